//! The Metadata Template Language (MTL).
//!
//! MTL renders one or more output strings, typically destination paths,
//! from per-file metadata. A template is literal text interleaved with
//! `{…}` fields:
//!
//! ```text
//! {audio:artist}/{audio:album}/{format:int:02d,{audio:track}} - {audio:title}.mp3
//! ```
//!
//! # Field anatomy
//!
//! Inside the braces, a field reads left to right:
//!
//! ```text
//! {delim+name:subfield.attr|filter(arg)[find,replace] op value?bool,default}
//! ```
//!
//! - `delim+` - join a multi-valued field into one string with `delim`
//!   (`{,+keywords}` → `a,b`); bare `+` joins with nothing. Without it, a
//!   field with N values multiplies the whole template into N outputs.
//! - `name:subfield` - the metadata field, dispatched to a provider
//!   (`audio:artist`, `exiftool:Keywords`).
//! - `.attr` - navigation: date/time attributes (`{created.year}`,
//!   `{created.strftime,%Y-%m}`) and path components
//!   (`{filepath.parent.name}`).
//! - `|filter` - transformation chain (`|lower|parens`, `|split(;)`).
//! - `[find,replace|…]` - literal substitutions applied in order.
//! - ` op value` - a conditional: note the single space before the
//!   operator; `{ISO < 100}` tests, `{ISO<100}` is a field named `ISO<100`.
//!   Operators: `contains`, `matches`, `startswith`, `endswith`, `==`,
//!   `!=`, `<`, `<=`, `>`, `>=`, optionally preceded by `not`. Alternative
//!   candidates are separated by `|`.
//! - `?bool` - emitted when the field (or conditional) is truthy.
//! - `,default` - substituted when the field has no value (or the
//!   conditional is false). With neither, a missing value renders as `_`.
//!
//! Defaults, boolean branches, conditional values, and the replace side of
//! a find/replace pair are templates themselves, so they may contain
//! nested fields. The find side is plain text to search for.
//!
//! # Variables and escapes
//!
//! `{var:NAME,VALUE}` emits nothing and binds `NAME` for the rest of the
//! render; `{%NAME}` reads the binding back as a field, and `%NAME` inside
//! text, delimiters, and filter arguments substitutes it textually. `%%`
//! is always a literal `%`. Punctuation that the grammar reserves is
//! emitted through fixed fields: `{comma}`, `{pipe}`, `{openbrace}`, and
//! friends.

pub(crate) mod ast;
mod cond;
pub(crate) mod error;
pub(crate) mod filters;
mod formatspec;
mod lexer;
mod parser;
mod renderer;
pub(crate) mod vars;


pub use ast::Template;
pub use error::{Span, TemplateError};
pub use renderer::TemplateEngine;
