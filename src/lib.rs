//! Metadata-driven path templating.
//!
//! pathmint is the core of a file organizer: it renders destination
//! directory paths and filenames for a file from that file's metadata,
//! using the Metadata Template Language (MTL). The crate owns the
//! language (lexer, parser, and renderer) plus the provider interface
//! that metadata extractors plug into. Moving files, walking directories,
//! and the heavyweight extractors (audio tags, EXIF, PDF, …) are the
//! host's business; they meet this crate only at the [`Provider`] trait.
//!
//! # Core modules
//!
//! - [`template`] - the MTL front end and renderer: [`Template`],
//!   [`TemplateEngine`], [`TemplateError`]
//! - [`provider`] - the [`Provider`] trait, [`ProviderRegistry`], and the
//!   built-in providers (punctuation, `filepath`, file dates, file stat)
//! - [`value`] - the [`MetaValue`] runtime value model
//! - [`options`] - [`RenderOptions`]
//!
//! # Rendering a template
//!
//! ```
//! use std::sync::Arc;
//! use pathmint::{
//!     ErrorPolicy, FileContext, MetaValue, Provider, ProviderRegistry, Template,
//!     TemplateEngine,
//! };
//!
//! // A host-supplied metadata source.
//! struct AudioTags;
//!
//! impl Provider for AudioTags {
//!     fn lookup(
//!         &self,
//!         _name: &str,
//!         subfield: Option<&str>,
//!         _ctx: &FileContext,
//!     ) -> anyhow::Result<MetaValue> {
//!         Ok(match subfield {
//!             Some("artist") => MetaValue::scalar("The Piano Guys"),
//!             Some("album") => MetaValue::scalar("Wonders"),
//!             _ => MetaValue::Null,
//!         })
//!     }
//! }
//!
//! let mut registry = ProviderRegistry::with_defaults();
//! registry.register(&["audio"], Arc::new(AudioTags), ErrorPolicy::Hard);
//!
//! let engine = TemplateEngine::new(registry);
//! let template = Template::parse("{audio:artist}/{audio:album}")?;
//! let outputs = engine.render(&template, &FileContext::new("song.mp3"))?;
//! assert_eq!(outputs, vec!["The Piano Guys/Wonders"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Multi-valued fields
//!
//! A field whose provider returns several values renders the template once
//! per value; prefixing the field with `+` (optionally after a join
//! delimiter) collapses them instead:
//!
//! ```
//! # use std::sync::Arc;
//! # use pathmint::{ErrorPolicy, FileContext, MetaValue, Provider, ProviderRegistry, TemplateEngine};
//! # struct Tags;
//! # impl Provider for Tags {
//! #     fn lookup(&self, _n: &str, _s: Option<&str>, _c: &FileContext) -> anyhow::Result<MetaValue> {
//! #         Ok(MetaValue::List(vec!["foo".into(), "bar".into()]))
//! #     }
//! # }
//! # let mut registry = ProviderRegistry::with_defaults();
//! # registry.register(&["keywords"], Arc::new(Tags), ErrorPolicy::Hard);
//! # let engine = TemplateEngine::new(registry);
//! # let ctx = FileContext::new("f");
//! assert_eq!(engine.render_str("{keywords}", &ctx)?, vec!["foo", "bar"]);
//! assert_eq!(engine.render_str("{,+keywords}", &ctx)?, vec!["foo,bar"]);
//! # Ok::<(), pathmint::TemplateError>(())
//! ```

pub mod options;
pub mod provider;
pub mod template;
pub mod value;

pub use options::RenderOptions;
pub use provider::{ErrorPolicy, FileContext, Provider, ProviderRegistry};
pub use template::{Span, Template, TemplateEngine, TemplateError};
pub use value::MetaValue;
