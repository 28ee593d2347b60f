//! Metadata providers and their registry.
//!
//! A provider answers lookups for one or more top-level template field
//! names. The renderer never inspects file metadata itself; every
//! `{field}` reference is dispatched through a [`ProviderRegistry`] to the
//! single provider registered for that name, which returns a
//! [`MetaValue`](crate::MetaValue).
//!
//! The crate ships providers that need nothing beyond the standard library
//! and the clock:
//!
//! - [`punctuation`] - fixed characters that would otherwise be template
//!   syntax (`{comma}`, `{openbrace}`, `{pipe}`, …)
//! - [`filepath`] - the path of the file being processed
//! - [`filedates`] - `created`, `modified`, `accessed`, `today`, `now`
//! - [`filestat`] - `size`, `uid`, `gid`, `user`, `group`
//!
//! Heavyweight extractors (audio tags, EXIF, PDF, …) live outside this
//! crate; hosts register them with
//! [`ProviderRegistry::register`] under the field names they serve.
//!
//! # Implementing a provider
//!
//! ```
//! use pathmint::{FileContext, MetaValue, Provider};
//!
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
//!             _ => MetaValue::Null,
//!         })
//!     }
//! }
//! ```

use std::cell::OnceCell;
use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::{Local, NaiveDateTime};

use crate::value::MetaValue;

pub mod filedates;
pub mod filepath;
pub mod filestat;
pub mod punctuation;
mod registry;

pub use registry::{ErrorPolicy, ProviderRegistry};

/// Per-file lookup context handed to every provider.
///
/// Carries the path of the file being processed plus render-scoped scratch
/// state: the clock is captured on first use so `{today}` and `{now}`
/// resolve to the same instant for every field in one render.
///
/// A `FileContext` belongs to a single render; create a fresh one per file.
#[derive(Debug)]
pub struct FileContext {
    path: PathBuf,
    now: OnceCell<NaiveDateTime>,
}

impl FileContext {
    /// Create a context for the given source file.
    ///
    /// The path is not required to exist; only providers that stat the file
    /// will fail when it does not.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            now: OnceCell::new(),
        }
    }

    /// Path of the file being processed.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The current local date/time, captured once per context.
    pub fn now(&self) -> NaiveDateTime {
        *self.now.get_or_init(|| Local::now().naive_local())
    }

    /// Pin the clock to a fixed instant. Useful for hosts that want
    /// reproducible `{today}`/`{now}` output (and for tests).
    pub fn with_now(self, now: NaiveDateTime) -> Self {
        let _ = self.now.set(now);
        self
    }
}

/// A pluggable metadata source.
///
/// A provider is registered for one or more top-level field names and is
/// called with the name that matched, the optional `:subfield`, and the
/// file context. Implementations must behave as pure functions of
/// `(name, subfield, ctx)` for a given file; any caching they do must be
/// invalidated per file.
///
/// Lookups may block (stat calls, spawning an external tool); the renderer
/// treats every lookup as potentially blocking.
///
/// # Errors
///
/// Return `Err` for genuine failures (missing external binary, unreadable
/// file). Return `Ok(MetaValue::Null)` for "the field simply has no value
/// here". Whether an `Err` aborts the render or degrades to `Null` is
/// decided by the [`ErrorPolicy`] the provider was registered with.
pub trait Provider: Send + Sync {
    /// Resolve a field reference to a value.
    fn lookup(&self, name: &str, subfield: Option<&str>, ctx: &FileContext) -> Result<MetaValue>;
}
