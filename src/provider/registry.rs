//! Dispatch from top-level field names to registered providers.

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;

use super::filedates::FileDatesProvider;
use super::filepath::FilepathProvider;
use super::filestat::FileStatProvider;
use super::punctuation::{self, PunctuationProvider};
use super::{FileContext, Provider};
use crate::value::MetaValue;

/// How a provider failure is surfaced to the render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// A lookup error aborts the render.
    Hard,
    /// A lookup error degrades to `Null` with a logged warning. Use this
    /// for providers that are optional on some platforms.
    Soft,
}

struct Registered {
    provider: Arc<dyn Provider>,
    policy: ErrorPolicy,
}

/// Maps each top-level field name to exactly one provider.
///
/// The registry is built up front and then handed to the engine, after
/// which it is never mutated: concurrent renders may share it freely.
///
/// `var`, `strip`, and `format` are handled by the renderer itself and must
/// not be registered here.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use pathmint::{ErrorPolicy, FileContext, MetaValue, Provider, ProviderRegistry};
///
/// struct Answer;
/// impl Provider for Answer {
///     fn lookup(
///         &self,
///         _name: &str,
///         _subfield: Option<&str>,
///         _ctx: &FileContext,
///     ) -> anyhow::Result<MetaValue> {
///         Ok(MetaValue::scalar("42"))
///     }
/// }
///
/// let mut registry = ProviderRegistry::with_defaults();
/// registry.register(&["answer"], Arc::new(Answer), ErrorPolicy::Hard);
/// assert!(registry.contains("answer"));
/// assert!(registry.contains("filepath"));
/// ```
pub struct ProviderRegistry {
    providers: HashMap<String, Registered>,
}

impl ProviderRegistry {
    /// An empty registry. Most hosts want [`with_defaults`] instead.
    ///
    /// [`with_defaults`]: ProviderRegistry::with_defaults
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
        }
    }

    /// A registry pre-loaded with the built-in providers: punctuation
    /// fields, `filepath`, the file and clock dates, and the stat fields.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();

        registry.register(punctuation::NAMES, Arc::new(PunctuationProvider), ErrorPolicy::Hard);
        registry.register(&["filepath"], Arc::new(FilepathProvider), ErrorPolicy::Hard);
        registry.register(
            &["created", "modified", "accessed", "today", "now"],
            Arc::new(FileDatesProvider),
            ErrorPolicy::Hard,
        );

        let stat = Arc::new(FileStatProvider);
        registry.register(&["size", "uid", "gid"], stat.clone(), ErrorPolicy::Hard);
        // Account-name resolution is best-effort: a uid with no passwd entry
        // (or a non-Unix host) degrades to the missing-value path.
        registry.register(&["user", "group"], stat, ErrorPolicy::Soft);

        registry
    }

    /// Register `provider` for every name in `names` with the given error
    /// policy. Re-registering a name replaces the previous provider.
    pub fn register(&mut self, names: &[&str], provider: Arc<dyn Provider>, policy: ErrorPolicy) {
        for name in names {
            self.providers.insert(
                (*name).to_string(),
                Registered {
                    provider: provider.clone(),
                    policy,
                },
            );
        }
    }

    /// True if a provider is registered for `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.providers.contains_key(name)
    }

    /// Registered field names, unordered.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.providers.keys().map(String::as_str)
    }

    /// Dispatch a lookup.
    ///
    /// Returns `None` when no provider is registered for `name`. A provider
    /// error is propagated for `Hard` registrations and converted to `Null`
    /// (with a warning) for `Soft` ones.
    pub(crate) fn lookup(
        &self,
        name: &str,
        subfield: Option<&str>,
        ctx: &FileContext,
    ) -> Option<Result<MetaValue>> {
        let registered = self.providers.get(name)?;
        tracing::debug!(field = name, subfield, "provider lookup");
        match registered.provider.lookup(name, subfield, ctx) {
            Ok(value) => Some(Ok(value)),
            Err(err) => match registered.policy {
                ErrorPolicy::Hard => Some(Err(err)),
                ErrorPolicy::Soft => {
                    tracing::warn!(field = name, error = %err, "provider failed; treating value as missing");
                    Some(Ok(MetaValue::Null))
                }
            },
        }
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::bail;

    struct Failing;

    impl Provider for Failing {
        fn lookup(
            &self,
            _name: &str,
            _subfield: Option<&str>,
            _ctx: &FileContext,
        ) -> Result<MetaValue> {
            bail!("backend unavailable")
        }
    }

    #[test]
    fn unknown_name_is_none() {
        let registry = ProviderRegistry::new();
        let ctx = FileContext::new("f");
        assert!(registry.lookup("nope", None, &ctx).is_none());
    }

    #[test]
    fn defaults_cover_builtin_names() {
        let registry = ProviderRegistry::with_defaults();
        for name in [
            "comma", "pipe", "percent", "openbrace", "closebrace", "filepath", "created",
            "modified", "accessed", "today", "now", "size", "uid", "gid", "user", "group",
        ] {
            assert!(registry.contains(name), "missing default provider for {name}");
        }
    }

    #[test]
    fn hard_policy_propagates_errors() {
        let mut registry = ProviderRegistry::new();
        registry.register(&["x"], Arc::new(Failing), ErrorPolicy::Hard);
        let ctx = FileContext::new("f");
        assert!(registry.lookup("x", None, &ctx).unwrap().is_err());
    }

    #[test]
    fn soft_policy_degrades_to_null() {
        let mut registry = ProviderRegistry::new();
        registry.register(&["x"], Arc::new(Failing), ErrorPolicy::Soft);
        let ctx = FileContext::new("f");
        let value = registry.lookup("x", None, &ctx).unwrap().unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn re_registration_replaces() {
        struct Fixed(&'static str);
        impl Provider for Fixed {
            fn lookup(
                &self,
                _name: &str,
                _subfield: Option<&str>,
                _ctx: &FileContext,
            ) -> Result<MetaValue> {
                Ok(MetaValue::scalar(self.0))
            }
        }

        let mut registry = ProviderRegistry::new();
        registry.register(&["x"], Arc::new(Fixed("a")), ErrorPolicy::Hard);
        registry.register(&["x"], Arc::new(Fixed("b")), ErrorPolicy::Hard);
        let ctx = FileContext::new("f");
        let value = registry.lookup("x", None, &ctx).unwrap().unwrap();
        assert_eq!(value, MetaValue::scalar("b"));
    }
}
