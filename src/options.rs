//! Render-time options.
//!
//! [`RenderOptions`] controls the handful of behaviours a host may want to
//! tune per invocation: the sentinel emitted for missing values, whether
//! multi-valued fields collapse in place, and whether rendered output is
//! trimmed. The struct is serde-enabled so hosts can load it straight from
//! their configuration files.

use serde::{Deserialize, Serialize};

/// Default sentinel emitted when a field has no value and no default branch.
pub const DEFAULT_NONE_STR: &str = "_";

/// Default separator used when [`RenderOptions::expand_inplace`] collapses a
/// multi-valued field that carries no delimiter of its own.
pub const DEFAULT_INPLACE_SEP: &str = ",";

/// Options governing template rendering.
///
/// All fields have sensible defaults; `RenderOptions::default()` matches the
/// documented behaviour of the template language.
///
/// # Examples
///
/// ```
/// use pathmint::RenderOptions;
///
/// let options = RenderOptions {
///     none_str: "unknown".to_string(),
///     ..RenderOptions::default()
/// };
/// assert!(!options.expand_inplace);
/// assert_eq!(options.inplace_sep, ",");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    /// String substituted for a field that renders to no value and has no
    /// default branch.
    pub none_str: String,

    /// Separator used when `expand_inplace` collapses a field that has no
    /// delimiter of its own. A per-field delimiter always wins.
    pub inplace_sep: String,

    /// When true, every multi-valued field collapses to a single joined
    /// string instead of producing one output per value.
    pub expand_inplace: bool,

    /// When true, trim leading and trailing whitespace from each fully
    /// rendered output string.
    pub strip: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            none_str: DEFAULT_NONE_STR.to_string(),
            inplace_sep: DEFAULT_INPLACE_SEP.to_string(),
            expand_inplace: false,
            strip: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_behaviour() {
        let options = RenderOptions::default();
        assert_eq!(options.none_str, "_");
        assert_eq!(options.inplace_sep, ",");
        assert!(!options.expand_inplace);
        assert!(!options.strip);
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let options: RenderOptions = serde_json::from_str(r#"{"none_str": "-"}"#).unwrap();
        assert_eq!(options.none_str, "-");
        assert_eq!(options.inplace_sep, ",");
    }
}
