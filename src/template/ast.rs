//! Parsed template representation.
//!
//! A template is an ordered list of segments: literal runs and `{…}`
//! fields. Positions that hold nested template text in the source
//! (conditional right-hand sides, boolean and default branches, replace
//! text, variable values) are parsed up front into sub-templates, so the
//! renderer never re-lexes strings.

use super::error::{Span, TemplateError};
use super::parser::Parser;

/// A parsed template, ready to render any number of times.
///
/// Parsing is cheap and allocation-bounded; templates are treated as
/// short-lived values and are not shared across threads.
///
/// # Examples
///
/// ```
/// use pathmint::Template;
///
/// let template = Template::parse("{audio:artist}/{audio:album}")?;
/// assert_eq!(template.fields(), vec!["audio", "audio"]);
/// # Ok::<(), pathmint::TemplateError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Template {
    pub(crate) segments: Vec<Segment>,
    pub(crate) span: Span,
}

impl Template {
    /// Parse a template source string.
    ///
    /// # Errors
    ///
    /// Returns [`TemplateError::Parse`] with a byte offset and message for
    /// any grammar violation: an unterminated field, an unknown conditional
    /// operator, a find/replace pair without a comma, an unknown filter or
    /// malformed filter argument, a stray `}`.
    pub fn parse(source: &str) -> Result<Self, TemplateError> {
        Parser::new(source).parse()
    }

    /// Top-level field names referenced by the template, in source order.
    ///
    /// Nested fields (inside defaults, conditionals, find/replace) are not
    /// included. Useful for validating a template against a registry before
    /// rendering.
    pub fn fields(&self) -> Vec<&str> {
        self.segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Field(field) => Some(field.name.as_str()),
                Segment::Literal(_) => None,
            })
            .collect()
    }
}

/// One top-level template element.
#[derive(Debug, Clone)]
pub(crate) enum Segment {
    /// Verbatim text (still subject to `%NAME`/`%%` expansion at render).
    Literal(String),
    /// A `{…}` field.
    Field(FieldExpr),
}

/// A parsed `{…}` field.
#[derive(Debug, Clone)]
pub(crate) struct FieldExpr {
    /// Location of the whole field, `{` through `}`.
    pub span: Span,
    /// Join separator from the `delim+` prefix, verbatim (may contain
    /// `%NAME` references). `None` for a bare `+` prefix.
    pub delim: Option<String>,
    /// True when the field had a `+` prefix: its values join into a single
    /// string instead of multiplying the output.
    pub in_place: bool,
    /// Top-level field name (or `%NAME` for a variable reference).
    pub name: String,
    /// Text after `:`, when present.
    pub subfield: Option<String>,
    /// Dot-attribute chain after the name/subfield.
    pub path: Vec<String>,
    /// Filter chain, applied left to right.
    pub filters: Vec<FilterSpec>,
    /// Find/replace pairs, applied in order after the filters. The find
    /// side is plain text (subject only to `%NAME`/`%%` expansion at
    /// render); the replace side is a sub-template.
    pub replacements: Vec<(String, Template)>,
    /// Conditional test, evaluated after filters and replacements.
    pub conditional: Option<Cond>,
    /// Branch emitted when the field (or its conditional) is truthy.
    pub bool_branch: Option<Template>,
    /// Branch substituted when the field has no value (or the conditional
    /// is false).
    pub default_branch: Option<Template>,
}

/// A single `|filter` or `|filter(arg)` application.
#[derive(Debug, Clone)]
pub(crate) struct FilterSpec {
    pub name: String,
    /// Argument text, verbatim. `Some("")` for empty parentheses.
    pub arg: Option<String>,
    pub span: Span,
}

/// A conditional test: `[not] op value`.
#[derive(Debug, Clone)]
pub(crate) struct Cond {
    pub negated: bool,
    pub op: CondOp,
    /// Right-hand side alternatives, pre-split on top-level `|`.
    pub rhs: Vec<Template>,
}

/// Conditional operators, longest-match scanned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CondOp {
    Contains,
    Matches,
    StartsWith,
    EndsWith,
    Eq,
    Ne,
    Le,
    Ge,
    Lt,
    Gt,
}

impl CondOp {
    /// Map an operator token to its variant.
    pub(crate) fn from_token(token: &str) -> Option<Self> {
        Some(match token {
            "contains" => CondOp::Contains,
            "matches" => CondOp::Matches,
            "startswith" => CondOp::StartsWith,
            "endswith" => CondOp::EndsWith,
            "==" => CondOp::Eq,
            "!=" => CondOp::Ne,
            "<=" => CondOp::Le,
            ">=" => CondOp::Ge,
            "<" => CondOp::Lt,
            ">" => CondOp::Gt,
            _ => return None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_lists_top_level_names() {
        let template = Template::parse("{created.year}/{audio:album}/{baz,{nested}}").unwrap();
        assert_eq!(template.fields(), vec!["created", "audio", "baz"]);
    }

    #[test]
    fn op_tokens_round_trip() {
        for token in [
            "contains",
            "matches",
            "startswith",
            "endswith",
            "==",
            "!=",
            "<=",
            ">=",
            "<",
            ">",
        ] {
            assert!(CondOp::from_token(token).is_some(), "{token}");
        }
        assert!(CondOp::from_token("=~").is_none());
    }
}
