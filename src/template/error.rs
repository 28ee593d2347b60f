//! Template error types.
//!
//! Parsing reports a byte offset into the template source; rendering
//! reports the span of the field that failed. The host decides whether a
//! failed template aborts the surrounding batch. A render either produces
//! its complete output list or an error; no partial output is emitted.

use thiserror::Error;

/// Byte range into the original template source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Offset of the first byte.
    pub start: usize,
    /// Offset one past the last byte.
    pub end: usize,
}

impl Span {
    pub(crate) fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }
}

impl std::fmt::Display for Span {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bytes {}..{}", self.start, self.end)
    }
}

/// Errors raised while parsing or rendering a template.
#[derive(Error, Debug)]
pub enum TemplateError {
    /// The template source does not conform to the grammar.
    #[error("template syntax error at byte {offset}: {message}")]
    Parse {
        /// Byte offset where the problem was detected.
        offset: usize,
        /// Human-readable description.
        message: String,
    },

    /// No provider is registered for the field's top-level name.
    #[error("unknown template field '{name}' ({span})")]
    UnknownField {
        /// The unrecognised field name.
        name: String,
        /// Location of the field in the source.
        span: Span,
    },

    /// A provider with the hard error policy failed.
    #[error("provider for field '{name}' failed ({span}): {source}")]
    Provider {
        /// The field whose provider failed.
        name: String,
        /// Location of the field in the source.
        span: Span,
        /// The underlying provider error.
        source: anyhow::Error,
    },

    /// `{%NAME}` referenced a variable that was never defined.
    #[error("variable '%{name}' is not defined ({span})")]
    UndefinedVariable {
        /// The variable name, without the leading `%`.
        name: String,
        /// Location of the reference.
        span: Span,
    },

    /// A dot attribute is not valid for the value it was applied to.
    #[error("invalid attribute '{attr}' for field '{name}' ({span})")]
    InvalidPath {
        /// The field being navigated.
        name: String,
        /// The offending attribute.
        attr: String,
        /// Location of the field.
        span: Span,
    },

    /// Any other render-time misuse: a multi-valued value where a single
    /// string is required, malformed `var`/`format` usage, an invalid
    /// strftime or format specification, a bad filter argument.
    #[error("{message} ({span})")]
    Value {
        /// Human-readable description.
        message: String,
        /// Location of the field (or enclosing template) that failed.
        span: Span,
    },
}

impl TemplateError {
    pub(crate) fn parse(offset: usize, message: impl Into<String>) -> Self {
        TemplateError::Parse {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn value(span: Span, message: impl Into<String>) -> Self {
        TemplateError::Value {
            message: message.into(),
            span,
        }
    }

    /// The source span the error refers to, when the error is tied to one.
    pub fn span(&self) -> Option<Span> {
        match self {
            TemplateError::Parse { .. } => None,
            TemplateError::UnknownField { span, .. }
            | TemplateError::Provider { span, .. }
            | TemplateError::UndefinedVariable { span, .. }
            | TemplateError::InvalidPath { span, .. }
            | TemplateError::Value { span, .. } => Some(*span),
        }
    }
}
