//! Render-local variable environment.
//!
//! `{var:NAME,VALUE}` binds NAME to the rendered VALUE for the remainder of
//! the render; the binding never outlives it. Bindings are referenced two
//! ways: `{%NAME}` as a field resolves to the bound list, while a textual
//! `%NAME` inside literal text, a delimiter, a filter argument, or a format
//! string substitutes the bound string in place.
//!
//! Textual substitution replaces only names that are actually bound; an
//! unbound `%NAME` passes through verbatim. That is what lets strftime
//! patterns such as `%Y-%m-%d` travel through a default branch untouched.
//! `%%` always collapses to a single `%`.

use std::collections::HashMap;

/// Variable bindings for one render.
#[derive(Debug, Default)]
pub(crate) struct Variables {
    bindings: HashMap<String, Vec<String>>,
}

impl Variables {
    /// Bind `name` to `values`, replacing any previous binding.
    pub(crate) fn define(&mut self, name: &str, values: Vec<String>) {
        self.bindings.insert(name.to_string(), values);
    }

    /// The bound list, if `name` is defined.
    pub(crate) fn get(&self, name: &str) -> Option<&[String]> {
        self.bindings.get(name).map(Vec::as_slice)
    }

    /// True for `[A-Za-z_][A-Za-z0-9_]*`.
    pub(crate) fn is_valid_name(name: &str) -> bool {
        let mut chars = name.chars();
        match chars.next() {
            Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
            _ => return false,
        }
        chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
    }

    /// Expand `%NAME` references and `%%` escapes in `text`.
    ///
    /// A reference to a bound variable must be single-valued here; these
    /// are positions that need exactly one string. Unbound names are left
    /// verbatim.
    pub(crate) fn expand(&self, text: &str) -> Result<String, String> {
        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();

        while let Some(c) = chars.next() {
            if c != '%' {
                out.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                out.push('%');
                continue;
            }

            let mut name = String::new();
            while let Some(&next) = chars.peek() {
                let valid = if name.is_empty() {
                    next.is_ascii_alphabetic() || next == '_'
                } else {
                    next.is_ascii_alphanumeric() || next == '_'
                };
                if !valid {
                    break;
                }
                name.push(next);
                chars.next();
            }

            match self.bindings.get(&name) {
                Some(values) if values.len() == 1 => out.push_str(&values[0]),
                Some(values) => {
                    return Err(format!(
                        "variable '%{name}' has {} values where a single value is required",
                        values.len()
                    ));
                }
                None => {
                    out.push('%');
                    out.push_str(&name);
                }
            }
        }

        Ok(out)
    }
}
