//! Punctuation fields.
//!
//! Much of the punctuation a user might want in an output path is template
//! syntax: `{` opens a field, `,` introduces a default, `|` separates
//! filters, and so on. These characters are emitted through fixed fields
//! instead: `{openbrace}value{closebrace}` renders to `{value}`.

use anyhow::Result;

use super::{FileContext, Provider};
use crate::value::MetaValue;

/// Field names served by [`PunctuationProvider`].
pub const NAMES: &[&str] = &[
    "comma",
    "semicolon",
    "questionmark",
    "pipe",
    "percent",
    "openbrace",
    "closebrace",
    "openparens",
    "closeparens",
    "openbracket",
    "closebracket",
    "newline",
    "lf",
    "cr",
    "crlf",
];

/// Resolves each punctuation field to its fixed character.
pub struct PunctuationProvider;

fn character(name: &str) -> Option<&'static str> {
    Some(match name {
        "comma" => ",",
        "semicolon" => ";",
        "questionmark" => "?",
        "pipe" => "|",
        "percent" => "%",
        "openbrace" => "{",
        "closebrace" => "}",
        "openparens" => "(",
        "closeparens" => ")",
        "openbracket" => "[",
        "closebracket" => "]",
        "newline" | "lf" => "\n",
        "cr" => "\r",
        "crlf" => "\r\n",
        _ => return None,
    })
}

impl Provider for PunctuationProvider {
    fn lookup(&self, name: &str, _subfield: Option<&str>, _ctx: &FileContext) -> Result<MetaValue> {
        Ok(character(name).map(MetaValue::scalar).unwrap_or(MetaValue::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_registered_name_resolves() {
        let ctx = FileContext::new("f");
        for name in NAMES {
            let value = PunctuationProvider.lookup(name, None, &ctx).unwrap();
            assert!(!value.is_null(), "{name} did not resolve");
        }
    }

    #[test]
    fn lf_aliases_newline() {
        assert_eq!(character("lf"), character("newline"));
    }
}
