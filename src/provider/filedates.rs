//! File and clock date/time fields.
//!
//! `created`, `modified`, and `accessed` come from the file's metadata;
//! `today` and `now` come from the clock captured in the [`FileContext`],
//! so every reference within one render sees the same instant. All five
//! resolve to `MetaValue::DateTime`; formatting happens through the
//! renderer's dot attributes (`{created.year}`, `{modified.strftime,…}`).

use std::fs;
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Local, NaiveDateTime};

use super::{FileContext, Provider};
use crate::value::MetaValue;

/// Resolves the date/time fields.
pub struct FileDatesProvider;

fn to_naive(time: SystemTime) -> NaiveDateTime {
    DateTime::<Local>::from(time).naive_local()
}

impl Provider for FileDatesProvider {
    fn lookup(&self, name: &str, _subfield: Option<&str>, ctx: &FileContext) -> Result<MetaValue> {
        if matches!(name, "today" | "now") {
            return Ok(MetaValue::DateTime(ctx.now()));
        }

        let path = ctx.path();
        let metadata = fs::metadata(path)
            .with_context(|| format!("failed to stat {}", path.display()))?;

        let time = match name {
            // Not every filesystem records a birth time; fall back to the
            // modification time so `created` stays usable everywhere.
            "created" => metadata.created().or_else(|_| metadata.modified()),
            "modified" => metadata.modified(),
            "accessed" => metadata.accessed(),
            other => bail!("unsupported date field '{other}'"),
        }
        .with_context(|| format!("no {} timestamp for {}", name, path.display()))?;

        Ok(MetaValue::DateTime(to_naive(time)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn clock_fields_use_context_instant() {
        let pinned = chrono::NaiveDate::from_ymd_opt(2021, 6, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let ctx = FileContext::new("f").with_now(pinned);
        for name in ["today", "now"] {
            let value = FileDatesProvider.lookup(name, None, &ctx).unwrap();
            assert_eq!(value, MetaValue::DateTime(pinned));
        }
    }

    #[test]
    fn file_fields_stat_the_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "data").unwrap();
        let ctx = FileContext::new(file.path());
        for name in ["created", "modified", "accessed"] {
            let value = FileDatesProvider.lookup(name, None, &ctx).unwrap();
            assert!(matches!(value, MetaValue::DateTime(_)), "{name} not a datetime");
        }
    }

    #[test]
    fn missing_file_is_an_error() {
        let ctx = FileContext::new("/no/such/file/anywhere");
        assert!(FileDatesProvider.lookup("modified", None, &ctx).is_err());
    }
}
