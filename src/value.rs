//! Runtime value model for metadata lookups.
//!
//! Every provider lookup resolves to a [`MetaValue`]: nothing, an ordered
//! list of strings, or a date/time instant. A scalar string is modelled as a
//! single-element list so the renderer only ever deals with one multi-valued
//! shape. Date/time values stay opaque until the renderer navigates them
//! with a dot attribute (`{created.year}`) or hands them to `strftime`; only
//! then do they become strings.
//!
//! This module also owns the two path-navigation tables:
//!
//! - the date/time attribute table (`date`, `year`, `yy`, `month`, `mon`,
//!   `mm`, `dd`, `dow`, `doy`, `hour`, `min`, `sec`), and
//! - the path-component attributes applied to list values (`name`, `stem`,
//!   `suffix`, `parent`).

use std::path::Path;

use chrono::NaiveDateTime;
use chrono::format::{Item, StrftimeItems};

/// A value produced by a metadata provider.
///
/// `Null` and an empty `List` are distinct at the provider boundary (a
/// provider that knows a field but has no data returns `Null`; one that
/// computed an empty collection returns `List(vec![])`), but both count as
/// "no value" once the renderer decides between a field's value and its
/// default branch.
#[derive(Debug, Clone, PartialEq)]
pub enum MetaValue {
    /// The field is known but has no value for this file.
    Null,
    /// One or more string values, in provider order.
    List(Vec<String>),
    /// A date/time instant, resolved to strings via dot attributes.
    DateTime(NaiveDateTime),
}

impl MetaValue {
    /// A single-valued list. Convenience for the common scalar case.
    pub fn scalar(value: impl Into<String>) -> Self {
        MetaValue::List(vec![value.into()])
    }

    /// True for `Null`.
    pub fn is_null(&self) -> bool {
        matches!(self, MetaValue::Null)
    }
}

impl From<String> for MetaValue {
    fn from(value: String) -> Self {
        MetaValue::List(vec![value])
    }
}

impl From<&str> for MetaValue {
    fn from(value: &str) -> Self {
        MetaValue::scalar(value)
    }
}

impl From<Vec<String>> for MetaValue {
    fn from(values: Vec<String>) -> Self {
        MetaValue::List(values)
    }
}

impl From<Option<String>> for MetaValue {
    fn from(value: Option<String>) -> Self {
        match value {
            Some(v) => MetaValue::List(vec![v]),
            None => MetaValue::Null,
        }
    }
}

impl From<NaiveDateTime> for MetaValue {
    fn from(value: NaiveDateTime) -> Self {
        MetaValue::DateTime(value)
    }
}

/// ISO 8601 rendering of a date/time value, used when a `DateTime` field is
/// emitted without any dot attribute.
pub(crate) fn datetime_iso(dt: &NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// Resolve a date/time dot attribute to its string form.
///
/// Returns `None` for an attribute that is not in the table (`strftime` is
/// handled separately because it consumes the field's default branch).
pub(crate) fn datetime_attr(dt: &NaiveDateTime, attr: &str) -> Option<String> {
    let fmt = match attr {
        "date" => "%Y-%m-%d",
        "year" => "%Y",
        "yy" => "%y",
        "month" => "%B",
        "mon" => "%b",
        "mm" => "%m",
        "dd" => "%d",
        "dow" => "%A",
        "doy" => "%j",
        "hour" => "%H",
        "min" => "%M",
        "sec" => "%S",
        _ => return None,
    };
    Some(dt.format(fmt).to_string())
}

/// Evaluate a strftime format string against a date/time value.
///
/// The format is pre-scanned so an invalid conversion yields an error
/// message instead of a formatting panic later.
pub(crate) fn strftime(dt: &NaiveDateTime, fmt: &str) -> Result<String, String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(fmt).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(format!("invalid strftime format '{fmt}'"));
    }
    Ok(dt.format_with_items(items.into_iter()).to_string())
}

/// Apply a path-component attribute to a single value.
///
/// Returns `None` for an attribute outside the `name`/`stem`/`suffix`/
/// `parent` table. Components that do not exist resolve to an empty string
/// (`suffix` of an extensionless file, `name` of `/`), except `parent`,
/// which mirrors the conventional path algebra: the parent of a bare file
/// name is `.` and the root is its own parent.
pub(crate) fn path_attr(value: &str, attr: &str) -> Option<String> {
    let path = Path::new(value);
    let resolved = match attr {
        "name" => path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "stem" => path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        "suffix" => path
            .extension()
            .map(|e| format!(".{}", e.to_string_lossy()))
            .unwrap_or_default(),
        "parent" => match path.parent() {
            Some(p) if p.as_os_str().is_empty() => ".".to_string(),
            Some(p) => p.to_string_lossy().into_owned(),
            None => value.to_string(),
        },
        _ => return None,
    };
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample_dt() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2020, 2, 4)
            .unwrap()
            .and_hms_opt(19, 7, 38)
            .unwrap()
    }

    #[test]
    fn scalar_is_single_element_list() {
        assert_eq!(
            MetaValue::scalar("x"),
            MetaValue::List(vec!["x".to_string()])
        );
    }

    #[test]
    fn option_conversion() {
        assert_eq!(MetaValue::from(None::<String>), MetaValue::Null);
        assert!(!MetaValue::from(Some("x".to_string())).is_null());
    }

    #[test]
    fn iso_rendering() {
        assert_eq!(datetime_iso(&sample_dt()), "2020-02-04T19:07:38");
    }

    #[test]
    fn datetime_attributes() {
        let dt = sample_dt();
        assert_eq!(datetime_attr(&dt, "date").unwrap(), "2020-02-04");
        assert_eq!(datetime_attr(&dt, "year").unwrap(), "2020");
        assert_eq!(datetime_attr(&dt, "yy").unwrap(), "20");
        assert_eq!(datetime_attr(&dt, "month").unwrap(), "February");
        assert_eq!(datetime_attr(&dt, "mon").unwrap(), "Feb");
        assert_eq!(datetime_attr(&dt, "mm").unwrap(), "02");
        assert_eq!(datetime_attr(&dt, "dd").unwrap(), "04");
        assert_eq!(datetime_attr(&dt, "dow").unwrap(), "Tuesday");
        assert_eq!(datetime_attr(&dt, "doy").unwrap(), "035");
        assert_eq!(datetime_attr(&dt, "hour").unwrap(), "19");
        assert_eq!(datetime_attr(&dt, "min").unwrap(), "07");
        assert_eq!(datetime_attr(&dt, "sec").unwrap(), "38");
        assert!(datetime_attr(&dt, "bogus").is_none());
    }

    #[test]
    fn strftime_valid_and_invalid() {
        let dt = sample_dt();
        assert_eq!(
            strftime(&dt, "%Y-%m-%d-%H%M%S").unwrap(),
            "2020-02-04-190738"
        );
        assert!(strftime(&dt, "%Q").is_err());
    }

    #[test]
    fn path_attributes() {
        assert_eq!(
            path_attr("/music/album/track.mp3", "name").unwrap(),
            "track.mp3"
        );
        assert_eq!(path_attr("/music/album/track.mp3", "stem").unwrap(), "track");
        assert_eq!(path_attr("/music/album/track.mp3", "suffix").unwrap(), ".mp3");
        assert_eq!(
            path_attr("/music/album/track.mp3", "parent").unwrap(),
            "/music/album"
        );
        assert_eq!(path_attr("README", "suffix").unwrap(), "");
        assert_eq!(path_attr("README", "parent").unwrap(), ".");
        assert_eq!(path_attr("/", "parent").unwrap(), "/");
        assert!(path_attr("x", "bogus").is_none());
    }

    #[test]
    fn chained_path_attributes() {
        let parent = path_attr("/music/album/track.mp3", "parent").unwrap();
        assert_eq!(path_attr(&parent, "name").unwrap(), "album");
    }
}
