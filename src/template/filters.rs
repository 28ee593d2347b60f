//! The filter catalogue.
//!
//! Filters apply left to right to a field's value list. Scalar-wise filters
//! transform each element; list-wise filters reshape the list itself.
//! Names and arities are checked at parse time; arguments are literal
//! except for `%NAME` expansion, so an argument containing `%` is
//! re-checked at render time once the variables are known.

use super::ast::FilterSpec;
use super::vars::Variables;

/// Filters that take no argument.
const NO_ARG: &[&str] = &[
    "lower",
    "upper",
    "strip",
    "titlecase",
    "capitalize",
    "braces",
    "parens",
    "brackets",
    "autosplit",
    "sort",
    "rsort",
    "reverse",
    "uniq",
];

/// Filters whose argument must be present and non-empty.
const REQUIRED_ARG: &[&str] = &[
    "split", "chop", "chomp", "append", "prepend", "remove", "appends", "prepends", "slice",
    "sslice",
];

/// Check a filter name and argument at parse time.
///
/// Arguments containing `%` may be variable references and are only
/// validated for presence here; their content is re-validated at render
/// time after expansion.
pub(crate) fn validate(name: &str, arg: Option<&str>) -> Result<(), String> {
    if NO_ARG.contains(&name) {
        return match arg {
            None => Ok(()),
            Some(_) => Err(format!("filter '{name}' takes no argument")),
        };
    }
    if REQUIRED_ARG.contains(&name) {
        return match arg {
            Some(a) if !a.is_empty() => validate_argument(name, a),
            _ => Err(format!("filter '{name}' requires an argument")),
        };
    }
    if name == "join" {
        // join() is legal: it joins with the empty string.
        return match arg {
            Some(_) => Ok(()),
            None => Err("filter 'join' requires an argument (which may be empty)".to_string()),
        };
    }
    Err(format!("unknown filter '{name}'"))
}

/// Validate argument content when it cannot be a variable reference.
fn validate_argument(name: &str, arg: &str) -> Result<(), String> {
    if arg.contains('%') {
        return Ok(());
    }
    match name {
        "chop" | "chomp" => arg
            .parse::<usize>()
            .map(|_| ())
            .map_err(|_| format!("filter '{name}' requires a non-negative integer, got '{arg}'")),
        "slice" | "sslice" => parse_slice(arg).map(|_| ()),
        _ => Ok(()),
    }
}

/// Apply one filter to a value list.
pub(crate) fn apply(
    spec: &FilterSpec,
    values: Vec<String>,
    vars: &Variables,
) -> Result<Vec<String>, String> {
    let arg = match &spec.arg {
        Some(raw) => Some(vars.expand(raw)?),
        None => None,
    };
    let arg = arg.as_deref();

    let filtered = match spec.name.as_str() {
        "lower" => each(values, |v| v.to_lowercase()),
        "upper" => each(values, |v| v.to_uppercase()),
        "strip" => each(values, |v| v.trim().to_string()),
        "titlecase" => each(values, |v| titlecase(&v)),
        "capitalize" => each(values, |v| capitalize(&v)),
        "braces" => each(values, |v| format!("{{{v}}}")),
        "parens" => each(values, |v| format!("({v})")),
        "brackets" => each(values, |v| format!("[{v}]")),
        "chop" => {
            let n = count_argument("chop", arg)?;
            each(values, |v| chop(&v, n))
        }
        "chomp" => {
            let n = count_argument("chomp", arg)?;
            each(values, |v| v.chars().skip(n).collect())
        }
        "appends" => {
            let tail = required("appends", arg)?;
            each(values, |v| format!("{v}{tail}"))
        }
        "prepends" => {
            let head = required("prepends", arg)?;
            each(values, |v| format!("{head}{v}"))
        }
        "split" => {
            let sep = required("split", arg)?;
            values
                .iter()
                .flat_map(|v| v.split(sep).map(str::to_string))
                .collect()
        }
        "autosplit" => values
            .iter()
            .flat_map(|v| v.split([',', ';', ' ']))
            .filter(|piece| !piece.is_empty())
            .map(str::to_string)
            .collect(),
        "sort" => {
            let mut values = values;
            values.sort();
            values
        }
        "rsort" => {
            let mut values = values;
            values.sort_by(|a, b| b.cmp(a));
            values
        }
        "reverse" => {
            let mut values = values;
            values.reverse();
            values
        }
        "uniq" => {
            let mut seen = Vec::new();
            for value in values {
                if !seen.contains(&value) {
                    seen.push(value);
                }
            }
            seen
        }
        "join" => {
            let sep = arg.unwrap_or("");
            vec![values.join(sep)]
        }
        "append" => {
            let mut values = values;
            values.push(required("append", arg)?.to_string());
            values
        }
        "prepend" => {
            let mut values = values;
            values.insert(0, required("prepend", arg)?.to_string());
            values
        }
        "remove" => {
            let unwanted = required("remove", arg)?;
            values.into_iter().filter(|v| v != unwanted).collect()
        }
        "slice" => {
            let spec = parse_slice(required("slice", arg)?)?;
            slice_indices(values.len(), &spec)
                .into_iter()
                .map(|i| values[i].clone())
                .collect()
        }
        "sslice" => {
            let spec = parse_slice(required("sslice", arg)?)?;
            each(values, |v| {
                let chars: Vec<char> = v.chars().collect();
                slice_indices(chars.len(), &spec)
                    .into_iter()
                    .map(|i| chars[i])
                    .collect()
            })
        }
        other => return Err(format!("unknown filter '{other}'")),
    };
    Ok(filtered)
}

fn each(values: Vec<String>, f: impl Fn(String) -> String) -> Vec<String> {
    values.into_iter().map(f).collect()
}

fn required<'a>(name: &str, arg: Option<&'a str>) -> Result<&'a str, String> {
    match arg {
        Some(a) if !a.is_empty() => Ok(a),
        _ => Err(format!("filter '{name}' requires an argument")),
    }
}

fn count_argument(name: &str, arg: Option<&str>) -> Result<usize, String> {
    required(name, arg)?
        .parse::<usize>()
        .map_err(|_| format!("filter '{name}' requires a non-negative integer"))
}

/// Remove `n` characters from the end.
fn chop(value: &str, n: usize) -> String {
    let total = value.chars().count();
    value.chars().take(total.saturating_sub(n)).collect()
}

/// Uppercase the first letter of each word, lowercase the rest. Word
/// boundaries are non-alphabetic characters.
fn titlecase(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut at_boundary = true;
    for c in value.chars() {
        if c.is_alphabetic() {
            if at_boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_boundary = false;
        } else {
            out.push(c);
            at_boundary = true;
        }
    }
    out
}

/// Uppercase the first character, lowercase everything after it.
fn capitalize(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
        None => String::new(),
    }
}

/// A `start:stop:step` slice specification.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SliceSpec {
    start: Option<i64>,
    stop: Option<i64>,
    step: i64,
}

/// Parse a slice specification: one to three `:`-separated optional
/// integers, `start:stop:step`.
pub(crate) fn parse_slice(arg: &str) -> Result<SliceSpec, String> {
    let parts: Vec<&str> = arg.split(':').collect();
    if parts.len() > 3 {
        return Err(format!("invalid slice '{arg}': too many ':' separators"));
    }
    let parse_part = |part: &str| -> Result<Option<i64>, String> {
        if part.is_empty() {
            Ok(None)
        } else {
            part.parse::<i64>()
                .map(Some)
                .map_err(|_| format!("invalid slice '{arg}': '{part}' is not an integer"))
        }
    };
    let start = parse_part(parts[0])?;
    let stop = parse_part(parts.get(1).copied().unwrap_or(""))?;
    let step = parse_part(parts.get(2).copied().unwrap_or(""))?.unwrap_or(1);
    if step == 0 {
        return Err(format!("invalid slice '{arg}': step cannot be zero"));
    }
    Ok(SliceSpec { start, stop, step })
}

/// Resolve a slice over a sequence of `len` items to the selected indices,
/// honouring negative indices and negative steps.
fn slice_indices(len: usize, spec: &SliceSpec) -> Vec<usize> {
    let len = len as i64;
    let step = spec.step;

    let clamp = |index: i64, low: i64, high: i64| -> i64 {
        let adjusted = if index < 0 { index + len } else { index };
        adjusted.clamp(low, high)
    };

    let mut indices = Vec::new();
    if step > 0 {
        let start = spec.start.map(|s| clamp(s, 0, len)).unwrap_or(0);
        let stop = spec.stop.map(|s| clamp(s, 0, len)).unwrap_or(len);
        let mut i = start;
        while i < stop {
            indices.push(i as usize);
            i += step;
        }
    } else {
        let start = spec.start.map(|s| clamp(s, -1, len - 1)).unwrap_or(len - 1);
        let stop = spec.stop.map(|s| clamp(s, -1, len - 1)).unwrap_or(-1);
        let mut i = start;
        while i > stop {
            indices.push(i as usize);
            i += step;
        }
    }
    indices
}
