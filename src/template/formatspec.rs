//! String formatting for `{format:TYPE:FORMAT,…}`.
//!
//! Implements the subset of the Python format-specification mini-language
//! the original tool documented for its users:
//!
//! ```text
//! [[fill]align][sign][0][width][,][.precision][type]
//! ```
//!
//! with alignments `<` `>` `^` `=`, signs `+` `-` and space, a thousands
//! separator for integers, and the types `d`, `f`, and `s` (or none).

/// Target type for `{format:TYPE:…}` coercion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CoerceType {
    Int,
    Float,
    Str,
}

impl CoerceType {
    pub(crate) fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "int" => CoerceType::Int,
            "float" => CoerceType::Float,
            "str" => CoerceType::Str,
            _ => return None,
        })
    }
}

/// Why formatting could not produce a result.
#[derive(Debug)]
pub(crate) enum FormatFailure {
    /// The value did not parse as the requested type. The caller emits the
    /// element unchanged.
    Coercion,
    /// The format specification itself is invalid. The caller fails the
    /// render.
    Spec(String),
}

#[derive(Debug, Default)]
struct FormatSpec {
    fill: Option<char>,
    align: Option<char>,
    sign: Option<char>,
    zero: bool,
    width: usize,
    thousands: bool,
    precision: Option<usize>,
    ty: Option<char>,
}

fn parse_spec(spec: &str) -> Result<FormatSpec, String> {
    let mut parsed = FormatSpec::default();
    let chars: Vec<char> = spec.chars().collect();
    let mut i = 0;

    // [[fill]align]
    if chars.len() >= 2 && matches!(chars[1], '<' | '>' | '^' | '=') {
        parsed.fill = Some(chars[0]);
        parsed.align = Some(chars[1]);
        i = 2;
    } else if !chars.is_empty() && matches!(chars[0], '<' | '>' | '^' | '=') {
        parsed.align = Some(chars[0]);
        i = 1;
    }

    if i < chars.len() && matches!(chars[i], '+' | '-' | ' ') {
        parsed.sign = Some(chars[i]);
        i += 1;
    }

    if i < chars.len() && chars[i] == '0' {
        parsed.zero = true;
        i += 1;
    }

    let width_start = i;
    while i < chars.len() && chars[i].is_ascii_digit() {
        i += 1;
    }
    if i > width_start {
        parsed.width = chars[width_start..i]
            .iter()
            .collect::<String>()
            .parse()
            .map_err(|_| format!("invalid width in format spec '{spec}'"))?;
    }

    if i < chars.len() && chars[i] == ',' {
        parsed.thousands = true;
        i += 1;
    }

    if i < chars.len() && chars[i] == '.' {
        i += 1;
        let precision_start = i;
        while i < chars.len() && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i == precision_start {
            return Err(format!("missing precision digits in format spec '{spec}'"));
        }
        parsed.precision = Some(
            chars[precision_start..i]
                .iter()
                .collect::<String>()
                .parse()
                .map_err(|_| format!("invalid precision in format spec '{spec}'"))?,
        );
    }

    if i < chars.len() {
        let ty = chars[i];
        i += 1;
        if i != chars.len() {
            return Err(format!("unrecognised format spec '{spec}'"));
        }
        if !matches!(ty, 'd' | 'f' | 's') {
            return Err(format!("unsupported format type '{ty}' in spec '{spec}'"));
        }
        parsed.ty = Some(ty);
    }

    Ok(parsed)
}

/// Coerce `value` to `ty` and format it with `spec`.
pub(crate) fn format_value(
    value: &str,
    ty: CoerceType,
    spec: &str,
) -> Result<String, FormatFailure> {
    let parsed = parse_spec(spec).map_err(FormatFailure::Spec)?;

    match ty {
        CoerceType::Str => {
            if matches!(parsed.ty, Some('d') | Some('f')) {
                return Err(FormatFailure::Spec(format!(
                    "format type '{}' requires a numeric value",
                    parsed.ty.expect("checked above"),
                )));
            }
            Ok(pad(value.to_string(), "", &parsed, false))
        }
        CoerceType::Int => {
            let number: i64 = value.trim().parse().map_err(|_| FormatFailure::Coercion)?;
            match parsed.ty {
                Some('f') => Ok(format_float(number as f64, &parsed)),
                Some('s') => Err(FormatFailure::Spec(
                    "format type 's' cannot be applied to an integer".to_string(),
                )),
                _ => Ok(format_int(number, &parsed)),
            }
        }
        CoerceType::Float => {
            let number: f64 = value.trim().parse().map_err(|_| FormatFailure::Coercion)?;
            match parsed.ty {
                Some('d') => Err(FormatFailure::Spec(
                    "format type 'd' cannot be applied to a float".to_string(),
                )),
                Some('s') => Err(FormatFailure::Spec(
                    "format type 's' cannot be applied to a float".to_string(),
                )),
                _ => Ok(format_float(number, &parsed)),
            }
        }
    }
}

fn format_int(number: i64, spec: &FormatSpec) -> String {
    let mut digits = number.unsigned_abs().to_string();
    if spec.thousands {
        digits = group_thousands(&digits);
    }
    pad(digits, sign_for(number.is_negative(), spec), spec, true)
}

fn format_float(number: f64, spec: &FormatSpec) -> String {
    let precision = spec.precision.unwrap_or(6);
    let mut body = format!("{:.*}", precision, number.abs());
    if spec.thousands {
        let (int_part, frac_part) = body.split_once('.').unwrap_or((body.as_str(), ""));
        let grouped = group_thousands(int_part);
        body = if frac_part.is_empty() {
            grouped
        } else {
            format!("{grouped}.{frac_part}")
        };
    }
    pad(body, sign_for(number.is_sign_negative(), spec), spec, true)
}

fn sign_for(negative: bool, spec: &FormatSpec) -> &'static str {
    if negative {
        "-"
    } else {
        match spec.sign {
            Some('+') => "+",
            Some(' ') => " ",
            _ => "",
        }
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    let chars: Vec<char> = digits.chars().collect();
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (chars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*c);
    }
    grouped
}

fn pad(body: String, sign: &str, spec: &FormatSpec, numeric: bool) -> String {
    let content_width = body.chars().count() + sign.chars().count();
    if content_width >= spec.width {
        return format!("{sign}{body}");
    }
    let padding = spec.width - content_width;

    // `0` with no explicit alignment means sign-aware zero padding.
    let align = spec.align.unwrap_or(match (spec.zero, numeric) {
        (true, _) => '=',
        (false, true) => '>',
        (false, false) => '<',
    });
    let fill = spec.fill.unwrap_or(if spec.zero && spec.align.is_none() {
        '0'
    } else {
        ' '
    });

    match align {
        '<' => format!("{sign}{body}{}", fill.to_string().repeat(padding)),
        '>' => format!("{}{sign}{body}", fill.to_string().repeat(padding)),
        '=' => format!("{sign}{}{body}", fill.to_string().repeat(padding)),
        '^' => {
            let left = padding / 2;
            let right = padding - left;
            format!(
                "{}{sign}{body}{}",
                fill.to_string().repeat(left),
                fill.to_string().repeat(right)
            )
        }
        _ => format!("{sign}{body}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fmt(value: &str, ty: CoerceType, spec: &str) -> String {
        format_value(value, ty, spec).unwrap()
    }

    #[test]
    fn zero_padded_integers() {
        assert_eq!(fmt("1", CoerceType::Int, "02d"), "01");
        assert_eq!(fmt("42", CoerceType::Int, "03d"), "042");
        assert_eq!(fmt("-5", CoerceType::Int, "04d"), "-005");
    }

    #[test]
    fn plain_and_signed_integers() {
        assert_eq!(fmt("42", CoerceType::Int, ""), "42");
        assert_eq!(fmt("42", CoerceType::Int, "+d"), "+42");
        assert_eq!(fmt(" 7 ", CoerceType::Int, "d"), "7");
    }

    #[test]
    fn thousands_grouping() {
        assert_eq!(fmt("2021", CoerceType::Int, ","), "2,021");
        assert_eq!(fmt("1234567", CoerceType::Int, ","), "1,234,567");
        assert_eq!(fmt("123", CoerceType::Int, ","), "123");
    }

    #[test]
    fn floats_with_precision_and_width() {
        assert_eq!(fmt("42", CoerceType::Float, "10.4f"), "   42.0000");
        assert_eq!(fmt("3.14159", CoerceType::Float, ".2f"), "3.14");
        assert_eq!(fmt("42", CoerceType::Float, "f"), "42.000000");
    }

    #[test]
    fn string_alignment() {
        assert_eq!(fmt("42", CoerceType::Str, "-^10"), "----42----");
        assert_eq!(fmt("ab", CoerceType::Str, "<5"), "ab   ");
        assert_eq!(fmt("ab", CoerceType::Str, ">5"), "   ab");
        assert_eq!(fmt("ab", CoerceType::Str, "5"), "ab   ");
    }

    #[test]
    fn numbers_default_to_right_alignment() {
        assert_eq!(fmt("42", CoerceType::Int, "5"), "   42");
    }

    #[test]
    fn coercion_failure_is_distinguished() {
        assert!(matches!(
            format_value("x", CoerceType::Int, "02d"),
            Err(FormatFailure::Coercion)
        ));
        assert!(matches!(
            format_value("42", CoerceType::Int, "02z"),
            Err(FormatFailure::Spec(_))
        ));
    }

    #[test]
    fn empty_spec_is_identity_for_strings() {
        assert_eq!(fmt("hello", CoerceType::Str, ""), "hello");
    }
}
