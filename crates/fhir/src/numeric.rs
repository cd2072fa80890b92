//! Number scanning and rendering for free-text clinical input.
//!
//! Two flavours of parsing are needed by the edit fields:
//! - a *leading* parse that reads the longest numeric prefix of a token (`"12.5mg"` is `12.5`)
//! - a *whole* parse that accepts a string only if, once trimmed, it is entirely a number

/// Reads the longest decimal number at the start of `s` (after leading whitespace).
///
/// Accepts an optional sign, digits with an optional fraction, and an optional exponent.
/// `"Infinity"` is recognised after the sign. Returns `None` when no digits are present.
pub(crate) fn parse_leading_float(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end += 1;
    }

    if s[end..].starts_with("Infinity") {
        let negative = bytes.first() == Some(&b'-');
        return Some(if negative {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        if digits > 0 || frac_end > frac_start {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    // Exponent only counts when at least one digit follows it.
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().ok()
}

/// Reads the optionally signed run of decimal digits at the start of `s` (after leading
/// whitespace), ignoring any fraction or exponent: `"1e2"` is `1`, `"40.5"` is `40`.
///
/// The value is returned as `f64` so arbitrarily long digit runs never overflow.
pub(crate) fn parse_leading_int(s: &str) -> Option<f64> {
    let s = s.trim_start();
    let bytes = s.as_bytes();
    let sign_len = usize::from(matches!(bytes.first(), Some(b'+') | Some(b'-')));
    let digits = bytes[sign_len..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse::<f64>().ok()
}

/// Parses `s` as a number only if the whole (trimmed) string is numeric.
///
/// Blank strings are not numbers.
pub(crate) fn parse_number(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// Renders a number in its shortest form: `50` rather than `50.0`, `12.5` as is.
pub(crate) fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Collapses negative zero.
        return "0".to_string();
    }
    value.to_string()
}
