//! Numeric utilities: lenient parsing of caller-supplied values.
//!
//! Guidelines
//! - Request fields arrive as loosely typed JSON. Parsing never fails hard: a value that
//!   cannot be read as a number yields `None`, and the caller decides what absence means.
//! - Integer parsing follows the leading-integer rule (`"2"`, `" 2 "`, `"2px"` all read as 2;
//!   `"abc"` and `""` read as nothing). Numbers with a fractional part are truncated.

use serde_json::Value;

/// Parse the leading base-10 integer of `s` (after optional whitespace and sign).
#[must_use]
pub fn parse_int_prefix(s: &str) -> Option<i64> {
    let t = s.trim_start();
    let (neg, rest) = match t.as_bytes().first() {
        Some(b'-') => (true, &t[1..]),
        Some(b'+') => (false, &t[1..]),
        _ => (false, t),
    };
    let digits_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if digits_len == 0 {
        return None;
    }
    let magnitude: i64 = rest[..digits_len].parse().ok()?;
    Some(if neg { -magnitude } else { magnitude })
}

/// Exact conversion of a float with no fractional part.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_exact(v: f64) -> Option<i64> {
    if v.is_finite() && v.fract() == 0.0 && v >= i64::MIN as f64 && v <= i64::MAX as f64 {
        Some(v as i64)
    } else {
        None
    }
}

/// Truncating conversion; `None` for NaN or infinities.
#[inline]
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
pub fn f64_to_i64_trunc(v: f64) -> Option<i64> {
    if !v.is_finite() || v < i64::MIN as f64 || v > i64::MAX as f64 {
        return None;
    }
    Some(v.trunc() as i64)
}

/// Integer from a JSON number or numeric string.
#[must_use]
pub fn lenient_i64(v: &Value) -> Option<i64> {
    match v {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().and_then(f64_to_i64_trunc)),
        Value::String(s) => parse_int_prefix(s),
        _ => None,
    }
}

/// Finite float from a JSON number or numeric string.
#[must_use]
pub fn lenient_f64(v: &Value) -> Option<f64> {
    let f = match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    f.is_finite().then_some(f)
}

/// Text from a JSON string or number (numbers are rendered as written).
#[must_use]
pub fn lenient_string(v: &Value) -> Option<String> {
    match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn int_prefix_rules() {
        assert_eq!(parse_int_prefix("2"), Some(2));
        assert_eq!(parse_int_prefix("  -1"), Some(-1));
        assert_eq!(parse_int_prefix("+7"), Some(7));
        assert_eq!(parse_int_prefix("2abc"), Some(2));
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("99999999999999999999"), None);
    }

    #[test]
    fn lenient_values() {
        assert_eq!(lenient_i64(&json!(1)), Some(1));
        assert_eq!(lenient_i64(&json!(1.9)), Some(1));
        assert_eq!(lenient_i64(&json!("1")), Some(1));
        assert_eq!(lenient_i64(&json!(null)), None);
        assert_eq!(lenient_i64(&json!(true)), None);
        assert_eq!(lenient_f64(&json!("150.5")), Some(150.5));
        assert_eq!(lenient_f64(&json!("cheap")), None);
        assert_eq!(lenient_f64(&json!("inf")), None);
        assert_eq!(lenient_string(&json!(2)), Some("2".to_string()));
        assert_eq!(lenient_string(&json!(["2"])), None);
    }

    #[test]
    fn float_conversions() {
        assert_eq!(f64_to_i64_exact(3.0), Some(3));
        assert_eq!(f64_to_i64_exact(3.5), None);
        assert_eq!(f64_to_i64_trunc(-3.5), Some(-3));
        assert_eq!(f64_to_i64_trunc(f64::NAN), None);
    }
}
