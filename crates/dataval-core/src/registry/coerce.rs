//! Loose value conversions shared by the built-in types and transforms
//!
//! Untrusted form and API payloads often carry numbers as strings and flags
//! as `"1"` or `""`. These helpers define one consistent set of conversion
//! rules over `serde_json::Value` so that every built-in coerces the same way.
//!
//! Copyright (c) 2025 Dataval Team
//! Licensed under the Apache-2.0 license

use serde_json::{Number, Value};

/// Largest integer a double can hold exactly (2^53)
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// String form of any value
pub fn to_loose_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => number_to_string(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::Null => String::new(),
                other => to_loose_string(other),
            })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Print a number without a trailing `.0` when it is integral
pub fn number_to_string(number: &Number) -> String {
    if let Some(i) = number.as_i64() {
        return i.to_string();
    }
    if let Some(u) = number.as_u64() {
        return u.to_string();
    }
    number.as_f64().map(format_f64).unwrap_or_else(|| number.to_string())
}

/// Print a float without a trailing `.0` when it is integral
pub fn format_f64(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e21 {
        format!("{:.0}", value)
    } else {
        value.to_string()
    }
}

/// Parse a numeric literal the way loose string-to-number conversion does
///
/// Surrounding whitespace is ignored, an empty string is zero and the
/// `0x`/`0o`/`0b` radix prefixes are understood. Non-finite results are
/// rejected since JSON cannot represent them.
pub fn parse_number(input: &str) -> Option<f64> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Some(0.0);
    }

    let radix = match trimmed.get(..2) {
        Some("0x") | Some("0X") => Some(16),
        Some("0o") | Some("0O") => Some(8),
        Some("0b") | Some("0B") => Some(2),
        _ => None,
    };
    if let Some(radix) = radix {
        return parse_radix(&trimmed[2..], radix);
    }

    // f64::from_str also accepts "inf", "nan" and "infinity"
    let is_decimal_literal = trimmed
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E'));
    if !is_decimal_literal || !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }

    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Digits in `radix` accumulated as a float, so long inputs lose precision instead of overflowing
pub(crate) fn parse_radix(digits: &str, radix: u32) -> Option<f64> {
    if digits.is_empty() {
        return None;
    }
    let mut acc = 0f64;
    for c in digits.chars() {
        acc = acc * f64::from(radix) + f64::from(c.to_digit(radix)?);
    }
    Some(acc).filter(|v| v.is_finite())
}

/// Numeric form of any value, `None` when the value does not denote a number
pub fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => parse_number(s),
        // null stringifies to "null", which is not numeric
        Value::Null => None,
        Value::Array(_) | Value::Object(_) => parse_number(&to_loose_string(value)),
    }
}

/// Build a JSON number, preferring the integer representation when exact
pub fn number_value(value: f64) -> Value {
    if value.fract() == 0.0 && value.abs() <= MAX_SAFE_INTEGER {
        Value::from(value as i64)
    } else {
        Number::from_f64(value).map(Value::Number).unwrap_or(Value::Null)
    }
}

/// Whether a number is integral
pub fn is_integral(number: &Number) -> bool {
    number.is_i64() || number.is_u64() || number.as_f64().is_some_and(|v| v.fract() == 0.0)
}

/// Loose truthiness: null, false, 0 and "" are false
pub fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|v| v != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Compact JSON rendering used in diagnostics
pub fn serialize(value: &Value) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| to_loose_string(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_loose_string_forms() {
        assert_eq!(to_loose_string(&json!(null)), "null");
        assert_eq!(to_loose_string(&json!(true)), "true");
        assert_eq!(to_loose_string(&json!(5.0)), "5");
        assert_eq!(to_loose_string(&json!(1.5)), "1.5");
        assert_eq!(to_loose_string(&json!([1, null, "a"])), "1,,a");
        assert_eq!(to_loose_string(&json!([])), "");
        assert_eq!(to_loose_string(&json!({"a": 1})), "[object Object]");
    }

    #[test]
    fn test_parse_number_literals() {
        assert_eq!(parse_number(" 42 "), Some(42.0));
        assert_eq!(parse_number(""), Some(0.0));
        assert_eq!(parse_number("-1.5e2"), Some(-150.0));
        assert_eq!(parse_number("0x1F"), Some(31.0));
        assert_eq!(parse_number("0b101"), Some(5.0));
        assert_eq!(parse_number("abc"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("1e999"), None);
        assert_eq!(parse_number("+"), None);
        assert_eq!(parse_number("0xZZ"), None);
    }

    #[test]
    fn test_to_number_by_kind() {
        assert_eq!(to_number(&json!(false)), Some(0.0));
        assert_eq!(to_number(&json!("7")), Some(7.0));
        assert_eq!(to_number(&json!([8])), Some(8.0));
        assert_eq!(to_number(&json!([])), Some(0.0));
        assert_eq!(to_number(&json!(null)), None);
        assert_eq!(to_number(&json!({})), None);
    }

    #[test]
    fn test_number_value_prefers_integers() {
        assert_eq!(number_value(5.0), json!(5));
        assert!(number_value(5.0).is_i64());
        assert_eq!(number_value(0.25), json!(0.25));
    }

    #[test]
    fn test_truthiness() {
        assert!(!truthy(&json!(null)));
        assert!(!truthy(&json!(0)));
        assert!(!truthy(&json!("")));
        assert!(truthy(&json!("0")));
        assert!(truthy(&json!([])));
        assert!(truthy(&json!({})));
    }
}
