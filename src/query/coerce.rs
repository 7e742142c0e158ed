//! Total conversions from untrusted text to numbers.
//!
//! None of these fail: unparsable input becomes the supplied default, and a
//! parsed value below `min` is clamped up to `min`.

use serde_json::Value;

pub fn to_float(value: Option<&str>, default: f64, min: Option<f64>) -> f64 {
    let parsed = value.and_then(parse_float).unwrap_or(default);
    match min {
        Some(min) if parsed < min => min,
        _ => parsed,
    }
}

pub fn to_int(value: Option<&str>, default: i64, min: Option<i64>) -> i64 {
    let parsed = value.and_then(parse_int).unwrap_or(default);
    match min {
        Some(min) if parsed < min => min,
        _ => parsed,
    }
}

/// Like [`to_float`] but distinguishes "absent or unparsable" from a value
pub fn parse_float(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    let parsed = raw.parse::<f64>().ok().or_else(|| {
        // decimal comma ("85,5")
        if raw.contains(',') && !raw.contains('.') {
            raw.replace(',', ".").parse::<f64>().ok()
        } else {
            None
        }
    })?;
    parsed.is_finite().then_some(parsed)
}

pub fn parse_int(raw: &str) -> Option<i64> {
    let raw = raw.trim();
    raw.parse::<i64>()
        .ok()
        .or_else(|| parse_float(raw).map(|f| f.trunc() as i64))
}

/// Scalar text of a tree value.
///
/// Handles both a bare scalar and an object wrapping the scalar under
/// `#text` (an element that carries attributes, e.g. a price with a
/// currency attribute).
pub fn value_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(map) => map.get("#text").and_then(value_text),
        _ => None,
    }
}

pub fn float_value(value: Option<&Value>, default: f64, min: Option<f64>) -> f64 {
    let text = value.and_then(value_text);
    to_float(text.as_deref(), default, min)
}

pub fn int_value(value: Option<&Value>, default: i64, min: Option<i64>) -> i64 {
    let text = value.and_then(value_text);
    to_int(text.as_deref(), default, min)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_or_garbage_yields_default() {
        assert_eq!(to_float(None, 7.5, None), 7.5);
        assert_eq!(to_float(Some("abc"), 0.0, None), 0.0);
        assert_eq!(to_float(Some(""), 3.0, None), 3.0);
        assert_eq!(to_int(Some("dez"), 10, None), 10);
    }

    #[test]
    fn clamps_below_min() {
        assert_eq!(to_float(Some("500"), 0.0, Some(1000.0)), 1000.0);
        assert_eq!(to_float(Some("1500"), 0.0, Some(1000.0)), 1500.0);
        assert_eq!(to_int(Some("-3"), 1, Some(1)), 1);
        assert_eq!(to_int(Some("0"), 1, Some(1)), 1);
    }

    #[test]
    fn default_is_clamped_too() {
        assert_eq!(to_float(None, 0.0, Some(1000.0)), 1000.0);
    }

    #[test]
    fn decimal_comma_and_whitespace() {
        assert_eq!(to_float(Some(" 85,5 "), 0.0, None), 85.5);
        assert_eq!(to_float(Some("1.250,00"), 0.0, None), 0.0);
    }

    #[test]
    fn non_finite_is_rejected() {
        assert_eq!(to_float(Some("inf"), 1.0, None), 1.0);
        assert_eq!(to_float(Some("NaN"), 1.0, None), 1.0);
    }

    #[test]
    fn int_accepts_float_text() {
        assert_eq!(to_int(Some("3.0"), 0, None), 3);
        assert_eq!(to_int(Some("2.9"), 0, None), 2);
    }

    #[test]
    fn wrapped_and_bare_scalars_agree() {
        let bare = json!("350000");
        let wrapped = json!({"@currency": "BRL", "#text": "350000"});
        let number = json!(350000);
        assert_eq!(float_value(Some(&bare), 0.0, None), 350000.0);
        assert_eq!(float_value(Some(&wrapped), 0.0, None), 350000.0);
        assert_eq!(float_value(Some(&number), 0.0, None), 350000.0);
        assert_eq!(int_value(Some(&json!(["2"])), 0, None), 0);
        assert_eq!(int_value(None, 4, None), 4);
    }
}
