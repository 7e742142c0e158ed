use serde_json::Value;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Canonical form used for every text comparison.
///
/// Percent-decodes up to twice (query parameters sometimes arrive
/// double-encoded), folds compatibility forms (`ª`, `ﬁ`), strips accents,
/// lowercases and trims. Input that does
/// not decode to valid UTF-8 normalizes to the empty string.
pub fn normalize(text: &str) -> String {
    let Some(decoded) = percent_decode_twice(text) else {
        return String::new();
    };

    decoded
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .collect::<String>()
        .to_lowercase()
        .trim()
        .to_string()
}

/// [`normalize`] for tree values: strings and numbers are normalized, a
/// `{"#text": ...}` wrapper is unwrapped, everything else is `""`.
pub fn normalize_value(value: &Value) -> String {
    match value {
        Value::String(s) => normalize(s),
        Value::Number(n) => normalize(&n.to_string()),
        Value::Object(map) => map.get("#text").map(normalize_value).unwrap_or_default(),
        _ => String::new(),
    }
}

fn percent_decode_twice(text: &str) -> Option<String> {
    let mut current = text.to_string();
    for _ in 0..2 {
        if !current.contains('%') {
            break;
        }
        current = urlencoding::decode(&current).ok()?.into_owned();
    }
    Some(current)
}
