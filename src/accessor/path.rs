use serde_json::Value as JsonValue;

/// The final segment of a dotted path with its inline modifiers split off.
///
/// | Suffix  | Meaning                                          |
/// |---------|--------------------------------------------------|
/// | `?`     | report disagreement as `MultipleValues`          |
/// | `\|sep` | join/split array values with `sep`               |
/// | `&N`    | read/write bit `N` of an integer field           |
/// | `$`     | the field holds embedded JSON text               |
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FieldSelector<'p> {
    pub key: &'p str,
    pub bit: Option<u32>,
    pub embedded_json: bool,
    pub separator: Option<&'p str>,
    pub reveal_multiple: bool,
}

impl<'p> FieldSelector<'p> {
    pub(crate) fn parse(segment: &'p str) -> Self {
        let (segment, reveal_multiple) = match segment.strip_suffix('?') {
            Some(rest) => (rest, true),
            None => (segment, false),
        };

        let (segment, separator) = match segment.split_once('|') {
            Some((key, sep)) => (key, Some(sep.split('|').next().unwrap_or(sep))),
            None => (segment, None),
        };

        let (segment, bit) = match segment.split_once('&') {
            Some((key, bit)) => (key, Some(leading_int(bit).max(0) as u32)),
            None => (segment, None),
        };

        let (key, embedded_json) = match segment.strip_suffix('$') {
            Some(key) => (key, true),
            None => (segment, false),
        };

        Self {
            key,
            bit,
            embedded_json,
            separator,
            reveal_multiple,
        }
    }
}

/// Integer parse in the lenient style of form inputs: leading whitespace,
/// an optional sign, then as many digits as are present. Anything else is 0.
pub(crate) fn leading_int(s: &str) -> i64 {
    parse_leading_int(s).unwrap_or(0)
}

/// Like [`leading_int`] but reports a string without leading digits as `None`.
pub(crate) fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    let value: i64 = digits[..end].parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Integer view of a JSON value: numbers truncate, strings parse leniently,
/// everything else is `None`.
pub(crate) fn json_to_int(value: &JsonValue) -> Option<i64> {
    match value {
        JsonValue::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        JsonValue::String(s) => parse_leading_int(s),
        JsonValue::Bool(b) => Some(*b as i64),
        _ => None,
    }
}

pub(crate) fn is_truthy(value: &JsonValue) -> bool {
    match value {
        JsonValue::Null => false,
        JsonValue::Bool(b) => *b,
        JsonValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        JsonValue::String(s) => !s.is_empty(),
        JsonValue::Array(_) | JsonValue::Object(_) => true,
    }
}

/// Text form used when joining array elements.
pub(crate) fn display_string(value: &JsonValue) -> String {
    match value {
        JsonValue::Null => String::new(),
        JsonValue::String(s) => s.clone(),
        other => other.to_string(),
    }
}

pub(crate) fn is_index(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_plain_field() {
        let selector = FieldSelector::parse("label");
        assert_eq!(selector.key, "label");
        assert!(selector.bit.is_none() && selector.separator.is_none());
        assert!(!selector.embedded_json && !selector.reveal_multiple);
    }

    #[test]
    fn test_modifiers() {
        assert_eq!(FieldSelector::parse("flags&3").bit, Some(3));
        assert_eq!(FieldSelector::parse("tags|,").separator, Some(","));

        let json = FieldSelector::parse("config$?");
        assert_eq!(json.key, "config");
        assert!(json.embedded_json && json.reveal_multiple);
    }

    #[test]
    fn test_lenient_integers() {
        assert_eq!(parse_leading_int(" 42px"), Some(42));
        assert_eq!(parse_leading_int("-7"), Some(-7));
        assert_eq!(parse_leading_int("abc"), None);
        assert_eq!(json_to_int(&json!(3.9)), Some(3));
        assert_eq!(json_to_int(&json!("12")), Some(12));
        assert_eq!(json_to_int(&json!(null)), None);
    }
}
