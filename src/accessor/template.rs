use super::jsonpath::JsonPath;
use super::path::{display_string, is_truthy};
use regex::{Captures, Regex};
use serde_json::Value as JsonValue;
use std::sync::LazyLock;

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{([^}]+)\|([^}]+)\}\}").expect("Invalid placeholder regex"));

/// Replaces `{KEY}` occurrences with the given values.
///
/// ```
/// use nodeloom::accessor::substitute;
/// assert_eq!(substitute("in{I}", &[("I", "2".to_string())]), "in2");
/// ```
pub fn substitute(template: &str, params: &[(&str, String)]) -> String {
    params.iter().fold(template.to_string(), |acc, (key, value)| {
        acc.replace(&format!("{{{}}}", key), value)
    })
}

/// Expands `{{path|default}}` placeholders against `object`.
///
/// `path` is a JSONPath (a leading `$.` is implied when missing). A falsy
/// or missing match falls back to `default`; an empty default yields
/// `{{not-found:path}}`.
pub fn render(object: &JsonValue, template: &str) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            let path = caps[1].trim();
            let default = caps[2].trim();
            let query = if path.starts_with('$') {
                path.to_string()
            } else {
                format!("$.{}", path)
            };

            let found = JsonPath::parse(&query)
                .ok()
                .and_then(|p| p.query(object).first().map(|v| (*v).clone()))
                .filter(is_truthy);

            match found {
                Some(value) => display_string(&value),
                None if !default.is_empty() => default.to_string(),
                None => format!("{{{{not-found:{}}}}}", path),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_render_uses_value_or_default() {
        let node = json!({ "data": { "value": "Speed", "empty": "" } });
        assert_eq!(render(&node, "{{data.value|JSON Value}}"), "Speed");
        assert_eq!(render(&node, "{{$.data.empty|Fallback}}"), "Fallback");
        assert_eq!(render(&node, "Label: {{data.missing|n/a}}!"), "Label: n/a!");
    }

    #[test]
    fn test_substitute_multiple_keys() {
        let out = substitute(
            "in{I} ({N})",
            &[("I", "0".to_string()), ("N", "1".to_string())],
        );
        assert_eq!(out, "in0 (1)");
    }
}
