//! Text rendering of token values shared by the formatters.

use serde_json::{Map, Number, Value};
use strata_transform::TransformedToken;
use strata_values::format_number;

pub const HEADER_LINES: [&str; 2] = ["Do not edit directly", "Generated by strata"];

pub fn number_text(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(format_number).unwrap_or_else(|| n.to_string())
    }
}

/// Compact JSON for values that have no native syntax in the target.
pub fn compact_json(value: &Value) -> String {
    // Serializing a `Value` to a string cannot fail.
    serde_json::to_string(value).unwrap_or_default()
}

/// Plain text of a scalar; composites become compact JSON.
pub fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        other => compact_json(other),
    }
}

fn font_family(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Array(items) => {
            let names: Vec<String> = items.iter().map(plain_text).collect();
            Some(names.join(", "))
        }
        _ => None,
    }
}

/// `[style] [weight] size[/line-height] family`, the CSS `font` shorthand.
/// `None` when the size or family is missing.
pub fn typography_shorthand(map: &Map<String, Value>) -> Option<String> {
    let size = map.get("fontSize").map(plain_text)?;
    let family = map.get("fontFamily").and_then(font_family)?;

    let mut parts = Vec::new();
    if let Some(style) = map.get("fontStyle") {
        parts.push(plain_text(style));
    }
    if let Some(weight) = map.get("fontWeight") {
        parts.push(plain_text(weight));
    }
    match map.get("lineHeight") {
        Some(line_height) => parts.push(format!("{}/{}", size, plain_text(line_height))),
        None => parts.push(size),
    }
    parts.push(family);
    Some(parts.join(" "))
}

/// Value text for style-sheet formats.
pub fn css_value(token: &TransformedToken) -> String {
    match &token.value {
        Value::Object(map) if token.token_type.as_deref() == Some("typography") => {
            typography_shorthand(map).unwrap_or_else(|| compact_json(&token.value))
        }
        Value::Array(_) if token.token_type.as_deref() == Some("fontFamily") => {
            font_family(&token.value).unwrap_or_default()
        }
        other => plain_text(other),
    }
}

/// Joins a formatter prefix and a token name with `separator`.
pub fn prefixed(prefix: Option<&str>, name: &str, separator: &str) -> String {
    match prefix.map(|p| p.trim_matches(|c| c == '-' || c == '_')) {
        Some(p) if !p.is_empty() => format!("{}{}{}", p, separator, name),
        _ => name.to_string(),
    }
}

pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        }
        _ => false,
    }
}

/// Makes `name` usable as a program identifier, keeping valid names as-is.
pub fn identifier(name: &str) -> String {
    if is_identifier(name) {
        return name.to_string();
    }
    let cleaned: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if cleaned.starts_with(|c: char| c.is_ascii_digit()) || cleaned.is_empty() {
        format!("_{}", cleaned)
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typography_shorthand() {
        let map = json!({
            "fontFamily": ["Inter", "sans-serif"],
            "fontWeight": 600,
            "fontSize": "1rem",
            "lineHeight": 1.5
        });
        assert_eq!(
            typography_shorthand(map.as_object().unwrap()).as_deref(),
            Some("600 1rem/1.5 Inter, sans-serif")
        );
        assert_eq!(typography_shorthand(json!({ "fontSize": "1rem" }).as_object().unwrap()), None);
    }

    #[test]
    fn test_number_text() {
        assert_eq!(plain_text(&json!(4)), "4");
        assert_eq!(plain_text(&json!(0.123456)), "0.1235");
    }

    #[test]
    fn test_identifier() {
        assert_eq!(identifier("colorsBlue"), "colorsBlue");
        assert_eq!(identifier("colors-blue"), "colors_blue");
        assert_eq!(identifier("500"), "_500");
        assert_eq!(prefixed(Some("--ds"), "gap", "-"), "ds-gap");
        assert_eq!(prefixed(Some(""), "gap", "-"), "gap");
    }
}
