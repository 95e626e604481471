//! Swift constants for iOS.

use crate::value::{HEADER_LINES, compact_json, identifier, plain_text};
use serde_json::Value;
use std::fmt::Write;
use strata_transform::matcher::SIZE_TYPES;
use strata_transform::{NameCase, TransformedToken};
use strata_values::number::format_fixed;
use strata_values::{Size, format_number, parse_color_value};

const DEFAULT_TYPE_NAME: &str = "Tokens";

fn swift_string(text: &str) -> String {
    let escaped = text
        .replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\n', "\\n");
    format!("\"{}\"", escaped)
}

fn type_name(prefix: Option<&str>) -> String {
    prefix
        .map(|p| {
            let words: Vec<&str> = p.split(|c: char| !c.is_alphanumeric()).collect();
            NameCase::Pascal.apply(&words)
        })
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_TYPE_NAME.to_string())
}

fn member_name(token: &TransformedToken) -> String {
    let name = if token.name.contains(|c: char| !c.is_ascii_alphanumeric() && c != '_') {
        NameCase::Camel.apply(&token.path)
    } else {
        token.name.clone()
    };
    identifier(&name)
}

/// Declaration right-hand side, including the type annotation if needed.
fn declaration(token: &TransformedToken, base_font_size: f64) -> String {
    let token_type = token.token_type.as_deref().unwrap_or_default();
    let text = plain_text(&token.value);

    if token_type == "color"
        && let Ok(color) = parse_color_value(&text)
    {
        let (r, g, b) = color.unit_channels();
        return format!(
            " = UIColor(red: {}, green: {}, blue: {}, alpha: {})",
            format_fixed(r, 3),
            format_fixed(g, 3),
            format_fixed(b, 3),
            format_number(f64::from(color.a))
        );
    }

    if SIZE_TYPES.contains(&token_type)
        && let Ok(size) = Size::parse(&text)
    {
        return format!(": CGFloat = {}", format_number(size.to_px(base_font_size)));
    }

    match &token.value {
        Value::Number(_) => format!(": Double = {}", text),
        Value::Bool(b) => format!(" = {}", b),
        Value::String(s) => format!(" = {}", swift_string(s)),
        other => format!(" = {}", swift_string(&compact_json(other))),
    }
}

pub fn ios_swift(tokens: &[TransformedToken], prefix: Option<&str>, base_font_size: f64) -> String {
    let mut out = String::new();
    out.push_str("//\n");
    for line in HEADER_LINES {
        let _ = writeln!(out, "// {}", line);
    }
    out.push_str("//\n\nimport UIKit\n\n");
    let _ = writeln!(out, "public enum {} {{", type_name(prefix));
    for token in tokens {
        if let Some(text) = token.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "    /// {}", text);
        }
        let _ = writeln!(
            out,
            "    public static let {}{}",
            member_name(token),
            declaration(token, base_font_size)
        );
    }
    out.push_str("}\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_values::units::DEFAULT_BASE_FONT_SIZE;

    fn token(path: &str, value: Value, token_type: &str) -> TransformedToken {
        let path: Vec<String> = path.split('.').map(String::from).collect();
        TransformedToken {
            name: NameCase::Camel.apply(&path),
            path,
            value: value.clone(),
            original_value: value,
            token_type: Some(token_type.to_string()),
            description: None,
        }
    }

    #[test]
    fn test_swift_declarations() {
        let tokens = [
            token("colors.primary", json!("#0066FF"), "color"),
            token("space.md", json!("16px"), "dimension"),
            token("font.family", json!("Inter \"Display\""), "fontFamily"),
            token("opacity.muted", json!(0.6), "number"),
        ];
        let swift = ios_swift(&tokens, Some("brand tokens"), DEFAULT_BASE_FONT_SIZE);
        assert!(swift.contains("public enum BrandTokens {"));
        assert!(swift.contains(
            "public static let colorsPrimary = UIColor(red: 0, green: 0.4, blue: 1, alpha: 1)"
        ));
        assert!(swift.contains("public static let spaceMd: CGFloat = 16"));
        assert!(swift.contains(r#"public static let fontFamily = "Inter \"Display\"""#));
        assert!(swift.contains("public static let opacityMuted: Double = 0.6"));
    }

    #[test]
    fn test_default_type_name() {
        assert!(ios_swift(&[], None, DEFAULT_BASE_FONT_SIZE).contains("public enum Tokens {"));
    }
}
