//! Android `<resources>` XML.

use crate::error::FormatError;
use crate::value::{HEADER_LINES, plain_text, prefixed};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use serde_json::Value;
use strata_transform::matcher::SIZE_TYPES;
use strata_transform::{NameCase, TransformedToken};
use strata_values::{Size, format_number, parse_color_value};

const FONT_SIZE_TYPES: &[&str] = &["fontSize"];

fn resource_name(token: &TransformedToken, prefix: Option<&str>) -> String {
    let valid = !token.name.is_empty()
        && token
            .name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    let name = if valid {
        token.name.clone()
    } else {
        NameCase::Snake.apply(&token.path)
    };
    let name = prefixed(prefix, &name, "_");
    if name.starts_with(|c: char| c.is_ascii_digit()) {
        format!("_{}", name)
    } else {
        name
    }
}

/// `(element, text)` for one token.
fn resource(token: &TransformedToken, base_font_size: f64) -> (&'static str, String) {
    let token_type = token.token_type.as_deref().unwrap_or_default();
    let text = plain_text(&token.value);

    if token_type == "color"
        && let Ok(color) = parse_color_value(&text)
    {
        let hex = if color.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", color.r, color.g, color.b)
        } else {
            format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                color.alpha_byte(),
                color.r,
                color.g,
                color.b
            )
        };
        return ("color", hex);
    }

    if SIZE_TYPES.contains(&token_type)
        && let Ok(size) = Size::parse(&text)
    {
        let unit = if FONT_SIZE_TYPES.contains(&token_type) {
            "sp"
        } else {
            "dp"
        };
        let px = size.to_px(base_font_size);
        return ("dimen", format!("{}{}", format_number(px), unit));
    }

    if let Value::Number(n) = &token.value
        && n.is_i64()
    {
        return ("integer", text);
    }
    ("string", text)
}

/// `rem`/`em` sizes become `dp`/`sp` at `base_font_size` pixels each.
pub fn android_resources(
    tokens: &[TransformedToken],
    prefix: Option<&str>,
    base_font_size: f64,
) -> Result<String, FormatError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
    let comment = format!(" {} ", HEADER_LINES.join(", "));
    writer.write_event(Event::Comment(BytesText::from_escaped(comment)))?;
    writer.write_event(Event::Start(BytesStart::new("resources")))?;

    for token in tokens {
        let (element, text) = resource(token, base_font_size);
        let name = resource_name(token, prefix);
        writer
            .create_element(element)
            .with_attribute(("name", name.as_str()))
            .write_text_content(BytesText::new(&text))?;
    }

    writer.write_event(Event::End(BytesEnd::new("resources")))?;
    let mut out = String::from_utf8(writer.into_inner())?;
    out.push('\n');
    Ok(out)
}
