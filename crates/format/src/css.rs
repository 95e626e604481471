//! Style-sheet variable formats.

use crate::value::{HEADER_LINES, css_value, prefixed};
use std::fmt::Write;
use strata_transform::TransformedToken;

fn block_header(out: &mut String) {
    out.push_str("/**\n");
    for line in HEADER_LINES {
        let _ = writeln!(out, " * {}", line);
    }
    out.push_str(" */\n\n");
}

fn description_comment(token: &TransformedToken) -> String {
    match &token.description {
        Some(text) if !text.is_empty() => format!(" /* {} */", text.replace("*/", "* /")),
        _ => String::new(),
    }
}

pub fn css_variables(tokens: &[TransformedToken], prefix: Option<&str>) -> String {
    let mut out = String::new();
    block_header(&mut out);
    out.push_str(":root {\n");
    for token in tokens {
        let _ = writeln!(
            out,
            "  --{}: {};{}",
            prefixed(prefix, &token.name, "-"),
            css_value(token),
            description_comment(token)
        );
    }
    out.push_str("}\n");
    out
}

/// SCSS (`$`) and Less (`@`) share one shape.
pub fn preprocessor_variables(tokens: &[TransformedToken], prefix: Option<&str>, sigil: char) -> String {
    let mut out = String::new();
    block_header(&mut out);
    for token in tokens {
        if let Some(text) = token.description.as_deref().filter(|d| !d.is_empty()) {
            let _ = writeln!(out, "// {}", text);
        }
        let _ = writeln!(
            out,
            "{}{}: {};",
            sigil,
            prefixed(prefix, &token.name, "-"),
            css_value(token)
        );
    }
    out
}
