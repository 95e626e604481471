//! JavaScript module and its TypeScript declarations.

use crate::value::{HEADER_LINES, compact_json, identifier, prefixed};
use serde_json::Value;
use std::fmt::Write;
use strata_transform::TransformedToken;

fn header(out: &mut String) {
    out.push_str("/**\n");
    for line in HEADER_LINES {
        let _ = writeln!(out, " * {}", line);
    }
    out.push_str(" */\n\n");
}

fn export_name(token: &TransformedToken, prefix: Option<&str>) -> String {
    identifier(&prefixed(prefix, &token.name, "_"))
}

fn doc_comment(out: &mut String, token: &TransformedToken) {
    if let Some(text) = token.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = writeln!(out, "/** {} */", text.replace("*/", "* /"));
    }
}

pub fn js_module(tokens: &[TransformedToken], prefix: Option<&str>) -> String {
    let mut out = String::new();
    header(&mut out);
    for token in tokens {
        doc_comment(&mut out, token);
        let _ = writeln!(
            out,
            "export const {} = {};",
            export_name(token, prefix),
            compact_json(&token.value)
        );
    }
    out
}

fn ts_type(value: &Value) -> String {
    match value {
        Value::String(_) => "string".to_string(),
        Value::Number(_) => "number".to_string(),
        Value::Bool(_) => "boolean".to_string(),
        Value::Null => "null".to_string(),
        Value::Array(items) => match items.first() {
            Some(first) if items.iter().all(|i| ts_type(i) == ts_type(first)) => {
                format!("{}[]", ts_type(first))
            }
            _ => "unknown[]".to_string(),
        },
        Value::Object(map) => {
            let fields: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", serde_json::Value::String(k.clone()), ts_type(v)))
                .collect();
            format!("{{ {} }}", fields.join("; "))
        }
    }
}

pub fn ts_declarations(tokens: &[TransformedToken], prefix: Option<&str>) -> String {
    let mut out = String::new();
    header(&mut out);
    for token in tokens {
        doc_comment(&mut out, token);
        let _ = writeln!(
            out,
            "export declare const {}: {};",
            export_name(token, prefix),
            ts_type(&token.value)
        );
    }
    out
}
