//! Plain JSON outputs.

use crate::error::FormatError;
use crate::value::prefixed;
use serde_json::{Map, Value};
use strata_transform::TransformedToken;

fn insert_path(root: &mut Map<String, Value>, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(segment.clone())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        let Value::Object(next) = slot else {
            return;
        };
        current = next;
    }
    current.insert(last.clone(), value);
}

/// Values nested by token path. Name transforms do not apply here.
pub fn json_nested(tokens: &[TransformedToken]) -> Result<String, FormatError> {
    let mut root = Map::new();
    for token in tokens {
        insert_path(&mut root, &token.path, token.value.clone());
    }
    let mut out = serde_json::to_string_pretty(&Value::Object(root))?;
    out.push('\n');
    Ok(out)
}

/// One entry per token display name.
pub fn json_flat(tokens: &[TransformedToken], prefix: Option<&str>) -> Result<String, FormatError> {
    let root: Map<String, Value> = tokens
        .iter()
        .map(|token| (prefixed(prefix, &token.name, "-"), token.value.clone()))
        .collect();
    let mut out = serde_json::to_string_pretty(&Value::Object(root))?;
    out.push('\n');
    Ok(out)
}
