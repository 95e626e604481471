//! Export of platforms into a style-dictionary style config.

use crate::tables::{id_for_format, id_for_transform};
use serde_json::{Map, Value, json};
use strata_format::PlatformConfig;

fn export_platform(platform: &PlatformConfig) -> Value {
    let transforms: Vec<Value> = platform
        .transforms
        .iter()
        .filter_map(|transform| {
            if transform.matcher.is_some() {
                log::warn!(
                    "Platform '{}': transform matchers cannot be exported; exporting unrestricted",
                    platform.name
                );
            }
            let id = id_for_transform(&transform.kind);
            if id.is_none() {
                log::warn!("Platform '{}': no identifier for {:?}", platform.name, transform.kind);
            }
            id.map(Value::from)
        })
        .collect();

    let files: Vec<Value> = platform
        .enabled_outputs()
        .map(|output| {
            json!({
                "destination": output.file_name,
                "format": id_for_format(output.format),
            })
        })
        .collect();

    let mut entry = Map::new();
    entry.insert("transforms".to_string(), Value::Array(transforms));
    if let Some(prefix) = &platform.prefix {
        entry.insert("prefix".to_string(), Value::from(prefix.as_str()));
    }
    if let Some(size) = platform.base_font_size {
        entry.insert("basePxFontSize".to_string(), Value::from(size));
    }
    entry.insert("files".to_string(), Value::Array(files));
    Value::Object(entry)
}

/// Renders `platforms` as a config document. Disabled outputs are omitted.
pub fn export_config(platforms: &[PlatformConfig], source: &[String], include: &[String]) -> Value {
    let mut root = Map::new();
    root.insert("source".to_string(), Value::from(source.to_vec()));
    if !include.is_empty() {
        root.insert("include".to_string(), Value::from(include.to_vec()));
    }
    let entries: Map<String, Value> = platforms
        .iter()
        .map(|platform| (platform.name.clone(), export_platform(platform)))
        .collect();
    root.insert("platforms".to_string(), Value::Object(entries));
    Value::Object(root)
}
