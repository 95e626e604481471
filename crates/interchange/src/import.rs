//! Import of a style-dictionary style config.

use crate::error::InterchangeError;
use crate::tables::{
    format_for_id, preset_for_format, preset_for_group, transform_for_id, transforms_for_group,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use strata_format::{OutputConfig, OutputFormat, PlatformConfig};

const DEFAULT_GROUP: &str = "css";

/// An entry that was coerced or dropped during import.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
    pub message: String,
}

impl fmt::Display for ImportWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.platform {
            Some(platform) => write!(f, "platform '{}': {}", platform, self.message),
            None => f.write_str(&self.message),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ImportResult {
    pub platforms: Vec<PlatformConfig>,
    pub source: Vec<String>,
    pub include: Vec<String>,
    pub warnings: Vec<ImportWarning>,
}

struct Importer {
    warnings: Vec<ImportWarning>,
}

impl Importer {
    fn warn(&mut self, platform: Option<&str>, message: String) {
        let warning = ImportWarning {
            platform: platform.map(String::from),
            message,
        };
        log::warn!("Import: {}", warning);
        self.warnings.push(warning);
    }

    fn globs(&mut self, root: &Map<String, Value>, key: &str) -> Vec<String> {
        match root.get(key) {
            None => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| match item.as_str() {
                    Some(glob) => Some(glob.to_string()),
                    None => {
                        self.warn(None, format!("ignored non-string entry in '{}'", key));
                        None
                    }
                })
                .collect(),
            Some(Value::String(glob)) => vec![glob.clone()],
            Some(_) => {
                self.warn(None, format!("'{}' must be an array of globs; ignored", key));
                Vec::new()
            }
        }
    }

    fn platform(&mut self, name: &str, config: &Map<String, Value>) -> PlatformConfig {
        let mut platform = PlatformConfig::new(name);
        let group = config.get("transformGroup").and_then(Value::as_str);
        let mut default_transforms = false;

        match config.get("transforms") {
            Some(Value::Array(ids)) => {
                if group.is_some() {
                    self.warn(
                        Some(name),
                        "both 'transforms' and 'transformGroup' given; using 'transforms'"
                            .to_string(),
                    );
                }
                for id in ids {
                    match id.as_str().and_then(transform_for_id) {
                        Some(transform) => platform.transforms.push(transform),
                        None => {
                            self.warn(Some(name), format!("unsupported transform {} dropped", id))
                        }
                    }
                }
            }
            Some(other) => {
                self.warn(Some(name), format!("'transforms' must be an array, got {}", other));
            }
            None => match group {
                Some(group) => match transforms_for_group(group) {
                    Some(transforms) => platform.transforms = transforms,
                    None => self.warn(
                        Some(name),
                        format!("unsupported transform group '{}' dropped", group),
                    ),
                },
                None => default_transforms = true,
            },
        }

        platform.prefix = config
            .get("prefix")
            .and_then(Value::as_str)
            .map(String::from);
        platform.base_font_size = config
            .get("basePxFontSize")
            .or_else(|| config.get("baseFontSize"))
            .and_then(Value::as_f64);

        let files = config.get("files").and_then(Value::as_array);
        for file in files.into_iter().flatten() {
            if let Some(output) = self.output(name, file) {
                platform.outputs.push(output);
            }
        }
        if default_transforms {
            let preset = platform
                .outputs
                .first()
                .map_or(DEFAULT_GROUP, |output| preset_for_format(output.format));
            platform.transforms = transforms_for_group(preset).unwrap_or_default();
            self.warn(
                Some(name),
                format!("no transforms or transformGroup given; using '{}' transforms", preset),
            );
        }
        if platform.outputs.is_empty() {
            let preset = group.and_then(preset_for_group).unwrap_or(DEFAULT_GROUP);
            platform.outputs = PlatformConfig::preset(preset).outputs;
            let defaults: Vec<&str> = platform
                .outputs
                .iter()
                .map(|o| o.file_name.as_str())
                .collect();
            let message = format!("no files given; added default output '{}'", defaults.join(", "));
            self.warn(Some(name), message);
        }
        platform
    }

    fn output(&mut self, platform: &str, file: &Value) -> Option<OutputConfig> {
        let Some(file) = file.as_object() else {
            self.warn(Some(platform), format!("ignored file entry {}", file));
            return None;
        };

        let format = match file.get("format").and_then(Value::as_str) {
            Some(id) => format_for_id(id).unwrap_or_else(|| {
                self.warn(
                    Some(platform),
                    format!("unsupported format '{}' replaced by nested JSON", id),
                );
                OutputFormat::JsonNested
            }),
            None => {
                self.warn(Some(platform), "file without format uses nested JSON".to_string());
                OutputFormat::JsonNested
            }
        };

        let file_name = match file.get("destination").and_then(Value::as_str) {
            Some(destination) if !destination.is_empty() => destination.to_string(),
            _ => {
                let fallback = format.default_file_name();
                self.warn(
                    Some(platform),
                    format!("file without destination written to '{}'", fallback),
                );
                fallback
            }
        };
        Some(OutputConfig::new(file_name, format))
    }
}

/// Imports a config document. Only unparseable JSON, a non-object root or a
/// non-object `platforms` entry fail; everything else becomes a warning.
pub fn import_config(text: &str) -> Result<ImportResult, InterchangeError> {
    let value: Value = serde_json::from_str(text)?;
    import_value(&value)
}

pub fn import_value(value: &Value) -> Result<ImportResult, InterchangeError> {
    let root = value.as_object().ok_or(InterchangeError::RootNotObject)?;
    let mut importer = Importer {
        warnings: Vec::new(),
    };

    let source = importer.globs(root, "source");
    let include = importer.globs(root, "include");

    let mut platforms = Vec::new();
    match root.get("platforms") {
        None => {
            importer.warn(
                None,
                format!("no platforms given; added default '{}' platform", DEFAULT_GROUP),
            );
            platforms.push(PlatformConfig::preset(DEFAULT_GROUP));
        }
        Some(Value::Object(entries)) => {
            for (name, config) in entries {
                match config.as_object() {
                    Some(config) => platforms.push(importer.platform(name, config)),
                    None => importer.warn(
                        Some(name),
                        "platform must be an object; skipped".to_string(),
                    ),
                }
            }
            if platforms.is_empty() {
                importer.warn(
                    None,
                    format!("no usable platforms; added default '{}' platform", DEFAULT_GROUP),
                );
                platforms.push(PlatformConfig::preset(DEFAULT_GROUP));
            }
        }
        Some(_) => return Err(InterchangeError::PlatformsNotObject),
    }

    log::info!(
        "Imported {} platform(s) with {} warning(s)",
        platforms.len(),
        importer.warnings.len()
    );
    Ok(ImportResult {
        platforms,
        source,
        include,
        warnings: importer.warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use strata_transform::{NameCase, TransformKind};

    #[test]
    fn test_import_platform_with_group() {
        let result = import_value(&json!({
            "source": ["tokens/**/*.json"],
            "platforms": {
                "web": {
                    "transformGroup": "css",
                    "prefix": "ds",
                    "files": [{ "destination": "variables.css", "format": "css/variables" }]
                }
            }
        }))
        .unwrap();

        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert_eq!(result.source, vec!["tokens/**/*.json"]);
        let web = &result.platforms[0];
        assert_eq!(web.name, "web");
        assert_eq!(web.prefix.as_deref(), Some("ds"));
        assert_eq!(web.transforms[0].kind, TransformKind::Name(NameCase::Kebab));
        assert_eq!(web.outputs, vec![OutputConfig::new("variables.css", OutputFormat::CssVariables)]);
    }

    #[test]
    fn test_unknown_format_coerced_with_one_warning() {
        let result = import_value(&json!({
            "platforms": {
                "docs": {
                    "transforms": ["name/kebab"],
                    "files": [{ "destination": "tokens.yaml", "format": "yaml/custom" }]
                }
            }
        }))
        .unwrap();
        assert_eq!(result.warnings.len(), 1);
        assert_eq!(result.platforms[0].outputs[0].format, OutputFormat::JsonNested);
        assert_eq!(
            result.warnings[0].to_string(),
            "platform 'docs': unsupported format 'yaml/custom' replaced by nested JSON"
        );
    }

    #[test]
    fn test_unknown_transform_dropped() {
        let result = import_value(&json!({
            "platforms": {
                "web": {
                    "transforms": ["attribute/cti", "color/hex"],
                    "files": [{ "destination": "t.json", "format": "json/flat" }]
                }
            }
        }))
        .unwrap();
        assert_eq!(result.platforms[0].transforms.len(), 1);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_missing_platforms_and_files_get_defaults() {
        let result = import_value(&json!({ "source": ["a.json"] })).unwrap();
        assert_eq!(result.platforms.len(), 1);
        assert_eq!(result.platforms[0].name, "css");
        assert_eq!(result.warnings.len(), 1);

        let result = import_value(&json!({
            "platforms": { "android": { "transformGroup": "compose" } }
        }))
        .unwrap();
        assert_eq!(result.platforms[0].outputs[0].format, OutputFormat::AndroidXml);
        assert_eq!(result.warnings.len(), 1);
    }

    #[test]
    fn test_missing_transforms_follow_the_file_format() {
        let result = import_value(&json!({
            "platforms": {
                "web": { "files": [{ "destination": "tokens.css", "format": "css/variables" }] },
                "droid": { "files": [{ "destination": "tokens.xml", "format": "android/resources" }] }
            }
        }))
        .unwrap();

        let web = &result.platforms[0];
        assert!(!web.transforms.is_empty());
        assert_eq!(Some(web.transforms.clone()), transforms_for_group("css"));
        let droid = &result.platforms[1];
        assert_eq!(Some(droid.transforms.clone()), transforms_for_group("android"));

        assert_eq!(result.warnings.len(), 2);
        assert_eq!(
            result.warnings[0].to_string(),
            "platform 'web': no transforms or transformGroup given; using 'css' transforms"
        );
    }

    #[test]
    fn test_bare_platform_gets_default_transforms_and_output() {
        let result = import_value(&json!({ "platforms": { "web": {} } })).unwrap();
        let web = &result.platforms[0];
        assert_eq!(Some(web.transforms.clone()), transforms_for_group(DEFAULT_GROUP));
        assert_eq!(web.outputs[0].format, OutputFormat::CssVariables);
        assert_eq!(result.warnings.len(), 2);
    }

    #[test]
    fn test_hard_errors() {
        assert!(matches!(import_config("{ not json"), Err(InterchangeError::Json(_))));
        assert_eq!(import_config("[1, 2]"), Err(InterchangeError::RootNotObject));
        assert_eq!(
            import_config(r#"{ "platforms": ["css"] }"#),
            Err(InterchangeError::PlatformsNotObject)
        );
    }
}
