//! Per-platform build settings.

use crate::output::{FormatOptions, OutputFormat};
use serde::{Deserialize, Serialize};
use strata_transform::{Transform, TransformOptions, transform_group};
use strata_values::units::DEFAULT_BASE_FONT_SIZE;

fn default_enabled() -> bool {
    true
}

/// One file rendered for a platform.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputConfig {
    pub file_name: String,
    pub format: OutputFormat,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

impl OutputConfig {
    pub fn new(file_name: impl Into<String>, format: OutputFormat) -> Self {
        Self {
            file_name: file_name.into(),
            format,
            enabled: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlatformConfig {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefix: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_font_size: Option<f64>,
    #[serde(default)]
    pub transforms: Vec<Transform>,
    #[serde(default)]
    pub outputs: Vec<OutputConfig>,
}

impl PlatformConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            base_font_size: None,
            transforms: Vec::new(),
            outputs: Vec::new(),
        }
    }

    /// A platform using a named transform preset and its usual output.
    /// Unknown presets get no transforms and a nested JSON output.
    pub fn preset(group: &str) -> Self {
        let format = match group {
            "css" => OutputFormat::CssVariables,
            "scss" => OutputFormat::ScssVariables,
            "less" => OutputFormat::LessVariables,
            "js" => OutputFormat::JsModule,
            "android" => OutputFormat::AndroidXml,
            "ios" => OutputFormat::IosSwift,
            _ => OutputFormat::JsonNested,
        };
        Self {
            transforms: transform_group(group).unwrap_or_default(),
            outputs: vec![OutputConfig::new(format.default_file_name(), format)],
            ..Self::new(group)
        }
    }

    pub fn transform_options(&self) -> TransformOptions {
        TransformOptions {
            base_font_size: self.base_font_size.unwrap_or(DEFAULT_BASE_FONT_SIZE),
        }
    }

    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            prefix: self.prefix.clone(),
            base_font_size: self.base_font_size.unwrap_or(DEFAULT_BASE_FONT_SIZE),
        }
    }

    pub fn enabled_outputs(&self) -> impl Iterator<Item = &OutputConfig> {
        self.outputs.iter().filter(|o| o.enabled)
    }
}
