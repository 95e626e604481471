use serde::{Deserialize, Serialize};
use std::fmt;
use strata_values::units::DEFAULT_BASE_FONT_SIZE;

/// Settings shared by every formatter.
#[derive(Debug, Clone, PartialEq)]
pub struct FormatOptions {
    /// Prepended to every emitted name.
    pub prefix: Option<String>,
    /// Pixels per `rem`/`em` for formats that need absolute sizes.
    pub base_font_size: f64,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            prefix: None,
            base_font_size: DEFAULT_BASE_FONT_SIZE,
        }
    }
}

impl FormatOptions {
    pub fn prefixed(prefix: impl Into<String>) -> Self {
        Self {
            prefix: Some(prefix.into()),
            ..Self::default()
        }
    }
}

/// Every syntax the formatter can render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    /// `:root { --name: value; }`
    CssVariables,
    /// `$name: value;`
    ScssVariables,
    /// `@name: value;`
    LessVariables,
    /// Tokens nested by path.
    JsonNested,
    /// One key per token name.
    JsonFlat,
    /// ES module with one `export const` per token.
    JsModule,
    /// `.d.ts` declarations for [`OutputFormat::JsModule`].
    TsDeclarations,
    /// Android `<resources>` XML.
    AndroidXml,
    /// A Swift enum of static constants.
    IosSwift,
}

impl OutputFormat {
    pub const ALL: [OutputFormat; 9] = [
        OutputFormat::CssVariables,
        OutputFormat::ScssVariables,
        OutputFormat::LessVariables,
        OutputFormat::JsonNested,
        OutputFormat::JsonFlat,
        OutputFormat::JsModule,
        OutputFormat::TsDeclarations,
        OutputFormat::AndroidXml,
        OutputFormat::IosSwift,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::CssVariables => "css",
            OutputFormat::ScssVariables => "scss",
            OutputFormat::LessVariables => "less",
            OutputFormat::JsonNested | OutputFormat::JsonFlat => "json",
            OutputFormat::JsModule => "js",
            OutputFormat::TsDeclarations => "d.ts",
            OutputFormat::AndroidXml => "xml",
            OutputFormat::IosSwift => "swift",
        }
    }

    /// A file name for outputs that do not set one.
    pub fn default_file_name(self) -> String {
        let stem = match self {
            OutputFormat::AndroidXml => "tokens_resources",
            OutputFormat::IosSwift => "Tokens",
            _ => "tokens",
        };
        format!("{}.{}", stem, self.extension())
    }

    pub fn label(self) -> &'static str {
        match self {
            OutputFormat::CssVariables => "CSS custom properties",
            OutputFormat::ScssVariables => "SCSS variables",
            OutputFormat::LessVariables => "Less variables",
            OutputFormat::JsonNested => "Nested JSON",
            OutputFormat::JsonFlat => "Flat JSON",
            OutputFormat::JsModule => "JavaScript module",
            OutputFormat::TsDeclarations => "TypeScript declarations",
            OutputFormat::AndroidXml => "Android resources",
            OutputFormat::IosSwift => "iOS Swift",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
