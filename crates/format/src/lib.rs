//! Output formatter.
//!
//! Each formatter is a pure function of the transformed token list: it never
//! resolves aliases or applies transforms, and the same input always renders
//! the same text.

pub mod android;
pub mod css;
pub mod error;
pub mod ios;
pub mod js;
pub mod json;
pub mod output;
pub mod platform;
pub mod value;

pub use error::FormatError;
pub use output::{FormatOptions, OutputFormat};
pub use platform::{OutputConfig, PlatformConfig};

use strata_transform::TransformedToken;

/// Renders `tokens` in `format`. The prefix is prepended to every emitted
/// name; JSON nested output and the Swift type name use it differently.
pub fn format_output(
    tokens: &[TransformedToken],
    format: OutputFormat,
    options: &FormatOptions,
) -> Result<String, FormatError> {
    log::debug!("Formatting {} token(s) as {}", tokens.len(), format);
    let prefix = options.prefix.as_deref();
    let base = options.base_font_size;
    let text = match format {
        OutputFormat::CssVariables => css::css_variables(tokens, prefix),
        OutputFormat::ScssVariables => css::preprocessor_variables(tokens, prefix, '$'),
        OutputFormat::LessVariables => css::preprocessor_variables(tokens, prefix, '@'),
        OutputFormat::JsonNested => json::json_nested(tokens)?,
        OutputFormat::JsonFlat => json::json_flat(tokens, prefix)?,
        OutputFormat::JsModule => js::js_module(tokens, prefix),
        OutputFormat::TsDeclarations => js::ts_declarations(tokens, prefix),
        OutputFormat::AndroidXml => android::android_resources(tokens, prefix, base)?,
        OutputFormat::IosSwift => ios::ios_swift(tokens, prefix, base),
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::{Value, json};
    use strata_tokens::{DEFAULT_MAX_DEPTH, TokenTree, flatten, resolve_tokens};
    use strata_transform::{Transform, TransformOptions, apply_transforms, transform_group};
    use strata_values::ColorFormat;

    const NO_PREFIX: FormatOptions = FormatOptions {
        prefix: None,
        base_font_size: strata_values::units::DEFAULT_BASE_FONT_SIZE,
    };

    fn transformed(group: &str) -> Vec<TransformedToken> {
        let tree = TokenTree::from_value(&json!({
            "colors": {
                "$type": "color",
                "blue": { "500": { "$value": "#0066FF", "$description": "Brand blue" } },
                "primary": { "$value": "{colors.blue.500}" }
            },
            "space": { "$type": "dimension", "md": { "$value": "16px" } },
            "type": {
                "body": {
                    "$type": "typography",
                    "$value": { "fontFamily": "Inter", "fontSize": "{space.md}", "fontWeight": 400 }
                }
            }
        }))
        .unwrap();
        let resolved = resolve_tokens(&flatten(&tree), &tree, DEFAULT_MAX_DEPTH);
        apply_transforms(
            &resolved,
            &transform_group(group).unwrap(),
            &TransformOptions::default(),
        )
    }

    #[test]
    fn test_css_variables() {
        let options = FormatOptions::prefixed("ds");
        let css = format_output(&transformed("css"), OutputFormat::CssVariables, &options).unwrap();
        assert!(css.starts_with("/**\n * Do not edit directly\n"));
        assert!(css.contains(":root {\n"));
        assert!(css.contains("  --ds-colors-blue-500: #0066ff; /* Brand blue */\n"));
        assert!(css.contains("  --ds-colors-primary: #0066ff;\n"));
        assert!(css.contains("  --ds-space-md: 1rem;\n"));
        assert!(css.contains("  --ds-type-body: 400 16px Inter;\n"));
        assert!(css.ends_with("}\n"));
    }

    #[test]
    fn test_scss_and_less() {
        let tokens = transformed("scss");
        let scss = format_output(&tokens, OutputFormat::ScssVariables, &NO_PREFIX).unwrap();
        assert!(scss.contains("// Brand blue\n$colors-blue-500: #0066ff;\n"));
        let less = format_output(&tokens, OutputFormat::LessVariables, &NO_PREFIX).unwrap();
        assert!(less.contains("@space-md: 1rem;\n"));
    }

    #[test]
    fn test_json_nested_keeps_paths() {
        let out = format_output(&transformed("js"), OutputFormat::JsonNested, &NO_PREFIX).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["colors"]["blue"]["500"], json!("#0066ff"));
        assert_eq!(value["type"]["body"]["fontFamily"], json!("Inter"));
    }

    #[test]
    fn test_json_flat_uses_names() {
        let out = format_output(&transformed("js"), OutputFormat::JsonFlat, &NO_PREFIX).unwrap();
        let value: Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["colorsPrimary"], json!("#0066ff"));
    }

    #[test]
    fn test_js_and_ts() {
        let tokens = transformed("js");
        let js = format_output(&tokens, OutputFormat::JsModule, &NO_PREFIX).unwrap();
        assert!(js.contains("/** Brand blue */\nexport const colorsBlue500 = \"#0066ff\";\n"));
        assert!(js.contains("export const spaceMd = \"1rem\";\n"));

        let ts = format_output(&tokens, OutputFormat::TsDeclarations, &NO_PREFIX).unwrap();
        assert!(ts.contains("export declare const colorsPrimary: string;\n"));
        assert!(ts.contains(
            "export declare const typeBody: { \"fontFamily\": string; \"fontSize\": string; \"fontWeight\": number };"
        ));
    }

    #[test]
    fn test_every_format_renders() {
        let tokens = transformed("css");
        for format in OutputFormat::ALL {
            let text = format_output(&tokens, format, &NO_PREFIX).unwrap();
            assert!(!text.is_empty(), "{} rendered nothing", format);
            assert!(text.ends_with('\n'));
        }
    }

    #[test]
    fn test_native_sizes_use_base_font_size() {
        let tree = TokenTree::from_value(&json!({
            "space": { "$type": "dimension", "md": { "$value": "1.5rem" } }
        }))
        .unwrap();
        let resolved = resolve_tokens(&flatten(&tree), &tree, DEFAULT_MAX_DEPTH);
        let tokens = apply_transforms(&resolved, &[], &TransformOptions::default());
        let options = FormatOptions {
            base_font_size: 10.0,
            ..FormatOptions::default()
        };

        let xml = format_output(&tokens, OutputFormat::AndroidXml, &options).unwrap();
        assert!(xml.contains(">15dp</dimen>"), "{}", xml);
        let swift = format_output(&tokens, OutputFormat::IosSwift, &options).unwrap();
        assert!(swift.contains(": CGFloat = 15"), "{}", swift);

        let xml = format_output(&tokens, OutputFormat::AndroidXml, &NO_PREFIX).unwrap();
        assert!(xml.contains(">24dp</dimen>"), "{}", xml);
    }

    proptest! {
        #[test]
        fn test_formatting_is_idempotent(
            colors in prop::collection::vec((0u8..=255, 0u8..=255, 0u8..=255), 1..8),
            format_index in 0usize..OutputFormat::ALL.len(),
        ) {
            let mut tree = TokenTree::new();
            for (i, (r, g, b)) in colors.iter().enumerate() {
                let token = strata_tokens::Token::new(format!("#{:02x}{:02x}{:02x}", r, g, b))
                    .with_type("color");
                tree.set_token(&format!("palette.c{}", i), token).unwrap();
            }
            let resolved = resolve_tokens(&flatten(&tree), &tree, DEFAULT_MAX_DEPTH);
            let tokens = apply_transforms(
                &resolved,
                &[Transform::color(ColorFormat::Rgb)],
                &TransformOptions::default(),
            );
            let format = OutputFormat::ALL[format_index];
            let first = format_output(&tokens, format, &FormatOptions::prefixed("x")).unwrap();
            let second = format_output(&tokens, format, &FormatOptions::prefixed("x")).unwrap();
            prop_assert_eq!(first, second);
        }
    }
}
