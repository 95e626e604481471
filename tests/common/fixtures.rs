//! Project documents shared by the integration tests.

use serde_json::{Value, json};
use strata::Project;

/// Primitives defines `colors.blue.500`; the required Semantic layer is bound
/// to `mode` and only has a `light` page aliasing it.
pub fn brand_document() -> Value {
    json!({
        "name": "Brand",
        "variables": [
            { "id": "var-mode", "name": "Mode", "key": "mode", "values": ["light", "dark"] }
        ],
        "layers": [
            { "id": "layer-primitives", "name": "Primitives", "order": 0 },
            {
                "id": "layer-semantic",
                "name": "Semantic",
                "order": 1,
                "variableKeys": ["mode"],
                "required": true
            }
        ],
        "pages": [
            {
                "id": "page-primitives",
                "layerId": "layer-primitives",
                "name": "Primitives",
                "tokens": {
                    "colors": {
                        "$type": "color",
                        "blue": { "500": { "$value": "#0066FF", "$description": "Brand blue" } },
                        "gray": { "900": { "$value": "#111111" } }
                    },
                    "space": {
                        "$type": "dimension",
                        "sm": { "$value": "8px" },
                        "md": { "$value": "16px" }
                    },
                    "motion": { "fast": { "$type": "duration", "$value": "150ms" } }
                }
            },
            {
                "id": "page-semantic-light",
                "layerId": "layer-semantic",
                "name": "Semantic / light",
                "variableValues": { "mode": "light" },
                "tokens": {
                    "colors": {
                        "primary": { "$value": "{colors.blue.500}" },
                        "text": { "$value": "{colors.gray.900}" }
                    }
                }
            }
        ],
        "platforms": [
            {
                "name": "web",
                "prefix": "ds",
                "transforms": [
                    { "name": "kebab" },
                    { "color": "hex" },
                    { "size": "rem" }
                ],
                "outputs": [
                    { "fileName": "tokens.css", "format": "cssVariables" },
                    { "fileName": "tokens.json", "format": "jsonFlat" }
                ]
            },
            {
                "name": "ios",
                "transforms": [{ "name": "camel" }, { "color": "rgba" }],
                "outputs": [{ "fileName": "Tokens.swift", "format": "iosSwift" }]
            }
        ]
    })
}

/// The brand document with a `dark` page added, so every config is complete.
pub fn complete_brand_document() -> Value {
    let mut doc = brand_document();
    if let Some(pages) = doc["pages"].as_array_mut() {
        pages.push(json!({
            "id": "page-semantic-dark",
            "layerId": "layer-semantic",
            "name": "Semantic / dark",
            "variableValues": { "mode": "dark" },
            "tokens": {
                "colors": {
                    "primary": { "$value": "#66A3FF" },
                    "text": { "$value": "#EEEEEE" }
                }
            }
        }));
    }
    doc
}

pub fn load(doc: &Value) -> Project {
    Project::from_json(&doc.to_string()).expect("valid project document")
}
