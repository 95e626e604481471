//! The project document: a pipeline plus its platform settings.

use crate::error::StrataError;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use strata_format::PlatformConfig;
use strata_interchange::{ImportWarning, export_config, import_config};
use strata_pipeline::config::variables_in_use;
use strata_pipeline::{
    BuildConfig, EffectiveTokens, Pipeline, all_build_configs, compute_effective_tokens,
    default_build_config,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(flatten)]
    pub pipeline: Pipeline,
    #[serde(default)]
    pub platforms: Vec<PlatformConfig>,
    /// Token source globs carried through interchange import and export.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub source: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub include: Vec<String>,
}

impl Project {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            pipeline: Pipeline::new(),
            platforms: vec![PlatformConfig::preset("css")],
            source: Vec::new(),
            include: Vec::new(),
        }
    }

    /// Parses and validates a project document.
    pub fn from_json(text: &str) -> Result<Self, StrataError> {
        let project: Project = serde_json::from_str(text)?;
        project.validate()?;
        log::debug!(
            "Loaded project '{}': {} layer(s), {} variable(s), {} page(s), {} platform(s)",
            project.name,
            project.pipeline.layers().len(),
            project.pipeline.variables().len(),
            project.pipeline.pages().len(),
            project.platforms.len()
        );
        Ok(project)
    }

    pub fn to_json(&self) -> Result<String, StrataError> {
        let mut text = serde_json::to_string_pretty(self)?;
        text.push('\n');
        Ok(text)
    }

    pub fn validate(&self) -> Result<(), StrataError> {
        self.pipeline.validate()?;
        let mut names = HashSet::new();
        for platform in &self.platforms {
            if !names.insert(platform.name.as_str()) {
                return Err(StrataError::Config(format!(
                    "duplicate platform name '{}'",
                    platform.name
                )));
            }
        }
        Ok(())
    }

    pub fn platform(&self, name: &str) -> Result<&PlatformConfig, StrataError> {
        self.platforms
            .iter()
            .find(|p| p.name == name)
            .ok_or_else(|| StrataError::UnknownPlatform(name.to_string()))
    }

    pub fn build_configs(&self) -> Vec<BuildConfig> {
        all_build_configs(&self.pipeline)
    }

    pub fn find_config(&self, name: &str) -> Result<BuildConfig, StrataError> {
        self.build_configs()
            .into_iter()
            .find(|c| c.name == name)
            .ok_or_else(|| StrataError::UnknownConfig(name.to_string()))
    }

    /// The default config with `overrides` applied. Every override must name
    /// a variable in use and one of its values.
    pub fn config_with(&self, overrides: &BTreeMap<String, String>) -> Result<BuildConfig, StrataError> {
        let defaults = default_build_config(&self.pipeline);
        let in_use = variables_in_use(&self.pipeline);

        for (key, value) in overrides {
            let variable = in_use
                .iter()
                .find(|v| &v.key == key)
                .ok_or_else(|| StrataError::UnknownConfig(format!("{}={}", key, value)))?;
            if !variable.values.contains(value) {
                return Err(StrataError::UnknownConfig(format!("{}={}", key, value)));
            }
        }

        let pairs = in_use.iter().filter_map(|variable| {
            overrides
                .get(&variable.key)
                .or_else(|| defaults.selections.get(&variable.key))
                .map(|value| (variable.key.clone(), value.clone()))
        });
        Ok(BuildConfig::from_pairs(pairs))
    }

    /// The merged view of the named layer, with provenance.
    pub fn effective_tokens(
        &self,
        layer_name: &str,
        config: &BuildConfig,
    ) -> Result<EffectiveTokens, StrataError> {
        let layer = self
            .pipeline
            .layer_by_name(layer_name)
            .ok_or_else(|| strata_pipeline::PipelineModelError::UnknownLayer(layer_name.to_string()))?;
        Ok(compute_effective_tokens(&self.pipeline, &layer.id, config)?)
    }

    /// Replaces the platforms with those of an interchange config.
    pub fn import_platforms(&mut self, text: &str) -> Result<Vec<ImportWarning>, StrataError> {
        let imported = import_config(text)?;
        self.platforms = imported.platforms;
        self.source = imported.source;
        self.include = imported.include;
        Ok(imported.warnings)
    }

    pub fn export_platforms(&self) -> serde_json::Value {
        export_config(&self.platforms, &self.source, &self.include)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document() -> serde_json::Value {
        json!({
            "name": "Acme",
            "variables": [
                { "id": "var-mode", "name": "Mode", "key": "mode", "values": ["light", "dark"] }
            ],
            "layers": [
                { "id": "layer-base", "name": "Base", "order": 0 },
                { "id": "layer-theme", "name": "Theme", "order": 1, "variableKeys": ["mode"], "required": true }
            ],
            "pages": [
                {
                    "id": "page-base",
                    "layerId": "layer-base",
                    "name": "Base",
                    "tokens": { "colors": { "$type": "color", "ink": { "$value": "#111111" } } }
                },
                {
                    "id": "page-light",
                    "layerId": "layer-theme",
                    "name": "Theme / light",
                    "variableValues": { "mode": "light" },
                    "tokens": { "colors": { "text": { "$value": "{colors.ink}" } } }
                }
            ],
            "platforms": [
                { "name": "web", "outputs": [{ "fileName": "tokens.css", "format": "cssVariables" }] }
            ]
        })
    }

    #[test]
    fn test_document_round_trip() {
        let project = Project::from_json(&document().to_string()).unwrap();
        assert_eq!(project.name, "Acme");
        assert_eq!(project.pipeline.layers().len(), 2);
        assert_eq!(project.platforms[0].name, "web");

        let again = Project::from_json(&project.to_json().unwrap()).unwrap();
        assert_eq!(again, project);
    }

    #[test]
    fn test_invalid_documents_are_rejected() {
        let mut doc = document();
        doc["platforms"] = json!([{ "name": "web" }, { "name": "web" }]);
        assert!(matches!(
            Project::from_json(&doc.to_string()),
            Err(StrataError::Config(_))
        ));

        let mut doc = document();
        doc["layers"][1]["variableKeys"] = json!(["size"]);
        assert!(matches!(
            Project::from_json(&doc.to_string()),
            Err(StrataError::Pipeline(_))
        ));
    }

    #[test]
    fn test_config_with_overrides() {
        let project = Project::from_json(&document().to_string()).unwrap();
        let dark: BTreeMap<_, _> = [("mode".to_string(), "dark".to_string())].into_iter().collect();
        assert_eq!(project.config_with(&dark).unwrap().name, "dark");
        assert_eq!(project.config_with(&BTreeMap::new()).unwrap().name, "light");

        let bad: BTreeMap<_, _> = [("mode".to_string(), "sepia".to_string())].into_iter().collect();
        assert!(matches!(project.config_with(&bad), Err(StrataError::UnknownConfig(_))));
    }

    #[test]
    fn test_effective_tokens_by_layer_name() {
        let project = Project::from_json(&document().to_string()).unwrap();
        let config = project.find_config("light").unwrap();
        let view = project.effective_tokens("Theme", &config).unwrap();
        assert_eq!(view.resolve("colors.text"), Some(json!("#111111")));
        assert!(view.provenance("colors.ink").unwrap().inherited);
        assert!(project.effective_tokens("Nope", &config).is_err());
    }

    #[test]
    fn test_import_platforms() {
        let mut project = Project::new("Acme");
        let warnings = project
            .import_platforms(r#"{ "source": ["t/*.json"], "platforms": { "ios": { "transformGroup": "ios" } } }"#)
            .unwrap();
        assert_eq!(warnings.len(), 1);
        assert_eq!(project.platforms[0].name, "ios");
        assert_eq!(project.export_platforms()["source"], json!(["t/*.json"]));
    }
}
