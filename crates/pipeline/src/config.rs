//! Build configurations: one concrete value per variable in use.

use crate::model::{Assignment, Layer, Pipeline, Variable};
use itertools::Itertools;
use serde::{Deserialize, Serialize};

const DEFAULT_CONFIG_NAME: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfig {
    pub name: String,
    pub selections: Assignment,
}

impl BuildConfig {
    /// Builds a config from `(key, value)` pairs given in variable order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let ordered: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        let name = if ordered.is_empty() {
            DEFAULT_CONFIG_NAME.to_string()
        } else {
            ordered.iter().map(|(_, v)| v.as_str()).join("-")
        };
        Self {
            name,
            selections: ordered.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::from_pairs(std::iter::empty::<(String, String)>())
    }

    /// The part of this config that selects a page of `layer`. `None` when
    /// the config has no value for one of the layer's keys.
    pub fn project(&self, layer: &Layer) -> Option<Assignment> {
        layer
            .variable_keys
            .iter()
            .map(|key| {
                self.selections
                    .get(key)
                    .map(|value| (key.clone(), value.clone()))
            })
            .collect()
    }
}

/// Variables bound to at least one layer, in declaration order.
pub fn variables_in_use(pipeline: &Pipeline) -> Vec<&Variable> {
    pipeline
        .variables()
        .iter()
        .filter(|variable| {
            pipeline
                .layers()
                .iter()
                .any(|layer| layer.variable_keys.contains(&variable.key))
        })
        .collect()
}

/// Every buildable configuration. Variables are taken in declaration order
/// and values in declared order, with the last variable varying fastest.
/// No variables in use yields a single `default` config.
pub fn all_build_configs(pipeline: &Pipeline) -> Vec<BuildConfig> {
    let variables = variables_in_use(pipeline);
    if variables.is_empty() {
        return vec![BuildConfig::empty()];
    }

    let configs: Vec<BuildConfig> = variables
        .into_iter()
        .map(|variable| {
            let key = variable.key.as_str();
            variable.values.iter().map(move |value| (key, value.as_str()))
        })
        .multi_cartesian_product()
        .map(BuildConfig::from_pairs)
        .collect();
    log::debug!("Enumerated {} build config(s)", configs.len());
    configs
}

/// Selects the first value of every variable in use.
pub fn default_build_config(pipeline: &Pipeline) -> BuildConfig {
    BuildConfig::from_pairs(variables_in_use(pipeline).into_iter().filter_map(|variable| {
        variable
            .values
            .first()
            .map(|value| (variable.key.as_str(), value.as_str()))
    }))
}
