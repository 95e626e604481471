//! Token selection for transforms.

use serde::{Deserialize, Serialize};

/// Token types each value-transform family applies to.
pub const COLOR_TYPES: &[&str] = &["color"];
pub const SIZE_TYPES: &[&str] = &[
    "dimension",
    "fontSize",
    "spacing",
    "sizing",
    "borderRadius",
    "borderWidth",
];
pub const TIME_TYPES: &[&str] = &["duration"];

/// Restricts a transform to some tokens. Every given criterion must match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMatcher {
    /// Accepted token types; empty accepts any type.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub types: Vec<String>,
    /// Dot-path the token must equal or sit below.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path_prefix: Option<String>,
}

impl TokenMatcher {
    pub fn types<S: Into<String>>(types: impl IntoIterator<Item = S>) -> Self {
        Self {
            types: types.into_iter().map(Into::into).collect(),
            path_prefix: None,
        }
    }

    pub fn path_prefix(prefix: impl Into<String>) -> Self {
        Self {
            types: Vec::new(),
            path_prefix: Some(prefix.into()),
        }
    }

    pub fn matches(&self, path: &[String], token_type: Option<&str>) -> bool {
        let type_ok = self.types.is_empty()
            || token_type.is_some_and(|t| self.types.iter().any(|accepted| accepted == t));
        let path_ok = match &self.path_prefix {
            None => true,
            Some(prefix) => {
                let prefix: Vec<&str> = prefix.split('.').filter(|s| !s.is_empty()).collect();
                prefix.len() <= path.len() && prefix.iter().zip(path).all(|(a, b)| *a == b.as_str())
            }
        };
        type_ok && path_ok
    }
}

pub fn is_type_in(token_type: Option<&str>, family: &[&str]) -> bool {
    token_type.is_some_and(|t| family.contains(&t))
}
