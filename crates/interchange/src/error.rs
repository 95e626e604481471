use thiserror::Error;

/// Input the adapter cannot work with at all. Everything short of this is
/// reported as an [`crate::ImportWarning`].
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterchangeError {
    #[error("Config is not valid JSON: {0}")]
    Json(String),

    #[error("Config root must be a JSON object")]
    RootNotObject,

    #[error("'platforms' must be an object keyed by platform name")]
    PlatformsNotObject,
}

impl From<serde_json::Error> for InterchangeError {
    fn from(e: serde_json::Error) -> Self {
        InterchangeError::Json(e.to_string())
    }
}
