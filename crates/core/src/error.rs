//! The umbrella error for project-level operations.

use strata_format::FormatError;
use strata_interchange::InterchangeError;
use strata_pipeline::PipelineModelError;
use strata_tokens::TokenError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrataError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON serialization/deserialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Token error: {0}")]
    Tokens(#[from] TokenError),
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineModelError),
    #[error("Formatting error: {0}")]
    Format(#[from] FormatError),
    #[error("Interchange error: {0}")]
    Interchange(#[from] InterchangeError),
    #[error("Unknown platform: '{0}'")]
    UnknownPlatform(String),
    #[error("Unknown build config: '{0}'")]
    UnknownConfig(String),
    #[error("Output path leaves the output directory: '{0}'")]
    UnsafePath(String),
}
