use strata_tokens::TokenError;
use thiserror::Error;

/// Errors raised by pipeline mutations. Every mutation validates first, so
/// an error always means the pipeline was left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PipelineModelError {
    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("A variable with key '{0}' already exists")]
    DuplicateVariableKey(String),

    #[error("Variable '{key}' already has the value '{value}'")]
    DuplicateVariableValue { key: String, value: String },

    #[error("A layer named '{0}' already exists")]
    DuplicateLayerName(String),

    #[error("Unknown layer: '{0}'")]
    UnknownLayer(String),

    #[error("Unknown variable: '{0}'")]
    UnknownVariable(String),

    #[error("Variable '{key}' has no value '{value}'")]
    UnknownVariableValue { key: String, value: String },

    #[error("Unknown page: '{0}'")]
    UnknownPage(String),

    #[error("Layer '{layer}' is already bound to variable '{key}'")]
    AlreadyBound { layer: String, key: String },

    #[error("Invalid assignment for layer '{layer}': {reason}")]
    InvalidAssignment { layer: String, reason: String },

    #[error("Duplicate page for layer '{layer}' and assignment {assignment}")]
    DuplicatePage { layer: String, assignment: String },

    #[error("Token edit failed: {0}")]
    Token(#[from] TokenError),
}
