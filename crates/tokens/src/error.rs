use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("JSON parsing error: {0}")]
    Json(String),

    #[error("Token file root must be a JSON object")]
    RootNotObject,

    #[error("Invalid attribute '{attribute}' at '{path}': {message}")]
    InvalidAttribute {
        path: String,
        attribute: String,
        message: String,
    },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    #[error("Path not found: '{0}'")]
    NotFound(String),

    #[error("'{0}' already exists")]
    AlreadyExists(String),

    #[error("'{0}' is a token, not a group")]
    NotAGroup(String),

    #[error("'{0}' is a group, not a token")]
    NotAToken(String),

    #[error("Cannot move '{path}' into its own subtree '{target}'")]
    MoveIntoSelf { path: String, target: String },
}

impl From<serde_json::Error> for TokenError {
    fn from(e: serde_json::Error) -> Self {
        TokenError::Json(e.to_string())
    }
}
