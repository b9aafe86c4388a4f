//! Errors for configuration and record access.

use crate::validate::ValidationError;

pub type RecordsResult<T> = Result<T, RecordsError>;

#[derive(thiserror::Error, Debug)]
pub enum RecordsError {
    #[error("Header mapping has no entry for '{key}'")]
    MissingHeader { key: String },

    #[error("Metadata for use case '{use_case}' has no '{key}'")]
    MissingMetadata { use_case: String, key: String },

    #[error("Metadata '{key}' for use case '{use_case}' is not a number: '{value}'")]
    MalformedMetadata {
        use_case: String,
        key: String,
        value: String,
    },

    #[error("No classification ranges configured")]
    MissingClassification,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
