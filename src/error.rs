//! Error types for schema flattening

use thiserror::Error;

/// Result type for flattening operations
pub type Result<T> = std::result::Result<T, FlattenError>;

/// Flattening errors
#[derive(Error, Debug)]
pub enum FlattenError {
    #[error("Schema node has no name at {path}")]
    MissingName { path: String },

    #[error("Duplicate qualified name: {name}")]
    DuplicateName { name: String },

    #[error("Schema nesting deeper than {max_depth} at {path}")]
    DepthExceeded { path: String, max_depth: usize },

    #[error("Invalid schema document: {0}")]
    InvalidDocument(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config_crate::ConfigError),
}
