//! Error types for schema derivation and document loading

use thiserror::Error;

/// Errors that can occur while deriving form artifacts from a schema
#[derive(Debug, Error)]
pub enum FormError {
    /// Root is not an object, or a read-only wrapper does not wrap an object
    #[error("Invalid schema: {0}")]
    InvalidSchema(String),

    /// Requested behavior is reserved but not available
    #[error("Not implemented: {0}")]
    NotImplemented(String),

    /// A schema document could not be turned into a schema tree
    #[error("Invalid document '{path}': {reason}")]
    Document { path: String, reason: String },

    /// File extension is not one of json, yaml or yml
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Glob pattern error: {0}")]
    Glob(#[from] glob::PatternError),
}

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, FormError>;
