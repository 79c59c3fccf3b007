//! Error types for the observed-schema engine

use thiserror::Error;

/// Result type for schema operations
pub type Result<T> = std::result::Result<T, SchemaError>;

/// Observed-schema engine errors
#[derive(Error, Debug)]
pub enum SchemaError {
    /// One sample document cannot be traversed. Recovered locally: the
    /// accumulator skips the sample, counts it, and keeps going.
    #[error("Malformed sample '{file}': {reason}")]
    MalformedSample { file: String, reason: String },

    /// A loaded schema snapshot is missing required fields or has an
    /// incompatible shape. Fatal for the requesting operation.
    #[error("Invalid schema snapshot '{path}': {reason}")]
    SchemaFormat { path: String, reason: String },

    /// Candidate document or comparison snapshot is absent or unreadable.
    #[error("Target not found: {path}")]
    TargetNotFound { path: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
