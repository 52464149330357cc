//! Error types for the storage layer.

use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur in storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The store rejected a pipeline (malformed stage, bad operand).
    #[error("query error: {0}")]
    Query(String),

    /// A populate path could not be resolved.
    #[error("expansion error: {0}")]
    Expansion(String),

    /// Invalid data.
    #[error("invalid data: {0}")]
    InvalidData(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error (fixture files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Types(#[from] memehub_types::Error),
}
