//! Error types for the feed layer.

use memehub_store::StorageError;
use thiserror::Error;

/// Result type for feed operations.
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur in feed and meme operations.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The store failed to run a query, expansion or write.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// A referenced record does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Caller-supplied data was rejected.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

// Records the store hands back that do not decode are storage failures.
impl From<memehub_types::Error> for FeedError {
    fn from(e: memehub_types::Error) -> Self {
        Self::Storage(e.into())
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(e: serde_json::Error) -> Self {
        Self::Storage(e.into())
    }
}
