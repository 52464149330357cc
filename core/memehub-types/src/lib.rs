//! Core type definitions for MemeHub.
//!
//! This crate defines the store-agnostic types shared by every layer:
//! - Record identifiers (UUID v7, time-ordered)
//! - The JSON document representation and field-path access
//! - Millisecond wall-clock timestamps
//!
//! Domain entities (memes, comments, votes) live in `memehub-model`.

mod document;
mod ids;
mod timestamp;

pub use document::{Document, ID_FIELD, document_id, get_path};
pub use ids::RecordId;
pub use timestamp::now_millis;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("invalid record id: {0}")]
    InvalidId(#[from] uuid::Error),

    #[error("document has no `_id` field")]
    MissingId,
}
