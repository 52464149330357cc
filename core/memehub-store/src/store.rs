//! Document store abstraction trait.

use crate::error::StorageResult;
use async_trait::async_trait;
use memehub_pipeline::{Expansion, Pipeline, Predicate};
use memehub_types::{Document, RecordId};

/// In-place modification applied to a single document under the store's
/// write lock. Changes to `_id` are discarded.
pub type DocumentUpdate = Box<dyn FnOnce(&mut Document) + Send>;

/// Query and write contract every backing store implements.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Runs `pipeline` over `collection` as one query.
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> StorageResult<Vec<Document>>;

    /// Replaces referenced ids with the documents they point to.
    async fn populate(
        &self,
        documents: Vec<Document>,
        expansions: &[Expansion],
    ) -> StorageResult<Vec<Document>>;

    /// Stores a document, assigning `_id` when absent.
    async fn insert(&self, collection: &str, document: Document) -> StorageResult<RecordId>;

    async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Document>>;

    /// Atomically applies `update` to the first document matching `filter`.
    ///
    /// Returns the document as it was before the update, or `None` when
    /// nothing matched.
    async fn update_one(
        &self,
        collection: &str,
        filter: &Predicate,
        update: DocumentUpdate,
    ) -> StorageResult<Option<Document>>;

    /// As [`update_one`](Self::update_one), but inserts `seed` and applies
    /// `update` to it when nothing matches (returning `None`).
    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Predicate,
        seed: Document,
        update: DocumentUpdate,
    ) -> StorageResult<Option<Document>>;
}
