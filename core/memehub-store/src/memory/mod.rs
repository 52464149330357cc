//! In-memory document store.
//!
//! Collections live behind one `tokio::sync::RwLock`. A pipeline runs under
//! a single read guard, so each query sees a consistent snapshot, and every
//! write holds the write guard for its whole read-modify-write.

mod eval;
mod order;
mod populate;
mod stages;

use crate::{DocumentStore, DocumentUpdate, StorageError, StorageResult};
use async_trait::async_trait;
use eval::Matcher;
use memehub_pipeline::{Expansion, Pipeline, Predicate, fields};
use memehub_types::{Document, ID_FIELD, RecordId, document_id};
use serde_json::Value;
use std::collections::HashMap;
use std::path::Path;
use tokio::sync::RwLock;
use tracing::{debug, info};

type Collections = HashMap<String, Vec<Document>>;

/// Document store held entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<Collections>,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store seeded from a JSON fixture file shaped as
    /// `{ "collection": [document, ...], ... }`.
    ///
    /// Documents without `_id` are assigned one.
    pub async fn load_json(path: impl AsRef<Path>) -> StorageResult<Self> {
        let path = path.as_ref();
        let raw = tokio::fs::read(path).await?;
        let fixture: HashMap<String, Vec<Document>> = serde_json::from_slice(&raw)?;

        let mut collections = Collections::new();
        let mut total = 0;
        for (name, documents) in fixture {
            let target: &mut Vec<Document> = collections.entry(name).or_default();
            for mut document in documents {
                canonicalize_references(&mut document)?;
                insert_into(target, document)?;
                total += 1;
            }
        }
        info!("Loaded {} documents from {}", total, path.display());

        Ok(Self {
            collections: RwLock::new(collections),
        })
    }

    /// Number of documents in `collection`.
    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }
}

/// Fields of fixture documents that hold record ids.
const REFERENCE_FIELDS: [&str; 4] = [
    fields::USER,
    fields::COMMENTS,
    fields::MEME_ID,
    fields::USER_ID,
];

/// Rewrites id references to the canonical form the query layer compares
/// against. A reference that is not an id is rejected.
fn canonicalize_references(document: &mut Document) -> StorageResult<()> {
    for field in REFERENCE_FIELDS {
        match document.get_mut(field) {
            Some(Value::Array(ids)) => {
                for id in ids.iter_mut() {
                    canonicalize_id(field, id)?;
                }
            }
            Some(value) => canonicalize_id(field, value)?,
            None => {}
        }
    }
    Ok(())
}

fn canonicalize_id(field: &str, value: &mut Value) -> StorageResult<()> {
    let Value::String(raw) = value else {
        return Ok(());
    };
    let id = RecordId::parse(raw)
        .map_err(|e| StorageError::InvalidData(format!("{field} holds {raw:?}: {e}")))?;
    *value = id.into();
    Ok(())
}

/// Appends a document after assigning or validating its id. The id is
/// stored in canonical form whatever spelling it arrived in.
fn insert_into(target: &mut Vec<Document>, mut document: Document) -> StorageResult<RecordId> {
    let id = if document.contains_key(ID_FIELD) {
        document_id(&document)?
    } else {
        RecordId::new()
    };
    document.insert(ID_FIELD.to_owned(), id.into());
    let key = Value::from(id);
    if target.iter().any(|d| d.get(ID_FIELD) == Some(&key)) {
        return Err(StorageError::InvalidData(format!("duplicate id {id}")));
    }
    target.push(document);
    Ok(id)
}

/// Applies `update` while keeping the document's id intact.
fn apply_update(document: &mut Document, update: DocumentUpdate) {
    let id = document.get(ID_FIELD).cloned();
    update(document);
    if let Some(id) = id {
        document.insert(ID_FIELD.to_owned(), id);
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn aggregate(
        &self,
        collection: &str,
        pipeline: &Pipeline,
    ) -> StorageResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let documents = stages::run(&collections, collection, pipeline)?;
        debug!(
            "aggregate {}: {} stages -> {} documents",
            collection,
            pipeline.len(),
            documents.len()
        );
        Ok(documents)
    }

    async fn populate(
        &self,
        mut documents: Vec<Document>,
        expansions: &[Expansion],
    ) -> StorageResult<Vec<Document>> {
        if documents.is_empty() || expansions.is_empty() {
            return Ok(documents);
        }
        let collections = self.collections.read().await;
        populate::populate(&collections, &mut documents, expansions)?;
        Ok(documents)
    }

    async fn insert(&self, collection: &str, document: Document) -> StorageResult<RecordId> {
        let mut collections = self.collections.write().await;
        let id = insert_into(collections.entry(collection.to_owned()).or_default(), document)?;
        debug!("inserted {} into {}", id, collection);
        Ok(id)
    }

    async fn find_by_id(&self, collection: &str, id: &RecordId) -> StorageResult<Option<Document>> {
        let key = Value::from(*id);
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.get(ID_FIELD) == Some(&key)))
            .cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &Predicate,
        update: DocumentUpdate,
    ) -> StorageResult<Option<Document>> {
        let matcher = Matcher::compile(filter)?;
        let mut collections = self.collections.write().await;
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| matcher.matches(d)))
        else {
            return Ok(None);
        };
        let before = document.clone();
        apply_update(document, update);
        Ok(Some(before))
    }

    async fn upsert_one(
        &self,
        collection: &str,
        filter: &Predicate,
        seed: Document,
        update: DocumentUpdate,
    ) -> StorageResult<Option<Document>> {
        let matcher = Matcher::compile(filter)?;
        let mut collections = self.collections.write().await;
        let target = collections.entry(collection.to_owned()).or_default();
        if let Some(document) = target.iter_mut().find(|d| matcher.matches(d)) {
            let before = document.clone();
            apply_update(document, update);
            return Ok(Some(before));
        }

        let mut seed = seed;
        if !seed.contains_key(ID_FIELD) {
            seed.insert(ID_FIELD.to_owned(), RecordId::new().into());
        }
        apply_update(&mut seed, update);
        insert_into(target, seed)?;
        Ok(None)
    }
}
