//! JSON document representation.

use crate::{Error, RecordId};
use serde_json::{Map, Value};

/// A schemaless record as held by the document store.
pub type Document = Map<String, Value>;

/// Name of the identifier field present on every stored document.
pub const ID_FIELD: &str = "_id";

/// Reads and parses the `_id` field of a document.
pub fn document_id(document: &Document) -> crate::Result<RecordId> {
    let raw = document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .ok_or(Error::MissingId)?;
    Ok(RecordId::parse(raw)?)
}

/// Resolves a dotted field path (`"userDetails.name"`) against a document.
///
/// Returns `None` when any segment is missing or traverses a non-object.
#[must_use]
pub fn get_path<'a>(document: &'a Document, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = document.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}
