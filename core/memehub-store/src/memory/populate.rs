//! Reference expansion (populate).

use super::Collections;
use crate::{StorageError, StorageResult};
use memehub_pipeline::Expansion;
use memehub_types::{Document, ID_FIELD, RecordId};
use serde_json::Value;

pub(crate) fn populate(
    collections: &Collections,
    documents: &mut [Document],
    expansions: &[Expansion],
) -> StorageResult<()> {
    for document in documents {
        for expansion in expansions {
            expand(collections, document, expansion)?;
        }
    }
    Ok(())
}

fn expand(
    collections: &Collections,
    document: &mut Document,
    expansion: &Expansion,
) -> StorageResult<()> {
    let Some(current) = document.get(&expansion.path) else {
        return Ok(());
    };
    let resolved = match current {
        Value::Null => return Ok(()),
        Value::String(raw) => {
            resolve(collections, expansion, raw)?.map_or(Value::Null, Value::Object)
        }
        Value::Array(items) => {
            let mut found = Vec::with_capacity(items.len());
            for item in items {
                let raw = item.as_str().ok_or_else(|| not_an_id(expansion, item))?;
                if let Some(doc) = resolve(collections, expansion, raw)? {
                    found.push(Value::Object(doc));
                }
            }
            Value::Array(found)
        }
        other => return Err(not_an_id(expansion, other)),
    };
    document.insert(expansion.path.clone(), resolved);
    Ok(())
}

/// Fetches, trims and recursively expands one referenced document.
fn resolve(
    collections: &Collections,
    expansion: &Expansion,
    raw: &str,
) -> StorageResult<Option<Document>> {
    let id = RecordId::parse(raw).map_err(|e| {
        StorageError::Expansion(format!("{}: invalid id {raw:?}: {e}", expansion.path))
    })?;
    let wanted = Value::from(id);
    let Some(found) = collections
        .get(&expansion.from)
        .and_then(|docs| docs.iter().find(|d| d.get(ID_FIELD) == Some(&wanted)))
    else {
        return Ok(None);
    };

    let mut doc = if expansion.select.is_empty() {
        found.clone()
    } else {
        found
            .iter()
            .filter(|(key, _)| key.as_str() == ID_FIELD || expansion.select.contains(key))
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    };
    for nested in &expansion.nested {
        expand(collections, &mut doc, nested)?;
    }
    Ok(Some(doc))
}

fn not_an_id(expansion: &Expansion, value: &Value) -> StorageError {
    StorageError::Expansion(format!(
        "{} holds {value}, expected a record id",
        expansion.path
    ))
}
