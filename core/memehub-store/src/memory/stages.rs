//! Stage-by-stage pipeline evaluation.

use super::Collections;
use super::eval::{Matcher, accumulate, eval_expr, field_value};
use super::order::compare_values;
use crate::StorageResult;
use memehub_pipeline::{Expr, Group, Lookup, Pipeline, Projection, SortDirection, SortKey, Stage};
use memehub_types::{Document, ID_FIELD, get_path};
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::HashMap;

/// Evaluates `pipeline` over a snapshot of `collection`.
pub(crate) fn run(
    collections: &Collections,
    collection: &str,
    pipeline: &Pipeline,
) -> StorageResult<Vec<Document>> {
    let mut documents = collections.get(collection).cloned().unwrap_or_default();
    for stage in pipeline.stages() {
        documents = apply(collections, stage, documents)?;
    }
    Ok(documents)
}

fn apply(
    collections: &Collections,
    stage: &Stage,
    mut documents: Vec<Document>,
) -> StorageResult<Vec<Document>> {
    match stage {
        Stage::Match(predicate) => {
            let matcher = Matcher::compile(predicate)?;
            documents.retain(|d| matcher.matches(d));
            Ok(documents)
        }
        Stage::Sort(keys) => {
            documents.sort_by(|a, b| compare_by_keys(keys, a, b));
            Ok(documents)
        }
        Stage::Limit(n) => {
            documents.truncate(*n);
            Ok(documents)
        }
        Stage::Project(projections) => documents
            .iter()
            .map(|d| project(projections, d))
            .collect(),
        Stage::Lookup(lookup) => {
            let foreign = collections
                .get(&lookup.from)
                .map(Vec::as_slice)
                .unwrap_or_default();
            for document in &mut documents {
                join(lookup, foreign, document);
            }
            Ok(documents)
        }
        Stage::AddFields(assignments) => {
            for document in &mut documents {
                let values = assignments
                    .iter()
                    .map(|(_, expr)| eval_expr(expr, document))
                    .collect::<StorageResult<Vec<_>>>()?;
                for ((name, _), value) in assignments.iter().zip(values) {
                    document.insert(name.clone(), value);
                }
            }
            Ok(documents)
        }
        Stage::Group(group) => group_documents(group, &documents),
        Stage::Unwind(field) => Ok(unwind(field, documents)),
        Stage::Window(accumulators) => {
            let totals = accumulators
                .iter()
                .map(|(name, acc)| Ok((name.clone(), accumulate(acc, &documents)?)))
                .collect::<StorageResult<Vec<_>>>()?;
            for document in &mut documents {
                for (name, value) in &totals {
                    document.insert(name.clone(), value.clone());
                }
            }
            Ok(documents)
        }
    }
}

/// Orders two documents by a compound sort key list.
fn compare_by_keys(keys: &[SortKey], a: &Document, b: &Document) -> Ordering {
    keys.iter()
        .map(|key| {
            let ord = compare_values(&field_value(a, &key.field), &field_value(b, &key.field));
            match key.direction {
                SortDirection::Ascending => ord,
                SortDirection::Descending => ord.reverse(),
            }
        })
        .find(|ord| *ord != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

fn project(projections: &[Projection], document: &Document) -> StorageResult<Document> {
    let mut out = Document::new();
    for projection in projections {
        match projection {
            Projection::Include(field) => {
                if let Some(value) = document.get(field) {
                    out.insert(field.clone(), value.clone());
                }
            }
            // A bare path to a missing field leaves the output field out.
            Projection::Computed(name, Expr::Field(path)) => {
                if let Some(value) = get_path(document, path) {
                    out.insert(name.clone(), value.clone());
                }
            }
            Projection::Computed(name, expr) => {
                out.insert(name.clone(), eval_expr(expr, document)?);
            }
        }
    }
    Ok(out)
}

/// Array values contribute each element as a join key.
fn join_keys(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}

fn join(lookup: &Lookup, foreign: &[Document], document: &mut Document) {
    let local = field_value(document, &lookup.local_field);
    let local_keys = join_keys(&local);
    let joined = foreign
        .iter()
        .filter(|candidate| {
            let value = field_value(candidate, &lookup.foreign_field);
            join_keys(&value).into_iter().any(|f| {
                local_keys
                    .iter()
                    .any(|l| compare_values(l, f) == Ordering::Equal)
            })
        })
        .cloned()
        .map(Value::Object)
        .collect();
    document.insert(lookup.as_field.clone(), Value::Array(joined));
}

fn group_documents(group: &Group, documents: &[Document]) -> StorageResult<Vec<Document>> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut buckets: Vec<(Value, Vec<&Document>)> = Vec::new();
    for document in documents {
        let key = eval_expr(&group.key, document)?;
        let slot = *index.entry(key.to_string()).or_insert_with(|| {
            buckets.push((key.clone(), Vec::new()));
            buckets.len() - 1
        });
        buckets[slot].1.push(document);
    }

    buckets
        .into_iter()
        .map(|(key, members)| {
            let mut out = Document::new();
            out.insert(ID_FIELD.to_owned(), key);
            for (name, accumulator) in &group.accumulators {
                out.insert(name.clone(), accumulate(accumulator, members.iter().copied())?);
            }
            Ok(out)
        })
        .collect()
}

fn unwind(field: &str, documents: Vec<Document>) -> Vec<Document> {
    let mut out = Vec::with_capacity(documents.len());
    for document in documents {
        match document.get(field) {
            None | Some(Value::Null) => {}
            Some(Value::Array(items)) => {
                for item in items {
                    let mut copy = document.clone();
                    copy.insert(field.to_owned(), item.clone());
                    out.push(copy);
                }
            }
            Some(_) => out.push(document),
        }
    }
    out
}

