use crate::{CompareOp, Predicate, SortDirection, SortKey};
use serde_json::Value;

/// Predicate selecting the documents at or after a boundary document in the
/// order given by `keys`.
///
/// `boundary` holds the boundary document's value for each key, in key
/// order. The last key must be unique per document (the record id), which
/// makes the boundary itself the first match. Keys beyond `boundary.len()`
/// are ignored.
///
/// For keys `(k1 desc, _id desc)` and boundary `(v1, c)` this produces
/// `k1 < v1 OR (k1 == v1 AND _id <= c)`.
#[must_use]
pub fn seek_predicate(keys: &[SortKey], boundary: &[Value]) -> Predicate {
    let keys = &keys[..keys.len().min(boundary.len())];
    let clauses = keys
        .iter()
        .enumerate()
        .map(|(i, key)| {
            let mut parts: Vec<Predicate> = keys[..i]
                .iter()
                .zip(boundary)
                .map(|(prior, value)| Predicate::eq(prior.field.clone(), value.clone()))
                .collect();
            let inclusive = i + 1 == keys.len();
            parts.push(Predicate::compare(
                key.field.clone(),
                after(key.direction, inclusive),
                boundary[i].clone(),
            ));
            Predicate::and(parts)
        })
        .collect();
    Predicate::or(clauses)
}

const fn after(direction: SortDirection, inclusive: bool) -> CompareOp {
    match (direction, inclusive) {
        (SortDirection::Descending, false) => CompareOp::Lt,
        (SortDirection::Descending, true) => CompareOp::Lte,
        (SortDirection::Ascending, false) => CompareOp::Gt,
        (SortDirection::Ascending, true) => CompareOp::Gte,
    }
}
