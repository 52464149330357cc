//! Cursor pagination over aggregation pipelines.
//!
//! A page is fetched with one extra record (the lookahead probe). When the
//! probe comes back, its id becomes the next cursor and it is dropped from
//! the page; the next request starts at that record, inclusively.
//!
//! Under a domain sort (likes, date, comment count) an id bound alone would
//! skip or repeat records, so the cursor record is looked up again and the
//! scan resumes with a keyset predicate over the full sort key.

use crate::FeedResult;
use memehub_pipeline::{
    Cursor, Expansion, Pipeline, Predicate, SortDirection, SortKey, Stage, cursor, fields,
    seek_predicate,
};
use memehub_store::DocumentStore;
use memehub_types::{Document, RecordId, document_id, get_path};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// One page of results.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub data: Vec<Document>,
    pub has_more: bool,
    /// Present exactly when `has_more` is true.
    pub next_cursor: Option<Cursor>,
}

/// How the record id participates in the page order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum IdOrder {
    /// Newest first; ties of any domain sort break by descending id.
    #[default]
    Descending,
    Ascending,
    /// No id sort is appended. Cursor bounds still use `_id <= cursor`.
    Unordered,
}

impl IdOrder {
    const fn direction(self) -> Option<SortDirection> {
        match self {
            Self::Descending => Some(SortDirection::Descending),
            Self::Ascending => Some(SortDirection::Ascending),
            Self::Unordered => None,
        }
    }
}

/// Executes pipelines page by page against a store.
pub struct Paginator<'s> {
    store: &'s dyn DocumentStore,
    page_size: usize,
}

impl<'s> Paginator<'s> {
    /// A page size of zero is treated as one.
    #[must_use]
    pub fn new(store: &'s dyn DocumentStore, page_size: usize) -> Self {
        Self {
            store,
            page_size: page_size.max(1),
        }
    }

    /// Runs `base` over `collection` and returns the page starting at
    /// `cursor`. An absent or undecodable cursor starts from the beginning.
    ///
    /// Expansions are applied to the fetched records before the page is
    /// cut; any query or expansion failure fails the whole call.
    pub async fn execute(
        &self,
        collection: &str,
        base: &Pipeline,
        cursor: Option<&str>,
        expansions: &[Expansion],
        order: IdOrder,
    ) -> FeedResult<Page> {
        let keys = page_order(base, order);
        let mut pipeline = base.clone();

        if let Some(boundary) = cursor::decode_lenient(cursor) {
            let seek = self.seek(collection, base, &keys, &boundary, order).await?;
            pipeline = pipeline.then(Stage::Match(seek));
        }
        if order != IdOrder::Unordered {
            pipeline = pipeline.then(Stage::Sort(keys));
        }
        pipeline = pipeline.then(Stage::Limit(self.page_size + 1));

        let mut data = self.store.aggregate(collection, &pipeline).await?;
        if !expansions.is_empty() && !data.is_empty() {
            data = self.store.populate(data, expansions).await?;
        }

        let has_more = data.len() > self.page_size;
        let next_cursor = if has_more {
            data.truncate(self.page_size + 1);
            data.pop()
                .map(|probe| document_id(&probe).map(|id| cursor::encode(&id)))
                .transpose()?
        } else {
            None
        };

        debug!(
            "page of {} from {} (has_more: {})",
            data.len(),
            collection,
            has_more
        );
        Ok(Page {
            data,
            has_more,
            next_cursor,
        })
    }

    /// Predicate admitting the boundary record and everything after it.
    async fn seek(
        &self,
        collection: &str,
        base: &Pipeline,
        keys: &[SortKey],
        boundary: &RecordId,
        order: IdOrder,
    ) -> FeedResult<Predicate> {
        let id_only = match order {
            IdOrder::Ascending => Predicate::gte(fields::ID, *boundary),
            IdOrder::Descending | IdOrder::Unordered => Predicate::lte(fields::ID, *boundary),
        };
        if order == IdOrder::Unordered || keys.len() < 2 {
            return Ok(id_only);
        }

        let probe = base
            .clone()
            .then(Stage::Match(Predicate::eq(fields::ID, *boundary)))
            .then(Stage::Limit(1));
        let Some(record) = self.store.aggregate(collection, &probe).await?.pop() else {
            debug!("cursor record {} is gone, seeking by id only", boundary);
            return Ok(id_only);
        };

        let values: Vec<Value> = keys
            .iter()
            .map(|key| get_path(&record, &key.field).cloned().unwrap_or(Value::Null))
            .collect();
        Ok(seek_predicate(keys, &values))
    }
}

/// Full page order: the authoritative domain sort, then the id tie-break.
fn page_order(base: &Pipeline, order: IdOrder) -> Vec<SortKey> {
    let mut keys: Vec<SortKey> = base
        .authoritative_sort()
        .unwrap_or_default()
        .iter()
        .filter(|key| key.field != fields::ID)
        .cloned()
        .collect();
    if let Some(direction) = order.direction() {
        keys.push(SortKey {
            field: fields::ID.to_owned(),
            direction,
        });
    }
    keys
}
