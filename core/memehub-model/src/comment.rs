use crate::{Record, collections};
use memehub_types::RecordId;
use serde::{Deserialize, Serialize};

/// A comment on a meme.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub meme_id: RecordId,
    pub user: RecordId,
    pub content: String,
    pub created_at: i64,
}

impl Comment {
    #[must_use]
    pub fn new(meme_id: RecordId, user: RecordId, content: impl Into<String>, now: i64) -> Self {
        Self {
            id: RecordId::new(),
            meme_id,
            user,
            content: content.into(),
            created_at: now,
        }
    }
}

impl Record for Comment {
    const COLLECTION: &'static str = collections::COMMENTS;
}
