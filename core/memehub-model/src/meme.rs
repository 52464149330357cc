use crate::{Record, collections};
use memehub_types::RecordId;
use serde::{Deserialize, Serialize};

/// A posted meme.
///
/// `comments` holds comment ids in posting order; `likes` and `dislikes`
/// are denormalized counters maintained by the vote path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meme {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub name: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(rename = "box_count", default, skip_serializing_if = "Option::is_none")]
    pub box_count: Option<u32>,
    #[serde(default)]
    pub comments: Vec<RecordId>,
    #[serde(default)]
    pub likes: u64,
    #[serde(default)]
    pub dislikes: u64,
    pub user: RecordId,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Meme {
    /// Builds a fresh meme from an upload payload.
    #[must_use]
    pub fn from_upload(upload: NewMeme, user: RecordId, now: i64) -> Self {
        Self {
            id: RecordId::new(),
            name: upload.name,
            url: upload.url,
            width: upload.width,
            height: upload.height,
            box_count: upload.box_count,
            comments: Vec::new(),
            likes: 0,
            dislikes: 0,
            user,
            created_at: now,
            updated_at: now,
        }
    }
}

impl Record for Meme {
    const COLLECTION: &'static str = collections::MEMES;
}

/// Upload payload for a new meme. The media url is stored as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMeme {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub box_count: Option<u32>,
}
