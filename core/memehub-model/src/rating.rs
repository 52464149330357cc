use memehub_types::RecordId;
use serde::{Deserialize, Serialize};

/// One leaderboard row produced by the engagement scorer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRating {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    pub total_memes: u64,
    pub total_likes: u64,
    pub total_comments: u64,
    pub normalized_memes: f64,
    pub normalized_likes: f64,
    pub normalized_comments: f64,
    /// Engagement rating on a 0–5 scale, one decimal place.
    pub rating: f64,
}
