use crate::{Record, collections};
use memehub_types::RecordId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// The two reactions a user can leave on a meme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteKind {
    Like,
    Dislike,
}

impl VoteKind {
    /// Wire name (`"like"` / `"dislike"`).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Like => "like",
            Self::Dislike => "dislike",
        }
    }

    /// Reads the stored vote state, where an empty string means "cleared".
    #[must_use]
    pub fn from_state(state: &str) -> Option<Self> {
        state.parse().ok()
    }
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "like" => Ok(Self::Like),
            "dislike" => Ok(Self::Dislike),
            other => Err(format!("invalid vote type: {other:?}")),
        }
    }
}

/// A user's current reaction to one meme. `kind == None` is a cleared vote,
/// stored as `"type": ""`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vote {
    #[serde(rename = "_id")]
    pub id: RecordId,
    pub meme_id: RecordId,
    pub user_id: RecordId,
    #[serde(rename = "type", serialize_with = "write_state", deserialize_with = "read_state")]
    pub kind: Option<VoteKind>,
    pub created_at: i64,
}

impl Vote {
    /// A vote record with no reaction yet.
    #[must_use]
    pub fn cleared(meme_id: RecordId, user_id: RecordId, now: i64) -> Self {
        Self {
            id: RecordId::new(),
            meme_id,
            user_id,
            kind: None,
            created_at: now,
        }
    }
}

impl Record for Vote {
    const COLLECTION: &'static str = collections::VOTES;
}

fn write_state<S: Serializer>(kind: &Option<VoteKind>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(kind.map_or("", VoteKind::as_str))
}

fn read_state<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<VoteKind>, D::Error> {
    let state = String::deserialize(deserializer)?;
    if state.is_empty() {
        return Ok(None);
    }
    state.parse().map(Some).map_err(serde::de::Error::custom)
}

/// Outcome of applying a requested reaction to a user's previous one.
///
/// Repeating the current reaction clears it; any other request replaces it.
/// The counter deltas move a meme's `likes`/`dislikes` from the previous
/// state to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VoteTransition {
    pub previous: Option<VoteKind>,
    pub next: Option<VoteKind>,
}

impl VoteTransition {
    #[must_use]
    pub fn apply(previous: Option<VoteKind>, requested: VoteKind) -> Self {
        let next = if previous == Some(requested) {
            None
        } else {
            Some(requested)
        };
        Self { previous, next }
    }

    #[must_use]
    pub fn likes_delta(&self) -> i64 {
        self.delta(VoteKind::Like)
    }

    #[must_use]
    pub fn dislikes_delta(&self) -> i64 {
        self.delta(VoteKind::Dislike)
    }

    fn delta(&self, kind: VoteKind) -> i64 {
        i64::from(self.next == Some(kind)) - i64::from(self.previous == Some(kind))
    }
}

/// Applies a signed delta to a counter that never drops below zero.
#[must_use]
pub const fn adjust_counter(current: u64, delta: i64) -> u64 {
    if delta < 0 {
        current.saturating_sub(delta.unsigned_abs())
    } else {
        current.saturating_add(delta.unsigned_abs())
    }
}
