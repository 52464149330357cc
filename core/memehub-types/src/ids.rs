//! Record identifiers.
//!
//! Uses UUID v7 so that identifiers are unique and sort in creation order.
//! The canonical string form (lowercase, hyphenated) sorts lexically in the
//! same order as the identifier itself, which lets documents store ids as
//! plain strings without losing their ordering.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::{Builder, Uuid};

/// Unique identifier for a record in any collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Creates a new record ID with the current timestamp.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a record ID for a fixed instant.
    ///
    /// `sequence` fills the low 48 bits of the random section, so ids built
    /// for the same millisecond still order by `sequence`. Used for fixtures
    /// and imports where creation order is known up front.
    #[must_use]
    pub fn from_millis(millis: u64, sequence: u64) -> Self {
        let mut random = [0u8; 10];
        random[4..].copy_from_slice(&sequence.to_be_bytes()[2..]);
        Self(Builder::from_unix_timestamp_millis(millis, &random).into_uuid())
    }

    /// Creates a record ID from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }

    /// Parses a record ID from its canonical string form.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl From<RecordId> for serde_json::Value {
    fn from(id: RecordId) -> Self {
        Self::String(id.to_string())
    }
}
