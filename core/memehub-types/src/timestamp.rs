//! Wall-clock timestamps.
//!
//! Documents store `createdAt`/`updatedAt` as milliseconds since the Unix
//! epoch so they compare numerically inside pipelines.

use std::time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch. Clocks set before the epoch read as 0.
#[must_use]
pub fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or_default()
}
