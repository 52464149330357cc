use serde::{Deserialize, Serialize};

/// Records per feed page.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Sizes of the paged and top-N views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Records per feed page.
    pub page_size: usize,
    /// Users kept on the engagement leaderboard.
    pub leaderboard_size: usize,
    /// Memes returned by the most-liked view.
    pub most_liked_size: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            leaderboard_size: 10,
            most_liked_size: 10,
        }
    }
}
