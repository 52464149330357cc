//! Aggregation pipelines for MemeHub.
//!
//! A [`Pipeline`] is an ordered, immutable list of tagged [`Stage`]s that a
//! document store executes as one query. This crate owns:
//!
//! - **Stage model**: [`Stage`], [`Predicate`], [`Expr`], [`Accumulator`]
//!   and the populate description [`Expansion`]
//! - **Cursor codec**: the opaque continuation token ([`cursor`])
//! - **Feed builder**: translates feed filters into stages ([`FeedPipelineBuilder`])
//! - **Keyset seek**: the predicate that resumes a sorted scan ([`seek_predicate`])
//! - **Recipes**: fixed pipelines for the leaderboard and user views
//!
//! Nothing here talks to a store; executing a pipeline is the job of a
//! `DocumentStore` implementation.

pub mod cursor;
mod engagement;
mod expansion;
mod expr;
mod feed;
mod predicate;
pub mod recipes;
mod seek;
mod stage;

pub use cursor::{Cursor, CursorDecodeError};
pub use engagement::{COMMENT_WEIGHT, LIKE_WEIGHT, MEME_WEIGHT, RATING_SCALE, engagement_pipeline};
pub use expansion::Expansion;
pub use expr::{Accumulator, Expr};
pub use feed::{Category, FeedPipelineBuilder, FeedQuery, SortBy};
pub use predicate::{CompareOp, Predicate};
pub use seek::seek_predicate;
pub use stage::{Group, Lookup, Pipeline, Projection, SortDirection, SortKey, Stage};

/// Field names shared by the recipes and the feed builder.
pub mod fields {
    pub const ID: &str = memehub_types::ID_FIELD;
    pub const NAME: &str = "name";
    pub const URL: &str = "url";
    pub const WIDTH: &str = "width";
    pub const HEIGHT: &str = "height";
    pub const BOX_COUNT: &str = "box_count";
    pub const LIKES: &str = "likes";
    pub const DISLIKES: &str = "dislikes";
    pub const COMMENTS: &str = "comments";
    pub const USER: &str = "user";
    pub const MEME_ID: &str = "memeId";
    pub const USER_ID: &str = "userId";
    pub const CREATED_AT: &str = "createdAt";
    pub const UPDATED_AT: &str = "updatedAt";
    /// Computed comment count used by the `comments` feed sort.
    pub const COMMENT_COUNT: &str = "count";
}
