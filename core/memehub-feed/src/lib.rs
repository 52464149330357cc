//! Feed and meme operations for MemeHub.
//!
//! Runs the pipelines from `memehub-pipeline` against a
//! [`DocumentStore`](memehub_store::DocumentStore):
//!
//! - [`Paginator`] executes a pipeline one page at a time, using an opaque
//!   cursor and a one-record lookahead to detect further pages
//! - [`MemeService`] exposes the feed, leaderboard and meme read/write
//!   operations on top of it

mod config;
mod error;
mod paginate;
mod service;

pub use config::{DEFAULT_PAGE_SIZE, FeedConfig};
pub use error::{FeedError, FeedResult};
pub use paginate::{IdOrder, Page, Paginator};
pub use service::{MemeDetail, MemeService, VoteOutcome};
