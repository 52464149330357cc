//! Domain record model for MemeHub.
//!
//! Defines the records the meme service reads and writes:
//! - [`Meme`] / [`NewMeme`]: posted memes and the upload payload
//! - [`Comment`]: a comment attached to a meme
//! - [`Vote`] / [`VoteKind`] / [`VoteTransition`]: like/dislike state per user and meme
//! - [`UserProfile`]: the public projection of a user account
//! - [`UserRating`]: one row of the engagement leaderboard
//!
//! Every record maps to a collection through [`Record`] and converts to and
//! from the store's JSON [`Document`](memehub_types::Document) form.

mod access;
mod comment;
mod meme;
mod rating;
mod record;
mod user;
mod vote;

pub use access::DocumentExt;
pub use comment::Comment;
pub use meme::{Meme, NewMeme};
pub use rating::UserRating;
pub use record::Record;
pub use user::UserProfile;
pub use vote::{Vote, VoteKind, VoteTransition, adjust_counter};

/// Collection names used by the service layer.
pub mod collections {
    pub const MEMES: &str = "memes";
    pub const COMMENTS: &str = "comments";
    pub const USERS: &str = "users";
    pub const VOTES: &str = "votes";
}
