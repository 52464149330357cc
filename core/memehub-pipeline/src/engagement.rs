//! Engagement leaderboard recipe.
//!
//! Every uploader is scored from three metrics: memes posted, likes
//! received, comments written. Each metric is normalized against the
//! largest value any uploader reached, the normalized metrics are combined
//! with fixed weights, and the result is scaled to a 0–5 rating.

use crate::{Accumulator, Expr, Group, Lookup, Pipeline, Projection, SortKey, Stage, fields};
use memehub_model::collections;

pub const MEME_WEIGHT: f64 = 0.33;
pub const LIKE_WEIGHT: f64 = 0.33;
pub const COMMENT_WEIGHT: f64 = 0.34;
/// Upper bound of the rating scale.
pub const RATING_SCALE: f64 = 5.0;

const TOTAL_MEMES: &str = "totalMemes";
const TOTAL_LIKES: &str = "totalLikes";
const TOTAL_COMMENTS: &str = "totalComments";
const MAX_MEMES: &str = "maxMemes";
const MAX_LIKES: &str = "maxLikes";
const MAX_COMMENTS: &str = "maxComments";
const NORMALIZED_MEMES: &str = "normalizedMemes";
const NORMALIZED_LIKES: &str = "normalizedLikes";
const NORMALIZED_COMMENTS: &str = "normalizedComments";
const ENGAGEMENT_SCORE: &str = "engagementScore";
const RATING: &str = "rating";
const USER_COMMENTS: &str = "userComments";
const USER_DETAILS: &str = "userDetails";

/// Builds the leaderboard pipeline over the `memes` collection, keeping the
/// `top_n` highest ratings.
///
/// A zero maximum normalizes to 0 instead of dividing by zero. Uploaders
/// without a user profile are dropped after the maxima are taken.
#[must_use]
pub fn engagement_pipeline(top_n: usize) -> Pipeline {
    Pipeline::new()
        .then(Stage::Group(Group {
            key: Expr::field(fields::USER),
            accumulators: vec![
                (TOTAL_MEMES.into(), Accumulator::Count),
                (TOTAL_LIKES.into(), Accumulator::Sum(Expr::field(fields::LIKES))),
            ],
        }))
        .then(Stage::Lookup(Lookup {
            from: collections::COMMENTS.into(),
            local_field: fields::ID.into(),
            foreign_field: fields::USER.into(),
            as_field: USER_COMMENTS.into(),
        }))
        .then(Stage::Project(vec![
            Projection::include(fields::ID),
            Projection::include(TOTAL_MEMES),
            Projection::include(TOTAL_LIKES),
            Projection::computed(TOTAL_COMMENTS, Expr::size(Expr::field(USER_COMMENTS))),
        ]))
        .then(Stage::Window(vec![
            (MAX_MEMES.into(), Accumulator::Max(Expr::field(TOTAL_MEMES))),
            (MAX_LIKES.into(), Accumulator::Max(Expr::field(TOTAL_LIKES))),
            (MAX_COMMENTS.into(), Accumulator::Max(Expr::field(TOTAL_COMMENTS))),
        ]))
        .then(Stage::Lookup(Lookup {
            from: collections::USERS.into(),
            local_field: fields::ID.into(),
            foreign_field: fields::ID.into(),
            as_field: USER_DETAILS.into(),
        }))
        .then(Stage::Unwind(USER_DETAILS.into()))
        .then(Stage::AddFields(vec![
            (NORMALIZED_MEMES.into(), normalized(TOTAL_MEMES, MAX_MEMES)),
            (NORMALIZED_LIKES.into(), normalized(TOTAL_LIKES, MAX_LIKES)),
            (NORMALIZED_COMMENTS.into(), normalized(TOTAL_COMMENTS, MAX_COMMENTS)),
        ]))
        .then(Stage::AddFields(vec![(
            ENGAGEMENT_SCORE.into(),
            Expr::Add(vec![
                Expr::scaled(Expr::field(NORMALIZED_MEMES), MEME_WEIGHT),
                Expr::scaled(Expr::field(NORMALIZED_LIKES), LIKE_WEIGHT),
                Expr::scaled(Expr::field(NORMALIZED_COMMENTS), COMMENT_WEIGHT),
            ]),
        )]))
        .then(Stage::AddFields(vec![(
            RATING.into(),
            Expr::round(Expr::scaled(Expr::field(ENGAGEMENT_SCORE), RATING_SCALE), 1),
        )]))
        .then(Stage::Project(vec![
            Projection::include(fields::ID),
            Projection::computed("avatar", Expr::field("userDetails.avatar")),
            Projection::computed("name", Expr::field("userDetails.name")),
            Projection::computed("email", Expr::field("userDetails.email")),
            Projection::include(TOTAL_MEMES),
            Projection::include(TOTAL_LIKES),
            Projection::include(TOTAL_COMMENTS),
            Projection::include(NORMALIZED_MEMES),
            Projection::include(NORMALIZED_LIKES),
            Projection::include(NORMALIZED_COMMENTS),
            Projection::include(RATING),
        ]))
        .then(Stage::Sort(vec![SortKey::desc(RATING), SortKey::asc(fields::ID)]))
        .then(Stage::Limit(top_n))
}

fn normalized(total: &str, max: &str) -> Expr {
    Expr::divide_or_zero(Expr::field(total), Expr::field(max))
}
