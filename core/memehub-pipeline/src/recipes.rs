//! Fixed pipelines and expansions behind the meme and user views.

use crate::{Expansion, Expr, Lookup, Pipeline, Predicate, Projection, SortKey, Stage, fields};
use memehub_model::{VoteKind, collections};
use memehub_types::RecordId;

/// The `limit` most liked memes with their comments joined inline.
#[must_use]
pub fn most_liked(limit: usize) -> Pipeline {
    Pipeline::new()
        .then(Stage::Sort(vec![SortKey::desc(fields::LIKES), SortKey::desc(fields::ID)]))
        .then(Stage::Limit(limit))
        .then(Stage::Lookup(Lookup {
            from: collections::COMMENTS.into(),
            local_field: fields::COMMENTS.into(),
            foreign_field: fields::ID.into(),
            as_field: fields::COMMENTS.into(),
        }))
        .then(Stage::Project(
            [
                fields::ID,
                fields::NAME,
                fields::URL,
                fields::WIDTH,
                fields::HEIGHT,
                fields::BOX_COUNT,
                fields::LIKES,
                fields::DISLIKES,
                fields::COMMENTS,
                fields::CREATED_AT,
                fields::UPDATED_AT,
            ]
            .into_iter()
            .map(Projection::include)
            .collect(),
        ))
}

/// Memes a user currently likes, read from the `votes` collection.
///
/// `createdAt` is the time of the vote, not of the meme.
#[must_use]
pub fn liked_memes(user: &RecordId) -> Pipeline {
    let details =
        |field: &str| Projection::computed(field, Expr::field(format!("memeDetails.{field}")));

    Pipeline::new()
        .then(Stage::Match(Predicate::and(vec![
            Predicate::eq(fields::USER_ID, *user),
            Predicate::eq("type", VoteKind::Like.as_str()),
        ])))
        .then(Stage::Lookup(Lookup {
            from: collections::MEMES.into(),
            local_field: fields::MEME_ID.into(),
            foreign_field: fields::ID.into(),
            as_field: "memeDetails".into(),
        }))
        .then(Stage::Unwind("memeDetails".into()))
        .then(Stage::Project(vec![
            Projection::include(fields::MEME_ID),
            details(fields::NAME),
            details(fields::URL),
            details(fields::WIDTH),
            details(fields::HEIGHT),
            details(fields::BOX_COUNT),
            details(fields::LIKES),
            details(fields::DISLIKES),
            Projection::include(fields::CREATED_AT),
        ]))
}

/// Memes posted by one user, in posting order.
#[must_use]
pub fn user_memes(user: &RecordId) -> Pipeline {
    Pipeline::new()
        .then(Stage::Match(Predicate::eq(fields::USER, *user)))
        .then(Stage::Sort(vec![SortKey::asc(fields::ID)]))
}

/// Single record lookup by id.
#[must_use]
pub fn by_id(id: &RecordId) -> Pipeline {
    Pipeline::new()
        .then(Stage::Match(Predicate::eq(fields::ID, *id)))
        .then(Stage::Limit(1))
}

/// Filter selecting one user's vote on one meme.
#[must_use]
pub fn vote_of(meme: &RecordId, user: &RecordId) -> Predicate {
    Predicate::and(vec![
        Predicate::eq(fields::MEME_ID, *meme),
        Predicate::eq(fields::USER_ID, *user),
    ])
}

/// Populates a meme's comment ids with the comments, and each comment's
/// author with their name and email.
#[must_use]
pub fn comment_expansion() -> Expansion {
    Expansion::new(fields::COMMENTS, collections::COMMENTS)
        .select(["content", fields::USER, fields::CREATED_AT])
        .nested(Expansion::new(fields::USER, collections::USERS).select(["name", "email"]))
}
