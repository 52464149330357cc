//! Meme service: the read and write operations behind the HTTP routes.

use crate::{FeedConfig, FeedError, FeedResult, IdOrder, Page, Paginator};
use memehub_model::{
    Comment, DocumentExt, Meme, NewMeme, Record, UserRating, Vote, VoteKind, VoteTransition,
    adjust_counter, collections,
};
use memehub_pipeline::{
    FeedPipelineBuilder, FeedQuery, Pipeline, Predicate, Stage, engagement_pipeline, fields,
    recipes,
};
use memehub_store::DocumentStore;
use memehub_types::{Document, RecordId, now_millis};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

const VOTE_TYPE: &str = "type";

/// A meme with its comments populated and the viewer's current vote.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MemeDetail {
    #[serde(flatten)]
    pub meme: Document,
    /// `"like"`, `"dislike"`, or empty when the viewer has no vote.
    pub like: String,
}

/// Vote state after a like/dislike request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VoteOutcome {
    /// The viewer's vote after the toggle; `None` when it was cleared.
    pub vote: Option<VoteKind>,
    pub likes: u64,
    pub dislikes: u64,
}

/// Feed, leaderboard and meme operations over a shared store.
pub struct MemeService {
    store: Arc<dyn DocumentStore>,
    config: FeedConfig,
    feed_builder: FeedPipelineBuilder,
}

impl MemeService {
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStore>, config: FeedConfig) -> Self {
        Self {
            store,
            config,
            feed_builder: FeedPipelineBuilder::new(),
        }
    }

    #[must_use]
    pub const fn config(&self) -> &FeedConfig {
        &self.config
    }

    // ── Reads ───────────────────────────────────────────────────

    /// One page of the meme feed.
    pub async fn feed(&self, query: &FeedQuery, next: Option<&str>) -> FeedResult<Page> {
        let pipeline = self.feed_builder.build(query);
        Paginator::new(self.store.as_ref(), self.config.page_size)
            .execute(collections::MEMES, &pipeline, next, &[], IdOrder::Descending)
            .await
    }

    /// A single meme with comments and the viewer's vote.
    pub async fn meme(&self, id: &RecordId, viewer: Option<&RecordId>) -> FeedResult<MemeDetail> {
        let found = self
            .store
            .aggregate(collections::MEMES, &recipes::by_id(id))
            .await?;
        let mut populated = self
            .store
            .populate(found, &[recipes::comment_expansion()])
            .await?;
        let meme = populated
            .pop()
            .ok_or_else(|| FeedError::NotFound(format!("meme {id}")))?;

        let like = match viewer {
            Some(user) => self
                .current_vote(id, user)
                .await?
                .map_or("", VoteKind::as_str),
            None => "",
        };

        Ok(MemeDetail {
            meme,
            like: like.to_owned(),
        })
    }

    /// The most liked memes with their comments joined.
    pub async fn most_liked(&self) -> FeedResult<Vec<Document>> {
        let pipeline = recipes::most_liked(self.config.most_liked_size);
        Ok(self.store.aggregate(collections::MEMES, &pipeline).await?)
    }

    /// Engagement leaderboard, best rated first.
    pub async fn user_ratings(&self) -> FeedResult<Vec<UserRating>> {
        let pipeline = engagement_pipeline(self.config.leaderboard_size);
        self.store
            .aggregate(collections::MEMES, &pipeline)
            .await?
            .into_iter()
            .map(|row| serde_json::from_value(Value::Object(row)).map_err(FeedError::from))
            .collect()
    }

    /// Memes the user currently likes.
    pub async fn liked_memes(&self, user: &RecordId) -> FeedResult<Vec<Document>> {
        Ok(self
            .store
            .aggregate(collections::VOTES, &recipes::liked_memes(user))
            .await?)
    }

    /// Memes posted by the user, comments populated.
    pub async fn user_memes(&self, user: &RecordId) -> FeedResult<Vec<Document>> {
        let memes = self
            .store
            .aggregate(collections::MEMES, &recipes::user_memes(user))
            .await?;
        Ok(self
            .store
            .populate(memes, &[recipes::comment_expansion()])
            .await?)
    }

    async fn current_vote(
        &self,
        meme: &RecordId,
        user: &RecordId,
    ) -> FeedResult<Option<VoteKind>> {
        let pipeline = Pipeline::new()
            .then(Stage::Match(recipes::vote_of(meme, user)))
            .then(Stage::Limit(1));
        let vote = self.store.aggregate(collections::VOTES, &pipeline).await?;
        Ok(vote
            .first()
            .and_then(|v| v.get_str(VOTE_TYPE))
            .and_then(VoteKind::from_state))
    }

    // ── Writes ──────────────────────────────────────────────────

    /// Stores a new meme owned by `user`. The url is kept as given.
    pub async fn post_meme(&self, user: &RecordId, upload: NewMeme) -> FeedResult<RecordId> {
        if upload.name.trim().is_empty() {
            return Err(FeedError::InvalidInput("meme name is required".into()));
        }
        if upload.url.trim().is_empty() {
            return Err(FeedError::InvalidInput("meme url is required".into()));
        }

        let meme = Meme::from_upload(upload, *user, now_millis());
        let id = self
            .store
            .insert(Meme::COLLECTION, meme.to_document()?)
            .await?;
        info!("Posted meme {} by {}", id, user);
        Ok(id)
    }

    /// Appends a comment to the meme's comment list and stores it.
    pub async fn add_comment(
        &self,
        meme: &RecordId,
        user: &RecordId,
        content: &str,
    ) -> FeedResult<Document> {
        let content = content.trim();
        if content.is_empty() {
            return Err(FeedError::InvalidInput("comment content is required".into()));
        }
        let now = now_millis();
        let comment = Comment::new(*meme, *user, content, now);
        let comment_id = comment.id;

        // The meme is updated first so an unknown meme leaves no comment behind.
        let appended = self
            .store
            .update_one(
                Meme::COLLECTION,
                &Predicate::eq(fields::ID, *meme),
                Box::new(move |doc: &mut Document| {
                    match doc.get_mut(fields::COMMENTS) {
                        Some(Value::Array(ids)) => ids.push(comment_id.into()),
                        _ => {
                            let ids = vec![comment_id.into()];
                            doc.insert(fields::COMMENTS.to_owned(), Value::Array(ids));
                        }
                    }
                    doc.insert(fields::UPDATED_AT.to_owned(), now.into());
                }),
            )
            .await?;
        if appended.is_none() {
            return Err(FeedError::NotFound(format!("meme {meme}")));
        }

        let comment = comment.to_document()?;
        self.store.insert(Comment::COLLECTION, comment.clone()).await?;

        debug!("comment {} added to meme {}", comment_id, meme);
        Ok(comment)
    }

    /// Toggles the user's like or dislike on a meme.
    ///
    /// Repeating the current vote clears it; switching moves one count from
    /// the old counter to the new one. Counters never drop below zero.
    pub async fn vote(
        &self,
        meme: &RecordId,
        user: &RecordId,
        kind: VoteKind,
    ) -> FeedResult<VoteOutcome> {
        self.require_meme(meme).await?;

        let now = now_millis();
        let seed = Vote::cleared(*meme, *user, now).to_document()?;
        let previous_vote = self
            .store
            .upsert_one(
                Vote::COLLECTION,
                &recipes::vote_of(meme, user),
                seed,
                Box::new(move |doc: &mut Document| {
                    let previous = doc.get_str(VOTE_TYPE).and_then(VoteKind::from_state);
                    let next = VoteTransition::apply(previous, kind).next;
                    doc.insert(VOTE_TYPE.to_owned(), next.map_or("", VoteKind::as_str).into());
                }),
            )
            .await?;
        let previous = previous_vote
            .as_ref()
            .and_then(|v| v.get_str(VOTE_TYPE))
            .and_then(VoteKind::from_state);
        let transition = VoteTransition::apply(previous, kind);

        let likes_delta = transition.likes_delta();
        let dislikes_delta = transition.dislikes_delta();
        let before = self
            .store
            .update_one(
                Meme::COLLECTION,
                &Predicate::eq(fields::ID, *meme),
                Box::new(move |doc: &mut Document| {
                    let deltas = [(fields::LIKES, likes_delta), (fields::DISLIKES, dislikes_delta)];
                    for (field, delta) in deltas {
                        let current = doc.get(field).and_then(Value::as_u64).unwrap_or(0);
                        doc.insert(field.to_owned(), adjust_counter(current, delta).into());
                    }
                    doc.insert(fields::UPDATED_AT.to_owned(), now.into());
                }),
            )
            .await?
            .ok_or_else(|| FeedError::NotFound(format!("meme {meme}")))?;

        let counter = |field: &str, delta: i64| {
            adjust_counter(before.get(field).and_then(Value::as_u64).unwrap_or(0), delta)
        };
        let outcome = VoteOutcome {
            vote: transition.next,
            likes: counter(fields::LIKES, likes_delta),
            dislikes: counter(fields::DISLIKES, dislikes_delta),
        };
        debug!("vote on {} by {}: {:?}", meme, user, outcome);
        Ok(outcome)
    }

    async fn require_meme(&self, meme: &RecordId) -> FeedResult<()> {
        match self.store.find_by_id(collections::MEMES, meme).await? {
            Some(_) => Ok(()),
            None => Err(FeedError::NotFound(format!("meme {meme}"))),
        }
    }
}
