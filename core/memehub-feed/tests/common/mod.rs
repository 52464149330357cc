//! Shared test helpers for feed tests.

#![allow(dead_code)]

use memehub_feed::{FeedConfig, MemeService};
use memehub_model::{Comment, Meme, Record, UserProfile};
use memehub_store::{DocumentStore, MemoryStore};
use memehub_types::{Document, RecordId};
use serde_json::Value;
use std::sync::Arc;

pub const BASE_MILLIS: u64 = 1_700_000_000_000;

/// Id of the `n`-th fixture meme; higher `n` is newer.
pub fn meme_id(n: u64) -> RecordId {
    RecordId::from_millis(BASE_MILLIS + n, 0)
}

pub fn meme(n: u64, user: RecordId, likes: u64) -> Meme {
    let created = i64::try_from(BASE_MILLIS + n).unwrap();
    Meme {
        id: meme_id(n),
        name: format!("meme {n}"),
        url: format!("https://img.example/{n}.png"),
        width: Some(500),
        height: Some(400),
        box_count: Some(2),
        comments: Vec::new(),
        likes,
        dislikes: 0,
        user,
        created_at: created,
        updated_at: created,
    }
}

pub async fn insert<R: Record>(store: &MemoryStore, record: &R) -> RecordId {
    store
        .insert(R::COLLECTION, record.to_document().unwrap())
        .await
        .unwrap()
}

/// Store holding memes 1..=n owned by one user, likes chosen by `likes`.
pub async fn seeded_store(n: u64, likes: impl Fn(u64) -> u64) -> (Arc<MemoryStore>, RecordId) {
    let store = Arc::new(MemoryStore::new());
    let user = RecordId::new();
    for i in 1..=n {
        insert(&store, &meme(i, user, likes(i))).await;
    }
    (store, user)
}

pub fn service(store: Arc<MemoryStore>) -> MemeService {
    MemeService::new(store, FeedConfig::default())
}

pub fn service_with(store: Arc<MemoryStore>, config: FeedConfig) -> MemeService {
    MemeService::new(store, config)
}

pub fn profile(name: &str) -> UserProfile {
    UserProfile {
        id: RecordId::new(),
        name: Some(name.to_owned()),
        email: format!("{}@memehub.test", name.to_lowercase()),
        avatar: None,
        bio: None,
    }
}

pub fn comment(meme: RecordId, user: RecordId, content: &str) -> Comment {
    Comment::new(meme, user, content, 0)
}

pub fn names(docs: &[Document]) -> Vec<String> {
    docs.iter()
        .map(|d| d.get("name").and_then(Value::as_str).unwrap_or("?").to_owned())
        .collect()
}

pub fn expected_names(range: impl IntoIterator<Item = u64>) -> Vec<String> {
    range.into_iter().map(|n| format!("meme {n}")).collect()
}
