//! Tests for paginate.rs: page cutting, cursors and continuation.

mod common;

use common::{expected_names, meme, meme_id, names, seeded_store, service, service_with};
use memehub_feed::{FeedConfig, FeedError, IdOrder, MemeService, Page, Paginator};
use memehub_model::Record;
use memehub_pipeline::{
    Expansion, Expr, FeedQuery, Pipeline, Predicate, SortKey, Stage, cursor, fields,
};
use memehub_store::{DocumentStore, MemoryStore, StorageError};
use memehub_types::RecordId;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;

fn all() -> Pipeline {
    Pipeline::new().then(Stage::Match(Predicate::All))
}

/// Follows cursors until the last page, returning every page's names.
async fn walk(service: &MemeService, query: &FeedQuery) -> Vec<Vec<String>> {
    let mut pages = Vec::new();
    let mut next: Option<String> = None;
    loop {
        let page = service.feed(query, next.as_deref()).await.unwrap();
        pages.push(names(&page.data));
        match page.next_cursor {
            Some(cursor) => {
                assert!(page.has_more);
                next = Some(cursor.into_string());
            }
            None => {
                assert!(!page.has_more);
                return pages;
            }
        }
    }
}

// ── Scenarios ───────────────────────────────────────────────────

#[tokio::test]
async fn twenty_five_memes_page_newest_first() {
    let (store, _) = seeded_store(25, |_| 0).await;
    let service = service(store);
    let query = FeedQuery::default();

    let first = service.feed(&query, None).await.unwrap();
    assert_eq!(names(&first.data), expected_names((16..=25).rev()));
    assert!(first.has_more);
    let token = first.next_cursor.unwrap();
    assert_eq!(cursor::decode(token.as_str()).unwrap(), meme_id(15));

    let second = service.feed(&query, Some(token.as_str())).await.unwrap();
    assert_eq!(names(&second.data), expected_names((6..=15).rev()));
    assert!(second.has_more);

    let token = second.next_cursor.unwrap();
    let third = service.feed(&query, Some(token.as_str())).await.unwrap();
    assert_eq!(names(&third.data), expected_names((1..=5).rev()));
    assert!(!third.has_more);
    assert_eq!(third.next_cursor, None);
}

#[tokio::test]
async fn uppercase_ids_page_to_completion() {
    let store = Arc::new(MemoryStore::new());
    let user = RecordId::new();
    for i in 1..=25 {
        let mut doc = meme(i, user, 0).to_document().unwrap();
        doc.insert("_id".into(), meme_id(i).to_string().to_uppercase().into());
        store.insert("memes", doc).await.unwrap();
    }
    let service = service(store);

    let mut pages = Vec::new();
    let mut next: Option<String> = None;
    for _ in 0..5 {
        let page = service.feed(&FeedQuery::default(), next.as_deref()).await.unwrap();
        pages.push(names(&page.data));
        match page.next_cursor {
            Some(cursor) => next = Some(cursor.into_string()),
            None => break,
        }
    }
    assert_eq!(
        pages,
        vec![
            expected_names((16..=25).rev()),
            expected_names((6..=15).rev()),
            expected_names((1..=5).rev()),
        ]
    );

    let detail = service.meme(&meme_id(3), None).await.unwrap();
    assert_eq!(detail.meme["name"], "meme 3");
}

#[tokio::test]
async fn empty_collection_yields_empty_page() {
    let service = service(Arc::new(MemoryStore::new()));
    let page = service.feed(&FeedQuery::default(), None).await.unwrap();
    assert_eq!(
        page,
        Page {
            data: Vec::new(),
            has_more: false,
            next_cursor: None,
        }
    );
    assert_eq!(
        serde_json::to_value(&page).unwrap(),
        serde_json::json!({"data": [], "hasMore": false, "nextCursor": null})
    );
}

#[tokio::test]
async fn exact_multiple_of_page_size_has_no_trailing_page() {
    let (store, _) = seeded_store(20, |_| 0).await;
    let pages = walk(&service(store), &FeedQuery::default()).await;
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[1], expected_names((1..=10).rev()));
}

#[tokio::test]
async fn invalid_cursor_restarts_from_first_page() {
    let (store, _) = seeded_store(12, |_| 0).await;
    let service = service(store);
    // empty, not base64, base64 of "hello"
    for token in ["", "%%%not-base64%%%", "aGVsbG8="] {
        let page = service
            .feed(&FeedQuery::default(), Some(token))
            .await
            .unwrap();
        assert_eq!(names(&page.data), expected_names((3..=12).rev()), "{token:?}");
    }
}

#[tokio::test]
async fn page_serializes_with_camel_case_keys() {
    let (store, _) = seeded_store(11, |_| 0).await;
    let page = service(store)
        .feed(&FeedQuery::default(), None)
        .await
        .unwrap();
    let json = serde_json::to_value(&page).unwrap();
    assert_eq!(json["hasMore"], serde_json::json!(true));
    assert_eq!(
        json["nextCursor"],
        serde_json::json!(cursor::encode(&meme_id(1)).as_str())
    );
    assert_eq!(json["data"].as_array().unwrap().len(), 10);
}

// ── Domain sorts ────────────────────────────────────────────────

#[tokio::test]
async fn sortby_likes_continues_across_tied_counts() {
    let (store, _) = seeded_store(23, |i| i % 4).await;
    let query = FeedQuery::from_params(None, None, Some("likes"));
    let pages = walk(&service(store), &query).await;
    assert_eq!(pages.len(), 3);

    let mut expected: Vec<u64> = (1..=23).collect();
    expected.sort_by(|a, b| (b % 4).cmp(&(a % 4)).then(b.cmp(a)));
    let seen: Vec<String> = pages.concat();
    assert_eq!(seen, expected_names(expected));
}

#[tokio::test]
async fn trending_with_sortby_likes_orders_by_likes() {
    let likes = [3, 9, 1, 9, 0];
    let (store, _) = seeded_store(5, |i| likes[usize::try_from(i - 1).unwrap()]).await;
    let query = FeedQuery::from_params(None, Some("trending"), Some("likes"));
    let page = service(store).feed(&query, None).await.unwrap();
    assert_eq!(page.data.len(), 5);
    assert_eq!(names(&page.data), expected_names([4, 2, 1, 3, 5]));
}

#[tokio::test]
async fn later_sortby_overrides_category() {
    let (store, _) = seeded_store(4, |i| 10 - i).await;
    let query = FeedQuery::from_params(None, Some("trending"), Some("date"));
    let page = service(store).feed(&query, None).await.unwrap();
    assert_eq!(names(&page.data), expected_names([4, 3, 2, 1]));
}

#[tokio::test]
async fn search_filters_before_paging() {
    let (store, _) = seeded_store(30, |_| 0).await;
    let query = FeedQuery::from_params(Some("MEME 1"), None, None);
    let pages = walk(&service(store), &query).await;
    // "meme 1" and "meme 10".."meme 19"
    assert_eq!(pages.len(), 2);
    assert_eq!(pages.concat().len(), 11);
}

#[tokio::test]
async fn missing_cursor_record_falls_back_to_id_bound() {
    let (store, _) = seeded_store(15, |i| i).await;
    let query = FeedQuery::from_params(Some("meme"), None, Some("likes"));
    let gone = cursor::encode(&meme_id(99));
    let page = service(store)
        .feed(&query, Some(gone.as_str()))
        .await
        .unwrap();
    assert_eq!(names(&page.data), expected_names((6..=15).rev()));
}

// ── Paginator ───────────────────────────────────────────────────

#[tokio::test]
async fn ascending_order_pages_oldest_first() {
    let (store, _) = seeded_store(7, |_| 0).await;
    let paginator = Paginator::new(store.as_ref(), 3);

    let first = paginator
        .execute("memes", &all(), None, &[], IdOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(names(&first.data), expected_names(1..=3));

    let token = first.next_cursor.unwrap();
    let second = paginator
        .execute("memes", &all(), Some(token.as_str()), &[], IdOrder::Ascending)
        .await
        .unwrap();
    assert_eq!(names(&second.data), expected_names(4..=6));
}

#[tokio::test]
async fn unordered_keeps_pipeline_order() {
    let (store, _) = seeded_store(4, |_| 0).await;
    let base = all().then(Stage::Sort(vec![SortKey::asc(fields::NAME)]));
    let page = Paginator::new(store.as_ref(), 10)
        .execute("memes", &base, None, &[], IdOrder::Unordered)
        .await
        .unwrap();
    assert_eq!(names(&page.data), expected_names(1..=4));
}

#[tokio::test]
async fn zero_page_size_is_treated_as_one() {
    let (store, _) = seeded_store(2, |_| 0).await;
    let page = Paginator::new(store.as_ref(), 0)
        .execute("memes", &all(), None, &[], IdOrder::Descending)
        .await
        .unwrap();
    assert_eq!(names(&page.data), expected_names([2]));
    assert!(page.has_more);
}

#[tokio::test]
async fn expansion_failure_fails_the_page() {
    let (store, _) = seeded_store(3, |_| 0).await;
    let bad = Expansion::new(fields::LIKES, "users");
    let err = Paginator::new(store.as_ref(), 10)
        .execute("memes", &all(), None, &[bad], IdOrder::Descending)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Storage(StorageError::Expansion(_))));
}

#[tokio::test]
async fn query_failure_fails_the_page() {
    let (store, _) = seeded_store(3, |_| 0).await;
    let base = all().then(Stage::AddFields(vec![(
        "n".into(),
        Expr::size(Expr::field(fields::NAME)),
    )]));
    let err = Paginator::new(store.as_ref(), 10)
        .execute("memes", &base, None, &[], IdOrder::Descending)
        .await
        .unwrap_err();
    assert!(matches!(err, FeedError::Storage(StorageError::Query(_))));
}

#[tokio::test]
async fn custom_page_size_from_config() {
    let (store, _) = seeded_store(9, |_| 0).await;
    let config = FeedConfig {
        page_size: 4,
        ..FeedConfig::default()
    };
    let pages = walk(&service_with(store, config), &FeedQuery::default()).await;
    assert_eq!(pages.iter().map(Vec::len).collect::<Vec<_>>(), vec![4, 4, 1]);
}

// ── Properties ──────────────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn pages_cover_every_record_once(
        n in 1u64..40,
        page_size in 1usize..12,
        sort in prop::sample::select(vec![None, Some("likes"), Some("date"), Some("comments")]),
    ) {
        let pages = tokio_test::block_on(async {
            let (store, _) = seeded_store(n, |i| i % 3).await;
            let config = FeedConfig { page_size, ..FeedConfig::default() };
            walk(&service_with(store, config), &FeedQuery::from_params(None, None, sort)).await
        });

        let expected_pages = usize::try_from(n).unwrap().div_ceil(page_size);
        prop_assert_eq!(pages.len(), expected_pages);
        prop_assert!(pages.iter().all(|p| p.len() <= page_size));

        let seen: Vec<String> = pages.concat();
        let unique: HashSet<&String> = seen.iter().collect();
        prop_assert_eq!(seen.len(), usize::try_from(n).unwrap());
        prop_assert_eq!(unique.len(), seen.len());
    }
}
