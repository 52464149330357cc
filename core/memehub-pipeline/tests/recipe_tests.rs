//! Tests for engagement.rs and recipes.rs: stage layout of the fixed pipelines.

use memehub_pipeline::{
    Accumulator, COMMENT_WEIGHT, Expr, LIKE_WEIGHT, Lookup, MEME_WEIGHT, Predicate, SortKey,
    Stage, engagement_pipeline, fields, recipes,
};
use memehub_types::RecordId;
use pretty_assertions::assert_eq;

// ── engagement_pipeline ─────────────────────────────────────────

#[test]
fn weights_sum_to_one() {
    assert!((MEME_WEIGHT + LIKE_WEIGHT + COMMENT_WEIGHT - 1.0).abs() < 1e-9);
}

#[test]
fn engagement_starts_with_group_by_user() {
    let pipeline = engagement_pipeline(10);
    let Stage::Group(group) = &pipeline.stages()[0] else {
        panic!("expected group stage, got {:?}", pipeline.stages()[0]);
    };
    assert_eq!(group.key, Expr::field(fields::USER));
    assert_eq!(group.accumulators[0], ("totalMemes".to_owned(), Accumulator::Count));
}

#[test]
fn engagement_takes_maxima_before_dropping_profileless_users() {
    let stages = engagement_pipeline(10).stages().to_vec();
    let window = stages
        .iter()
        .position(|s| matches!(s, Stage::Window(_)))
        .unwrap();
    let unwind = stages
        .iter()
        .position(|s| matches!(s, Stage::Unwind(_)))
        .unwrap();
    assert!(window < unwind);
}

#[test]
fn engagement_ends_with_rating_sort_and_limit() {
    let stages = engagement_pipeline(3).stages().to_vec();
    let n = stages.len();
    assert_eq!(
        stages[n - 2],
        Stage::Sort(vec![SortKey::desc("rating"), SortKey::asc(fields::ID)])
    );
    assert_eq!(stages[n - 1], Stage::Limit(3));
}

// ── recipes ─────────────────────────────────────────────────────

#[test]
fn most_liked_limits_before_joining_comments() {
    let stages = recipes::most_liked(5).stages().to_vec();
    assert_eq!(
        stages[0],
        Stage::Sort(vec![SortKey::desc(fields::LIKES), SortKey::desc(fields::ID)])
    );
    assert_eq!(stages[1], Stage::Limit(5));
    assert_eq!(
        stages[2],
        Stage::Lookup(Lookup {
            from: "comments".into(),
            local_field: fields::COMMENTS.into(),
            foreign_field: fields::ID.into(),
            as_field: fields::COMMENTS.into(),
        })
    );
}

#[test]
fn liked_memes_matches_only_like_votes_of_user() {
    let user = RecordId::new();
    let pipeline = recipes::liked_memes(&user);
    assert_eq!(
        pipeline.stages()[0],
        Stage::Match(Predicate::And(vec![
            Predicate::eq("userId", user),
            Predicate::eq("type", "like"),
        ]))
    );
}

#[test]
fn by_id_matches_and_limits_to_one() {
    let id = RecordId::new();
    assert_eq!(
        recipes::by_id(&id).stages().to_vec(),
        vec![Stage::Match(Predicate::eq(fields::ID, id)), Stage::Limit(1)]
    );
}

#[test]
fn comment_expansion_nests_author() {
    let expansion = recipes::comment_expansion();
    assert_eq!(expansion.path, "comments");
    assert_eq!(expansion.from, "comments");
    assert_eq!(expansion.select, vec!["content", "user", "createdAt"]);
    assert_eq!(expansion.nested.len(), 1);
    assert_eq!(expansion.nested[0].from, "users");
    assert_eq!(expansion.nested[0].select, vec!["name", "email"]);
}
