use memehub_model::{Comment, DocumentExt, Meme, NewMeme, Record, UserProfile, UserRating};
use memehub_types::RecordId;
use pretty_assertions::assert_eq;
use serde_json::json;

fn upload() -> NewMeme {
    NewMeme {
        name: "Distracted Boyfriend".into(),
        url: "https://img.example/db.jpg".into(),
        width: Some(1200),
        height: Some(800),
        box_count: Some(3),
    }
}

// ── Meme ─────────────────────────────────────────────────────────

#[test]
fn meme_from_upload_starts_empty() {
    let user = RecordId::new();
    let meme = Meme::from_upload(upload(), user, 1_000);
    assert_eq!(meme.user, user);
    assert_eq!(meme.likes, 0);
    assert_eq!(meme.dislikes, 0);
    assert!(meme.comments.is_empty());
    assert_eq!(meme.created_at, 1_000);
    assert_eq!(meme.updated_at, 1_000);
}

#[test]
fn meme_document_uses_store_field_names() {
    let meme = Meme::from_upload(upload(), RecordId::new(), 1_000);
    let doc = meme.to_document().unwrap();

    assert_eq!(doc.get_str("_id"), Some(meme.id.to_string().as_str()));
    assert_eq!(doc["createdAt"], json!(1_000));
    assert_eq!(doc["box_count"], json!(3));
    assert_eq!(doc["comments"], json!([]));
    assert!(doc.get("created_at").is_none());
}

#[test]
fn meme_document_roundtrip() {
    let mut meme = Meme::from_upload(upload(), RecordId::new(), 1_000);
    meme.comments.push(RecordId::new());
    meme.likes = 7;
    let back = Meme::from_document(meme.to_document().unwrap()).unwrap();
    assert_eq!(back, meme);
}

#[test]
fn meme_optional_dimensions_are_omitted() {
    let mut payload = upload();
    payload.width = None;
    payload.box_count = None;
    let doc = Meme::from_upload(payload, RecordId::new(), 0).to_document().unwrap();
    assert!(doc.get("width").is_none());
    assert!(doc.get("box_count").is_none());
    assert_eq!(doc["height"], json!(800));
}

#[test]
fn new_meme_accepts_minimal_payload() {
    let payload: NewMeme = serde_json::from_value(json!({"name": "a", "url": "b"})).unwrap();
    assert_eq!(payload.width, None);
    assert_eq!(payload.box_count, None);
}

// ── Comment / UserProfile ────────────────────────────────────────

#[test]
fn comment_document_roundtrip() {
    let comment = Comment::new(RecordId::new(), RecordId::new(), "nice", 5);
    let doc = comment.to_document().unwrap();
    assert_eq!(doc.get_str("content"), Some("nice"));
    assert_eq!(doc.get_str("memeId"), Some(comment.meme_id.to_string().as_str()));
    assert_eq!(Comment::from_document(doc).unwrap(), comment);
}

#[test]
fn user_profile_reads_partial_account() {
    let id = RecordId::new();
    let doc = json!({ "_id": id, "email": "ada@example.com", "role": "user" });
    let profile = UserProfile::from_document(doc.as_object().cloned().unwrap()).unwrap();
    assert_eq!(profile.id, id);
    assert_eq!(profile.name, None);
    assert_eq!(profile.email, "ada@example.com");
}

// ── UserRating ───────────────────────────────────────────────────

#[test]
fn user_rating_reads_integer_normalized_values() {
    let id = RecordId::new();
    let row = json!({
        "_id": id,
        "name": "Ada",
        "email": "ada@example.com",
        "totalMemes": 10,
        "totalLikes": 5,
        "totalComments": 0,
        "normalizedMemes": 1,
        "normalizedLikes": 1,
        "normalizedComments": 0,
        "rating": 3.3
    });
    let rating: UserRating = serde_json::from_value(row).unwrap();
    assert_eq!(rating.id, id);
    assert_eq!(rating.avatar, None);
    assert_eq!(rating.normalized_comments, 0.0);
    assert_eq!(rating.rating, 3.3);
}

// ── DocumentExt ──────────────────────────────────────────────────

#[test]
fn document_ext_reads_nested_strings_only() {
    let doc = json!({"likes": 3, "userDetails": {"name": "x"}})
        .as_object()
        .cloned()
        .unwrap();
    assert_eq!(doc.get_str("userDetails.name"), Some("x"));
    assert_eq!(doc.get_str("likes"), None);
    assert_eq!(doc.get_str("userDetails.missing"), None);
}
