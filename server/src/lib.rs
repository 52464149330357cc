//! MemeHub HTTP API.
//!
//! Thin axum layer over [`MemeService`]: parses request parameters, resolves
//! the caller, and maps service errors onto status codes.

mod error;
mod principal;

pub use error::ApiError;
pub use principal::{Principal, USER_ID_HEADER, Viewer};

use axum::{
    Json, Router,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::{HeaderName, Method, StatusCode, header::CONTENT_TYPE},
    routing::{get, post},
};
use memehub_feed::{MemeDetail, MemeService, Page, VoteOutcome};
use memehub_model::{NewMeme, UserRating, VoteKind};
use memehub_pipeline::FeedQuery;
use memehub_types::{Document, RecordId};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};

pub type AppState = Arc<MemeService>;

type ApiResult<T> = Result<T, ApiError>;

/// Build the API router.
pub fn build_router(service: AppState) -> Router {
    Router::new()
        .route("/api/meme", get(feed).post(post_meme))
        .route("/api/meme/most-liked", get(most_liked))
        .route("/api/meme/post/{meme_id}", get(meme_detail))
        .route("/api/meme/comment/{meme_id}", post(add_comment))
        .route("/api/meme/like/{meme_id}", post(vote))
        .route("/api/user/ratings", get(user_ratings))
        .route("/api/user/liked_memes", get(liked_memes))
        .route("/api/user/memes", get(user_memes))
        .layer(cors_layer())
        .with_state(service)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(USER_ID_HEADER)])
        .max_age(Duration::from_secs(60 * 60))
}

fn parse_id(raw: &str, what: &str) -> ApiResult<RecordId> {
    RecordId::parse(raw.trim()).map_err(|_| ApiError::BadRequest(format!("invalid {what} id")))
}

fn required_id(raw: Option<&str>, what: &str) -> ApiResult<RecordId> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_id(raw, what),
        _ => Err(ApiError::BadRequest(format!("{what} id is required"))),
    }
}

// ── Memes ──

#[derive(Debug, Default, Deserialize)]
struct FeedParams {
    search: Option<String>,
    category: Option<String>,
    sortby: Option<String>,
    next: Option<String>,
}

async fn feed(
    State(service): State<AppState>,
    Query(params): Query<FeedParams>,
) -> ApiResult<Json<Page>> {
    let query = FeedQuery::from_params(
        params.search.as_deref(),
        params.category.as_deref(),
        params.sortby.as_deref(),
    );
    let page = service.feed(&query, params.next.as_deref()).await?;
    Ok(Json(page))
}

async fn meme_detail(
    State(service): State<AppState>,
    Viewer(viewer): Viewer,
    Path(meme_id): Path<String>,
) -> ApiResult<Json<MemeDetail>> {
    let id = parse_id(&meme_id, "meme")?;
    let detail = service.meme(&id, viewer.as_ref()).await?;
    Ok(Json(detail))
}

async fn most_liked(State(service): State<AppState>) -> ApiResult<Json<Vec<Document>>> {
    Ok(Json(service.most_liked().await?))
}

async fn post_meme(
    State(service): State<AppState>,
    Principal(user): Principal,
    body: Result<Json<NewMeme>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Value>)> {
    let Json(upload) = body?;
    let id = service.post_meme(&user, upload).await?;
    Ok((StatusCode::CREATED, Json(json!({ "_id": id }))))
}

#[derive(Debug, Deserialize)]
struct CommentBody {
    content: String,
}

async fn add_comment(
    State(service): State<AppState>,
    Principal(user): Principal,
    Path(meme_id): Path<String>,
    body: Result<Json<CommentBody>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Document>)> {
    let meme = parse_id(&meme_id, "meme")?;
    let Json(body) = body?;
    let comment = service.add_comment(&meme, &user, &body.content).await?;
    Ok((StatusCode::CREATED, Json(comment)))
}

#[derive(Debug, Deserialize)]
struct VoteBody {
    #[serde(rename = "type")]
    kind: String,
}

async fn vote(
    State(service): State<AppState>,
    Principal(user): Principal,
    Path(meme_id): Path<String>,
    body: Result<Json<VoteBody>, JsonRejection>,
) -> ApiResult<Json<VoteOutcome>> {
    let meme = parse_id(&meme_id, "meme")?;
    let Json(body) = body?;
    let kind: VoteKind = body.kind.parse().map_err(ApiError::BadRequest)?;
    Ok(Json(service.vote(&meme, &user, kind).await?))
}

// ── Users ──

async fn user_ratings(State(service): State<AppState>) -> ApiResult<Json<Vec<UserRating>>> {
    Ok(Json(service.user_ratings().await?))
}

#[derive(Debug, Default, Deserialize)]
struct LikedParams {
    id: Option<String>,
}

async fn liked_memes(
    State(service): State<AppState>,
    Query(params): Query<LikedParams>,
) -> ApiResult<Json<Vec<Document>>> {
    let user = required_id(params.id.as_deref(), "user")?;
    Ok(Json(service.liked_memes(&user).await?))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserMemesParams {
    user_id: Option<String>,
}

async fn user_memes(
    State(service): State<AppState>,
    Query(params): Query<UserMemesParams>,
) -> ApiResult<Json<Vec<Document>>> {
    let user = required_id(params.user_id.as_deref(), "user")?;
    Ok(Json(service.user_memes(&user).await?))
}
