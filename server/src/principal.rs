//! Caller identity.
//!
//! Token checks happen upstream; the authenticating gateway forwards the
//! caller's user id in the `x-user-id` header.

use crate::ApiError;
use axum::{extract::FromRequestParts, http::request::Parts};
use memehub_types::RecordId;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller. Rejects the request with 401 when absent.
#[derive(Debug, Clone, Copy)]
pub struct Principal(pub RecordId);

/// The caller if one is identified; anonymous requests are allowed.
#[derive(Debug, Clone, Copy)]
pub struct Viewer(pub Option<RecordId>);

fn header_user(parts: &Parts) -> Result<Option<RecordId>, ApiError> {
    let Some(raw) = parts.headers.get(USER_ID_HEADER) else {
        return Ok(None);
    };
    raw.to_str()
        .ok()
        .and_then(|s| RecordId::parse(s.trim()).ok())
        .map(Some)
        .ok_or(ApiError::Unauthorized)
}

impl<S: Send + Sync> FromRequestParts<S> for Principal {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_user(parts)?.map(Self).ok_or(ApiError::Unauthorized)
    }
}

impl<S: Send + Sync> FromRequestParts<S> for Viewer {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        header_user(parts).map(Self)
    }
}
