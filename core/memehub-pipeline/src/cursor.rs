//! Continuation cursor codec.
//!
//! A cursor is the standard base64 encoding of a record id's canonical
//! string form. Clients treat it as opaque and send it back verbatim in the
//! `next` query parameter. This module only converts between ids and
//! tokens; how a decoded id restricts a query is the executor's concern.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use memehub_types::RecordId;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

// Canonical ids encode to 48 characters; anything far longer is not ours.
const MAX_CURSOR_LEN: usize = 256;

/// Opaque continuation token.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cursor(String);

impl Cursor {
    /// Wraps a token received from a client without validating it.
    pub fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Why a token failed to decode.
#[derive(Debug, thiserror::Error)]
pub enum CursorDecodeError {
    #[error("cursor token is empty")]
    Empty,

    #[error("cursor token exceeds max length: {len} chars (max {max})")]
    TooLong { len: usize, max: usize },

    #[error("cursor token is not base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("cursor token does not decode to UTF-8 text")]
    NotUtf8,

    #[error("cursor token does not hold a record id: {0}")]
    InvalidId(#[from] uuid::Error),
}

/// Encodes a record id as a cursor. Deterministic.
#[must_use]
pub fn encode(id: &RecordId) -> Cursor {
    Cursor(BASE64.encode(id.to_string()))
}

/// Decodes a cursor token back into the record id it was built from.
///
/// Surrounding whitespace is trimmed.
pub fn decode(token: &str) -> Result<RecordId, CursorDecodeError> {
    let token = token.trim();

    if token.is_empty() {
        return Err(CursorDecodeError::Empty);
    }

    if token.len() > MAX_CURSOR_LEN {
        return Err(CursorDecodeError::TooLong {
            len: token.len(),
            max: MAX_CURSOR_LEN,
        });
    }

    let bytes = BASE64.decode(token)?;
    let text = std::str::from_utf8(&bytes).map_err(|_| CursorDecodeError::NotUtf8)?;

    Ok(RecordId::parse(text)?)
}

/// Decodes an optional client token, treating every failure as "no cursor".
///
/// Invalid cursors restart pagination from the first page instead of
/// failing the request.
#[must_use]
pub fn decode_lenient(token: Option<&str>) -> Option<RecordId> {
    let token = token?;
    match decode(token) {
        Ok(id) => Some(id),
        Err(CursorDecodeError::Empty) => None,
        Err(e) => {
            debug!("ignoring invalid cursor {:?}: {}", token, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_is_base64_of_canonical_id() {
        let id = RecordId::parse("01890a5d-ac96-774b-bcce-b302099a8057").unwrap();
        let cursor = encode(&id);
        assert_eq!(
            BASE64.decode(cursor.as_str()).unwrap(),
            b"01890a5d-ac96-774b-bcce-b302099a8057"
        );
    }

    #[test]
    fn decode_rejects_empty_and_whitespace_tokens() {
        assert!(matches!(decode(""), Err(CursorDecodeError::Empty)));
        assert!(matches!(decode("  \n\t"), Err(CursorDecodeError::Empty)));
    }

    #[test]
    fn decode_enforces_max_token_length() {
        let token = "A".repeat(MAX_CURSOR_LEN + 4);
        let Err(CursorDecodeError::TooLong { len, max }) = decode(&token) else {
            panic!("expected TooLong");
        };
        assert_eq!((len, max), (MAX_CURSOR_LEN + 4, MAX_CURSOR_LEN));
    }

    #[test]
    fn decode_rejects_non_base64() {
        assert!(matches!(decode("***"), Err(CursorDecodeError::Base64(_))));
    }

    #[test]
    fn decode_rejects_non_utf8_payload() {
        let token = BASE64.encode([0xff, 0xfe, 0xfd]);
        assert!(matches!(decode(&token), Err(CursorDecodeError::NotUtf8)));
    }

    #[test]
    fn decode_rejects_base64_of_non_id() {
        let token = BASE64.encode("hello world");
        assert!(matches!(decode(&token), Err(CursorDecodeError::InvalidId(_))));
    }

    #[test]
    fn decode_trims_surrounding_whitespace() {
        let id = RecordId::new();
        let token = format!("  {}\n", encode(&id));
        assert_eq!(decode(&token).unwrap(), id);
    }

    #[test]
    fn lenient_decode_collapses_failures_to_none() {
        assert_eq!(decode_lenient(None), None);
        assert_eq!(decode_lenient(Some("")), None);
        assert_eq!(decode_lenient(Some("not a cursor")), None);

        let id = RecordId::new();
        let cursor = encode(&id);
        assert_eq!(decode_lenient(Some(cursor.as_str())), Some(id));
    }
}
