use crate::{Record, collections};
use memehub_types::RecordId;
use serde::{Deserialize, Serialize};

/// Public projection of a user account.
///
/// Accounts are created and maintained by the external account service;
/// this crate only reads the fields shown next to memes and ratings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl Record for UserProfile {
    const COLLECTION: &'static str = collections::USERS;
}
