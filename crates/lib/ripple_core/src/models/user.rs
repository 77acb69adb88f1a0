//! User models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paging::Identified;

/// Account role, as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserRole {
    User,
    Admin,
}

/// Full user payload, returned by the profile and auth endpoints.
///
/// `followers_count`, `following_count`, and `is_followed_by_current_user`
/// are per-viewer fields the server only includes on profile responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_img_url: Option<String>,
    pub role: UserRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub followers_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub following_count: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_followed_by_current_user: Option<bool>,
    #[serde(default)]
    pub banned: bool,
    pub joined_date: DateTime<Utc>,
}

impl Identified for User {
    fn id(&self) -> i64 {
        self.id
    }
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Denormalized creator snapshot embedded in posts, comments, and
/// notifications. Profile edits are not patched back into these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_img_url: Option<String>,
}
