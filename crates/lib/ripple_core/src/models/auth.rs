//! Auth-entry and toggle-response models.

use serde::{Deserialize, Serialize};

use super::user::User;

/// Body for `POST /auth/login`. `identifier` is a username or email.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub identifier: String,
    pub password: String,
}

/// Body for `POST /auth/register`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_img_url: Option<String>,
}

/// Successful login/register payload: the bearer token plus the user it
/// belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub user_data: User,
}

/// Canonical like state returned by `POST /api/post/{id}/like`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeResponse {
    pub is_liked: bool,
    pub likes_count: u64,
}

/// Canonical follow state returned by the follow/unfollow endpoints.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FollowResponse {
    pub is_followed_by_current_user: bool,
    pub followers_count: u64,
    pub following_count: u64,
}
