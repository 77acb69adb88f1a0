//! Profile and follow-graph endpoints.

use dashmap::DashMap;
use reqwest::multipart::{Form, Part};
use serde::Serialize;

use ripple_core::models::{FollowResponse, User};

use crate::error::{ApiError, ApiResult};
use crate::transport::Transport;

use super::UploadFile;

/// Partial profile update for `PUT /profile`; only set fields go on the wire.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

pub struct UserService {
    transport: Transport,
    /// Users with a follow/unfollow in flight; a second toggle on the same
    /// user is suppressed until the first resolves.
    follow_flight: DashMap<i64, ()>,
}

struct FlightGuard<'a> {
    map: &'a DashMap<i64, ()>,
    id: i64,
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        self.map.remove(&self.id);
    }
}

impl UserService {
    pub fn new(transport: Transport) -> Self {
        Self {
            transport,
            follow_flight: DashMap::new(),
        }
    }

    pub async fn profile(&self, username: &str) -> ApiResult<User> {
        self.transport.get(&format!("/profile/{username}"), &[]).await
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> ApiResult<User> {
        self.transport.put("/profile", update).await
    }

    /// Upload a new profile picture (multipart field `file`).
    pub async fn upload_picture(&self, file: UploadFile) -> ApiResult<User> {
        file.validate()?;
        let part = Part::bytes(file.bytes)
            .file_name(file.name.clone())
            .mime_str(&file.content_type)
            .map_err(|e| ApiError::Decode(format!("content type '{}': {e}", file.content_type)))?;
        let form = Form::new().part("file", part);
        self.transport.post_multipart("/profile/picture", form).await
    }

    pub async fn delete_picture(&self) -> ApiResult<User> {
        self.transport.delete("/profile/picture").await
    }

    pub async fn search(&self, query: &str) -> ApiResult<Vec<User>> {
        self.transport
            .get("/profile/search", &[("query", query.to_string())])
            .await
    }

    /// Follow a user. `Ok(None)` means a follow toggle for this user was
    /// already in flight and the call was suppressed.
    pub async fn follow(&self, user_id: i64) -> ApiResult<Option<FollowResponse>> {
        let Some(_guard) = self.claim(user_id) else {
            return Ok(None);
        };
        let response = self
            .transport
            .post_empty(&format!("/api/users/{user_id}/follow"))
            .await?;
        Ok(Some(response))
    }

    /// Unfollow a user; same single-flight discipline as [`follow`].
    pub async fn unfollow(&self, user_id: i64) -> ApiResult<Option<FollowResponse>> {
        let Some(_guard) = self.claim(user_id) else {
            return Ok(None);
        };
        let response = self
            .transport
            .delete(&format!("/api/users/{user_id}/unfollow"))
            .await?;
        Ok(Some(response))
    }

    /// Whether a follow toggle for `user_id` is currently in flight.
    pub fn is_follow_loading(&self, user_id: i64) -> bool {
        self.follow_flight.contains_key(&user_id)
    }

    fn claim(&self, user_id: i64) -> Option<FlightGuard<'_>> {
        use dashmap::mapref::entry::Entry;
        match self.follow_flight.entry(user_id) {
            Entry::Occupied(_) => None,
            Entry::Vacant(slot) => {
                slot.insert(());
                Some(FlightGuard {
                    map: &self.follow_flight,
                    id: user_id,
                })
            }
        }
    }
}

/// Fold the canonical follow state into a viewed profile.
pub fn apply_follow(user: &mut User, response: FollowResponse) {
    user.is_followed_by_current_user = Some(response.is_followed_by_current_user);
    user.followers_count = Some(response.followers_count);
    user.following_count = Some(response.following_count);
}
