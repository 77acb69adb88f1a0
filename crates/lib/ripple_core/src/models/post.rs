//! Post and media models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::user::UserSummary;
use crate::paging::Identified;

/// Attached media kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaKind {
    Image,
    Video,
}

/// A media attachment on a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub id: i64,
    pub url: String,
    #[serde(rename = "type")]
    pub kind: MediaKind,
}

/// A post as returned by the feed, profile, and detail endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub creator: UserSummary,
    #[serde(default)]
    pub media: Vec<Media>,
    pub likes_count: u64,
    pub comments_count: u64,
    pub is_liked_by_current_user: bool,
    #[serde(default)]
    pub is_hidden: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Identified for Post {
    fn id(&self) -> i64 {
        self.id
    }
}
