//! Notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::paging::Identified;

/// Notification kind. Tolerates kinds this client version does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NotificationType {
    #[serde(rename = "NEW_POST")]
    NewPost,
    #[serde(other)]
    Unknown,
}

/// Compact creator reference carried on notifications.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationCreator {
    pub id: i64,
    pub username: String,
}

/// A notification as returned by `/api/notifications`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub related_post_id: Option<i64>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub creator: NotificationCreator,
}

impl Identified for Notification {
    fn id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_notification_type_is_tolerated() {
        let json = r#"{
            "id": 3,
            "type": "NEW_FOLLOWER",
            "message": "ada followed you",
            "isRead": false,
            "createdAt": "2024-03-01T08:00:00Z",
            "creator": {"id": 1, "username": "ada"}
        }"#;
        let n: Notification = serde_json::from_str(json).expect("parse notification");
        assert_eq!(n.kind, NotificationType::Unknown);
        assert!(!n.is_read);
    }
}
