//! Administration console models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::report::{ReportReason, ReportStatus, ReportedType};
use super::user::User;
use crate::paging::Identified;

/// Dashboard headline numbers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_users: u64,
    pub total_posts: u64,
    pub pending_reports: u64,
    pub most_reported_user: Option<User>,
    #[serde(default)]
    pub most_reported_user_report_count: u64,
}

/// Body for `PUT /api/admin/users/{id}/ban`.
///
/// `duration_days` applies only to temporary bans and must be 1–365.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BanUserRequest {
    pub reason: String,
    pub permanent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_days: Option<u32>,
}

/// Body for `PUT /api/admin/users/{id}/role`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRoleRequest {
    pub role: super::user::UserRole,
}

/// Moderation action chosen when resolving a report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportAction {
    None,
    BanUser,
    HidePost,
    DeletePost,
    DeleteUser,
}

/// Body for `PUT /api/admin/reports/{id}/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveReportRequest {
    pub status: ReportStatus,
    pub admin_notes: String,
    pub action: ReportAction,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_duration_days: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ban_permanent: Option<bool>,
}

/// Body for `PUT /api/admin/posts/{id}/hidde`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HidePostRequest {
    pub reason: String,
}

/// Full report record shown in the admin console.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminReportDetails {
    pub id: i64,
    pub reported_type: ReportedType,
    pub reported_entity_id: i64,
    pub reason: ReportReason,
    pub description: String,
    pub status: ReportStatus,
    pub created_at: DateTime<Utc>,
    pub reporter_id: i64,
    pub reporter_username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reported_entity_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_by_username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Identified for AdminReportDetails {
    fn id(&self) -> i64 {
        self.id
    }
}
