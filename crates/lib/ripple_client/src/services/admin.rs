//! Administration console endpoints.

use std::sync::Arc;

use async_trait::async_trait;

use ripple_core::models::{
    AdminReportDetails, AdminStats, BanUserRequest, HidePostRequest, PageSlice, Post,
    ReportAction, ReportStatus, ResolveReportRequest, SpringPage, UpdateUserRoleRequest, User,
    UserRole,
};
use ripple_core::validation;

use crate::collections::{PageFetcher, PagedCollection};
use crate::error::ApiResult;
use crate::transport::Transport;

#[derive(Clone)]
pub struct AdminService {
    transport: Transport,
}

impl AdminService {
    pub fn new(transport: Transport) -> Self {
        Self { transport }
    }

    pub async fn stats(&self) -> ApiResult<AdminStats> {
        self.transport.get("/api/admin/stats", &[]).await
    }

    // -----------------------------------------------------------------------
    // User management
    // -----------------------------------------------------------------------

    pub fn users(&self, page_size: u32) -> PagedCollection<User> {
        PagedCollection::new(
            page_size,
            Arc::new(UsersFetcher {
                transport: self.transport.clone(),
            }),
        )
    }

    /// Ban a user, permanently or for 1–365 days.
    pub async fn ban_user(&self, user_id: i64, request: &BanUserRequest) -> ApiResult<()> {
        if !request.permanent {
            // A temporary ban must carry a duration; None is only valid for
            // permanent bans.
            let days = request.duration_days.unwrap_or(0);
            validation::validate_ban_duration(Some(days))?;
        }
        self.transport
            .put_unit(&format!("/api/admin/users/{user_id}/ban"), request)
            .await
    }

    pub async fn unban_user(&self, user_id: i64) -> ApiResult<()> {
        self.transport
            .put_empty_unit(&format!("/api/admin/users/{user_id}/unban"))
            .await
    }

    pub async fn delete_user(&self, user_id: i64) -> ApiResult<()> {
        self.transport
            .delete_unit(&format!("/api/admin/users/{user_id}"))
            .await
    }

    pub async fn update_user_role(&self, user_id: i64, role: UserRole) -> ApiResult<()> {
        self.transport
            .put_unit(
                &format!("/api/admin/users/{user_id}/role"),
                &UpdateUserRoleRequest { role },
            )
            .await
    }

    // -----------------------------------------------------------------------
    // Report management
    // -----------------------------------------------------------------------

    /// The reports table, optionally filtered to one status.
    pub fn reports(
        &self,
        page_size: u32,
        status: Option<ReportStatus>,
    ) -> PagedCollection<AdminReportDetails> {
        PagedCollection::new(
            page_size,
            Arc::new(ReportsFetcher {
                transport: self.transport.clone(),
                status,
            }),
        )
    }

    pub async fn report(&self, report_id: i64) -> ApiResult<AdminReportDetails> {
        self.transport
            .get(&format!("/api/admin/reports/{report_id}"), &[])
            .await
    }

    /// Resolve a report with a chosen moderation action; a temporary ban
    /// rider is bounds-checked before submission.
    pub async fn resolve_report(
        &self,
        report_id: i64,
        request: &ResolveReportRequest,
    ) -> ApiResult<()> {
        if request.action == ReportAction::BanUser && request.ban_permanent != Some(true) {
            let days = request.ban_duration_days.unwrap_or(0);
            validation::validate_ban_duration(Some(days))?;
        }
        self.transport
            .put_unit(&format!("/api/admin/reports/{report_id}/resolve"), request)
            .await
    }

    // -----------------------------------------------------------------------
    // Post management
    // -----------------------------------------------------------------------

    pub fn posts(&self, page_size: u32) -> PagedCollection<Post> {
        PagedCollection::new(
            page_size,
            Arc::new(PostsFetcher {
                transport: self.transport.clone(),
            }),
        )
    }

    pub async fn hide_post(&self, post_id: i64, reason: &str) -> ApiResult<()> {
        // "hidde" is what the backend routes; kept for wire compatibility.
        self.transport
            .put_unit(
                &format!("/api/admin/posts/{post_id}/hidde"),
                &HidePostRequest {
                    reason: reason.to_string(),
                },
            )
            .await
    }

    pub async fn unhide_post(&self, post_id: i64) -> ApiResult<()> {
        self.transport
            .put_empty_unit(&format!("/api/admin/posts/{post_id}/unhidde"))
            .await
    }

    pub async fn delete_post(&self, post_id: i64) -> ApiResult<()> {
        self.transport
            .delete_unit(&format!("/api/admin/posts/{post_id}"))
            .await
    }
}

struct UsersFetcher {
    transport: Transport,
}

#[async_trait]
impl PageFetcher<User> for UsersFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<User>> {
        let response: SpringPage<User> = self
            .transport
            .get(
                "/api/admin/users",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}

struct ReportsFetcher {
    transport: Transport,
    status: Option<ReportStatus>,
}

#[async_trait]
impl PageFetcher<AdminReportDetails> for ReportsFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<AdminReportDetails>> {
        let mut query = vec![("page", page.to_string()), ("size", size.to_string())];
        if let Some(status) = self.status {
            let value = serde_json::to_value(status)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            query.push(("status", value));
        }
        let response: SpringPage<AdminReportDetails> =
            self.transport.get("/api/admin/reports", &query).await?;
        Ok(response.into())
    }
}

struct PostsFetcher {
    transport: Transport,
}

#[async_trait]
impl PageFetcher<Post> for PostsFetcher {
    async fn fetch(&self, page: u32, size: u32) -> ApiResult<PageSlice<Post>> {
        let response: SpringPage<Post> = self
            .transport
            .get(
                "/api/admin/posts",
                &[("page", page.to_string()), ("size", size.to_string())],
            )
            .await?;
        Ok(response.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_status_query_value_is_screaming_snake() {
        let value = serde_json::to_value(ReportStatus::Pending).expect("serialize");
        assert_eq!(value.as_str(), Some("PENDING"));
    }
}
