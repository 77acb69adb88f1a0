//! Wire models for the Ripple backend.
//!
//! Field names follow the backend's camelCase JSON; each DTO carries a
//! `#[serde(rename_all = "camelCase")]` so the Rust side stays snake_case.

pub mod admin;
pub mod auth;
pub mod comment;
pub mod notification;
pub mod page;
pub mod post;
pub mod report;
pub mod user;

pub use admin::{
    AdminReportDetails, AdminStats, BanUserRequest, HidePostRequest, ReportAction,
    ResolveReportRequest, UpdateUserRoleRequest,
};
pub use auth::{AuthResponse, FollowResponse, LikeResponse, LoginRequest, RegisterRequest};
pub use comment::{Comment, CreateCommentRequest};
pub use notification::{Notification, NotificationType};
pub use page::{CommentPage, PageSlice, PagedResponse, SpringPage};
pub use post::{Media, MediaKind, Post};
pub use report::{CreateReportRequest, ReportReason, ReportResponse, ReportStatus, ReportedType};
pub use user::{User, UserRole, UserSummary};
