//! Command-line surface: one subcommand per screen-level operation.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use ripple_core::models::{ReportAction, ReportReason, ReportStatus, ReportedType, UserRole};

#[derive(Parser)]
#[command(name = "ripple", version, about = "Ripple — social network client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in with a username or email
    Login {
        identifier: String,
        password: String,
    },

    /// Create an account
    Register {
        username: String,
        first_name: String,
        last_name: String,
        email: String,
        password: String,
        #[arg(long)]
        bio: Option<String>,
    },

    /// Sign out and clear the stored credential
    Logout,

    /// Show the signed-in user
    Me,

    /// Browse the home feed
    Feed {
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        /// How many pages to scroll through
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },

    /// Post operations
    #[command(subcommand)]
    Post(PostCommand),

    /// Comment-thread operations
    #[command(subcommand)]
    Comments(CommentsCommand),

    /// Profiles and the follow graph
    #[command(subcommand)]
    Profile(ProfileCommand),

    /// The notification bell
    #[command(subcommand)]
    Notifications(NotificationsCommand),

    /// Report a user or a post
    Report {
        #[arg(value_parser = parse_reported_type)]
        reported_type: ReportedType,
        entity_id: i64,
        #[arg(value_parser = parse_reason)]
        reason: ReportReason,
        description: String,
    },

    /// My submitted reports
    MyReports {
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    /// Administration console
    #[command(subcommand)]
    Admin(AdminCommand),

    Version,
}

#[derive(Subcommand)]
pub enum PostCommand {
    /// Show one post with its comment thread
    Show { id: i64 },

    /// Create a post; up to five media files
    Create {
        title: String,
        content: String,
        #[arg(long)]
        files: Vec<PathBuf>,
    },

    /// Edit a post; removed media are named by id
    Edit {
        id: i64,
        title: String,
        content: String,
        #[arg(long)]
        files: Vec<PathBuf>,
        #[arg(long = "delete-media")]
        deleted_media: Vec<i64>,
    },

    Delete { id: i64 },

    /// Toggle the like on a post
    Like { id: i64 },
}

#[derive(Subcommand)]
pub enum CommentsCommand {
    List {
        post_id: i64,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
        #[arg(long, default_value_t = 1)]
        pages: u32,
    },
    Add { post_id: i64, content: String },
    Edit { comment_id: i64, content: String },
    Delete { comment_id: i64 },
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Show a profile (your own when no username is given)
    Show { username: Option<String> },

    /// A user's posts
    Posts {
        user_id: i64,
        #[arg(long, default_value_t = 10)]
        page_size: u32,
    },

    Follow { user_id: i64 },
    Unfollow { user_id: i64 },

    /// Search profiles
    Search { query: String },

    /// Update the bio
    SetBio { bio: String },

    /// Upload a new profile picture
    Picture { path: PathBuf },

    /// Remove the profile picture
    RemovePicture,
}

#[derive(Subcommand)]
pub enum NotificationsCommand {
    List {
        #[arg(long)]
        unread_only: bool,
    },
    MarkRead { id: i64 },
    MarkAllRead,
}

#[derive(Subcommand)]
pub enum AdminCommand {
    /// Dashboard statistics
    Stats,

    Users {
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Ban a user, for a number of days or permanently
    Ban {
        user_id: i64,
        reason: String,
        #[arg(long)]
        days: Option<u32>,
        #[arg(long)]
        permanent: bool,
    },

    Unban { user_id: i64 },

    /// Change a user's role
    Role {
        user_id: i64,
        #[arg(value_parser = parse_role)]
        role: UserRole,
    },

    DeleteUser { user_id: i64 },

    Reports {
        #[arg(long, value_parser = parse_status)]
        status: Option<ReportStatus>,
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    ShowReport { id: i64 },

    /// Resolve a report with a moderation action
    Resolve {
        id: i64,
        #[arg(value_parser = parse_status)]
        status: ReportStatus,
        #[arg(value_parser = parse_action)]
        action: ReportAction,
        #[arg(long, default_value = "")]
        notes: String,
        #[arg(long)]
        ban_days: Option<u32>,
        #[arg(long)]
        ban_permanent: bool,
    },

    Posts {
        #[arg(long, default_value_t = 20)]
        page_size: u32,
    },

    /// Hide a post from the feed
    Hide { post_id: i64, reason: String },

    /// Restore a hidden post
    Unhide { post_id: i64 },

    DeletePost { post_id: i64 },
}

fn parse_enum<T: serde::de::DeserializeOwned>(value: &str, what: &str) -> Result<T, String> {
    let upper = value.replace('-', "_").to_ascii_uppercase();
    serde_json::from_value(serde_json::Value::String(upper))
        .map_err(|_| format!("unknown {what} '{value}'"))
}

pub fn parse_reason(value: &str) -> Result<ReportReason, String> {
    parse_enum(value, "report reason")
}

pub fn parse_status(value: &str) -> Result<ReportStatus, String> {
    parse_enum(value, "report status")
}

pub fn parse_action(value: &str) -> Result<ReportAction, String> {
    parse_enum(value, "report action")
}

pub fn parse_reported_type(value: &str) -> Result<ReportedType, String> {
    parse_enum(value, "reported type")
}

pub fn parse_role(value: &str) -> Result<UserRole, String> {
    parse_enum(value, "role")
}
