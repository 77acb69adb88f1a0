//! Terminal rendering: the three screen states (content, loading, error
//! panel) and the per-entity line formats.

use ripple_client::ApiError;
use ripple_core::models::{
    AdminReportDetails, AdminStats, Comment, Notification, Post, ReportResponse, User,
};
use ripple_core::paging::PagedWindow;

/// The error panel. Affordances follow the error kind: Retry only for
/// transient failures, Home/Back for missing or forbidden content, and a
/// distinct no-navigation panel for a banned account.
pub fn error_panel(err: &ApiError) {
    match err {
        ApiError::Forbidden {
            message: Some(message),
        } if message.contains("banned") => {
            println!("── Account banned ──");
            println!("{message}");
            println!("Please contact support.");
        }
        ApiError::NotFound => {
            println!("── Not found ──");
            println!("The requested content does not exist.");
            println!("[Home] [Back]");
        }
        ApiError::Forbidden { message } => {
            println!("── Forbidden ──");
            if let Some(message) = message {
                println!("{message}");
            } else {
                println!("You do not have permission to view this.");
            }
            println!("[Home] [Back]");
        }
        err if err.is_transient() => {
            println!("── Something went wrong ──");
            println!("{err}");
            println!("[Retry]");
        }
        err => {
            println!("── Error ──");
            println!("{err}");
        }
    }
}

pub fn user_line(user: &User) {
    let badge = match (user.is_admin(), user.banned) {
        (true, _) => " [admin]",
        (_, true) => " [banned]",
        _ => "",
    };
    println!("#{} @{} — {}{badge}", user.id, user.username, user.full_name());
    if let Some(bio) = &user.bio {
        println!("    {bio}");
    }
    if let (Some(followers), Some(following)) = (user.followers_count, user.following_count) {
        let followed = match user.is_followed_by_current_user {
            Some(true) => ", followed by you",
            _ => "",
        };
        println!("    {followers} followers, {following} following{followed}");
    }
}

pub fn post_line(post: &Post) {
    let liked = if post.is_liked_by_current_user { "♥" } else { "♡" };
    let hidden = if post.is_hidden { " [hidden]" } else { "" };
    println!(
        "#{} {}{hidden} — @{} · {liked} {} · {} comments",
        post.id, post.title, post.creator.username, post.likes_count, post.comments_count
    );
}

pub fn post_detail(post: &Post) {
    post_line(post);
    println!("{}", post.content);
    for media in &post.media {
        println!("    [{:?}] {}", media.kind, media.url);
    }
}

pub fn comment_line(comment: &Comment) {
    println!(
        "#{} @{}: {}",
        comment.id, comment.user.username, comment.content
    );
}

pub fn notification_line(notification: &Notification) {
    let marker = if notification.is_read { " " } else { "*" };
    println!("{marker} #{} {}", notification.id, notification.message);
}

pub fn report_line(report: &ReportResponse) {
    println!(
        "#{} {:?} {:?} ({}) — {}",
        report.id,
        report.reported_type,
        report.status,
        report.reason.label(),
        report.description
    );
}

pub fn admin_report(report: &AdminReportDetails) {
    println!(
        "#{} {:?} {:?} ({}) by @{}",
        report.id,
        report.reported_type,
        report.status,
        report.reason.label(),
        report.reporter_username
    );
    println!("    {}", report.description);
    if let Some(notes) = &report.admin_notes {
        println!("    notes: {notes}");
    }
    if let Some(resolver) = &report.resolved_by_username {
        println!("    resolved by @{resolver}");
    }
}

pub fn stats(stats: &AdminStats) {
    println!("users:           {}", stats.total_users);
    println!("posts:           {}", stats.total_posts);
    println!("pending reports: {}", stats.pending_reports);
    if let Some(user) = &stats.most_reported_user {
        println!(
            "most reported:   @{} ({} reports)",
            user.username, stats.most_reported_user_report_count
        );
    }
}

/// Footer under any paged listing.
pub fn window_footer<T>(window: &PagedWindow<T>) {
    if window.has_more {
        println!(
            "-- {} of {} (scroll for more) --",
            window.len(),
            window.total_elements
        );
    } else {
        println!("-- {} of {} --", window.len(), window.total_elements);
    }
}
