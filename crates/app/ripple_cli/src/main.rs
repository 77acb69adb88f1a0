// Import and re-export the `error` module
pub use self::error::{Error, Result};
mod error;

use std::path::Path;
use std::sync::Arc;

use clap::Parser;

use cli::{
    AdminCommand, Cli, Commands, CommentsCommand, NotificationsCommand, PostCommand,
    ProfileCommand,
};
use ripple_client::services::UploadFile;
use ripple_client::services::posts::{NewPost, PostEdit};
use ripple_client::services::users::ProfileUpdate;
use ripple_client::{
    Admission, ApiError, ClientConfig, FileTokenStore, RippleClient, Route, admit,
};
use ripple_core::models::{BanUserRequest, CreateReportRequest, ResolveReportRequest};
use ripple_core::paging::Position;

mod cli;
mod logging;
mod render;

fn main() -> Result<()> {
    if let Err(e) = run() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    Ok(())
}

fn run() -> Result<()> {
    logging::init()?;

    let args = Cli::parse();

    if let Commands::Version = args.command {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(execute(args.command))
}

fn build_client() -> Result<RippleClient> {
    let config = ClientConfig::from_env()?;
    let store = Arc::new(FileTokenStore::new());
    Ok(RippleClient::new(config, store))
}

/// Run the route-entry guard for a screen command. A deny prints where the
/// router sent us and, when a redirect left one, the pending notice (the
/// banned-on-login message).
async fn admitted(client: &RippleClient, route: Route) -> bool {
    match admit(&route, client.session(), client.navigator()).await {
        Admission::Allow => true,
        Admission::Redirect(to) => {
            if let Some(notice) = client.navigator().take_notice() {
                println!("{notice}");
            }
            println!("redirected to {}", to.path());
            false
        }
    }
}

/// Surface an API failure the way a screen would: error panel first, then
/// the process exit code.
fn fail(err: ApiError) -> Error {
    render::error_panel(&err);
    Error::Api(err)
}

async fn execute(command: Commands) -> Result<()> {
    let client = build_client()?;

    match command {
        Commands::Login {
            identifier,
            password,
        } => {
            match client.session().login(&identifier, &password).await {
                Ok(user) => {
                    println!("signed in as @{}", user.username);
                }
                Err(err) => return Err(fail(err)),
            }
        }

        Commands::Register {
            username,
            first_name,
            last_name,
            email,
            password,
            bio,
        } => {
            let request = ripple_core::models::RegisterRequest {
                username,
                first_name,
                last_name,
                email,
                password,
                bio,
                profile_img_url: None,
            };
            let user = client.session().register(&request).await.map_err(fail)?;
            println!("welcome, @{}", user.username);
        }

        Commands::Logout => {
            client.session().logout();
            println!("signed out");
        }

        Commands::Me => {
            if !admitted(&client, Route::ProfileSelf).await {
                return Ok(());
            }
            let user = client.session().resolve_identity().await.map_err(fail)?;
            render::user_line(&user);
        }

        Commands::Feed { page_size, pages } => {
            if !admitted(&client, Route::Home).await {
                return Ok(());
            }
            client.bootstrap().await;

            let feed = client.posts.feed(page_size);
            feed.load_first().await.map_err(fail)?;
            for _ in 1..pages {
                feed.load_more().await.map_err(fail)?;
            }

            let window = feed.window();
            for post in &window.items {
                render::post_line(post);
            }
            render::window_footer(&window);

            let unread = client.notifications.state().unread_count;
            if unread > 0 {
                println!("({unread} unread notifications)");
            }
        }

        Commands::Post(command) => post_command(&client, command).await?,
        Commands::Comments(command) => comments_command(&client, command).await?,
        Commands::Profile(command) => profile_command(&client, command).await?,
        Commands::Notifications(command) => notifications_command(&client, command).await?,

        Commands::Report {
            reported_type,
            entity_id,
            reason,
            description,
        } => {
            if !admitted(&client, Route::Home).await {
                return Ok(());
            }
            let report = client
                .reports
                .create(&CreateReportRequest {
                    reported_type,
                    reported_entity_id: entity_id,
                    reason,
                    description,
                })
                .await
                .map_err(fail)?;
            println!("report #{} submitted ({:?})", report.id, report.status);
        }

        Commands::MyReports { page_size } => {
            if !admitted(&client, Route::Home).await {
                return Ok(());
            }
            let reports = client.reports.my_reports(page_size);
            reports.load_first().await.map_err(fail)?;
            let window = reports.window();
            for report in &window.items {
                render::report_line(report);
            }
            render::window_footer(&window);
        }

        Commands::Admin(command) => admin_command(&client, command).await?,

        Commands::Version => {
            println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}

async fn post_command(client: &RippleClient, command: PostCommand) -> Result<()> {
    match command {
        PostCommand::Show { id } => {
            if !admitted(client, Route::PostDetail(id)).await {
                return Ok(());
            }
            let post = client.posts.get(id).await.map_err(fail)?;
            render::post_detail(&post);

            let thread = client.comments.thread(id, 10);
            thread.load_first().await.map_err(fail)?;
            let window = thread.window();
            for comment in &window.items {
                render::comment_line(comment);
            }
            render::window_footer(&window);
        }

        PostCommand::Create {
            title,
            content,
            files,
        } => {
            if !admitted(client, Route::PostCreate).await {
                return Ok(());
            }
            let files = files
                .iter()
                .map(|path| load_upload(path))
                .collect::<Result<Vec<_>>>()?;
            let post = client
                .posts
                .create(NewPost {
                    title,
                    content,
                    files,
                })
                .await
                .map_err(fail)?;
            println!("created post #{}", post.id);
        }

        PostCommand::Edit {
            id,
            title,
            content,
            files,
            deleted_media,
        } => {
            if !admitted(client, Route::PostDetail(id)).await {
                return Ok(());
            }
            let files = files
                .iter()
                .map(|path| load_upload(path))
                .collect::<Result<Vec<_>>>()?;
            let post = client
                .posts
                .update(
                    id,
                    PostEdit {
                        title,
                        content,
                        files,
                        deleted_media_ids: deleted_media,
                    },
                )
                .await
                .map_err(fail)?;
            println!("updated post #{}", post.id);
        }

        PostCommand::Delete { id } => {
            if !admitted(client, Route::PostDetail(id)).await {
                return Ok(());
            }
            client.posts.delete(id).await.map_err(fail)?;
            println!("deleted post #{id}");
        }

        PostCommand::Like { id } => {
            if !admitted(client, Route::PostDetail(id)).await {
                return Ok(());
            }
            match client.likes.toggle(id).await.map_err(fail)? {
                Some(like) => {
                    let state = if like.is_liked { "liked" } else { "unliked" };
                    println!("{state}; {} likes now", like.likes_count);
                }
                None => println!("a like for #{id} is already in flight"),
            }
        }
    }
    Ok(())
}

async fn comments_command(client: &RippleClient, command: CommentsCommand) -> Result<()> {
    match command {
        CommentsCommand::List {
            post_id,
            page_size,
            pages,
        } => {
            if !admitted(client, Route::PostDetail(post_id)).await {
                return Ok(());
            }
            let thread = client.comments.thread(post_id, page_size);
            thread.load_first().await.map_err(fail)?;
            for _ in 1..pages {
                thread.load_more().await.map_err(fail)?;
            }
            let window = thread.window();
            for comment in &window.items {
                render::comment_line(comment);
            }
            render::window_footer(&window);
        }

        CommentsCommand::Add { post_id, content } => {
            if !admitted(client, Route::PostDetail(post_id)).await {
                return Ok(());
            }
            // The echo lands at the head of the thread, the way the detail
            // screen folds a fresh comment in without refetching.
            let thread = client.comments.thread(post_id, 10);
            thread.load_first().await.map_err(fail)?;
            let comment = client
                .comments
                .create(post_id, &content)
                .await
                .map_err(fail)?;
            thread.insert(comment, Position::Head);
            let window = thread.window();
            for comment in &window.items {
                render::comment_line(comment);
            }
            render::window_footer(&window);
        }

        CommentsCommand::Edit {
            comment_id,
            content,
        } => {
            let comment = client
                .comments
                .update(comment_id, &content)
                .await
                .map_err(fail)?;
            println!("comment #{} updated", comment.id);
        }

        CommentsCommand::Delete { comment_id } => {
            client.comments.delete(comment_id).await.map_err(fail)?;
            println!("comment #{comment_id} deleted");
        }
    }
    Ok(())
}

async fn profile_command(client: &RippleClient, command: ProfileCommand) -> Result<()> {
    match command {
        ProfileCommand::Show { username } => {
            let route = match &username {
                Some(name) => Route::Profile(name.clone()),
                None => Route::ProfileSelf,
            };
            if !admitted(client, route).await {
                return Ok(());
            }
            let username = match username {
                Some(name) => name,
                None => {
                    client
                        .session()
                        .resolve_identity()
                        .await
                        .map_err(fail)?
                        .username
                }
            };
            let user = client.users.profile(&username).await.map_err(fail)?;
            render::user_line(&user);
        }

        ProfileCommand::Posts { user_id, page_size } => {
            if !admitted(client, Route::Home).await {
                return Ok(());
            }
            let posts = client.posts.user_posts(user_id, page_size);
            posts.load_first().await.map_err(fail)?;
            let window = posts.window();
            for post in &window.items {
                render::post_line(post);
            }
            render::window_footer(&window);
        }

        ProfileCommand::Follow { user_id } => {
            if !admitted(client, Route::Home).await {
                return Ok(());
            }
            match client.users.follow(user_id).await.map_err(fail)? {
                Some(response) => {
                    println!(
                        "following; they have {} followers now",
                        response.followers_count
                    );
                }
                None => println!("a follow for #{user_id} is already in flight"),
            }
        }

        ProfileCommand::Unfollow { user_id } => {
            if !admitted(client, Route::Home).await {
                return Ok(());
            }
            match client.users.unfollow(user_id).await.map_err(fail)? {
                Some(response) => {
                    println!(
                        "unfollowed; they have {} followers now",
                        response.followers_count
                    );
                }
                None => println!("a follow for #{user_id} is already in flight"),
            }
        }

        ProfileCommand::Search { query } => {
            if !admitted(client, Route::Home).await {
                return Ok(());
            }
            let results = client.users.search(&query).await.map_err(fail)?;
            if results.is_empty() {
                println!("no users match '{query}'");
            }
            for user in &results {
                render::user_line(user);
            }
        }

        ProfileCommand::SetBio { bio } => {
            if !admitted(client, Route::ProfileSelf).await {
                return Ok(());
            }
            let user = client
                .users
                .update_profile(&ProfileUpdate {
                    bio: Some(bio),
                    ..Default::default()
                })
                .await
                .map_err(fail)?;
            render::user_line(&user);
        }

        ProfileCommand::Picture { path } => {
            if !admitted(client, Route::ProfileSelf).await {
                return Ok(());
            }
            let file = load_upload(&path)?;
            let user = client.users.upload_picture(file).await.map_err(fail)?;
            println!(
                "picture updated: {}",
                user.profile_img_url.as_deref().unwrap_or("(none)")
            );
        }

        ProfileCommand::RemovePicture => {
            if !admitted(client, Route::ProfileSelf).await {
                return Ok(());
            }
            client.users.delete_picture().await.map_err(fail)?;
            println!("picture removed");
        }
    }
    Ok(())
}

async fn notifications_command(
    client: &RippleClient,
    command: NotificationsCommand,
) -> Result<()> {
    if !admitted(client, Route::Home).await {
        return Ok(());
    }
    match command {
        NotificationsCommand::List { unread_only } => {
            client
                .notifications
                .refresh(unread_only)
                .await
                .map_err(fail)?;
            let state = client.notifications.state();
            for notification in &state.notifications {
                render::notification_line(notification);
            }
            println!("({} unread)", state.unread_count);
        }

        NotificationsCommand::MarkRead { id } => {
            client.notifications.refresh(false).await.map_err(fail)?;
            client.notifications.mark_as_read(id).await.map_err(fail)?;
            println!("({} unread)", client.notifications.state().unread_count);
        }

        NotificationsCommand::MarkAllRead => {
            client.notifications.refresh(false).await.map_err(fail)?;
            client.notifications.mark_all_read().await.map_err(fail)?;
            println!("all read");
        }
    }
    Ok(())
}

async fn admin_command(client: &RippleClient, command: AdminCommand) -> Result<()> {
    if !admitted(client, Route::AdminDashboard).await {
        return Ok(());
    }
    match command {
        AdminCommand::Stats => {
            let stats = client.admin.stats().await.map_err(fail)?;
            render::stats(&stats);
        }

        AdminCommand::Users { page_size } => {
            let users = client.admin.users(page_size);
            users.load_first().await.map_err(fail)?;
            let window = users.window();
            for user in &window.items {
                render::user_line(user);
            }
            render::window_footer(&window);
        }

        AdminCommand::Ban {
            user_id,
            reason,
            days,
            permanent,
        } => {
            client
                .admin
                .ban_user(
                    user_id,
                    &BanUserRequest {
                        reason,
                        permanent,
                        duration_days: days,
                    },
                )
                .await
                .map_err(fail)?;
            println!("user #{user_id} banned");
        }

        AdminCommand::Unban { user_id } => {
            client.admin.unban_user(user_id).await.map_err(fail)?;
            println!("user #{user_id} unbanned");
        }

        AdminCommand::Role { user_id, role } => {
            client
                .admin
                .update_user_role(user_id, role)
                .await
                .map_err(fail)?;
            println!("user #{user_id} is now {role:?}");
        }

        AdminCommand::DeleteUser { user_id } => {
            client.admin.delete_user(user_id).await.map_err(fail)?;
            println!("user #{user_id} deleted");
        }

        AdminCommand::Reports { status, page_size } => {
            let reports = client.admin.reports(page_size, status);
            reports.load_first().await.map_err(fail)?;
            let window = reports.window();
            for report in &window.items {
                render::admin_report(report);
            }
            render::window_footer(&window);
        }

        AdminCommand::ShowReport { id } => {
            let report = client.admin.report(id).await.map_err(fail)?;
            render::admin_report(&report);
        }

        AdminCommand::Resolve {
            id,
            status,
            action,
            notes,
            ban_days,
            ban_permanent,
        } => {
            client
                .admin
                .resolve_report(
                    id,
                    &ResolveReportRequest {
                        status,
                        admin_notes: notes,
                        action,
                        ban_duration_days: ban_days,
                        ban_permanent: ban_permanent.then_some(true),
                    },
                )
                .await
                .map_err(fail)?;
            println!("report #{id} resolved ({action:?})");
        }

        AdminCommand::Posts { page_size } => {
            let posts = client.admin.posts(page_size);
            posts.load_first().await.map_err(fail)?;
            let window = posts.window();
            for post in &window.items {
                render::post_line(post);
            }
            render::window_footer(&window);
        }

        AdminCommand::Hide { post_id, reason } => {
            client
                .admin
                .hide_post(post_id, &reason)
                .await
                .map_err(fail)?;
            println!("post #{post_id} hidden");
        }

        AdminCommand::Unhide { post_id } => {
            client.admin.unhide_post(post_id).await.map_err(fail)?;
            println!("post #{post_id} restored");
        }

        AdminCommand::DeletePost { post_id } => {
            client.admin.delete_post(post_id).await.map_err(fail)?;
            println!("post #{post_id} deleted");
        }
    }
    Ok(())
}

/// Read a media file for upload, deriving the content type from the
/// extension. Unsupported types are rejected here, before any bytes move.
fn load_upload(path: &Path) -> Result<UploadFile> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("upload")
        .to_string();
    let content_type = content_type_for(&name)?;
    let bytes = std::fs::read(path)?;
    let file = UploadFile::new(name, content_type, bytes);
    file.validate().map_err(Error::Validation)?;
    Ok(file)
}

fn content_type_for(name: &str) -> Result<&'static str> {
    let extension = name.rsplit('.').next().unwrap_or_default().to_ascii_lowercase();
    match extension.as_str() {
        "jpg" | "jpeg" => Ok("image/jpeg"),
        "png" => Ok("image/png"),
        "gif" => Ok("image/gif"),
        "mp4" => Ok("video/mp4"),
        other => Err(Error::Custom(format!(
            "unsupported media type '.{other}' (accepted: jpg, jpeg, png, gif, mp4)"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn content_types_cover_the_accepted_set() {
        assert_eq!(content_type_for("a.JPG").expect("jpg"), "image/jpeg");
        assert_eq!(content_type_for("b.png").expect("png"), "image/png");
        assert_eq!(content_type_for("c.mp4").expect("mp4"), "video/mp4");
        assert!(content_type_for("d.webp").is_err());
    }
}
