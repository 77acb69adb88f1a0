//! Content flows: multipart post create/edit, the comment thread, and the
//! follow toggle.

mod support;

use ripple_client::TokenStore;

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Multipart, Query};
use axum::routing::{get, post, put};
use axum::{Json, Router, middleware};
use serde_json::json;

use ripple_client::services::posts::{NewPost, PostEdit};
use ripple_client::services::users::{self, ProfileUpdate};
use ripple_client::services::UploadFile;
use ripple_core::paging::Position;

use support::{StubState, client_at, fresh_token, post_json, serve, user_json};

/// Field names and values the stub saw in the last multipart body.
type FieldLog = Arc<Mutex<Vec<(String, Option<String>)>>>;

async fn drain_multipart(mut multipart: Multipart, log: FieldLog) {
    let mut fields = Vec::new();
    while let Some(field) = multipart.next_field().await.expect("multipart field") {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let value = if is_file {
            let _ = field.bytes().await.expect("field bytes");
            None
        } else {
            Some(field.text().await.expect("field text"))
        };
        fields.push((name, value));
    }
    log.lock().unwrap_or_else(|e| e.into_inner()).extend(fields);
}

#[tokio::test]
async fn post_create_ships_title_content_and_files() {
    let state = StubState::new();
    let log: FieldLog = Arc::new(Mutex::new(Vec::new()));
    let handler_log = Arc::clone(&log);
    let router = Router::new()
        .route(
            "/api/post",
            post(move |multipart: Multipart| {
                let log = Arc::clone(&handler_log);
                async move {
                    drain_multipart(multipart, log).await;
                    Json(post_json(1))
                }
            }),
        )
        .layer(middleware::from_fn_with_state(state, support::record));
    let base = serve(router).await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    let post = client
        .posts
        .create(NewPost {
            title: "A sunny day".into(),
            content: "Long enough content for a post.".into(),
            files: vec![
                UploadFile::new("a.png", "image/png", vec![1, 2, 3]),
                UploadFile::new("b.mp4", "video/mp4", vec![4, 5, 6]),
            ],
        })
        .await
        .expect("create post");
    assert_eq!(post.id, 1);

    let fields = log.lock().unwrap_or_else(|e| e.into_inner()).clone();
    let names: Vec<_> = fields.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["title", "content", "files", "files"]);
    assert_eq!(fields[0].1.as_deref(), Some("A sunny day"));
}

#[tokio::test]
async fn post_edit_serializes_deleted_media_ids_as_json() {
    let state = StubState::new();
    let log: FieldLog = Arc::new(Mutex::new(Vec::new()));
    let handler_log = Arc::clone(&log);
    let router = Router::new()
        .route(
            "/api/post/{id}",
            put(move |multipart: Multipart| {
                let log = Arc::clone(&handler_log);
                async move {
                    drain_multipart(multipart, log).await;
                    Json(post_json(7))
                }
            }),
        )
        .layer(middleware::from_fn_with_state(state, support::record));
    let base = serve(router).await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    client
        .posts
        .update(
            7,
            PostEdit {
                title: "Edited title".into(),
                content: "Edited content, still long enough.".into(),
                files: Vec::new(),
                deleted_media_ids: vec![3, 9],
            },
        )
        .await
        .expect("edit post");

    let fields = log.lock().unwrap_or_else(|e| e.into_inner()).clone();
    let deleted = fields
        .iter()
        .find(|(n, _)| n == "deletedMediaIds")
        .expect("deletedMediaIds field");
    assert_eq!(deleted.1.as_deref(), Some("[3,9]"));
}

#[tokio::test]
async fn sixth_file_is_rejected_before_upload() {
    let state = StubState::new();
    let base = serve(
        Router::new().layer(middleware::from_fn_with_state(state.clone(), support::record)),
    )
    .await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    let files: Vec<_> = (0..6)
        .map(|i| UploadFile::new(format!("f{i}.png"), "image/png", vec![0; 4]))
        .collect();
    let err = client
        .posts
        .create(NewPost {
            title: "Too many".into(),
            content: "Content long enough either way.".into(),
            files,
        })
        .await
        .expect_err("six files");
    assert!(matches!(err, ripple_client::ApiError::Validation(_)));
    // Nothing went on the wire.
    assert!(state.requests().is_empty());
}

#[tokio::test]
async fn comment_thread_pages_and_reconciles_local_mutations() {
    fn comment_json(id: i64, content: &str) -> serde_json::Value {
        json!({
            "id": id,
            "content": content,
            "user": {"id": 2, "username": "bob", "firstName": "Bob", "lastName": "B"},
            "createdAt": "2024-03-02T10:00:00Z",
            "updatedAt": "2024-03-02T10:00:00Z"
        })
    }

    let state = StubState::new();
    let router = Router::new()
        .route(
            "/api/posts/{id}/comments",
            get(|Query(params): Query<HashMap<String, String>>| async move {
                let page: u32 = params.get("page").and_then(|p| p.parse().ok()).unwrap_or(0);
                let body = match page {
                    0 => json!({
                        "comments": [comment_json(1, "first"), comment_json(2, "second")],
                        "totalComments": 3,
                        "currentPage": 0,
                        "totalPages": 2,
                        "hasMore": true
                    }),
                    _ => json!({
                        "comments": [comment_json(3, "third")],
                        "totalComments": 3,
                        "currentPage": 1,
                        "totalPages": 2,
                        "hasMore": false
                    }),
                };
                Json(body)
            })
            .post(|| async { Json(comment_json(50, "mine")) }),
        )
        .route(
            "/api/comments/{id}",
            put(|| async { Json(comment_json(2, "second (edited)")) })
                .delete(|| async { axum::http::StatusCode::NO_CONTENT }),
        )
        .layer(middleware::from_fn_with_state(state, support::record));
    let base = serve(router).await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    let thread = client.comments.thread(9, 2);
    thread.load_first().await.expect("page 0");
    thread.load_more().await.expect("page 1");
    assert_eq!(thread.window().len(), 3);

    // Post a comment: the echo goes to the head of the thread.
    let mine = client.comments.create(9, "mine").await.expect("create");
    thread.insert(mine, Position::Head);
    let window = thread.window();
    assert_eq!(window.items[0].id, 50);
    assert_eq!(window.total_elements, 4);

    // Edit in place.
    let edited = client
        .comments
        .update(2, "second (edited)")
        .await
        .expect("update");
    thread.replace(edited);
    assert_eq!(
        thread
            .window()
            .items
            .iter()
            .find(|c| c.id == 2)
            .expect("comment 2")
            .content,
        "second (edited)"
    );

    // Delete: gone everywhere, total drops, no refetch.
    client.comments.delete(50).await.expect("delete");
    assert!(thread.remove(50));
    assert_eq!(thread.window().total_elements, 3);
}

#[tokio::test]
async fn follow_toggle_is_single_flight_and_patches_the_profile() {
    let state = StubState::new();
    let router = Router::new()
        .route(
            "/profile/{username}",
            get(|| async {
                let mut user = user_json(3, "grace", "USER");
                user["followersCount"] = json!(10);
                user["followingCount"] = json!(4);
                user["isFollowedByCurrentUser"] = json!(false);
                Json(user)
            }),
        )
        .route(
            "/api/users/{id}/follow",
            post(|| async {
                tokio::time::sleep(std::time::Duration::from_millis(50)).await;
                Json(json!({
                    "isFollowedByCurrentUser": true,
                    "followersCount": 11,
                    "followingCount": 4
                }))
            }),
        )
        .layer(middleware::from_fn_with_state(state.clone(), support::record));
    let base = serve(router).await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    let mut profile = client.users.profile("grace").await.expect("profile");

    let (a, b) = tokio::join!(client.users.follow(3), client.users.follow(3));
    let responses: Vec<_> = [a.expect("first"), b.expect("second")]
        .into_iter()
        .flatten()
        .collect();
    assert_eq!(responses.len(), 1);
    assert_eq!(state.count("POST", "/api/users/3/follow"), 1);

    users::apply_follow(&mut profile, responses[0]);
    assert_eq!(profile.followers_count, Some(11));
    assert_eq!(profile.is_followed_by_current_user, Some(true));
}

#[tokio::test]
async fn profile_update_sends_partial_body() {
    let state = StubState::new();
    let body_log: Arc<Mutex<Option<serde_json::Value>>> = Arc::new(Mutex::new(None));
    let handler_log = Arc::clone(&body_log);
    let router = Router::new()
        .route(
            "/profile",
            put(move |Json(body): Json<serde_json::Value>| {
                let log = Arc::clone(&handler_log);
                async move {
                    *log.lock().unwrap_or_else(|e| e.into_inner()) = Some(body);
                    Json(user_json(7, "ada", "USER"))
                }
            }),
        )
        .layer(middleware::from_fn_with_state(state, support::record));
    let base = serve(router).await;
    let (client, store) = client_at(&base);
    store.save(&fresh_token());

    client
        .users
        .update_profile(&ProfileUpdate {
            bio: Some("polymath".into()),
            ..Default::default()
        })
        .await
        .expect("update profile");

    let seen = body_log
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .clone()
        .expect("body recorded");
    assert_eq!(seen, json!({"bio": "polymath"}));
}
