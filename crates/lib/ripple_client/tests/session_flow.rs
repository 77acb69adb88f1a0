//! Login, register, and logout flows against a stub backend.

mod support;

use ripple_client::TokenStore;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router, middleware};
use serde_json::json;

use ripple_client::{ApiError, Route};

use support::{StubState, client_at, fresh_token, serve, user_json};

fn auth_router(state: std::sync::Arc<StubState>) -> Router {
    let token = fresh_token();
    Router::new()
        .route(
            "/auth/login",
            post(move |Json(body): Json<serde_json::Value>| {
                let token = token.clone();
                async move {
                    match body["identifier"].as_str() {
                        Some("ada") => (
                            StatusCode::OK,
                            Json(json!({"token": token, "userData": user_json(7, "ada", "USER")})),
                        )
                            .into_response(),
                        Some("banned") => (
                            StatusCode::FORBIDDEN,
                            Json(json!({"message": "Your account has been banned."})),
                        )
                            .into_response(),
                        _ => (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"message": "Invalid credentials"})),
                        )
                            .into_response(),
                    }
                }
            }),
        )
        .layer(middleware::from_fn_with_state(state, support::record))
}

#[tokio::test]
async fn login_persists_token_and_user() {
    let state = StubState::new();
    let base = serve(auth_router(state.clone())).await;
    let (client, store) = client_at(&base);

    let user = client
        .session()
        .login("ada", "password1")
        .await
        .expect("login");

    assert_eq!(user.username, "ada");
    assert!(store.load().is_some());
    assert_eq!(
        client.session().current_user().map(|u| u.id),
        Some(7)
    );
    // The login request itself must not carry a credential.
    assert_eq!(state.auth_headers("/auth/login"), vec![None]);
}

#[tokio::test]
async fn bad_credentials_surface_the_server_message() {
    let state = StubState::new();
    let base = serve(auth_router(state)).await;
    let (client, store) = client_at(&base);

    let err = client
        .session()
        .login("nobody", "password1")
        .await
        .expect_err("login should fail");

    assert!(matches!(err, ApiError::Unauthorized { .. }));
    assert_eq!(err.server_message(), Some("Invalid credentials"));
    assert!(store.load().is_none());
    assert!(client.session().current_user().is_none());
}

#[tokio::test]
async fn banned_login_keeps_no_token_and_message_is_verbatim() {
    let state = StubState::new();
    let base = serve(auth_router(state)).await;
    let (client, store) = client_at(&base);

    let err = client
        .session()
        .login("banned", "password1")
        .await
        .expect_err("banned login should fail");

    assert!(matches!(err, ApiError::Forbidden { .. }));
    assert_eq!(err.server_message(), Some("Your account has been banned."));
    assert!(store.load().is_none());
    assert!(client.session().current_user().is_none());
    // The login screen picks the message up from the navigator notice.
    assert_eq!(
        client.navigator().take_notice().as_deref(),
        Some("Your account has been banned.")
    );
}

#[tokio::test]
async fn logout_is_idempotent() {
    let state = StubState::new();
    let base = serve(auth_router(state)).await;
    let (client, store) = client_at(&base);

    client
        .session()
        .login("ada", "password1")
        .await
        .expect("login");
    assert!(store.load().is_some());

    client.session().logout();
    client.session().logout();

    assert!(store.load().is_none());
    assert!(client.session().current_user().is_none());
    assert_eq!(client.navigator().current(), Route::Login);
}

#[tokio::test]
async fn client_side_validation_blocks_short_identifier() {
    let state = StubState::new();
    let base = serve(auth_router(state.clone())).await;
    let (client, _store) = client_at(&base);

    let err = client
        .session()
        .login("ab", "password1")
        .await
        .expect_err("identifier too short");
    assert!(matches!(err, ApiError::Validation(_)));
    assert_eq!(state.count("POST", "/auth/login"), 0);
}
