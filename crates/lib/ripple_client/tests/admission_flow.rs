//! Route-admission scenarios: cold reloads, stale tokens, role gates.

mod support;

use ripple_client::TokenStore;

use axum::routing::get;
use axum::{Json, Router, middleware};

use ripple_client::{Admission, Route, admit};

use support::{StubState, client_at, expired_token, fresh_token, serve, user_json};

fn router_with_identity(state: std::sync::Arc<StubState>, role: &'static str) -> Router {
    Router::new()
        .route(
            "/auth/me",
            get(move || async move { Json(user_json(7, "ada", role)) }),
        )
        .layer(middleware::from_fn_with_state(state, support::record))
}

#[tokio::test]
async fn cold_admin_reload_resolves_once_and_allows() {
    let state = StubState::new();
    let base = serve(router_with_identity(state.clone(), "ADMIN")).await;
    let (client, store) = client_at(&base);

    store.save(&fresh_token());
    client.navigator().navigate(Route::AdminDashboard);

    let decision = admit(
        &Route::AdminDashboard,
        client.session(),
        client.navigator(),
    )
    .await;

    assert_eq!(decision, Admission::Allow);
    assert_eq!(state.count("GET", "/auth/me"), 1);
    // No flicker away from the dashboard.
    assert_eq!(client.navigator().current(), Route::AdminDashboard);
}

#[tokio::test]
async fn expired_token_on_protected_route_logs_out_without_resolving() {
    let state = StubState::new();
    let base = serve(router_with_identity(state.clone(), "USER")).await;
    let (client, store) = client_at(&base);

    store.save(&expired_token());

    let decision = admit(&Route::Home, client.session(), client.navigator()).await;

    assert_eq!(decision, Admission::Redirect(Route::Login));
    assert!(store.load().is_none());
    assert_eq!(client.navigator().current(), Route::Login);
    assert_eq!(state.count("GET", "/auth/me"), 0);
}

#[tokio::test]
async fn missing_token_denies_protected_route() {
    let state = StubState::new();
    let base = serve(router_with_identity(state.clone(), "USER")).await;
    let (client, _store) = client_at(&base);

    let decision = admit(&Route::Home, client.session(), client.navigator()).await;

    assert_eq!(decision, Admission::Redirect(Route::Login));
    assert_eq!(state.count("GET", "/auth/me"), 0);
}

#[tokio::test]
async fn guest_route_allows_a_stale_token() {
    let state = StubState::new();
    let base = serve(router_with_identity(state, "USER")).await;
    let (client, store) = client_at(&base);

    store.save(&expired_token());

    let decision = admit(&Route::Login, client.session(), client.navigator()).await;
    assert_eq!(decision, Admission::Allow);
    // The stale token stays until something clears it explicitly.
    assert!(store.load().is_some());
}

#[tokio::test]
async fn guest_route_redirects_a_signed_in_user_home() {
    let state = StubState::new();
    let base = serve(router_with_identity(state, "USER")).await;
    let (client, store) = client_at(&base);

    store.save(&fresh_token());

    let decision = admit(&Route::Login, client.session(), client.navigator()).await;
    assert_eq!(decision, Admission::Redirect(Route::Home));
    assert_eq!(client.navigator().current(), Route::Home);
}

#[tokio::test]
async fn non_admin_is_bounced_from_the_admin_route() {
    let state = StubState::new();
    let base = serve(router_with_identity(state.clone(), "USER")).await;
    let (client, store) = client_at(&base);

    store.save(&fresh_token());

    let decision = admit(
        &Route::AdminDashboard,
        client.session(),
        client.navigator(),
    )
    .await;

    assert_eq!(decision, Admission::Redirect(Route::Home));
    assert_eq!(state.count("GET", "/auth/me"), 1);
    assert_eq!(client.navigator().current(), Route::Home);
}

#[tokio::test]
async fn racing_admissions_share_one_identity_resolution() {
    let state = StubState::new();
    let base = serve(router_with_identity(state.clone(), "USER")).await;
    let (client, store) = client_at(&base);

    store.save(&fresh_token());

    let (a, b) = tokio::join!(
        admit(&Route::Home, client.session(), client.navigator()),
        admit(&Route::ProfileSelf, client.session(), client.navigator()),
    );

    assert_eq!(a, Admission::Allow);
    assert_eq!(b, Admission::Allow);
    assert_eq!(state.count("GET", "/auth/me"), 1);
}
