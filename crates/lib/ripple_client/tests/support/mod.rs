//! Shared harness for the end-to-end tests: an in-process axum stub backend
//! plus helpers for minting tokens and wiring a client at it.
#![allow(dead_code)] // each test binary uses its own slice of the harness

use std::sync::{Arc, Mutex};

use axum::Router;
use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use chrono::Utc;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use serde_json::{Value, json};

use ripple_client::{ClientConfig, MemoryTokenStore, RippleClient};

/// One observed request.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
}

/// Everything the stub backend saw.
#[derive(Debug, Default)]
pub struct StubState {
    requests: Mutex<Vec<Recorded>>,
}

impl StubState {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// How many requests hit `path` with `method`.
    pub fn count(&self, method: &str, path: &str) -> usize {
        self.requests()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    /// Authorization headers seen on `path`, in arrival order.
    pub fn auth_headers(&self, path: &str) -> Vec<Option<String>> {
        self.requests()
            .iter()
            .filter(|r| r.path == path)
            .map(|r| r.authorization.clone())
            .collect()
    }
}

/// Middleware recording every request before it reaches a handler.
pub async fn record(
    State(state): State<Arc<StubState>>,
    request: Request,
    next: Next,
) -> Response {
    let recorded = Recorded {
        method: request.method().to_string(),
        path: request.uri().path().to_string(),
        query: request.uri().query().map(str::to_string),
        authorization: request
            .headers()
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
    };
    state
        .requests
        .lock()
        .unwrap_or_else(|e| e.into_inner())
        .push(recorded);
    next.run(request).await
}

/// Serve `router` on an ephemeral port, returning its base URL.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub backend");
    let addr = listener.local_addr().expect("stub addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve stub");
    });
    format!("http://{addr}")
}

/// A client against `base_url` backed by an in-memory token store.
pub fn client_at(base_url: &str) -> (RippleClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    let config = ClientConfig::new(base_url).expect("stub base url");
    let client = RippleClient::new(config, store.clone());
    (client, store)
}

#[derive(Serialize)]
struct Claims {
    sub: String,
    exp: i64,
}

/// Mint a signed token with the given expiry instant.
pub fn token_with_exp(exp: i64) -> String {
    encode(
        &Header::default(),
        &Claims {
            sub: "7".into(),
            exp,
        },
        &EncodingKey::from_secret(b"stub-secret"),
    )
    .expect("encode token")
}

pub fn fresh_token() -> String {
    token_with_exp(Utc::now().timestamp() + 3600)
}

pub fn expired_token() -> String {
    token_with_exp(Utc::now().timestamp() - 3600)
}

/// A user payload as the backend would send it.
pub fn user_json(id: i64, username: &str, role: &str) -> Value {
    json!({
        "id": id,
        "username": username,
        "firstName": "Test",
        "lastName": "User",
        "email": format!("{username}@example.com"),
        "role": role,
        "banned": false,
        "joinedDate": "2024-01-01T00:00:00Z"
    })
}

/// A post payload as the backend would send it.
pub fn post_json(id: i64) -> Value {
    json!({
        "id": id,
        "title": format!("Post {id}"),
        "content": "Content long enough to pass validation.",
        "creator": {"id": 1, "username": "ada", "firstName": "Ada", "lastName": "L"},
        "media": [],
        "likesCount": 0,
        "commentsCount": 0,
        "isLikedByCurrentUser": false,
        "isHidden": false,
        "createdAt": "2024-02-01T09:00:00Z",
        "updatedAt": "2024-02-01T09:00:00Z"
    })
}

/// The `/api/post` page shape.
pub fn paged_posts(ids: &[i64], page: u32, total: u64, has_more: bool) -> Value {
    json!({
        "content": ids.iter().map(|&id| post_json(id)).collect::<Vec<_>>(),
        "currentPage": page,
        "totalElements": total,
        "hasMore": has_more
    })
}
