//! Session state and auth transitions.
//!
//! The session is one process-wide, reactively observed record: the current
//! user plus whether a credential is persisted. Exactly two paths populate
//! it (a successful login/register, and identity resolution on a cold load);
//! logout and the pipeline's 401 recovery clear it.

use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tracing::info;

use ripple_core::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use ripple_core::token;
use ripple_core::validation;

use crate::error::ApiResult;
use crate::routes::{Navigator, Route};
use crate::storage::TokenStore;
use crate::transport::Transport;

/// Observable session record.
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    pub user: Option<User>,
    pub token_present: bool,
}

/// The watch-backed cell both the session service and the transport's 401
/// recovery write through.
pub struct SessionCell {
    tx: watch::Sender<SessionSnapshot>,
}

impl SessionCell {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(SessionSnapshot::default());
        Self { tx }
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.tx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.tx.subscribe()
    }

    pub fn current_user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    /// A credential and its user arrived together (login/register).
    pub fn set_authenticated(&self, user: User) {
        self.tx.send_modify(|s| {
            s.user = Some(user);
            s.token_present = true;
        });
    }

    /// Identity resolved for an already-persisted credential.
    pub fn set_user(&self, user: User) {
        self.tx.send_modify(|s| {
            s.user = Some(user);
            s.token_present = true;
        });
    }

    /// Session over: logout or rejected credential.
    pub fn clear(&self) {
        self.tx.send_modify(|s| {
            s.user = None;
            s.token_present = false;
        });
    }
}

impl Default for SessionCell {
    fn default() -> Self {
        Self::new()
    }
}

/// Login, register, logout, and identity resolution.
pub struct Session {
    transport: Transport,
    store: Arc<dyn TokenStore>,
    cell: Arc<SessionCell>,
    navigator: Arc<Navigator>,
    /// Serializes racing identity resolutions (multiple admissions on a cold
    /// load); the winner populates the cell, the rest reuse it.
    resolve_lock: Mutex<()>,
}

impl Session {
    pub fn new(
        transport: Transport,
        store: Arc<dyn TokenStore>,
        cell: Arc<SessionCell>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            transport,
            store,
            cell,
            navigator,
            resolve_lock: Mutex::new(()),
        }
    }

    pub fn current_user(&self) -> Option<User> {
        self.cell.current_user()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.cell.subscribe()
    }

    /// A non-expired credential is persisted. Says nothing about whether the
    /// user record has been resolved yet.
    pub fn is_authenticated(&self) -> bool {
        self.stored_token().is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.current_user().is_some_and(|u| u.is_admin())
    }

    /// The stored token, treating an expired one as absent.
    pub fn stored_token(&self) -> Option<String> {
        self.store
            .load()
            .filter(|token| !token::is_expired(token))
    }

    /// The persisted token without the expiry filter. Admission needs to
    /// distinguish "absent" from "present but stale".
    pub fn raw_stored_token(&self) -> Option<String> {
        self.store.load()
    }

    /// Sign in. On success the token is persisted and the session cell is
    /// populated from the payload. A 403 here means a banned account — any
    /// partially persisted token is dropped and the server's message rides
    /// the error verbatim.
    pub async fn login(&self, identifier: &str, password: &str) -> ApiResult<User> {
        validation::validate_identifier(identifier)?;
        validation::validate_password(password)?;

        let request = LoginRequest {
            identifier: identifier.to_string(),
            password: password.to_string(),
        };
        let response: ApiResult<AuthResponse> = self.transport.post("/auth/login", &request).await;
        match response {
            Ok(auth) => {
                self.store.save(&auth.token);
                self.cell.set_authenticated(auth.user_data.clone());
                info!(username = %auth.user_data.username, "logged in");
                Ok(auth.user_data)
            }
            Err(err) => {
                if matches!(err, crate::error::ApiError::Forbidden { .. }) {
                    self.store.clear();
                    self.cell.clear();
                }
                Err(err)
            }
        }
    }

    /// Create an account; the backend signs the new user in atomically.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<User> {
        let auth: AuthResponse = self.transport.post("/auth/register", request).await?;
        self.store.save(&auth.token);
        self.cell.set_authenticated(auth.user_data.clone());
        info!(username = %auth.user_data.username, "registered");
        Ok(auth.user_data)
    }

    /// Clear the credential and the user, then land on the login page.
    /// Safe to call any number of times.
    pub fn logout(&self) {
        self.store.clear();
        self.cell.clear();
        self.navigator.navigate(Route::Login);
    }

    /// Resolve the identity behind the persisted credential (`GET /auth/me`).
    ///
    /// Single-flight: concurrent calls serialize, and whoever acquires the
    /// lock after a winner already populated the cell returns that user
    /// without another round trip. Failure is returned to the caller —
    /// admission owns the logout-and-redirect decision.
    pub async fn resolve_identity(&self) -> ApiResult<User> {
        let _guard = self.resolve_lock.lock().await;
        if let Some(user) = self.cell.current_user() {
            return Ok(user);
        }
        let user: User = self.transport.get("/auth/me", &[]).await?;
        self.cell.set_user(user.clone());
        Ok(user)
    }
}
