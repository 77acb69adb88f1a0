//! Durable token storage.
//!
//! The bearer token is the only durable state the client keeps. It lives
//! under a fixed key so concurrent clients of the same account race
//! last-writer-wins, which is acceptable; a client observing a 401 clears the
//! token regardless of who wrote it.

use std::path::PathBuf;
use std::sync::RwLock;

use tracing::debug;

/// Storage key / file name for the bearer token.
pub const TOKEN_KEY: &str = "Token";

/// Durable token storage. Reads happen on every outbound request; writes only
/// from session transitions and the 401 recovery path.
pub trait TokenStore: Send + Sync {
    /// The stored token, or `None` when absent or unreadable.
    fn load(&self) -> Option<String>;
    fn save(&self, token: &str);
    fn clear(&self);
}

/// File-backed store: a file named `Token` under the platform data dir.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store under `<data_dir>/ripple/Token`.
    pub fn new() -> Self {
        let path = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("ripple")
            .join(TOKEN_KEY);
        Self { path }
    }

    /// Store at an explicit path (tests point this at a temp dir).
    pub fn at(path: PathBuf) -> Self {
        Self { path }
    }
}

impl Default for FileTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Option<String> {
        let raw = std::fs::read_to_string(&self.path).ok()?;
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(trimmed.to_string())
    }

    fn save(&self, token: &str) {
        if let Some(parent) = self.path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        if let Err(e) = std::fs::write(&self.path, token) {
            debug!(path = %self.path.display(), "failed to persist token: {e}");
        }
    }

    fn clear(&self) {
        let _ = std::fs::remove_file(&self.path);
    }
}

/// In-memory store for tests and ephemeral sessions.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Option<String> {
        self.token
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    fn save(&self, token: &str) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = Some(token.to_string());
    }

    fn clear(&self) {
        *self.token.write().unwrap_or_else(|e| e.into_inner()) = None;
    }
}
