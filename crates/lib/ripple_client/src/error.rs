//! Client error taxonomy.

use serde::Deserialize;
use thiserror::Error;

use ripple_core::paging::LoadError;
use ripple_core::validation::ValidationError;

/// Convenience alias for client call results.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error body shape the backend uses for 4xx responses.
#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub message: Option<String>,
}

/// Classified outcome of a backend call.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error("network error: {0}")]
    Network(String),

    /// 401 — the credential was rejected. Off the auth-entry paths the
    /// pipeline has already cleared the session by the time the caller sees
    /// this; on login it carries the server's bad-credentials message.
    #[error("unauthorized{}", display_suffix(.message))]
    Unauthorized { message: Option<String> },

    /// 403 — the account lacks a role, or (on login) is banned. The server's
    /// message, when present, is preserved verbatim.
    #[error("forbidden{}", display_suffix(.message))]
    Forbidden { message: Option<String> },

    /// 404 — the addressed entity does not exist.
    #[error("not found")]
    NotFound,

    /// 400 — carries the server's human-readable message for form display.
    #[error("{message}")]
    BadRequest { message: String },

    /// 5xx.
    #[error("server error (HTTP {status})")]
    Server { status: u16 },

    /// Any other 4xx.
    #[error("request failed (HTTP {status}){}", display_suffix(.message))]
    Client { status: u16, message: Option<String> },

    /// The request was rejected client-side before going on the wire.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The response arrived but its body did not parse as the expected shape.
    #[error("unexpected response body: {0}")]
    Decode(String),
}

fn display_suffix(message: &Option<String>) -> String {
    match message {
        Some(m) => format!(": {m}"),
        None => String::new(),
    }
}

impl ApiError {
    /// Classify a non-success HTTP status plus whatever message the body had.
    pub(crate) fn from_status(status: u16, message: Option<String>) -> Self {
        match status {
            401 => Self::Unauthorized { message },
            403 => Self::Forbidden { message },
            404 => Self::NotFound,
            400 => Self::BadRequest {
                message: message.unwrap_or_else(|| "Bad request".to_string()),
            },
            500..=599 => Self::Server { status },
            _ => Self::Client { status, message },
        }
    }

    /// Transient errors warrant a Retry affordance; terminal ones a Home/Back.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Network(_) | Self::Server { .. })
    }

    /// The window-level error kind this failure maps to.
    pub fn load_error(&self) -> LoadError {
        match self {
            Self::Network(_) => LoadError::Network,
            Self::Server { .. } => LoadError::Server,
            Self::NotFound => LoadError::NotFound,
            Self::Forbidden { .. } => LoadError::Forbidden,
            _ => LoadError::Other,
        }
    }

    /// The server-sent message, when one was preserved.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Forbidden { message }
            | Self::Unauthorized { message }
            | Self::Client { message, .. } => message.as_deref(),
            Self::BadRequest { message } => Some(message),
            _ => None,
        }
    }
}
