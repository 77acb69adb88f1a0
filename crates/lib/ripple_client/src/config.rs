//! Client configuration.

use url::Url;

use crate::error::{ApiError, ApiResult};

/// Environment variable overriding the backend base URL.
pub const API_URL_ENV: &str = "RIPPLE_API_URL";

/// Default backend for local development.
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Resolved client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: Url,
}

impl ClientConfig {
    /// Build a config for an explicit base URL.
    pub fn new(base_url: &str) -> ApiResult<Self> {
        let base_url = Url::parse(base_url)
            .map_err(|e| ApiError::Network(format!("invalid base URL '{base_url}': {e}")))?;
        Ok(Self { base_url })
    }

    /// Resolve the base URL: `RIPPLE_API_URL` → built-in default.
    pub fn from_env() -> ApiResult<Self> {
        if let Ok(value) = std::env::var(API_URL_ENV)
            && !value.is_empty()
        {
            return Self::new(&value);
        }
        Self::new(DEFAULT_API_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_url_parses() {
        let cfg = ClientConfig::new("http://127.0.0.1:9000").expect("config");
        assert_eq!(cfg.base_url.as_str(), "http://127.0.0.1:9000/");
    }

    #[test]
    fn garbage_url_is_rejected() {
        assert!(ClientConfig::new("not a url").is_err());
    }
}
