//! The request pipeline.
//!
//! One shared `reqwest::Client` behind a decorator that, on every outbound
//! call: attaches the bearer credential (never on the auth-entry paths, and
//! never when the stored token is already expired), shapes the body, and
//! classifies the response. A 401 on any non-auth-entry path is recovered
//! globally here before the failure reaches the caller: token cleared,
//! session user cleared, navigation to the login page.
//!
//! Requests do not observe each other, and dropping a call's future cancels
//! the underlying request, so an abandoned screen never patches stale state.

use std::sync::Arc;

use reqwest::multipart::Form;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use url::Url;

use ripple_core::token;

use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::routes::{Navigator, Route};
use crate::session::SessionCell;
use crate::storage::TokenStore;

/// The two paths that must never carry a credential.
fn is_auth_entry(path: &str) -> bool {
    matches!(path, "/auth/login" | "/auth/register")
}

/// Shared request pipeline.
#[derive(Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
    store: Arc<dyn TokenStore>,
    session: Arc<SessionCell>,
    navigator: Arc<Navigator>,
}

impl Transport {
    pub fn new(
        base_url: Url,
        store: Arc<dyn TokenStore>,
        session: Arc<SessionCell>,
        navigator: Arc<Navigator>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            store,
            session,
            navigator,
        }
    }

    fn url(&self, path: &str, query: &[(&str, String)]) -> ApiResult<Url> {
        let mut url = self
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| ApiError::Network(format!("invalid path '{path}': {e}")))?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Attach the credential when one is usable: present, non-expired, and
    /// the path is not an auth entry.
    fn decorate(&self, builder: reqwest::RequestBuilder, path: &str) -> reqwest::RequestBuilder {
        if is_auth_entry(path) {
            return builder;
        }
        match self.store.load() {
            Some(token) if !token::is_expired(&token) => builder.bearer_auth(token),
            Some(_) => {
                debug!(path, "stored token is expired; sending without credential");
                builder
            }
            None => builder,
        }
    }

    /// Send, classify, and run the global recovery rules.
    async fn execute(
        &self,
        builder: reqwest::RequestBuilder,
        path: &str,
    ) -> ApiResult<reqwest::Response> {
        let response = self
            .decorate(builder, path)
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .text()
            .await
            .ok()
            .and_then(|body| serde_json::from_str::<ErrorBody>(&body).ok())
            .and_then(|body| body.message);
        let err = ApiError::from_status(status.as_u16(), message);

        match &err {
            ApiError::Unauthorized { .. } if !is_auth_entry(path) => {
                // Global recovery: this session is over.
                warn!(path, "401 on a protected path; clearing session");
                self.store.clear();
                self.session.clear();
                self.navigator.navigate(Route::Login);
            }
            ApiError::Forbidden { message } if path == "/auth/login" => {
                // Banned account. Drop any partially persisted token and let
                // the login screen show the server's message verbatim.
                self.store.clear();
                self.session.clear();
                if let Some(message) = message {
                    self.navigator
                        .navigate_with_notice(Route::Login, message.clone());
                }
            }
            // Other 403s stay page-level: a signed-in user may simply lack a
            // role, and logging them out would be wrong.
            _ => {}
        }

        Err(err)
    }

    async fn json_body<T: DeserializeOwned>(response: reqwest::Response) -> ApiResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ApiResult<T> {
        let url = self.url(path, query)?;
        let response = self.execute(self.http.get(url), path).await?;
        Self::json_body(response).await
    }

    pub async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self.execute(self.http.post(url).json(body), path).await?;
        Self::json_body(response).await
    }

    /// POST with an empty JSON body (the like toggle, follow).
    pub async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self
            .execute(self.http.post(url).json(&serde_json::json!({})), path)
            .await?;
        Self::json_body(response).await
    }

    pub async fn put<B: Serialize, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self.execute(self.http.put(url).json(body), path).await?;
        Self::json_body(response).await
    }

    /// PUT whose response body is empty or irrelevant.
    pub async fn put_unit<B: Serialize>(&self, path: &str, body: &B) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        self.execute(self.http.put(url).json(body), path).await?;
        Ok(())
    }

    /// PUT with no body and no meaningful response (unban, mark-all-read).
    pub async fn put_empty_unit(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        self.execute(self.http.put(url).json(&serde_json::json!({})), path)
            .await?;
        Ok(())
    }

    /// PUT with no request body but a JSON response (mark one notification).
    pub async fn put_empty<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self
            .execute(self.http.put(url).json(&serde_json::json!({})), path)
            .await?;
        Self::json_body(response).await
    }

    pub async fn delete_unit(&self, path: &str) -> ApiResult<()> {
        let url = self.url(path, &[])?;
        self.execute(self.http.delete(url), path).await?;
        Ok(())
    }

    /// DELETE with a JSON response (unfollow, profile picture removal).
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self.execute(self.http.delete(url), path).await?;
        Self::json_body(response).await
    }

    /// Multipart POST; the runtime sets the boundary, the form is passed
    /// through unchanged.
    pub async fn post_multipart<T: DeserializeOwned>(
        &self,
        path: &str,
        form: Form,
    ) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self
            .execute(self.http.post(url).multipart(form), path)
            .await?;
        Self::json_body(response).await
    }

    pub async fn put_multipart<T: DeserializeOwned>(&self, path: &str, form: Form) -> ApiResult<T> {
        let url = self.url(path, &[])?;
        let response = self
            .execute(self.http.put(url).multipart(form), path)
            .await?;
        Self::json_body(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_entry_paths_are_exact() {
        assert!(is_auth_entry("/auth/login"));
        assert!(is_auth_entry("/auth/register"));
        assert!(!is_auth_entry("/auth/me"));
        assert!(!is_auth_entry("/api/post"));
    }
}
