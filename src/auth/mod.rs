//! Session boundary to the external auth engine.
//!
//! Signup, login, and OAuth all live in a separate auth service; this crate
//! only ever asks it "who does this cookie belong to". The answer shape is
//! `Ok(None)` for no session, `Ok(Some(_))` for a verified principal, and
//! `Err(_)` only for verifier-internal failure - which callers treat as
//! unauthenticated (fail closed).

use async_trait::async_trait;
use axum::http::{header, HeaderMap};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::config::AuthConfig;

/// Authenticated principal for one request. Never persisted here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Error)]
pub enum VerifierError {
    #[error("invalid auth service URL: {0}")]
    InvalidUrl(String),

    #[error("auth service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("auth service returned a malformed session payload")]
    MalformedResponse,
}

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    /// Resolve the request's session cookie to a principal, or nothing
    async fn verify(&self, headers: &HeaderMap) -> Result<Option<Session>, VerifierError>;
}

/// Production verifier: forwards the Cookie header to the auth service's
/// get-session endpoint and parses the returned principal.
pub struct HttpSessionVerifier {
    client: reqwest::Client,
    get_session_url: Url,
}

impl HttpSessionVerifier {
    pub fn new(config: &AuthConfig) -> Result<Self, VerifierError> {
        let base = Url::parse(&config.base_url)
            .map_err(|_| VerifierError::InvalidUrl(config.base_url.clone()))?;
        let get_session_url = base
            .join(&config.get_session_path)
            .map_err(|_| VerifierError::InvalidUrl(config.get_session_path.clone()))?;

        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(Self { client, get_session_url })
    }
}

#[async_trait]
impl SessionVerifier for HttpSessionVerifier {
    async fn verify(&self, headers: &HeaderMap) -> Result<Option<Session>, VerifierError> {
        // No cookie at all means no session; skip the round trip
        let cookie = match headers.get(header::COOKIE).and_then(|v| v.to_str().ok()) {
            Some(c) => c,
            None => return Ok(None),
        };

        let response = self
            .client
            .get(self.get_session_url.clone())
            .header(header::COOKIE.as_str(), cookie)
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Ok(None);
        }
        let response = response.error_for_status()?;

        let body: serde_json::Value = response.json().await?;
        if body.is_null() {
            // get-session returns a JSON null body when the cookie is stale
            return Ok(None);
        }

        let user = body.get("user").ok_or(VerifierError::MalformedResponse)?;
        let user_id = match user.get("id").and_then(|v| v.as_str()) {
            Some(id) => id.to_string(),
            None => return Err(VerifierError::MalformedResponse),
        };

        Ok(Some(Session {
            user_id,
            email: user.get("email").and_then(|v| v.as_str()).map(String::from),
            name: user.get("name").and_then(|v| v.as_str()).map(String::from),
        }))
    }
}
