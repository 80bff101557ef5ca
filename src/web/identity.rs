//! Identity backend client. The backend owns credentials and sessions; this
//! module only asks it who a token belongs to and asks it to forget a token.
//! Tokens are wrapped in `SecretString` and never logged.

use crate::{APP_USER_AGENT, web::error::AuthError};
use async_trait::async_trait;
use axum::http::{HeaderMap, StatusCode, header::AUTHORIZATION};
use axum_extra::extract::cookie::CookieJar;
use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use std::{fmt, time::Duration};
use tracing::{debug, instrument};
use url::Url;

const SESSION_PATH: &str = "v1/auth/session";
const LOGOUT_PATH: &str = "v1/auth/logout";
const API_KEY_HEADER: &str = "apikey";

/// An authenticated principal as reported by the identity backend.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    pub id: String,
    pub email: Option<String>,
}

impl Identity {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: None,
        }
    }

    /// Stands in for a caller whose token is still held but could not be
    /// checked against the backend. Carries no id or email.
    #[must_use]
    pub fn unverified() -> Self {
        Self::new(String::new())
    }

    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Human-readable label: the email when known, otherwise the id.
    #[must_use]
    pub fn label(&self) -> &str {
        self.email.as_deref().unwrap_or(&self.id)
    }
}

/// Session token presented by the caller.
#[derive(Clone)]
pub struct Credentials(SecretString);

impl Credentials {
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Reads the token from `Authorization: Bearer` or, failing that, the
    /// session cookie. Empty values count as no credentials.
    #[must_use]
    pub fn from_headers(headers: &HeaderMap, cookie_name: &str) -> Option<Self> {
        if let Some(token) = bearer_token(headers) {
            return Some(Self::new(token));
        }
        let jar = CookieJar::from_headers(headers);
        let value = jar.get(cookie_name)?.value().trim();
        if value.is_empty() {
            None
        } else {
            Some(Self::new(value))
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credentials(***)")
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let trimmed = value.trim();
    let token = trimmed
        .strip_prefix("Bearer ")
        .or_else(|| trimmed.strip_prefix("bearer "))?
        .trim();
    if token.is_empty() {
        None
    } else {
        Some(token.to_string())
    }
}

/// Operations consumed from the identity backend.
#[async_trait]
pub trait IdentityBackend: Send + Sync {
    /// Look up the identity behind `credentials`. `Ok(None)` means the backend
    /// answered and there is no session; it is not an error.
    async fn lookup(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError>;

    /// Invalidate `credentials`. Must be idempotent.
    async fn invalidate(&self, credentials: &Credentials) -> Result<(), AuthError>;
}

#[derive(Deserialize)]
struct SessionPayload {
    user_id: String,
    #[serde(default)]
    email: Option<String>,
}

/// `reqwest` implementation talking to `/v1/auth/session` and `/v1/auth/logout`.
#[derive(Clone)]
pub struct HttpIdentityBackend {
    client: Client,
    session_url: Url,
    logout_url: Url,
    api_key: Option<SecretString>,
}

impl HttpIdentityBackend {
    /// # Errors
    /// Returns an error if the HTTP client cannot be built or the endpoint URLs
    /// cannot be derived from `base_url`.
    pub fn new(
        base_url: &Url,
        api_key: Option<SecretString>,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = Client::builder()
            .user_agent(APP_USER_AGENT)
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()?;

        // Url::join drops the last path segment unless the base ends with '/'.
        let mut base = base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client,
            session_url: base.join(SESSION_PATH)?,
            logout_url: base.join(LOGOUT_PATH)?,
            api_key,
        })
    }

    fn authorize(
        &self,
        builder: reqwest::RequestBuilder,
        credentials: &Credentials,
    ) -> reqwest::RequestBuilder {
        let builder = builder.bearer_auth(credentials.expose());
        match &self.api_key {
            Some(key) => builder.header(API_KEY_HEADER, key.expose_secret()),
            None => builder,
        }
    }
}

impl fmt::Debug for HttpIdentityBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpIdentityBackend")
            .field("session_url", &self.session_url.as_str())
            .field("logout_url", &self.logout_url.as_str())
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl IdentityBackend for HttpIdentityBackend {
    #[instrument(skip_all)]
    async fn lookup(&self, credentials: &Credentials) -> Result<Option<Identity>, AuthError> {
        let response = self
            .authorize(self.client.get(self.session_url.clone()), credentials)
            .send()
            .await
            .map_err(|e| AuthError::BackendUnavailable(e.to_string()))?;

        let status = response.status();
        debug!("session lookup returned {status}");

        match status {
            StatusCode::OK => {
                let payload: SessionPayload = response
                    .json()
                    .await
                    .map_err(|e| AuthError::BackendUnavailable(format!("malformed session: {e}")))?;
                if payload.user_id.trim().is_empty() {
                    return Err(AuthError::BackendUnavailable(
                        "malformed session: empty user_id".to_string(),
                    ));
                }
                Ok(Some(Identity {
                    id: payload.user_id,
                    email: payload.email.filter(|email| !email.trim().is_empty()),
                }))
            }
            StatusCode::NO_CONTENT | StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Ok(None),
            other => Err(AuthError::BackendUnavailable(format!(
                "{} - {other}",
                self.session_url
            ))),
        }
    }

    #[instrument(skip_all)]
    async fn invalidate(&self, credentials: &Credentials) -> Result<(), AuthError> {
        let response = self
            .authorize(self.client.post(self.logout_url.clone()), credentials)
            .send()
            .await
            .map_err(|e| AuthError::SignOutFailed(e.to_string()))?;

        let status = response.status();
        debug!("logout returned {status}");

        // 401: the token is already gone, which is the state we want.
        if status.is_success() || status == StatusCode::UNAUTHORIZED {
            Ok(())
        } else {
            Err(AuthError::SignOutFailed(format!(
                "{} - {status}",
                self.logout_url
            )))
        }
    }
}
