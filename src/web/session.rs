//! Per-request session resolution.
//!
//! A request resolves its session at most once. [`session_scope`] installs an
//! empty [`SessionScope`] in the request extensions; the first component that
//! asks for the session fills it and every later ask in the same request gets
//! the memoized value.

use crate::web::{
    error::AuthError,
    identity::{Credentials, Identity, IdentityBackend},
    state::AppState,
};
use axum::{
    extract::{FromRequestParts, Request},
    http::{StatusCode, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{instrument, warn};

/// Authentication state of one request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Session {
    Present(Identity),
    Absent,
}

impl Session {
    #[must_use]
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Self::Present(identity) => Some(identity),
            Self::Absent => None,
        }
    }

    #[must_use]
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }
}

/// What the resolver needs from the inbound request.
#[derive(Clone, Debug)]
pub struct RequestContext {
    credentials: Option<Credentials>,
    path: String,
}

impl RequestContext {
    #[must_use]
    pub fn new(credentials: Option<Credentials>, path: impl Into<String>) -> Self {
        Self {
            credentials,
            path: path.into(),
        }
    }

    #[must_use]
    pub fn from_parts(parts: &Parts, cookie_name: &str) -> Self {
        Self::new(
            Credentials::from_headers(&parts.headers, cookie_name),
            parts.uri.path(),
        )
    }

    #[must_use]
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }
}

impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_parts(parts)?;
        Ok(Self::from_parts(parts, state.config().session_cookie()))
    }
}

/// Read-only session lookup against the identity backend.
#[derive(Clone)]
pub struct SessionResolver {
    backend: Arc<dyn IdentityBackend>,
}

impl SessionResolver {
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Resolve without recovering from backend failures.
    ///
    /// # Errors
    /// Returns `AuthError::BackendUnavailable` when the backend cannot answer.
    pub async fn try_resolve(&self, request: &RequestContext) -> Result<Session, AuthError> {
        let Some(credentials) = request.credentials() else {
            return Ok(Session::Absent);
        };

        Ok(self
            .backend
            .lookup(credentials)
            .await?
            .map_or(Session::Absent, Session::Present))
    }

    /// Resolve, treating an unreachable backend as no session.
    #[instrument(skip_all, fields(path = %request.path()))]
    pub async fn resolve(&self, request: &RequestContext) -> Session {
        match self.try_resolve(request).await {
            Ok(session) => session,
            Err(err) => {
                warn!("Rendering as anonymous: {err}");
                Session::Absent
            }
        }
    }
}

/// Request-scoped memo of the resolved session.
#[derive(Clone, Default)]
pub struct SessionScope(Arc<OnceCell<Session>>);

impl SessionScope {
    pub async fn get_or_resolve(
        &self,
        resolver: &SessionResolver,
        request: &RequestContext,
    ) -> Session {
        self.0
            .get_or_init(|| resolver.resolve(request))
            .await
            .clone()
    }

    #[cfg(test)]
    fn get(&self) -> Option<&Session> {
        self.0.get()
    }

    fn from_parts(parts: &mut Parts) -> Self {
        if let Some(scope) = parts.extensions.get::<Self>() {
            return scope.clone();
        }
        let scope = Self::default();
        parts.extensions.insert(scope.clone());
        scope
    }
}

/// Middleware giving every request a fresh, empty [`SessionScope`].
pub async fn session_scope(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(SessionScope::default());
    next.run(request).await
}

/// Extractor yielding the request's memoized session.
#[derive(Clone, Debug)]
pub struct CurrentSession(pub Session);

impl<S> FromRequestParts<S> for CurrentSession
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_parts(parts)?;
        let request = RequestContext::from_parts(parts, state.config().session_cookie());
        let scope = SessionScope::from_parts(parts);
        Ok(Self(scope.get_or_resolve(state.resolver(), &request).await))
    }
}
