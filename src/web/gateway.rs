//! Sign-out command and the gateway that executes it. This is the only place
//! the front end asks the identity backend to change state.

use crate::web::{
    error::AuthError,
    identity::{Credentials, IdentityBackend},
    session::RequestContext,
};
use std::sync::Arc;
use tracing::{info, instrument};

/// Where a successful sign-out sends the browser.
pub const LANDING_ROUTE: &str = "/";

#[derive(Debug)]
pub struct SignOutCommand {
    credentials: Option<Credentials>,
}

impl SignOutCommand {
    #[must_use]
    pub fn new(credentials: Option<Credentials>) -> Self {
        Self { credentials }
    }

    #[must_use]
    pub fn from_request(request: &RequestContext) -> Self {
        Self::new(request.credentials().cloned())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SignOutOutcome {
    /// The backend confirmed the credentials are no longer valid.
    Invalidated,
    /// Nothing to invalidate; the request carried no credentials.
    AlreadySignedOut,
}

#[derive(Clone)]
pub struct AuthGateway {
    backend: Arc<dyn IdentityBackend>,
}

impl AuthGateway {
    #[must_use]
    pub fn new(backend: Arc<dyn IdentityBackend>) -> Self {
        Self { backend }
    }

    /// Execute a sign-out.
    ///
    /// # Errors
    /// Returns `AuthError::SignOutFailed` when the backend did not confirm the
    /// invalidation. Callers must not report success in that case.
    #[instrument(skip_all)]
    pub async fn sign_out(&self, command: SignOutCommand) -> Result<SignOutOutcome, AuthError> {
        let Some(credentials) = command.credentials else {
            info!("Sign-out without credentials");
            return Ok(SignOutOutcome::AlreadySignedOut);
        };

        self.backend
            .invalidate(&credentials)
            .await
            .map_err(|err| match err {
                AuthError::SignOutFailed(reason) | AuthError::BackendUnavailable(reason) => {
                    AuthError::SignOutFailed(reason)
                }
            })?;

        info!("Session invalidated");
        Ok(SignOutOutcome::Invalidated)
    }
}
