use thiserror::Error;

/// Failures at the identity backend boundary.
///
/// Read-path failures (`BackendUnavailable`) are recovered by rendering the
/// request as anonymous. Write-path failures (`SignOutFailed`) are surfaced
/// and never turned into a redirect.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("identity backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("sign-out failed: {0}")]
    SignOutFailed(String),
}
