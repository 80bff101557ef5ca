use crate::web::{self, WebConfig, theme::ThemeMode};
use anyhow::Result;
use secrecy::SecretString;
use std::time::Duration;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub port: u16,
    pub identity_url: String,
    pub identity_api_key: Option<SecretString>,
    pub identity_timeout_seconds: u64,
    pub session_cookie: String,
    pub public_url: String,
    pub sign_in_url: String,
    pub default_theme: ThemeMode,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the configuration is invalid or the server fails to start.
pub async fn execute(args: Args) -> Result<()> {
    let config = WebConfig::new(&args.public_url, &args.identity_url)?
        .with_identity_api_key(args.identity_api_key)
        .with_identity_timeout(Duration::from_secs(args.identity_timeout_seconds))
        .with_session_cookie(args.session_cookie)
        .with_sign_in_href(args.sign_in_url)
        .with_default_theme(args.default_theme);

    debug!("Web config: {:?}", config);

    let result = web::new(args.port, config).await;

    crate::cli::telemetry::shutdown_tracer();

    result
}
