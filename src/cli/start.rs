use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use tracing::debug;

/// Parse the command line, install logging and pick the action to run.
///
/// # Errors
///
/// Returns an error if telemetry cannot be initialized or the arguments do
/// not describe a usable server configuration.
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(commands::logging::level(&matches))?;

    debug!(
        version = env!("CARGO_PKG_VERSION"),
        build = crate::GIT_COMMIT_HASH,
        "Starting uptime-web"
    );

    dispatch::handler(&matches)
}
