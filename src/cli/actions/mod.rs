pub mod server;

use anyhow::Result;

#[derive(Debug)]
pub enum Action {
    /// Serve the Uptime Monitor front end until a shutdown signal arrives.
    Server(server::Args),
}

impl Action {
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> Result<()> {
        match self {
            Self::Server(args) => server::execute(args).await,
        }
    }
}
