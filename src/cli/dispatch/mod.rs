//! Maps validated CLI arguments to the action the binary runs.

use crate::cli::actions::{Action, server::Args};
use crate::cli::commands::{identity, site};
use anyhow::Result;

/// Map validated CLI matches to a server action.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let port = matches.get_one::<u16>("port").copied().unwrap_or(8080);

    let identity_opts = identity::Options::parse(matches)?;
    let site_opts = site::Options::parse(matches)?;

    Ok(Action::Server(Args {
        port,
        identity_url: identity_opts.url,
        identity_api_key: identity_opts.api_key,
        identity_timeout_seconds: identity_opts.timeout_seconds,
        session_cookie: identity_opts.session_cookie,
        public_url: site_opts.public_url,
        sign_in_url: site_opts.sign_in_url,
        default_theme: site_opts.default_theme,
    }))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::web::theme::ThemeMode;

    #[test]
    fn handler_builds_server_action() {
        temp_env::with_vars(
            [
                ("UPTIME_IDENTITY_URL", Some("https://auth.example.com")),
                ("UPTIME_DEFAULT_THEME", Some("light")),
                ("UPTIME_PORT", None),
            ],
            || {
                let matches = crate::cli::commands::new().get_matches_from(vec!["uptime-web"]);
                let Action::Server(args) = handler(&matches).unwrap();
                assert_eq!(args.port, 8080);
                assert_eq!(args.identity_url, "https://auth.example.com");
                assert_eq!(args.default_theme, ThemeMode::Light);
            },
        );
    }

    #[test]
    fn handler_rejects_blank_identity_url() {
        temp_env::with_vars([("UPTIME_IDENTITY_URL", Some("  "))], || {
            let matches = crate::cli::commands::new().get_matches_from(vec!["uptime-web"]);
            let result = handler(&matches);
            assert!(result.is_err());
            if let Err(err) = result {
                assert!(
                    err.to_string()
                        .contains("missing required argument: --identity-url")
                );
            }
        });
    }
}
