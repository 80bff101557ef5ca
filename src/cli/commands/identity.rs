use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_IDENTITY_URL: &str = "identity-url";
pub const ARG_IDENTITY_API_KEY: &str = "identity-api-key";
pub const ARG_IDENTITY_TIMEOUT: &str = "identity-timeout";
pub const ARG_SESSION_COOKIE: &str = "session-cookie";

/// Identity backend connection settings.
#[derive(Debug, Clone)]
pub struct Options {
    pub url: String,
    pub api_key: Option<SecretString>,
    pub timeout_seconds: u64,
    pub session_cookie: String,
}

impl Options {
    /// Parse identity backend arguments from matches.
    ///
    /// # Errors
    /// Returns an error if required arguments are missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let url = matches
            .get_one::<String>(ARG_IDENTITY_URL)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{ARG_IDENTITY_URL}"))?;

        let api_key = matches
            .get_one::<String>(ARG_IDENTITY_API_KEY)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
            .map(|v| SecretString::from(v.to_string()));

        let session_cookie = matches
            .get_one::<String>(ARG_SESSION_COOKIE)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow::anyhow!("--{ARG_SESSION_COOKIE} must not be empty"))?;

        Ok(Self {
            url,
            api_key,
            timeout_seconds: matches
                .get_one::<u64>(ARG_IDENTITY_TIMEOUT)
                .copied()
                .unwrap_or(5),
            session_cookie,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_IDENTITY_URL)
                .long(ARG_IDENTITY_URL)
                .help("Identity backend base URL, example: https://auth.example.com")
                .env("UPTIME_IDENTITY_URL")
                .required(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_API_KEY)
                .long(ARG_IDENTITY_API_KEY)
                .help("Public API key sent to the identity backend")
                .env("UPTIME_IDENTITY_API_KEY")
                .hide_env_values(true),
        )
        .arg(
            Arg::new(ARG_IDENTITY_TIMEOUT)
                .long(ARG_IDENTITY_TIMEOUT)
                .help("Identity backend request timeout in seconds")
                .env("UPTIME_IDENTITY_TIMEOUT")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..=60)),
        )
        .arg(
            Arg::new(ARG_SESSION_COOKIE)
                .long(ARG_SESSION_COOKIE)
                .help("Name of the cookie carrying the session token")
                .env("UPTIME_SESSION_COOKIE")
                .default_value("uptime_session"),
        )
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    #[test]
    fn parse_reads_defaults() {
        temp_env::with_vars(
            [
                ("UPTIME_IDENTITY_API_KEY", None::<&str>),
                ("UPTIME_IDENTITY_TIMEOUT", None),
                ("UPTIME_SESSION_COOKIE", None),
            ],
            || {
                let matches = with_args(Command::new("uptime-web")).get_matches_from(vec![
                    "uptime-web",
                    "--identity-url",
                    "https://auth.example.com",
                ]);
                let options = Options::parse(&matches).unwrap();
                assert_eq!(options.url, "https://auth.example.com");
                assert!(options.api_key.is_none());
                assert_eq!(options.timeout_seconds, 5);
                assert_eq!(options.session_cookie, "uptime_session");
            },
        );
    }

    #[test]
    fn parse_ignores_blank_api_key() {
        temp_env::with_vars([("UPTIME_IDENTITY_API_KEY", Some("   "))], || {
            let matches = with_args(Command::new("uptime-web")).get_matches_from(vec![
                "uptime-web",
                "--identity-url",
                "https://auth.example.com",
            ]);
            let options = Options::parse(&matches).unwrap();
            assert!(options.api_key.is_none());
        });
    }

    #[test]
    fn parse_keeps_api_key_secret() {
        let matches = with_args(Command::new("uptime-web")).get_matches_from(vec![
            "uptime-web",
            "--identity-url",
            "https://auth.example.com",
            "--identity-api-key",
            "anon-key",
        ]);
        let options = Options::parse(&matches).unwrap();
        assert_eq!(
            options.api_key.as_ref().map(ExposeSecret::expose_secret),
            Some("anon-key")
        );
        assert!(!format!("{options:?}").contains("anon-key"));
    }

    #[test]
    fn timeout_out_of_range_is_rejected() {
        let result = with_args(Command::new("uptime-web")).try_get_matches_from(vec![
            "uptime-web",
            "--identity-url",
            "https://auth.example.com",
            "--identity-timeout",
            "0",
        ]);
        assert!(result.is_err());
    }
}
