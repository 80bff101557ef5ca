use crate::web::theme::ThemeMode;
use clap::{Arg, ArgMatches, Command, builder::PossibleValuesParser};

pub const ARG_PUBLIC_URL: &str = "public-url";
pub const ARG_SIGN_IN_URL: &str = "sign-in-url";
pub const ARG_DEFAULT_THEME: &str = "default-theme";

/// Public-facing site settings.
#[derive(Debug, Clone)]
pub struct Options {
    pub public_url: String,
    pub sign_in_url: String,
    pub default_theme: ThemeMode,
}

impl Options {
    /// Parse site arguments from matches.
    ///
    /// # Errors
    /// Returns an error if a value is missing or the theme is unknown.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let read = |id: &str| -> anyhow::Result<String> {
            matches
                .get_one::<String>(id)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
        };

        let default_theme = read(ARG_DEFAULT_THEME)?
            .parse::<ThemeMode>()
            .map_err(|e| anyhow::anyhow!(e))?;

        Ok(Self {
            public_url: read(ARG_PUBLIC_URL)?,
            sign_in_url: read(ARG_SIGN_IN_URL)?,
            default_theme,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PUBLIC_URL)
                .long(ARG_PUBLIC_URL)
                .help("Public base URL of this site, used for metadata and same-origin checks")
                .env("UPTIME_PUBLIC_URL")
                .default_value("http://localhost:3000"),
        )
        .arg(
            Arg::new(ARG_SIGN_IN_URL)
                .long(ARG_SIGN_IN_URL)
                .help("Sign-in entry point linked from the header when signed out")
                .env("UPTIME_SIGN_IN_URL")
                .default_value("/sign-in"),
        )
        .arg(
            Arg::new(ARG_DEFAULT_THEME)
                .long(ARG_DEFAULT_THEME)
                .help("Theme used when the visitor has not picked one")
                .env("UPTIME_DEFAULT_THEME")
                .default_value("system")
                .value_parser(PossibleValuesParser::new(["light", "dark", "system"])),
        )
}
