use clap::{Arg, ArgMatches, Command, builder::ValueParser};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted in `UPTIME_LOG_LEVEL`, indexed by `-v` count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Accepts a level name or a raw `-v` count. Counts past `trace` clamp to it.
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(move |level: &str| -> std::result::Result<u8, String> {
        let level = level.trim().to_ascii_lowercase();
        if let Ok(count) = level.parse::<u8>() {
            return Ok(count);
        }

        LEVEL_NAMES
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| format!("expected one of {}", LEVEL_NAMES.join(", ")))
    })
}

/// Level handed to the subscriber. `None` keeps the error-only default so
/// backend outages still show up while request spans stay quiet.
#[must_use]
pub fn level(matches: &ArgMatches) -> Option<Level> {
    match matches.get_one::<u8>(ARG_VERBOSITY).copied().unwrap_or(0) {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help(
                "Verbosity: -v WARN (anonymous fallbacks), -vv INFO (sign-outs), \
                 -vvv DEBUG (requests), -vvvv TRACE",
            )
            .env("UPTIME_LOG_LEVEL")
            .global(true)
            .action(clap::ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> ArgMatches {
        with_args(Command::new("uptime-web")).get_matches_from(args)
    }

    #[test]
    fn flag_count_selects_level() {
        temp_env::with_vars([("UPTIME_LOG_LEVEL", None::<&str>)], || {
            assert_eq!(level(&parse(&["uptime-web"])), None);
            assert_eq!(level(&parse(&["uptime-web", "-v"])), Some(Level::WARN));
            assert_eq!(level(&parse(&["uptime-web", "-vvv"])), Some(Level::DEBUG));
            assert_eq!(
                level(&parse(&["uptime-web", "-vvvvvv"])),
                Some(Level::TRACE)
            );
        });
    }

    #[test]
    fn env_accepts_level_names() {
        for (name, expected) in [
            ("error", None),
            ("WARN", Some(Level::WARN)),
            ("info", Some(Level::INFO)),
            ("debug", Some(Level::DEBUG)),
            ("trace", Some(Level::TRACE)),
        ] {
            temp_env::with_vars([("UPTIME_LOG_LEVEL", Some(name))], || {
                assert_eq!(level(&parse(&["uptime-web"])), expected, "{name}");
            });
        }
    }

    #[test]
    fn validator_rejects_unknown_levels() {
        let command = Command::new("uptime-web").arg(
            Arg::new(ARG_VERBOSITY)
                .long("level")
                .value_parser(validator_log_level()),
        );
        assert!(
            command
                .clone()
                .try_get_matches_from(["uptime-web", "--level", "loud"])
                .is_err()
        );
        let matches = command
            .try_get_matches_from(["uptime-web", "--level", "debug"])
            .map(|m| m.get_one::<u8>(ARG_VERBOSITY).copied());
        assert!(matches!(matches, Ok(Some(3))));
    }
}
