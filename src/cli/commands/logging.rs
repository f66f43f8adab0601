//! `-v` / `FOLIO_LOG_LEVEL` handling.

use clap::{builder::ValueParser, Arg, ArgAction, ArgMatches, Command};
use tracing::Level;

pub const ARG_VERBOSITY: &str = "verbosity";

/// Names accepted by `FOLIO_LOG_LEVEL`, indexed by the equivalent `-v` count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

fn parse_level(raw: &str) -> Result<u8, String> {
    let raw = raw.trim();
    let index = match raw.parse::<usize>() {
        Ok(count) => Some(count).filter(|count| *count < LEVEL_NAMES.len()),
        Err(_) => LEVEL_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(raw)),
    };

    index
        .and_then(|i| u8::try_from(i).ok())
        .ok_or_else(|| {
            format!(
                "invalid log level '{raw}', expected 0-4 or one of: {}",
                LEVEL_NAMES.join(", ")
            )
        })
}

#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(parse_level)
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Verbosity level: ERROR, WARN, INFO, DEBUG, TRACE (default: ERROR)")
            .env("FOLIO_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}

/// Tracing level selected on the command line; `None` keeps the default.
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_and_counts() {
        assert_eq!(parse_level("info"), Ok(2));
        assert_eq!(parse_level(" TRACE "), Ok(4));
        assert_eq!(parse_level("3"), Ok(3));
        assert!(parse_level("5").is_err());
        assert!(parse_level("verbose").is_err());
    }

    #[test]
    fn count_maps_to_level() {
        temp_env::with_vars([("FOLIO_LOG_LEVEL", None::<&str>)], || {
            let command = with_args(Command::new("folio"));
            let matches = command.clone().get_matches_from(["folio"]);
            assert_eq!(level(&matches), None);

            let matches = command.clone().get_matches_from(["folio", "-vv"]);
            assert_eq!(level(&matches), Some(Level::INFO));

            let matches = command.get_matches_from(["folio", "-vvvvvv"]);
            assert_eq!(level(&matches), Some(Level::TRACE));
        });
    }
}
