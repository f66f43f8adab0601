use crate::cli::{
    actions::Action,
    commands::{self, logging},
    dispatch,
    globals::GlobalArgs,
    telemetry,
};
use anyhow::Result;

/// Parses the command line, sets up logging and returns the action to run.
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<(Action, GlobalArgs)> {
    let matches = commands::new().get_matches();

    telemetry::init(logging::level(&matches))?;

    dispatch::handler(&matches)
}
