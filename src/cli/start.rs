use crate::cli::{actions::Action, commands, dispatch, telemetry};
use anyhow::Result;
use clap::ArgMatches;
use tracing::Level;

/// `-v` count (or `LOADTARGET_LOG_LEVEL`) to a tracing level; `None` keeps errors only.
const fn verbosity_level(verbosity: u8) -> Option<Level> {
    match verbosity {
        0 => None,
        1 => Some(Level::WARN),
        2 => Some(Level::INFO),
        3 => Some(Level::DEBUG),
        _ => Some(Level::TRACE),
    }
}

// `-v` is global, so it may sit before or after the `load` subcommand.
fn verbosity(matches: &ArgMatches) -> u8 {
    let top = matches
        .get_one::<u8>(commands::logging::ARG_VERBOSITY)
        .copied()
        .unwrap_or(0);
    let sub = matches
        .subcommand()
        .and_then(|(_, sub)| sub.get_one::<u8>(commands::logging::ARG_VERBOSITY).copied())
        .unwrap_or(0);
    top.max(sub)
}

/// Parse arguments, install telemetry and resolve the [`Action`] to run.
///
/// # Errors
///
/// Returns an error if telemetry initialization or action dispatch fails
pub fn start() -> Result<Action> {
    let matches = commands::new().get_matches();

    telemetry::init(verbosity_level(verbosity(&matches)))?;

    dispatch::handler(&matches)
}
