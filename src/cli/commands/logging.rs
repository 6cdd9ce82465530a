use clap::{Arg, ArgAction, Command, builder::ValueParser};

pub const ARG_VERBOSITY: &str = "verbosity";

/// Level names accepted by `LOADTARGET_LOG_LEVEL`, indexed by verbosity count.
const LEVEL_NAMES: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Parse `LOADTARGET_LOG_LEVEL` as a level name or a verbosity count (`0..=5`).
#[must_use]
pub fn validator_log_level() -> ValueParser {
    ValueParser::from(|level: &str| -> Result<u8, String> {
        if let Ok(count) = level.parse::<u8>()
            && count <= 5
        {
            return Ok(count);
        }

        let level = level.to_ascii_lowercase();
        LEVEL_NAMES
            .iter()
            .position(|name| *name == level)
            .and_then(|index| u8::try_from(index).ok())
            .ok_or_else(|| {
                format!("invalid log level, expected one of {}", LEVEL_NAMES.join(", "))
            })
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command.arg(
        Arg::new(ARG_VERBOSITY)
            .short('v')
            .long("verbose")
            .help("Raise log verbosity: -v warn, -vv info (request spans), -vvv debug, -vvvv trace")
            .long_help(
                "Raise log verbosity: -v warn, -vv info (request spans), -vvv debug, -vvvv trace.\n\
                 Server start and created users are always printed.\n\
                 LOADTARGET_LOG_LEVEL takes a level name or count; RUST_LOG overrides both.",
            )
            .env("LOADTARGET_LOG_LEVEL")
            .global(true)
            .action(ArgAction::Count)
            .value_parser(validator_log_level()),
    )
}
