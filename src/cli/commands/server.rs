use crate::api::MULTIPLIER_LIMIT;
use clap::{Arg, Command};
use std::net::IpAddr;

pub const ARG_PORT: &str = "port";
pub const ARG_LISTEN: &str = "listen";
pub const ARG_SEED_USERS: &str = "seed-users";
pub const ARG_MAX_MULTIPLIER: &str = "max-multiplier";

pub const DEFAULT_PORT: u16 = 8000;
pub const DEFAULT_SEED_USERS: usize = 5000;

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PORT)
                .help("Port to listen on")
                .default_value("8000")
                .env("LOADTARGET_PORT")
                .value_parser(clap::value_parser!(u16)),
        )
        .arg(
            Arg::new(ARG_LISTEN)
                .short('l')
                .long("listen")
                .help("Address to bind, all interfaces by default")
                .default_value("0.0.0.0")
                .env("LOADTARGET_LISTEN")
                .value_parser(clap::value_parser!(IpAddr)),
        )
        .arg(
            Arg::new(ARG_SEED_USERS)
                .long("seed-users")
                .help("Random users created at startup, 0 disables seeding")
                .default_value("5000")
                .env("LOADTARGET_SEED_USERS")
                .value_parser(clap::value_parser!(usize)),
        )
        .arg(
            Arg::new(ARG_MAX_MULTIPLIER)
                .long("max-multiplier")
                .help("Largest multiplier accepted by /multi, at most 100000")
                .default_value("10000")
                .env("LOADTARGET_MAX_MULTIPLIER")
                .value_parser(clap::value_parser!(u64).range(..=MULTIPLIER_LIMIT)),
        )
}
