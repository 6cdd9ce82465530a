use crate::api::DEFAULT_MAX_MULTIPLIER;
use crate::cli::actions::{Action, load, server};
use crate::cli::commands::{load as load_cmd, server as server_cmd};
use crate::load::{DEFAULT_CONCURRENCY, DEFAULT_REQUESTS};
use anyhow::{Context, Result};
use std::net::IpAddr;
use url::Url;

/// # Errors
/// Returns an error if required arguments are missing.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    if let Some(sub) = matches.subcommand_matches(load_cmd::SUBCOMMAND_LOAD) {
        let url = sub
            .get_one::<Url>(load_cmd::ARG_URL)
            .cloned()
            .context("missing required argument: --url")?;

        return Ok(Action::Load(load::Args {
            url,
            requests: sub
                .get_one::<u64>(load_cmd::ARG_REQUESTS)
                .copied()
                .unwrap_or(DEFAULT_REQUESTS),
            concurrency: sub
                .get_one::<usize>(load_cmd::ARG_CONCURRENCY)
                .copied()
                .unwrap_or(DEFAULT_CONCURRENCY),
        }));
    }

    let listen = matches
        .get_one::<IpAddr>(server_cmd::ARG_LISTEN)
        .copied()
        .context("missing required argument: --listen")?;

    Ok(Action::Server(server::Args {
        listen,
        port: matches
            .get_one::<u16>(server_cmd::ARG_PORT)
            .copied()
            .unwrap_or(server_cmd::DEFAULT_PORT),
        seed_users: matches
            .get_one::<usize>(server_cmd::ARG_SEED_USERS)
            .copied()
            .unwrap_or(server_cmd::DEFAULT_SEED_USERS),
        max_multiplier: matches
            .get_one::<u64>(server_cmd::ARG_MAX_MULTIPLIER)
            .copied()
            .unwrap_or(DEFAULT_MAX_MULTIPLIER),
    }))
}
