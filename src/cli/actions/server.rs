use crate::{
    api::{self, ServerContext},
    cli::telemetry,
    directory::UserDirectory,
};
use anyhow::Result;
use std::{net::IpAddr, sync::Arc};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub listen: IpAddr,
    pub port: u16,
    pub seed_users: usize,
    pub max_multiplier: u64,
}

/// Execute the server action.
/// # Errors
/// Returns an error if the listener cannot be bound or the server fails.
pub async fn execute(args: Args) -> Result<()> {
    log_startup_args(&args);

    let directory = if args.seed_users == 0 {
        UserDirectory::new()
    } else {
        UserDirectory::seeded(args.seed_users)
    };
    info!("user directory ready with {} entries", directory.len());

    let ctx = Arc::new(ServerContext::new(directory).with_max_multiplier(args.max_multiplier));

    let result = api::new(args.listen, args.port, ctx).await;

    telemetry::shutdown_tracer();

    result
}

fn startup_entries(args: &Args) -> [(&'static str, String); 4] {
    [
        ("listen", args.listen.to_string()),
        ("port", args.port.to_string()),
        ("seed_users", args.seed_users.to_string()),
        ("max_multiplier", args.max_multiplier.to_string()),
    ]
}

fn log_startup_args(args: &Args) {
    info!("{}", render_entries("Startup configuration", &startup_entries(args)));
}

fn render_entries(title: &str, entries: &[(&str, String)]) -> String {
    let max_key_len = entries.iter().map(|(key, _)| key.len()).max().unwrap_or(0);
    let mut message = format!("{}\n\n{title}:", banner());
    for (key, value) in entries {
        let padding = " ".repeat(max_key_len.saturating_sub(key.len()));
        let _ =
            std::fmt::Write::write_fmt(&mut message, format_args!("\n  {key}:{padding} {value}"));
    }
    message
}

fn banner() -> String {
    BANNER.replace(
        "{VERSION}",
        &format!(
            "{} - {}",
            env!("CARGO_PKG_VERSION"),
            short_commit(crate::GIT_COMMIT_HASH)
        ),
    )
}

fn short_commit(hash: &str) -> &str {
    let trimmed = hash.trim();
    trimmed.get(..7).unwrap_or(trimmed)
}

const BANNER: &str = r"
  >>>  >>>  >>>
  L O A D T A R G E T  {VERSION}
  <<<  <<<  <<<";
