use crate::load::{self, LoadConfig};
use anyhow::Result;
use url::Url;

#[derive(Debug)]
pub struct Args {
    pub url: Url,
    pub requests: u64,
    pub concurrency: usize,
}

/// Execute the load action and print the report to stdout.
/// # Errors
/// Returns an error if the configuration is invalid or the client cannot be built.
pub async fn execute(args: Args) -> Result<()> {
    let config = LoadConfig::new(args.url, args.requests, args.concurrency)?;

    let report = load::run(&config).await?;

    println!("{report}");

    Ok(())
}
