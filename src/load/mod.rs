//! Keep-alive load client.
//!
//! Fires a fixed number of `GET` requests at one URL from a pool of
//! concurrent workers sharing a single `reqwest::Client`, so connections are
//! reused between requests the same way a load-testing tool would.

use anyhow::{Context, Result, bail};
use reqwest::{Client, StatusCode};
use std::{
    fmt,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};
use url::Url;

pub const DEFAULT_REQUESTS: u64 = 1000;
pub const DEFAULT_CONCURRENCY: usize = 8;

#[derive(Debug, Clone)]
pub struct LoadConfig {
    url: Url,
    requests: u64,
    concurrency: usize,
}

impl LoadConfig {
    /// # Errors
    /// Returns an error if the URL is not `http` or `https`.
    pub fn new(url: Url, requests: u64, concurrency: usize) -> Result<Self> {
        if !matches!(url.scheme(), "http" | "https") {
            bail!("Unsupported URL scheme: {}", url.scheme());
        }

        // Never spawn more workers than there are requests to send.
        let max_workers = usize::try_from(requests).unwrap_or(usize::MAX);
        let concurrency = concurrency.min(max_workers).max(1);

        Ok(Self {
            url,
            requests,
            concurrency,
        })
    }

    #[must_use]
    pub fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn requests(&self) -> u64 {
        self.requests
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct LoadReport {
    pub success: u64,
    pub client_errors: u64,
    pub server_errors: u64,
    pub other_status: u64,
    pub transport_errors: u64,
    pub bytes: u64,
    pub elapsed: Duration,
}

impl LoadReport {
    #[must_use]
    pub fn total(&self) -> u64 {
        self.success
            + self.client_errors
            + self.server_errors
            + self.other_status
            + self.transport_errors
    }

    #[must_use]
    pub fn requests_per_second(&self) -> f64 {
        let seconds = self.elapsed.as_secs_f64();
        if seconds > 0.0 {
            #[allow(clippy::cast_precision_loss)]
            let total = self.total() as f64;
            total / seconds
        } else {
            0.0
        }
    }

    fn record_status(&mut self, status: StatusCode, bytes: usize) {
        if status.is_success() {
            self.success += 1;
        } else if status.is_client_error() {
            self.client_errors += 1;
        } else if status.is_server_error() {
            self.server_errors += 1;
        } else {
            self.other_status += 1;
        }
        self.bytes += u64::try_from(bytes).unwrap_or(u64::MAX);
    }

    fn merge(&mut self, other: &Self) {
        self.success += other.success;
        self.client_errors += other.client_errors;
        self.server_errors += other.server_errors;
        self.other_status += other.other_status;
        self.transport_errors += other.transport_errors;
        self.bytes += other.bytes;
    }
}

impl fmt::Display for LoadReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "requests:         {}", self.total())?;
        writeln!(f, "2xx:              {}", self.success)?;
        writeln!(f, "4xx:              {}", self.client_errors)?;
        writeln!(f, "5xx:              {}", self.server_errors)?;
        writeln!(f, "other status:     {}", self.other_status)?;
        writeln!(f, "transport errors: {}", self.transport_errors)?;
        writeln!(f, "bytes received:   {}", self.bytes)?;
        writeln!(f, "elapsed:          {:.3}s", self.elapsed.as_secs_f64())?;
        write!(f, "requests/sec:     {:.1}", self.requests_per_second())
    }
}

/// Run the configured load and return the tallied report.
///
/// # Errors
/// Returns an error if the HTTP client cannot be built or a worker panics.
/// Failed requests are counted, not returned.
#[instrument(skip(config), fields(url = %config.url, requests = config.requests, concurrency = config.concurrency))]
pub async fn run(config: &LoadConfig) -> Result<LoadReport> {
    let client = Client::builder()
        .user_agent(crate::APP_USER_AGENT)
        .pool_max_idle_per_host(config.concurrency)
        .tcp_nodelay(true)
        .build()
        .context("Failed to build HTTP client")?;

    let issued = Arc::new(AtomicU64::new(0));
    let started = Instant::now();

    let mut workers = JoinSet::new();
    for worker in 0..config.concurrency {
        let client = client.clone();
        let url = config.url.clone();
        let issued = Arc::clone(&issued);
        let requests = config.requests;
        workers.spawn(async move { run_worker(worker, &client, url, &issued, requests).await });
    }

    let mut report = LoadReport::default();
    while let Some(joined) = workers.join_next().await {
        let tally = joined.context("Load worker failed")?;
        report.merge(&tally);
    }
    report.elapsed = started.elapsed();

    info!(
        total = report.total(),
        success = report.success,
        client_errors = report.client_errors,
        server_errors = report.server_errors,
        transport_errors = report.transport_errors,
        rps = report.requests_per_second(),
        "Load run finished"
    );

    Ok(report)
}

async fn run_worker(
    worker: usize,
    client: &Client,
    url: Url,
    issued: &AtomicU64,
    requests: u64,
) -> LoadReport {
    let mut tally = LoadReport::default();
    while issued.fetch_add(1, Ordering::Relaxed) < requests {
        match fetch(client, url.clone()).await {
            Ok((status, bytes)) => tally.record_status(status, bytes),
            Err(err) => {
                if tally.transport_errors == 0 {
                    warn!(worker, "Request failed: {err}");
                }
                tally.transport_errors += 1;
            }
        }
    }
    debug!(worker, sent = tally.total(), "Load worker done");
    tally
}

// The body is drained so the connection goes back to the pool.
async fn fetch(client: &Client, url: Url) -> reqwest::Result<(StatusCode, usize)> {
    let response = client.get(url).send().await?;
    let status = response.status();
    let body = response.bytes().await?;
    Ok((status, body.len()))
}
