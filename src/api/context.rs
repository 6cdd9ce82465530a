//! Shared server state handed to every handler through an `Extension`.

use crate::directory::UserDirectory;
use std::{
    sync::atomic::{AtomicU64, Ordering},
    time::{SystemTime, UNIX_EPOCH},
};

pub const DEFAULT_MAX_MULTIPLIER: u64 = 10_000;

/// Largest `--max-multiplier` accepted on the command line.
pub const MULTIPLIER_LIMIT: u64 = 100_000;

#[derive(Debug)]
pub struct ServerContext {
    directory: UserDirectory,
    authorizations: AtomicU64,
    last_authorized_ms: AtomicU64,
    max_multiplier: u64,
}

/// Snapshot returned for every successful authentication.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Authorization {
    pub count: u64,
    pub timestamp_ms: u64,
}

impl ServerContext {
    #[must_use]
    pub fn new(directory: UserDirectory) -> Self {
        Self {
            directory,
            authorizations: AtomicU64::new(0),
            last_authorized_ms: AtomicU64::new(0),
            max_multiplier: DEFAULT_MAX_MULTIPLIER,
        }
    }

    #[must_use]
    pub fn with_max_multiplier(mut self, max_multiplier: u64) -> Self {
        self.max_multiplier = max_multiplier;
        self
    }

    #[must_use]
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    #[must_use]
    pub fn max_multiplier(&self) -> u64 {
        self.max_multiplier
    }

    #[must_use]
    pub fn authorizations(&self) -> u64 {
        self.authorizations.load(Ordering::SeqCst)
    }

    /// Bump the process-wide authorization counter.
    ///
    /// Counts are strictly increasing. Timestamps never go backwards even if
    /// the wall clock does.
    pub fn record_authorization(&self) -> Authorization {
        let count = self.authorizations.fetch_add(1, Ordering::SeqCst) + 1;
        let now = now_unix_millis();
        let timestamp_ms = self
            .last_authorized_ms
            .fetch_max(now, Ordering::SeqCst)
            .max(now);

        Authorization {
            count,
            timestamp_ms,
        }
    }
}

fn now_unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
