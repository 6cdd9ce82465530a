//! In-memory user directory.
//!
//! Maps sanitized usernames to obfuscated passwords. The directory lives for
//! the lifetime of the process and is shared by every request, so all access
//! goes through an `RwLock`. Records are never removed or overwritten once
//! created through [`UserDirectory::insert_new`].

mod obfuscate;
mod sanitize;

pub use self::obfuscate::{ObfuscateError, obfuscate, rot47};
pub use self::sanitize::{STRIPPED_CHARS, sanitize};

use rand::Rng;
use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard},
};
use tracing::debug;

const SEED_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";
const SEED_MIN_LEN: usize = 6;
const SEED_MAX_LEN: usize = 12;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectoryError {
    #[error("user `{0}` already exists")]
    AlreadyExists(String),
}

#[derive(Debug, Default)]
pub struct UserDirectory {
    users: RwLock<HashMap<String, String>>,
}

impl UserDirectory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a directory pre-filled with `count` random noise records.
    ///
    /// Names and stored values are random ASCII letters of length 6 to 11.
    /// Colliding names overwrite each other, so the result holds at most
    /// `count` records.
    #[must_use]
    pub fn seeded(count: usize) -> Self {
        let mut rng = rand::thread_rng();
        let mut users = HashMap::with_capacity(count);
        for _ in 0..count {
            let username = random_letters(&mut rng);
            let password = random_letters(&mut rng);
            users.insert(username, password);
        }

        debug!(requested = count, seeded = users.len(), "Seeded user directory");

        Self {
            users: RwLock::new(users),
        }
    }

    /// Store `obfuscated` under `username` unless a record already exists.
    ///
    /// The existence check and the insert happen under one write guard.
    ///
    /// # Errors
    /// Returns [`DirectoryError::AlreadyExists`] if `username` is taken.
    pub fn insert_new(&self, username: &str, obfuscated: String) -> Result<(), DirectoryError> {
        let mut users = self.write();
        if users.contains_key(username) {
            return Err(DirectoryError::AlreadyExists(username.to_string()));
        }
        users.insert(username.to_string(), obfuscated);
        Ok(())
    }

    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.read().contains_key(username)
    }

    /// Stored (obfuscated) password for `username`.
    #[must_use]
    pub fn get(&self, username: &str) -> Option<String> {
        self.read().get(username).cloned()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the guard cannot leave a half-written String in
    // the map, so poisoned guards are recovered instead of failing requests.
    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, String>> {
        self.users.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, String>> {
        self.users.write().unwrap_or_else(PoisonError::into_inner)
    }
}

fn random_letters<R: Rng>(rng: &mut R) -> String {
    let len = rng.gen_range(SEED_MIN_LEN..SEED_MAX_LEN);
    (0..len)
        .map(|_| char::from(SEED_ALPHABET[rng.gen_range(0..SEED_ALPHABET.len())]))
        .collect()
}
