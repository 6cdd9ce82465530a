//! # loadtarget (HTTP load-test fixture)
//!
//! `loadtarget` is a small HTTP server meant to be hammered by load-testing
//! tools. It exposes a toy user API and an endpoint whose response size is
//! controlled by the caller, and ships with a keep-alive load client that can
//! drive traffic against it.
//!
//! ## Endpoints
//!
//! - `GET /newUser?username=&password=` stores a user. Usernames have
//!   `!@#$%^&*` stripped; passwords are kept ROT47-obfuscated, never hashed.
//! - `GET /auth?username=&password=` checks a password and reports a running
//!   authorization count with a millisecond timestamp.
//! - `GET /multi?multiplier=N` returns a fixed payload template repeated `N`
//!   times.
//! - Anything else answers `404`.
//!
//! ## State
//!
//! The user directory and the authorization counter live in memory for the
//! lifetime of the process, optionally pre-seeded with random users. There is
//! no persistence, no real cryptography, no rate limiting and no lockout.
//!
//! This is a fixture, not infrastructure.

pub mod api;
pub mod cli;
pub mod directory;
pub mod load;

pub const GIT_COMMIT_HASH: &str = env!("LOADTARGET_GIT_SHA");

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_git_commit_hash_format() {
        if GIT_COMMIT_HASH == "unknown" {
            // Acceptable in non-git build environments
            return;
        }
        assert!(
            GIT_COMMIT_HASH.chars().all(|c| c.is_ascii_hexdigit()),
            "GIT_COMMIT_HASH should be a hex string, got: {GIT_COMMIT_HASH}"
        );
        assert!(
            GIT_COMMIT_HASH.len() >= 7,
            "GIT_COMMIT_HASH should be at least 7 characters long, got: {GIT_COMMIT_HASH}"
        );
    }

    #[test]
    fn test_app_user_agent_format() {
        assert!(APP_USER_AGENT.starts_with(env!("CARGO_PKG_NAME")));
        assert!(APP_USER_AGENT.contains(env!("CARGO_PKG_VERSION")));
    }
}
