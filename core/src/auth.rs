//! Users, bearer sessions, and password primitives.
//!
//! Passwords are stored as `base64(salt)$base64(sha256(salt || password))`
//! and compared in constant time. Session tokens are 32 random bytes,
//! URL-safe base64.

use crate::error::{Result, StationError};
use crate::ids::UserId;
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A registered account.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Identifier.
    pub id: UserId,
    /// Unique login name.
    pub username: String,
    /// Salted password digest; never exposed through the API.
    pub password_hash: String,
    /// Staff accounts see all orders/tickets and may mutate the catalog.
    pub is_staff: bool,
}

/// The authenticated requester, as seen by services.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Identity {
    /// Account id.
    pub user_id: UserId,
    /// Login name, used for display labels.
    pub username: String,
    /// Elevated role flag.
    pub is_staff: bool,
}

impl From<&User> for Identity {
    fn from(user: &User) -> Self {
        Self {
            user_id: user.id,
            username: user.username.clone(),
            is_staff: user.is_staff,
        }
    }
}

/// A bearer-token session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token presented in the `Authorization` header.
    pub token: String,
    /// Account the token belongs to.
    pub user_id: UserId,
    /// Creation instant.
    pub created_at: DateTime<Utc>,
}

/// Storage access for user accounts.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Creates an account.
    ///
    /// Fails with [`StationError::Validation`] when the username is taken.
    async fn create(&self, username: &str, password_hash: &str, is_staff: bool) -> Result<User>;
    /// Fetches an account by id.
    async fn get(&self, id: UserId) -> Result<User>;
    /// Looks an account up by login name.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Storage access for bearer sessions.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Persists a session.
    async fn insert(&self, session: &Session) -> Result<()>;
    /// Resolves a token to its session, if the token is valid.
    async fn find(&self, token: &str) -> Result<Option<Session>>;
}

/// Hashes a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut salt);
    let digest = salted_digest(&salt, password);
    format!(
        "{}${}",
        URL_SAFE_NO_PAD.encode(salt),
        URL_SAFE_NO_PAD.encode(digest)
    )
}

/// Verifies `password` against a stored hash in constant time.
///
/// Malformed stored hashes verify as `false`, never as an error.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let Some((salt_b64, digest_b64)) = stored.split_once('$') else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (
        URL_SAFE_NO_PAD.decode(salt_b64),
        URL_SAFE_NO_PAD.decode(digest_b64),
    ) else {
        return false;
    };
    let actual = salted_digest(&salt, password);
    constant_time_eq(&actual, &expected)
}

/// Generates a fresh opaque bearer token.
#[must_use]
pub fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Checks registration input shape.
///
/// # Errors
///
/// Returns [`StationError::Validation`] for an empty username or a
/// password shorter than 5 characters.
pub fn validate_credentials(username: &str, password: &str) -> Result<()> {
    if username.trim().is_empty() {
        return Err(StationError::validation("username must not be empty"));
    }
    if password.len() < 5 {
        return Err(StationError::validation(
            "password must be at least 5 characters",
        ));
    }
    Ok(())
}

fn salted_digest(salt: &[u8], password: &str) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    hasher.finalize().to_vec()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_and_verify_round_trip() {
        let hash = hash_password("correct horse");
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
    }

    #[test]
    fn hashes_are_salted() {
        assert_ne!(hash_password("same"), hash_password("same"));
    }

    #[test]
    fn malformed_stored_hash_fails_closed() {
        assert!(!verify_password("anything", "no-separator"));
        assert!(!verify_password("anything", "!!$!!"));
    }

    #[test]
    fn tokens_are_unique() {
        assert_ne!(generate_token(), generate_token());
    }

    #[test]
    fn credentials_validation() {
        assert!(validate_credentials("alice", "secret1").is_ok());
        assert!(validate_credentials("", "secret1").is_err());
        assert!(validate_credentials("alice", "abc").is_err());
    }
}
