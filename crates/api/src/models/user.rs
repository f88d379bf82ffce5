//! API user and token domain types.

use chrono::{DateTime, Utc};
use rand::RngCore;
use secrecy::{ExposeSecret, SecretString};
use sha2::{Digest, Sha256};

use catalog_core::UserId;

/// Number of random bytes in a token key (hex-encoded to 40 characters).
const TOKEN_KEY_BYTES: usize = 20;

/// An account that authenticates with an API token.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Login email, unique.
    pub email: String,
    /// Display name.
    pub name: String,
    /// Inactive users are refused even with a valid token.
    pub is_active: bool,
    /// Staff users may create variants and delete catalog rows.
    pub is_staff: bool,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
}

/// A freshly generated API token key.
///
/// The plain key is shown once, when it is issued. Only [`hash_token_key`]
/// of it is stored.
pub struct TokenKey(SecretString);

impl TokenKey {
    /// Generate a random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0u8; TOKEN_KEY_BYTES];
        rand::rng().fill_bytes(&mut bytes);
        Self(SecretString::from(hex::encode(bytes)))
    }

    /// The plain key, for display to the token's owner.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Digest to store and look up.
    #[must_use]
    pub fn hash(&self) -> String {
        hash_token_key(self.expose())
    }
}

/// SHA-256 hex digest of a token key.
#[must_use]
pub fn hash_token_key(key: &str) -> String {
    hex::encode(Sha256::digest(key.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_keys_are_hex_and_distinct() {
        let first = TokenKey::generate();
        let second = TokenKey::generate();
        assert_eq!(first.expose().len(), TOKEN_KEY_BYTES * 2);
        assert!(first.expose().chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(first.expose(), second.expose());
    }

    #[test]
    fn test_hash_is_stable_sha256_hex() {
        assert_eq!(
            hash_token_key("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        let key = TokenKey::generate();
        assert_eq!(key.hash(), hash_token_key(key.expose()));
    }
}
