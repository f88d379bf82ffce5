//! API token commands.
//!
//! # Usage
//!
//! ```bash
//! # Create or rotate the token for a user; prints the key once
//! catalog token issue -e owner@example.com
//!
//! # Remove a user's token
//! catalog token revoke -e owner@example.com
//! ```
//!
//! Only the SHA-256 digest of a key is stored, so a lost key cannot be
//! recovered. Issue a new one instead.

use catalog_api::db::UserRepository;
use catalog_api::models::TokenKey;

use super::user::find;
use super::{CommandError, connect};

/// Issue a token for a user, replacing any previous one.
///
/// The key is written to stdout so it can be captured by scripts.
///
/// # Errors
///
/// Returns `CommandError::UnknownUser` if no user has this email.
pub async fn issue(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let user = find(&pool, email).await?;

    let key = TokenKey::generate();
    UserRepository::new(&pool)
        .issue_token(user.id, &key.hash())
        .await?;

    if !user.is_active {
        tracing::warn!("User {} is inactive; the token will be rejected", user.email);
    }
    tracing::info!(user_id = %user.id, "Token issued for {}", user.email);

    #[allow(clippy::print_stdout)]
    {
        println!("{}", key.expose());
    }

    Ok(())
}

/// Revoke a user's token.
///
/// # Errors
///
/// Returns `CommandError::UnknownUser` if no user has this email.
pub async fn revoke(email: &str) -> Result<(), CommandError> {
    let pool = connect().await?;
    let user = find(&pool, email).await?;

    if UserRepository::new(&pool).revoke_token(user.id).await? {
        tracing::info!(user_id = %user.id, "Token revoked for {}", user.email);
    } else {
        tracing::warn!("User {} had no token", user.email);
    }

    Ok(())
}
