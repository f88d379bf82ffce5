//! API user management commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff user
//! catalog user create -e owner@example.com -n "Owner" --staff
//!
//! # List users
//! catalog user list
//!
//! # Block a user without deleting their catalog rows
//! catalog user deactivate -e clerk@example.com
//! ```

use catalog_api::db::UserRepository;
use catalog_api::models::User;
use sqlx::PgPool;

use super::{CommandError, check_email, connect};

/// Create a new API user.
///
/// # Errors
///
/// Returns `CommandError::UserExists` if the email is taken.
pub async fn create(email: &str, name: &str, is_staff: bool) -> Result<User, CommandError> {
    check_email(email)?;
    let pool = connect().await?;
    let users = UserRepository::new(&pool);

    if users.get_by_email(email).await?.is_some() {
        return Err(CommandError::UserExists(email.to_owned()));
    }

    let user = users.create(email, name, is_staff).await?;
    tracing::info!(
        "User created successfully! ID: {}, Email: {}, Staff: {}",
        user.id,
        user.email,
        user.is_staff
    );
    tracing::info!("Issue a token with: catalog token issue -e {}", user.email);

    Ok(user)
}

/// Log every user.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable.
pub async fn list() -> Result<(), CommandError> {
    let pool = connect().await?;
    let users = UserRepository::new(&pool).list().await?;

    tracing::info!("{} user(s)", users.len());
    for user in users {
        tracing::info!(
            "  {} {} <{}> active={} staff={}",
            user.id,
            user.name,
            user.email,
            user.is_active,
            user.is_staff
        );
    }

    Ok(())
}

/// Allow or block a user's token.
///
/// # Errors
///
/// Returns `CommandError::UnknownUser` if no user has this email.
pub async fn set_active(email: &str, is_active: bool) -> Result<(), CommandError> {
    let pool = connect().await?;
    let user = find(&pool, email).await?;

    UserRepository::new(&pool)
        .set_active(user.id, is_active)
        .await?;
    tracing::info!(user_id = %user.id, is_active, "Updated user {}", user.email);

    Ok(())
}

/// Look up a user by email.
pub(super) async fn find(pool: &PgPool, email: &str) -> Result<User, CommandError> {
    UserRepository::new(pool)
        .get_by_email(email)
        .await?
        .ok_or_else(|| CommandError::UnknownUser(email.to_owned()))
}
