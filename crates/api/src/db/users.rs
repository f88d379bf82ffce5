//! User and API token repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use catalog_core::UserId;

use super::RepositoryError;
use crate::models::User;

const USER_COLUMNS: &str = "u.id, u.email, u.name, u.is_active, u.is_staff, u.created_at";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    email: String,
    name: String,
    is_active: bool,
    is_staff: bool,
    created_at: DateTime<Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::new(row.id),
            email: row.email,
            name: row.name,
            is_active: row.is_active,
            is_staff: row.is_staff,
            created_at: row.created_at,
        }
    }
}

/// Repository for users and their API tokens.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all users, oldest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<User>, RepositoryError> {
        let rows: Vec<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM catalog.app_user u ORDER BY u.id"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a user by email.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM catalog.app_user u WHERE lower(u.email) = lower($1)"
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Resolve the owner of a token from the digest of its key.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_token_hash(&self, key_hash: &str) -> Result<Option<User>, RepositoryError> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS}
             FROM catalog.api_token t
             JOIN catalog.app_user u ON u.id = t.user_id
             WHERE t.key_hash = $1"
        ))
        .bind(key_hash)
        .fetch_optional(self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the email is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(
        &self,
        email: &str,
        name: &str,
        is_staff: bool,
    ) -> Result<User, RepositoryError> {
        let row: UserRow = sqlx::query_as(
            "INSERT INTO catalog.app_user (email, name, is_staff)
             VALUES ($1, $2, $3)
             RETURNING id, email, name, is_active, is_staff, created_at",
        )
        .bind(email)
        .bind(name)
        .bind(is_staff)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }

    /// Set whether a user is active.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user does not exist.
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: UserId, is_active: bool) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE catalog.app_user SET is_active = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(is_active)
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Store the digest of a user's token key, replacing any previous token.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::InvalidReference` if the user does not exist.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self, key_hash))]
    pub async fn issue_token(&self, user_id: UserId, key_hash: &str) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO catalog.api_token (user_id, key_hash)
             VALUES ($1, $2)
             ON CONFLICT (user_id)
             DO UPDATE SET key_hash = EXCLUDED.key_hash, created_at = NOW()",
        )
        .bind(user_id)
        .bind(key_hash)
        .execute(self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_foreign_key_violation()
            {
                return RepositoryError::InvalidReference { field: "user" };
            }
            RepositoryError::from_write(e)
        })?;

        Ok(())
    }

    /// Delete a user's token.
    ///
    /// Returns whether a token existed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn revoke_token(&self, user_id: UserId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM catalog.api_token WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
