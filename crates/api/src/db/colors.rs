//! Color repository.

use sqlx::PgPool;
use tracing::instrument;

use catalog_core::{ColorId, UserId};

use super::RepositoryError;
use crate::models::{Color, NewColor};

#[derive(Debug, sqlx::FromRow)]
struct ColorRow {
    id: i32,
    name: String,
    code: String,
}

impl From<ColorRow> for Color {
    fn from(row: ColorRow) -> Self {
        Self {
            id: ColorId::new(row.id),
            name: row.name,
            code: row.code,
        }
    }
}

/// Repository for colors.
pub struct ColorRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ColorRepository<'a> {
    /// Create a new color repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all colors by name, descending.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Color>, RepositoryError> {
        let rows: Vec<ColorRow> =
            sqlx::query_as("SELECT id, name, code FROM catalog.color ORDER BY name DESC")
                .fetch_all(self.pool)
                .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Get a color by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ColorId) -> Result<Option<Color>, RepositoryError> {
        let row: Option<ColorRow> =
            sqlx::query_as("SELECT id, name, code FROM catalog.color WHERE id = $1")
                .bind(id)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Get a color by its exact code.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_code(&self, code: &str) -> Result<Option<Color>, RepositoryError> {
        let row: Option<ColorRow> =
            sqlx::query_as("SELECT id, name, code FROM catalog.color WHERE code = $1")
                .bind(code)
                .fetch_optional(self.pool)
                .await?;

        Ok(row.map(Into::into))
    }

    /// Create a color owned by `user_id`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Duplicate` if the name or code is taken.
    /// Returns `RepositoryError::Database` for other database errors.
    #[instrument(skip(self))]
    pub async fn create(&self, color: &NewColor, user_id: UserId) -> Result<Color, RepositoryError> {
        let row: ColorRow = sqlx::query_as(
            "INSERT INTO catalog.color (name, code, user_id)
             VALUES ($1, $2, $3)
             RETURNING id, name, code",
        )
        .bind(&color.name)
        .bind(&color.code)
        .bind(user_id)
        .fetch_one(self.pool)
        .await
        .map_err(RepositoryError::from_write)?;

        Ok(row.into())
    }
}
