//! Database operations for the catalog `PostgreSQL` schema.
//!
//! # Schema: `catalog`
//!
//! ## Tables
//!
//! - `app_user` - Accounts that own API tokens
//! - `api_token` - SHA-256 digests of API token keys, one per user
//! - `color` - Named colors with a two-letter code
//! - `article` - Base article numbers with brand and style
//! - `article_info` - Per-color, per-category article variants
//! - `material` - Bill-of-materials catalog entries
//!
//! # Migrations
//!
//! Migrations are stored in `crates/api/migrations/` and run via:
//! ```bash
//! cargo run -p catalog-cli -- migrate
//! ```

pub mod article_infos;
pub mod articles;
pub mod colors;
pub mod materials;
pub mod users;

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use article_infos::ArticleInfoRepository;
pub use articles::ArticleRepository;
pub use colors::ColorRepository;
pub use materials::MaterialRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// A write referenced a row that does not exist.
    #[error("invalid reference: {field}")]
    InvalidReference {
        /// Payload field holding the dangling id.
        field: &'static str,
    },

    /// A unique constraint rejected the write.
    #[error("duplicate value for {}", fields.join(", "))]
    Duplicate {
        /// Payload fields covered by the violated constraint.
        fields: &'static [&'static str],
    },

    /// Constraint violation not tied to payload fields.
    #[error("constraint violation: {0}")]
    Conflict(String),
}

impl RepositoryError {
    /// Map a write error, turning unique violations into `Duplicate`.
    ///
    /// The constraint name decides which payload fields are reported.
    pub(crate) fn from_write(e: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return match db_err.constraint().and_then(unique_constraint_fields) {
                Some(fields) => Self::Duplicate { fields },
                None => Self::Conflict(db_err.message().to_owned()),
            };
        }
        Self::Database(e)
    }
}

/// Payload fields guarded by each unique constraint in the catalog schema.
#[must_use]
pub fn unique_constraint_fields(constraint: &str) -> Option<&'static [&'static str]> {
    let fields: &'static [&'static str] = match constraint {
        "app_user_email_key" => &["email"],
        "color_name_key" => &["name"],
        "color_code_key" => &["code"],
        "article_artno_key" => &["artno"],
        "article_info_article_color_category_key" => &["article", "color", "category"],
        "article_info_artid_key" => &["artid"],
        "material_code_key" => &["code"],
        _ => return None,
    };
    Some(fields)
}

/// Create a `PostgreSQL` connection pool.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
/// * `max_connections` - Upper bound on pooled connections
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(
    database_url: &SecretString,
    max_connections: u32,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
