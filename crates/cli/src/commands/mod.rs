//! CLI command implementations.

pub mod migrate;
pub mod seed;
pub mod token;
pub mod user;

use secrecy::SecretString;
use sqlx::PgPool;
use thiserror::Error;

use catalog_api::db::{self, RepositoryError};

/// Connections are short-lived; the CLI never runs queries in parallel.
const CLI_MAX_CONNECTIONS: u32 = 2;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Migration failed.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A repository call failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    /// Invalid email.
    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    /// No user with this email.
    #[error("No user with email: {0}")]
    UnknownUser(String),

    /// User already exists.
    #[error("User already exists with email: {0}")]
    UserExists(String),
}

/// Connect to the catalog database named by `CATALOG_DATABASE_URL`
/// (falling back to `DATABASE_URL`).
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = std::env::var("CATALOG_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
        .map(SecretString::from)
        .map_err(|_| CommandError::MissingEnvVar("CATALOG_DATABASE_URL"))?;

    tracing::info!("Connecting to catalog database...");
    Ok(db::create_pool(&database_url, CLI_MAX_CONNECTIONS).await?)
}

/// Basic shape check; the database enforces uniqueness.
fn check_email(email: &str) -> Result<(), CommandError> {
    if email.contains('@') && email.contains('.') {
        Ok(())
    } else {
        Err(CommandError::InvalidEmail(email.to_owned()))
    }
}
