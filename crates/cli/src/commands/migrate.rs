//! Database migration command.
//!
//! # Usage
//!
//! ```bash
//! catalog migrate
//! ```
//!
//! # Environment Variables
//!
//! - `CATALOG_DATABASE_URL` - `PostgreSQL` connection string
//!
//! Migrations live in `crates/api/migrations/` and create the `catalog`
//! schema: enum types, users and tokens, colors, articles, variants and
//! materials.

use super::{CommandError, connect};

/// Apply all pending migrations.
///
/// # Errors
///
/// Returns `CommandError` if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = connect().await?;

    tracing::info!("Running catalog migrations...");
    catalog_api::MIGRATOR.run(&pool).await?;

    tracing::info!("Catalog migrations complete!");
    Ok(())
}
