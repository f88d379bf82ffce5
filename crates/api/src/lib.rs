//! Catalog API library.
//!
//! The REST service for the product catalog: colors, articles, per-color and
//! per-category article variants, and the bill-of-materials list. Exposed as
//! a library so the CLI and integration tests can reuse the repositories and
//! the router.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod state;

/// Migrations for the `catalog` schema.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
