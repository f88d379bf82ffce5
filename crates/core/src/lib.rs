//! Catalog Core - Shared types library.
//!
//! This crate provides the types and pure business rules used across the
//! catalog components:
//! - `api` - The catalog REST service
//! - `cli` - Command-line tools for migrations, users and seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. The `postgres` feature adds `sqlx` encode/decode impls for
//! the id and choice types.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, article categories and the fixed choice lists
//! - [`ident`] - Derivation of `artid` and `mcategory`
//! - [`filter`] - Query-string parsing for list and boolean filters

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod filter;
pub mod ident;
pub mod types;

pub use filter::{ColorFilter, FilterError};
pub use ident::{derive_artid, derive_mcategory};
pub use types::*;
