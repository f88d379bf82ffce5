//! Core types for the catalog.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod choices;
pub mod id;

pub use category::Category;
pub use choices::{Brand, ChoiceError, MaterialCategory, Style, Uom};
pub use id::*;
