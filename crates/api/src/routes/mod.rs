//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (database ping)
//!
//! # Colors (token)
//! GET    /api/article/colors           - List colors
//! POST   /api/article/colors           - Create color
//! GET    /api/article/colors/{id}      - Retrieve color
//!
//! # Articles (token; delete requires staff)
//! GET    /api/article/list             - List articles
//! POST   /api/article/list             - Create article
//! GET    /api/article/list/{id}        - Retrieve article with variants
//! PUT    /api/article/list/{id}        - Update article (renames variant ids)
//! DELETE /api/article/list/{id}        - Delete article and variants
//!
//! # Article variants (token; writes require staff)
//! GET    /api/article/articles         - List variants
//! POST   /api/article/articles         - Create variant
//! GET    /api/article/articles/{id}    - Retrieve variant detail
//! PUT    /api/article/articles/{id}    - Update variant
//! DELETE /api/article/articles/{id}    - Delete variant
//!
//! # Public
//! GET    /api/article/minimal          - Minimal variant listing
//!
//! # Materials (token; delete requires staff)
//! GET    /api/bom/materials            - List materials
//! POST   /api/bom/materials            - Create material
//! GET    /api/bom/materials/{id}       - Retrieve material
//! PUT    /api/bom/materials/{id}       - Update material
//! DELETE /api/bom/materials/{id}       - Delete material
//! ```
//!
//! Trailing slashes are trimmed before routing (see `main`).

pub mod article_infos;
pub mod articles;
pub mod colors;
pub mod health;
pub mod materials;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Build the full application router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
        .merge(colors::routes())
        .merge(articles::routes())
        .merge(article_infos::routes())
        .merge(materials::routes())
        .fallback(not_found)
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_owned())
}
