//! Color endpoints.
//!
//! Colors can be listed, created and retrieved. There is no update: a color
//! code is part of every dependent `artid`, and code changes are not
//! propagated.

use axum::{
    Json, Router,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    routing::get,
};

use catalog_core::ColorId;

use crate::db::ColorRepository;
use crate::error::AppError;
use crate::middleware::RequireAuth;
use crate::models::{Color, ColorInput};
use crate::state::AppState;

/// Build the color router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/article/colors", get(list).post(create))
        .route("/api/article/colors/{id}", get(show))
}

/// List colors by name, descending.
///
/// GET /api/article/colors
async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
) -> Result<Json<Vec<Color>>, AppError> {
    let colors = ColorRepository::new(state.pool()).list().await?;
    Ok(Json(colors))
}

/// Create a color.
///
/// POST /api/article/colors
async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<ColorInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Color>), AppError> {
    let Json(input) = payload?;
    let color = input.validate()?;

    let color = ColorRepository::new(state.pool())
        .create(&color, user.id)
        .await?;

    tracing::info!(color_id = %color.id, code = %color.code, "color created");
    Ok((StatusCode::CREATED, Json(color)))
}

/// Retrieve a color.
///
/// GET /api/article/colors/{id}
async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Color>, AppError> {
    let Path(id) = id?;
    let color = ColorRepository::new(state.pool())
        .get(ColorId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("color {id}")))?;

    Ok(Json(color))
}
