//! Bill-of-materials endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use catalog_core::MaterialId;

use crate::db::MaterialRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, RequireStaff};
use crate::models::{Material, MaterialFilter, MaterialInput, MaterialQuery};
use crate::state::AppState;

/// Build the material router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/bom/materials", get(list).post(create))
        .route(
            "/api/bom/materials/{id}",
            get(show).put(update).delete(destroy),
        )
}

/// List materials.
///
/// GET /api/bom/materials?code=&name=&category=&scategory=&active=
async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    query: Result<Query<MaterialQuery>, QueryRejection>,
) -> Result<Json<Vec<Material>>, AppError> {
    let Query(query) = query?;
    let filter = MaterialFilter::try_from(query)?;

    let materials = MaterialRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(materials))
}

/// Create a material.
///
/// POST /api/bom/materials
async fn create(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    payload: Result<Json<MaterialInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Material>), AppError> {
    let Json(input) = payload?;
    let fields = input.validate()?;

    let material = MaterialRepository::new(state.pool()).create(&fields).await?;

    tracing::info!(material_id = %material.id, code = %material.code, "material created");
    Ok((StatusCode::CREATED, Json(material)))
}

/// Retrieve a material.
///
/// GET /api/bom/materials/{id}
async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<Material>, AppError> {
    let Path(id) = id?;
    let material = MaterialRepository::new(state.pool())
        .get(MaterialId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("material {id}")))?;

    Ok(Json(material))
}

/// Update a material.
///
/// PUT /api/bom/materials/{id}
async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<MaterialInput>, JsonRejection>,
) -> Result<Json<Material>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let fields = input.validate()?;

    let material = MaterialRepository::new(state.pool())
        .update(MaterialId::new(id), &fields)
        .await?;

    Ok(Json(material))
}

/// Delete a material. Staff only.
///
/// DELETE /api/bom/materials/{id}
async fn destroy(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    MaterialRepository::new(state.pool())
        .delete(MaterialId::new(id))
        .await?;

    tracing::info!(material_id = id, user_id = %user.id, "material deleted");
    Ok(StatusCode::NO_CONTENT)
}
