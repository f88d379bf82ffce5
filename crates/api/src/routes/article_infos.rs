//! Article variant endpoints, including the public minimal listing.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use catalog_core::ArticleInfoId;

use crate::db::ArticleInfoRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, RequireStaff};
use crate::models::{
    ArticleInfo, ArticleInfoDetail, ArticleInfoFilter, ArticleInfoInput, ArticleInfoQuery,
    MinimalArticle,
};
use crate::state::AppState;

/// Build the article variant router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/article/articles", get(list).post(create))
        .route(
            "/api/article/articles/{id}",
            get(show).put(update).delete(destroy),
        )
        .route("/api/article/minimal", get(minimal))
}

/// List variants.
///
/// GET /api/article/articles?artno=&brand=&style=&color=&category=&active=&export=
async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    query: Result<Query<ArticleInfoQuery>, QueryRejection>,
) -> Result<Json<Vec<ArticleInfo>>, AppError> {
    let Query(query) = query?;
    let filter = ArticleInfoFilter::try_from(query)?;

    let items = ArticleInfoRepository::new(state.pool())
        .list(&filter)
        .await?;
    Ok(Json(items))
}

/// Create a variant. Staff only.
///
/// POST /api/article/articles
async fn create(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    payload: Result<Json<ArticleInfoInput>, JsonRejection>,
) -> Result<(StatusCode, Json<ArticleInfo>), AppError> {
    let Json(input) = payload?;
    let fields = input.validate()?;

    let item = ArticleInfoRepository::new(state.pool())
        .create(&fields, user.id)
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

/// Retrieve a variant with its article number and color name.
///
/// GET /api/article/articles/{id}
async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ArticleInfoDetail>, AppError> {
    let Path(id) = id?;
    let item = ArticleInfoRepository::new(state.pool())
        .get_detail(ArticleInfoId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article info {id}")))?;

    Ok(Json(item))
}

/// Update a variant. Staff only.
///
/// PUT /api/article/articles/{id}
async fn update(
    State(state): State<AppState>,
    RequireStaff(_user): RequireStaff,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ArticleInfoInput>, JsonRejection>,
) -> Result<Json<ArticleInfo>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let fields = input.validate()?;

    let item = ArticleInfoRepository::new(state.pool())
        .update(ArticleInfoId::new(id), &fields)
        .await?;

    Ok(Json(item))
}

/// Delete a variant. Staff only.
///
/// DELETE /api/article/articles/{id}
async fn destroy(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    ArticleInfoRepository::new(state.pool())
        .delete(ArticleInfoId::new(id))
        .await?;

    tracing::info!(article_info_id = id, user_id = %user.id, "article variant deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Public listing: artno, color name, main category, price and status.
///
/// GET /api/article/minimal
async fn minimal(State(state): State<AppState>) -> Result<Json<Vec<MinimalArticle>>, AppError> {
    let items = ArticleInfoRepository::new(state.pool())
        .list_minimal()
        .await?;
    Ok(Json(items))
}
