//! Article endpoints.

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
    routing::get,
};

use catalog_core::ArticleId;

use crate::db::ArticleRepository;
use crate::error::AppError;
use crate::middleware::{RequireAuth, RequireStaff};
use crate::models::{Article, ArticleDetail, ArticleFilter, ArticleInput, ArticleQuery};
use crate::state::AppState;

/// Build the article router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/article/list", get(list).post(create))
        .route(
            "/api/article/list/{id}",
            get(show).put(update).delete(destroy),
        )
}

/// List articles, newest first.
///
/// GET /api/article/list?brand=&style=&color=&category=
async fn list(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    query: Result<Query<ArticleQuery>, QueryRejection>,
) -> Result<Json<Vec<Article>>, AppError> {
    let Query(query) = query?;
    let filter = ArticleFilter::try_from(query)?;

    let articles = ArticleRepository::new(state.pool()).list(&filter).await?;
    Ok(Json(articles))
}

/// Create an article.
///
/// POST /api/article/list
async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    payload: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<(StatusCode, Json<Article>), AppError> {
    let Json(input) = payload?;
    let fields = input.validate()?;

    let article = ArticleRepository::new(state.pool())
        .create(&fields, user.id)
        .await?;

    tracing::info!(article_id = %article.id, artno = %article.artno, "article created");
    Ok((StatusCode::CREATED, Json(article)))
}

/// Retrieve an article with its variants expanded.
///
/// GET /api/article/list/{id}
async fn show(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
) -> Result<Json<ArticleDetail>, AppError> {
    let Path(id) = id?;
    let article = ArticleRepository::new(state.pool())
        .get_detail(ArticleId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("article {id}")))?;

    Ok(Json(article))
}

/// Update an article. A new `artno` is propagated to every variant's `artid`.
///
/// PUT /api/article/list/{id}
async fn update(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    id: Result<Path<i32>, PathRejection>,
    payload: Result<Json<ArticleInput>, JsonRejection>,
) -> Result<Json<Article>, AppError> {
    let Path(id) = id?;
    let Json(input) = payload?;
    let fields = input.validate()?;

    let article = ArticleRepository::new(state.pool())
        .update(ArticleId::new(id), &fields)
        .await?;

    Ok(Json(article))
}

/// Delete an article and its variants.
///
/// DELETE /api/article/list/{id}
async fn destroy(
    State(state): State<AppState>,
    RequireStaff(user): RequireStaff,
    id: Result<Path<i32>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id?;
    ArticleRepository::new(state.pool())
        .delete(ArticleId::new(id))
        .await?;

    tracing::info!(article_id = id, user_id = %user.id, "article deleted");
    Ok(StatusCode::NO_CONTENT)
}
