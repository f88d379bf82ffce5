//! Unified error handling for the catalog API.
//!
//! Every error renders as a JSON body with a `detail` message. Validation and
//! uniqueness failures add a `fields` map of field name to messages.

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::{Map, Value, json};
use thiserror::Error;

use catalog_core::FilterError;

use crate::db::RepositoryError;
use crate::models::ValidationErrors;

/// Message attached to each field of a violated unique constraint.
const UNIQUE_MESSAGE: &str = "must be unique";

/// Application-level error type for the catalog API.
#[derive(Debug, Error)]
pub enum AppError {
    /// Database operation failed.
    #[error("Database error: {0}")]
    Database(RepositoryError),

    /// Payload failed field validation.
    #[error("Invalid input: {0}")]
    Validation(ValidationErrors),

    /// A unique constraint rejected the write.
    #[error("The fields {} must make a unique set.", .0.join(", "))]
    Duplicate(&'static [&'static str]),

    /// A query parameter could not be parsed.
    #[error("{0}")]
    InvalidQuery(#[from] FilterError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Caller is not authenticated.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Caller lacks permission.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<RepositoryError> for AppError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => Self::NotFound("no such object".to_owned()),
            RepositoryError::Duplicate { fields } => Self::Duplicate(fields),
            RepositoryError::InvalidReference { field } => Self::Validation(
                ValidationErrors::single(field, "Invalid pk - object does not exist."),
            ),
            RepositoryError::Conflict(message) => Self::BadRequest(message),
            other => Self::Database(other),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(errors)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        Self::NotFound(rejection.body_text())
    }
}

impl AppError {
    /// HTTP status for this error.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Validation(_)
            | Self::Duplicate(_)
            | Self::InvalidQuery(_)
            | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }

    fn body(&self) -> Value {
        match self {
            // Don't expose internal error details to clients
            Self::Database(_) => json!({"detail": "Internal server error"}),
            Self::Validation(errors) => json!({
                "detail": "Invalid input.",
                "fields": errors,
            }),
            Self::Duplicate(fields) => {
                let fields: Map<String, Value> = fields
                    .iter()
                    .map(|field| ((*field).to_owned(), json!([UNIQUE_MESSAGE])))
                    .collect();
                json!({"detail": self.to_string(), "fields": fields})
            }
            _ => json!({"detail": self.to_string()}),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Log server errors with Sentry
        if matches!(self, Self::Database(_)) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Catalog request error"
            );
        }

        (self.status(), Json(self.body())).into_response()
    }
}

/// Set the Sentry user context for the authenticated caller.
pub fn set_sentry_user(user_id: i32, email: &str) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: Some(email.to_owned()),
            ..Default::default()
        }));
    });
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::to_bytes;

    use super::*;

    async fn body_json(err: AppError) -> (StatusCode, Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_app_error_display() {
        let err = AppError::NotFound("color 9".to_string());
        assert_eq!(err.to_string(), "Not found: color 9");

        let err = AppError::Duplicate(&["article", "color", "category"]);
        assert_eq!(
            err.to_string(),
            "The fields article, color, category must make a unique set."
        );
    }

    #[test]
    fn test_app_error_status_codes() {
        fn get_status(err: AppError) -> StatusCode {
            err.into_response().status()
        }

        assert_eq!(
            get_status(AppError::NotFound("test".to_string())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            get_status(AppError::Unauthorized("test".to_string())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            get_status(AppError::Forbidden("test".to_string())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            get_status(AppError::Duplicate(&["artno"])),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            get_status(AppError::Database(RepositoryError::Database(
                sqlx::Error::PoolTimedOut
            ))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_invalid_boolean_is_bad_request() {
        let err: AppError = FilterError::InvalidBoolean {
            param: "active".into(),
            value: "3780, pride".into(),
        }
        .into();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_repository_errors_map_to_client_errors() {
        let err: AppError = RepositoryError::NotFound.into();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);

        let err: AppError = RepositoryError::InvalidReference { field: "color" }.into();
        assert!(matches!(err, AppError::Validation(ref e) if e.get("color").is_some()));

        let err: AppError = RepositoryError::Database(sqlx::Error::PoolTimedOut).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_duplicate_body_lists_fields() {
        let (status, body) = body_json(AppError::Duplicate(&["article", "color", "category"])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["color"], json!(["must be unique"]));
        assert_eq!(body["fields"].as_object().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_validation_body() {
        let errors = ValidationErrors::single("category", "This field is required.");
        let (status, body) = body_json(AppError::Validation(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["fields"]["category"][0], "This field is required.");
    }

    #[tokio::test]
    async fn test_internal_details_hidden() {
        let err = AppError::Database(RepositoryError::Database(sqlx::Error::PoolTimedOut));
        let (_, body) = body_json(err).await;
        assert_eq!(body, json!({"detail": "Internal server error"}));
    }
}
