//! Token authentication extractors.
//!
//! Clients send `Authorization: Token <key>` (or `Bearer <key>`). The key is
//! hashed and looked up in `catalog.api_token`; the owning user must be
//! active.

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::Span;

use crate::db::{RepositoryError, UserRepository};
use crate::error::{AppError, set_sentry_user};
use crate::models::{User, hash_token_key};
use crate::state::AppState;

/// Authorization schemes accepted in front of the token key.
const TOKEN_SCHEMES: &[&str] = &["token", "bearer"];

/// Extractor that requires a valid API token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(user): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", user.name)
/// }
/// ```
pub struct RequireAuth(pub User);

/// Extractor that requires a valid API token belonging to a staff user.
pub struct RequireStaff(pub User);

/// Error returned when authentication or authorization fails.
#[derive(Debug)]
pub enum AuthRejection {
    /// No usable `Authorization` header.
    MissingCredentials,
    /// The header was well formed but the key is unknown.
    InvalidToken,
    /// The token's owner has been deactivated.
    InactiveUser,
    /// The user is authenticated but not staff.
    NotStaff,
    /// The token lookup itself failed.
    Lookup(RepositoryError),
}

impl From<AuthRejection> for AppError {
    fn from(rejection: AuthRejection) -> Self {
        match rejection {
            AuthRejection::MissingCredentials => {
                Self::Unauthorized("Authentication credentials were not provided.".to_owned())
            }
            AuthRejection::InvalidToken => Self::Unauthorized("Invalid token.".to_owned()),
            AuthRejection::InactiveUser => {
                Self::Unauthorized("User inactive or deleted.".to_owned())
            }
            AuthRejection::NotStaff => Self::Forbidden(
                "You do not have permission to perform this action.".to_owned(),
            ),
            AuthRejection::Lookup(e) => Self::Database(e),
        }
    }
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        AppError::from(self).into_response()
    }
}

/// Extract the key from an `Authorization` header value.
///
/// Returns `None` for other schemes or an empty key.
#[must_use]
pub fn parse_authorization(value: &str) -> Option<&str> {
    let (scheme, key) = value.trim().split_once(char::is_whitespace)?;
    if !TOKEN_SCHEMES
        .iter()
        .any(|accepted| scheme.eq_ignore_ascii_case(accepted))
    {
        return None;
    }
    let key = key.trim();
    (!key.is_empty() && !key.contains(char::is_whitespace)).then_some(key)
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Already resolved by an earlier extractor on this request
        if let Some(user) = parts.extensions.get::<User>() {
            return Ok(Self(user.clone()));
        }

        let key = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(parse_authorization)
            .ok_or(AuthRejection::MissingCredentials)?;

        let user = UserRepository::new(state.pool())
            .get_by_token_hash(&hash_token_key(key))
            .await
            .map_err(AuthRejection::Lookup)?
            .ok_or(AuthRejection::InvalidToken)?;

        if !user.is_active {
            return Err(AuthRejection::InactiveUser);
        }

        Span::current().record("user_id", user.id.as_i32());
        set_sentry_user(user.id.as_i32(), &user.email);

        parts.extensions.insert(user.clone());
        Ok(Self(user))
    }
}

impl FromRequestParts<AppState> for RequireStaff {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let RequireAuth(user) = RequireAuth::from_request_parts(parts, state).await?;

        if !user.is_staff {
            tracing::warn!(user_id = %user.id, "staff-only action refused");
            return Err(AuthRejection::NotStaff);
        }

        Ok(Self(user))
    }
}
