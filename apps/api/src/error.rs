// [apps/api/src/error.rs]
//! HTTP-boundary error shape: domain/infra errors
//! collapse here into the status codes and `{ "detail":... }` body the
//! external interface promises. No domain or infra crate's error type is
//! ever returned to a client directly.

use attention_domain_auth::AuthError;
use attention_infra_db::DbError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::error;

#[derive(Debug)]
pub enum ApiError {
    Validation(String),
    Unauthorized,
    Forbidden,
    NotFound,
    Internal(String),
}

#[derive(Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::Validation(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Unauthorized => (StatusCode::UNAUTHORIZED, "invalid or missing credentials".to_string()),
            ApiError::Forbidden => (StatusCode::FORBIDDEN, "insufficient privileges".to_string()),
            ApiError::NotFound => (StatusCode::NOT_FOUND, "not found".to_string()),
            ApiError::Internal(message) => {
                error!(error = %message, "internal error at HTTP boundary");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal server error".to_string())
            }
        };
        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound => ApiError::NotFound,
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials | AuthError::InvalidToken | AuthError::UnknownSubject => {
                ApiError::Unauthorized
            }
            AuthError::Forbidden => ApiError::Forbidden,
            AuthError::HashingFailure(message) => ApiError::Internal(message),
        }
    }
}
