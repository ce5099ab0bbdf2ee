//! API error taxonomy and its mapping onto HTTP responses.

use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde::Serialize;
use thiserror::Error;

/// Errors a handler can surface. Validation and conflict checks run
/// before any mutating store call; store failures are converted at the
/// boundary and never leak their cause to the client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing required field or path/body id mismatch.
    #[error("{0}")]
    Validation(String),

    /// Duplicate userName or unresolvable author reference.
    #[error("{0}")]
    Conflict(String),

    /// Unknown id on lookup.
    #[error("Not Found")]
    NotFound,

    /// Store connectivity or query failure.
    #[error(transparent)]
    Store(sqlx::Error),
}

/// Uniform JSON error body: `{"error": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        // The read-then-write uniqueness check can race; the UNIQUE
        // constraint on authors.user_name is the backstop, and it maps
        // to the same conflict response as the pre-check.
        if let Some(db_err) = err.as_database_error() {
            if db_err.code().as_deref() == Some("23505") {
                return ApiError::Conflict("Username already taken".to_string());
            }
        }
        ApiError::Store(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::Validation(message) | ApiError::Conflict(message) => {
                (StatusCode::BAD_REQUEST, message)
            }
            ApiError::NotFound => (StatusCode::NOT_FOUND, "Not Found".to_string()),
            ApiError::Store(err) => {
                tracing::error!("store error: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_string(),
                )
            }
        };
        (status, Json(ErrorBody { error: message })).into_response()
    }
}
