use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::models::ApiResponse;

/// Result alias used by every handler in the crate.
pub type ApiResult<T> = Result<T, ApiError>;

/// ApiError
///
/// The single error surface of the HTTP layer. Every failure a handler can
/// produce maps onto one of these variants, and every variant renders as the
/// uniform `ApiResponse { success: false, message }` body with its status code.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed or semantically invalid input (400).
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials (401).
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but not allowed to perform this operation (403).
    #[error("You don't have permission to make this operation")]
    Forbidden,

    /// Resource lookup failed (404).
    #[error("{resource} not found with {field} : '{value}'")]
    NotFound {
        resource: &'static str,
        field: &'static str,
        value: String,
    },

    /// Unexpected server-side failure (500). The detail is logged, never sent.
    #[error("Internal server error")]
    Internal(String),

    /// Database failure (500). The underlying error is logged, never sent.
    #[error("Internal server error")]
    Database(sqlx::Error),
}

/// Shorthand constructor for a 400 with a custom message.
pub fn bad_request(message: impl Into<String>) -> ApiError {
    ApiError::BadRequest(message.into())
}

/// Shorthand constructor for a 401 with a custom message.
pub fn unauthorized(message: impl Into<String>) -> ApiError {
    ApiError::Unauthorized(message.into())
}

/// Builds the canonical 404 for a missing resource, rendered as
/// `Post not found with id : '42'`.
pub fn not_found(
    resource: &'static str,
    field: &'static str,
    value: impl std::fmt::Display,
) -> ApiError {
    ApiError::NotFound {
        resource,
        field,
        value: value.to_string(),
    }
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Server-side failures carry detail a client must never see. Log it
        // here, at the single point every error passes through.
        match &self {
            ApiError::Database(e) => tracing::error!("Database error: {e}"),
            ApiError::Internal(detail) => tracing::error!("Internal error: {detail}"),
            _ => {}
        }

        let body = ApiResponse {
            success: false,
            message: self.to_string(),
        };

        (self.status_code(), Json(body)).into_response()
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        // Unique constraint violations surface as client errors: the caller
        // tried to reuse a username, email, tag name or category name.
        if let sqlx::Error::Database(db_err) = &e {
            if db_err.kind() == sqlx::error::ErrorKind::UniqueViolation {
                return ApiError::BadRequest(
                    "A record with the same unique value already exists".to_string(),
                );
            }
        }
        ApiError::Database(e)
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(e: validator::ValidationErrors) -> Self {
        ApiError::BadRequest(e.to_string().replace('\n', "; "))
    }
}
