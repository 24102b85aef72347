//! Application error taxonomy with consistent API responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("Unauthorized request.")]
    Unauthorized,

    #[error("Invalid or expired token.")]
    InvalidToken,

    #[error("Refresh token is expired or has already been used.")]
    TokenExpiredOrReused,

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Upload(String),

    #[error("Internal server error.")]
    Database(#[source] anyhow::Error),

    #[error("Internal server error.")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Normalize persistence failures: unique-constraint violations become
    /// `Conflict`, everything else is an internal database error.
    pub fn from_db(err: anyhow::Error) -> Self {
        if viewtube_db::is_constraint_violation(&err) {
            return AppError::Conflict("Resource already exists.".to_string());
        }
        AppError::Database(err)
    }

    fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidToken | AppError::TokenExpiredOrReused => {
                StatusCode::UNAUTHORIZED
            }
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Upload(_) | AppError::Database(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// JSON error envelope; mirrors the success envelope minus `data`.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody {
    status_code: u16,
    message: String,
    success: bool,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Internal detail is logged, never sent to the client.
        match &self {
            AppError::Database(err) => tracing::error!(error = %err, "Database error"),
            AppError::Internal(err) => tracing::error!(error = %err, "Internal server error"),
            AppError::Upload(msg) => tracing::error!(error = %msg, "Upload error"),
            _ => {}
        }

        let status = self.status();
        let body = ErrorBody {
            status_code: status.as_u16(),
            message: self.to_string(),
            success: false,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
