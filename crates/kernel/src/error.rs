//! Application error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),

    /// Content missing or not publicly viewable.
    #[error("{message}")]
    NotFound { code: &'static str, message: String },

    #[error("unauthorized")]
    Unauthorized,

    #[error("{0}")]
    BadRequest(String),

    #[error("database error")]
    Database(#[from] sqlx::Error),
}

impl AppError {
    /// The not-found error returned for unknown or unpublished content.
    pub fn post_not_found() -> Self {
        AppError::NotFound {
            code: "post_not_found",
            message: "Post not found or not published.".to_string(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            AppError::Internal(_) | AppError::Database(_) => "internal_error",
            AppError::NotFound { code, .. } => code,
            AppError::Unauthorized => "unauthorized",
            AppError::BadRequest(_) => "bad_request",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        // Infrastructure failures are logged here and reported vaguely.
        let message = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = %e, "internal server error");
                "internal server error".to_string()
            }
            AppError::Database(e) => {
                tracing::error!(error = %e, "database error");
                "internal server error".to_string()
            }
            _ => self.to_string(),
        };

        let body = json!({
            "code": self.code(),
            "message": message,
            "data": { "status": status.as_u16() },
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias using AppError.
pub type AppResult<T> = Result<T, AppError>;
