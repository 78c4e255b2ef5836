//! Application error types
//!
//! Unified error type for route handlers and storage operations. Module-level
//! errors (path parsing, markup parsing, text generation) convert into
//! `AppError` at the boundary where they become request failures.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::textgen::TextGenError;

/// Unified application error
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Markup error: {0}")]
    Markup(String),

    #[error("Generation failed: {0}")]
    Generation(#[from] TextGenError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for application operations
pub type Result<T> = std::result::Result<T, AppError>;

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::BadRequest(_) | Self::Markup(_) => StatusCode::BAD_REQUEST,
            Self::Generation(e) => e.status_code(),
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("request failed: {}", self);
        }
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<crate::dom::MarkupError> for AppError {
    fn from(err: crate::dom::MarkupError) -> Self {
        AppError::Markup(err.to_string())
    }
}
