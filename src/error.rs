//! Error types for the assessment service.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::renderer::client::RenderError;

/// Main error type for API operations.
///
/// Renderer failures keep their three-way split (offline / timeout / HTTP
/// error) all the way to the response body so the UI can tell "service is
/// down" apart from "service rejected the render".
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found")]
    NotFound,

    #[error("PDF renderer is offline: {0}")]
    RendererOffline(String),

    #[error("PDF renderer timed out")]
    RendererTimeout,

    #[error("PDF renderer error {status}: {detail}")]
    RendererHttp { status: u16, detail: String },

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::RendererOffline(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::RendererTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::RendererHttp { .. } => StatusCode::BAD_GATEWAY,
            Self::Database(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<RenderError> for AppError {
    fn from(err: RenderError) -> Self {
        match err {
            RenderError::Offline(reason) => Self::RendererOffline(reason),
            RenderError::Timeout => Self::RendererTimeout,
            RenderError::Http { status, body } => Self::RendererHttp {
                status,
                detail: body,
            },
        }
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::BadRequest(format!("JSON error: {}", err))
    }
}

/// Result type alias for API operations.
pub type Result<T> = std::result::Result<T, AppError>;
