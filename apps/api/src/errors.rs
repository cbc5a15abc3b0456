use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    #[error("Could not read document: {0}")]
    MalformedDocument(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("File too large: {size_mb:.2} MB (max {max_mb} MB)")]
    FileTooLarge { size_mb: f64, max_mb: u64 },

    #[error("Too many requests; please slow down.")]
    RateLimited,

    #[error("LLM provider error: {0}")]
    Upstream(String),

    #[error("Invalid JSON fields: {detail}")]
    InvalidModelOutput { detail: String, excerpt: String },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::UnsupportedFileType(name) => AppError::UnsupportedFileType(format!(
                "'{name}' is not a supported document. Use .pdf, .docx, or .txt"
            )),
            other => AppError::MalformedDocument(other.to_string()),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        AppError::Upstream(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::UnsupportedFileType(msg) => (
                StatusCode::BAD_REQUEST,
                "UNSUPPORTED_FILE_TYPE",
                msg.clone(),
            ),
            AppError::MalformedDocument(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "MALFORMED_DOCUMENT",
                msg.clone(),
            ),
            AppError::Validation(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Multipart(e) => (e.status(), "MULTIPART_ERROR", e.body_text()),
            AppError::FileTooLarge { .. } => (
                StatusCode::PAYLOAD_TOO_LARGE,
                "FILE_TOO_LARGE",
                self.to_string(),
            ),
            AppError::RateLimited => (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                self.to_string(),
            ),
            AppError::Upstream(msg) => {
                tracing::error!("LLM provider error: {msg}");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", self.to_string())
            }
            AppError::InvalidModelOutput { detail, excerpt } => {
                tracing::error!("Invalid model output: {detail}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INVALID_MODEL_OUTPUT",
                    format!("Invalid JSON fields: {detail}. Raw output starts with: {excerpt}"),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
