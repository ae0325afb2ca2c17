use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::extraction::prompts::{INPUT_MISSING_MESSAGE, PARSE_FAILURE_MESSAGE};
use crate::extraction::ExtractionError;
use crate::llm_client::LlmError;
use crate::render::ExportError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let mut details = Map::new();

        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
            // Extraction failures are recoverable: the user sees the message and
            // the session keeps its previous fields.
            AppError::Extraction(e) => match e {
                ExtractionError::InputMissing => (
                    StatusCode::BAD_REQUEST,
                    "INPUT_MISSING",
                    INPUT_MISSING_MESSAGE.to_string(),
                ),
                ExtractionError::Api(inner) => {
                    let detail = match inner {
                        LlmError::Api { message, .. } => message.clone(),
                        other => other.to_string(),
                    };
                    (
                        StatusCode::BAD_GATEWAY,
                        "LLM_API_ERROR",
                        format!("OpenAI API Error: {detail}"),
                    )
                }
                ExtractionError::Parse { raw_response, .. } => {
                    details.insert(
                        "raw_response".to_string(),
                        Value::String(raw_response.clone()),
                    );
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "LLM_PARSE_ERROR",
                        PARSE_FAILURE_MESSAGE.to_string(),
                    )
                }
                ExtractionError::Unexpected(msg) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "UNEXPECTED_ERROR",
                    format!("Unexpected error: {msg}"),
                ),
            },
            AppError::Export(e) => {
                tracing::error!("Export error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EXPORT_ERROR",
                    "The document could not be exported".to_string(),
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

        let mut error = Map::new();
        error.insert("code".to_string(), json!(code));
        error.insert("message".to_string(), json!(message));
        error.extend(details);

        let body = Json(json!({ "error": error }));

        (status, body).into_response()
    }
}
