use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::gateway::GenerationError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Invalid JSON body: {0}")]
    JsonBody(#[from] JsonRejection),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Generation(e) => generation_status(e),
            AppError::JsonBody(rejection) => match rejection.status() {
                StatusCode::PAYLOAD_TOO_LARGE => (
                    StatusCode::PAYLOAD_TOO_LARGE,
                    "PAYLOAD_TOO_LARGE",
                    rejection.body_text(),
                ),
                _ => (
                    StatusCode::BAD_REQUEST,
                    "VALIDATION_ERROR",
                    rejection.body_text(),
                ),
            },
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

fn generation_status(error: &GenerationError) -> (StatusCode, &'static str, String) {
    match error {
        GenerationError::InvalidRequest(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        GenerationError::MissingCredential => (
            StatusCode::UNAUTHORIZED,
            "MISSING_CREDENTIAL",
            "A Gemini API key is required to generate".to_string(),
        ),
        GenerationError::Transport { status, message } => {
            tracing::error!("Backend transport error (status {status:?}): {message}");
            let message = match status {
                Some(401) | Some(403) => "The AI backend rejected the API key".to_string(),
                _ => "The AI backend could not be reached".to_string(),
            };
            (StatusCode::BAD_GATEWAY, "BACKEND_UNAVAILABLE", message)
        }
        GenerationError::EmptyResponse => (
            StatusCode::BAD_GATEWAY,
            "EMPTY_RESPONSE",
            "The AI backend returned an empty response".to_string(),
        ),
        GenerationError::MalformedResponse { raw, reason } => {
            tracing::error!("Malformed backend response ({reason}): {raw}");
            (
                StatusCode::BAD_GATEWAY,
                "MALFORMED_RESPONSE",
                "The AI backend returned a response that could not be read".to_string(),
            )
        }
    }
}
