//! Axum route handlers for the Credentials API.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::credentials::CredentialTicket;
use crate::errors::AppError;
use crate::json::AppJson;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreCredentialRequest {
    pub api_key: String,
}

/// POST /api/v1/credentials
pub async fn handle_store_credential(
    State(state): State<AppState>,
    AppJson(request): AppJson<StoreCredentialRequest>,
) -> Result<(StatusCode, Json<CredentialTicket>), AppError> {
    let api_key = request.api_key.trim();
    if api_key.is_empty() {
        return Err(AppError::Validation("apiKey cannot be empty".to_string()));
    }
    let ticket = state.credentials.put(api_key.to_string(), Utc::now()).await;
    Ok((StatusCode::CREATED, Json(ticket)))
}

/// DELETE /api/v1/credentials/:session_id
pub async fn handle_delete_credential(
    State(state): State<AppState>,
    Path(session_id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    if state.credentials.remove(session_id).await {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!(
            "Credential session {session_id} not found"
        )))
    }
}
