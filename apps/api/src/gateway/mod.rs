//! Generation Gateway: the single point of entry for all generative backend calls.
//!
//! No other module may call a backend directly. The gateway submits a composed
//! request through an injected `GenerationBackend`, then funnels the reply
//! through one validation path: empty check → JSON span extraction → strict
//! schema parse.
//!
//! Exactly one backend call per `generate`. No retry, no cache.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::application::models::GenerationResult;
use crate::composer::GenerationRequest;

pub mod extract;
pub mod gemini;
#[cfg(test)]
pub mod mock;

#[derive(Debug, Clone, Error)]
pub enum GenerationError {
    #[error("no backend credential supplied")]
    MissingCredential,

    #[error(
        "backend transport error{}: {message}",
        .status.map(|s| format!(" (status {s})")).unwrap_or_default()
    )]
    Transport { status: Option<u16>, message: String },

    #[error("backend returned an empty response")]
    EmptyResponse,

    #[error("backend response does not match the schema: {reason}")]
    MalformedResponse { raw: String, reason: String },

    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl GenerationError {
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        GenerationError::Transport {
            status,
            message: message.into(),
        }
    }

    fn malformed(raw: &str, reason: impl Into<String>) -> Self {
        GenerationError::MalformedResponse {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}

/// Capability interface for a generative backend.
///
/// Implementations perform exactly one outbound call per `submit` and return
/// the raw reply text. Schema validation is the gateway's job, not theirs.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    async fn submit(
        &self,
        request: &GenerationRequest,
        credential: &str,
    ) -> Result<String, GenerationError>;

    /// Backend name, for logs.
    fn name(&self) -> &str;
}

/// Executes composed requests against a backend and validates the replies.
#[derive(Clone)]
pub struct Gateway {
    backend: Arc<dyn GenerationBackend>,
}

impl Gateway {
    pub fn new(backend: Arc<dyn GenerationBackend>) -> Self {
        Self { backend }
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }

    /// Runs one generation: Idle → Dispatched → Succeeded | Failed.
    ///
    /// Concurrent calls are not serialised here.
    pub async fn generate(
        &self,
        request: &GenerationRequest,
        credential: &str,
    ) -> Result<GenerationResult, GenerationError> {
        if credential.trim().is_empty() {
            warn!("Generation rejected before dispatch: missing credential");
            return Err(GenerationError::MissingCredential);
        }

        info!(
            backend = self.backend.name(),
            has_attachment = request.attachment.is_some(),
            "Dispatching generation request"
        );

        let raw = self
            .backend
            .submit(request, credential)
            .await
            .inspect_err(|e| warn!(backend = self.backend.name(), "Generation failed: {e}"))?;

        let result = parse_reply(&raw)
            .inspect_err(|e| warn!(backend = self.backend.name(), "Generation failed: {e}"))?;

        info!(
            skills = result.skill_alignment.len(),
            email_chars = result.email_body.chars().count(),
            "Generation succeeded"
        );
        Ok(result)
    }
}

/// Validates a raw reply and parses it into a `GenerationResult`.
pub fn parse_reply(raw: &str) -> Result<GenerationResult, GenerationError> {
    if raw.trim().is_empty() {
        return Err(GenerationError::EmptyResponse);
    }

    let payload = extract::extract_json_payload(raw)
        .ok_or_else(|| GenerationError::malformed(raw, "no JSON object found in response"))?;

    if payload.len() != raw.trim().len() {
        debug!(
            "Extracted JSON span of {} bytes from {} byte reply",
            payload.len(),
            raw.len()
        );
    }

    let result: GenerationResult = serde_json::from_str(payload)
        .map_err(|e| GenerationError::malformed(raw, e.to_string()))?;

    if result.skill_alignment.is_empty() {
        return Err(GenerationError::malformed(raw, "skillAlignment is empty"));
    }

    Ok(result)
}
