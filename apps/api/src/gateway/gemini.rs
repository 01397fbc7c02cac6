//! Gemini `generateContent` backend.
//!
//! Sends the instruction as a text part, the CV attachment (if any) as a
//! base64 `inlineData` part, and the response schema via `generationConfig`.
//! Returns the concatenated text of the first candidate.

use anyhow::{Context, Result};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::composer::GenerationRequest;
use crate::gateway::{GenerationBackend, GenerationError};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_MODEL: &str = "gemini-3-pro-preview";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfigBody<'a>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData<'a>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody<'a> {
    temperature: f32,
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    prompt_token_count: Option<u32>,
    candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

impl GenerateContentResponse {
    /// Concatenated text of the first candidate's parts. Empty if none.
    fn text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }
}

/// Gemini REST backend. The credential is supplied per call, not held.
#[derive(Clone)]
pub struct GeminiBackend {
    client: Client,
    base_url: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            model: model.into(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }
}

/// Builds the `generateContent` body. Kept separate from the HTTP call so the
/// wire shape can be checked without a network.
fn build_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let mut parts = vec![Part::Text {
        text: &request.instruction,
    }];
    if let Some(attachment) = &request.attachment {
        parts.push(Part::InlineData {
            inline_data: InlineData {
                mime_type: &attachment.mime_type,
                data: STANDARD.encode(&attachment.content),
            },
        });
    }

    GenerateContentRequest {
        contents: vec![Content {
            role: "user",
            parts,
        }],
        generation_config: GenerationConfigBody {
            temperature: request.config.temperature,
            response_mime_type: request.config.response_mime_type,
            response_schema: &request.response_schema,
        },
    }
}

/// Maps a `generateContent` HTTP reply to the candidate text or a typed error.
fn interpret(status: StatusCode, text: String) -> Result<String, GenerationError> {
    if !status.is_success() {
        let message = serde_json::from_str::<GeminiError>(&text)
            .map(|e| e.error.message)
            .unwrap_or(text);
        return Err(GenerationError::transport(Some(status.as_u16()), message));
    }

    let parsed: GenerateContentResponse = match serde_json::from_str(&text) {
        Ok(parsed) => parsed,
        Err(e) => {
            return Err(GenerationError::MalformedResponse {
                raw: text,
                reason: format!("unreadable generateContent envelope: {e}"),
            })
        }
    };

    if let Some(usage) = &parsed.usage_metadata {
        debug!(
            "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}, finish_reason={:?}",
            usage.prompt_token_count,
            usage.candidates_token_count,
            parsed.candidates.first().and_then(|c| c.finish_reason.as_deref())
        );
    }

    Ok(parsed.text())
}

#[async_trait]
impl GenerationBackend for GeminiBackend {
    async fn submit(
        &self,
        request: &GenerationRequest,
        credential: &str,
    ) -> Result<String, GenerationError> {
        let body = build_body(request);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                GenerationError::transport(e.status().map(|s| s.as_u16()), e.to_string())
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GenerationError::transport(Some(status.as_u16()), e.to_string()))?;

        interpret(status, text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
