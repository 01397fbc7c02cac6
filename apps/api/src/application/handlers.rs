//! Axum route handlers for the Application API.

use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::application::formatting::CopyBundle;
use crate::application::models::{AiSkills, CvSource, GenerationResult, Style, Tone};
use crate::application::validation::{validate_submission, ApplicationForm, ALLOWED_CV_MIME_TYPES};
use crate::composer::compose;
use crate::composer::tone::{email_register, style_directive, tone_label};
use crate::errors::AppError;
use crate::json::AppJson;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    pub application: ApplicationForm,
    /// Credential sent with this request only.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Session from `POST /api/v1/credentials`.
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
pub struct GenerateResponse {
    pub result: GenerationResult,
    pub copy: CopyBundle,
}

#[derive(Debug, Serialize)]
pub struct StyleOption {
    pub value: Style,
    pub label: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToneOption {
    pub value: Tone,
    pub label: &'static str,
    pub email_register: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SkillOption {
    pub key: &'static str,
    pub label: &'static str,
    pub default: u8,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FormLimits {
    pub job_description_max_chars: usize,
    pub cv_file_max_bytes: usize,
    pub cv_mime_types: &'static [&'static str],
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptionsResponse {
    pub styles: Vec<StyleOption>,
    pub tones: Vec<ToneOption>,
    pub skills: Vec<SkillOption>,
    pub default_style: Style,
    pub default_tone: Tone,
    pub limits: FormLimits,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/applications/generate
///
/// Validates the form, composes the request and runs one generation.
/// Used for both the initial submit and an explicit refresh.
pub async fn handle_generate(
    State(state): State<AppState>,
    AppJson(request): AppJson<GenerateRequest>,
) -> Result<Json<GenerateResponse>, AppError> {
    let data = validate_submission(request.application, &state.config.submission_limits())?;
    info!(
        company = %data.company,
        position = %data.position,
        style = ?data.style,
        tone = ?data.tone,
        "Generating application package"
    );

    if let CvSource::File {
        content, file_name, ..
    } = &data.cv
    {
        debug!("CV attached as '{file_name}' ({} bytes)", content.len());
    }

    let generation_request = compose(&data, &state.config.composer_settings());
    let credential = resolve_credential(&state, request.api_key, request.session_id).await;

    let result = state
        .gateway
        .generate(&generation_request, &credential)
        .await?;
    let copy = CopyBundle::from_result(&result);

    Ok(Json(GenerateResponse { result, copy }))
}

/// GET /api/v1/applications/options
///
/// Presets, defaults and limits for building the form.
pub async fn handle_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let defaults = AiSkills::default();
    let limits = state.config.submission_limits();

    Json(OptionsResponse {
        styles: Style::ALL
            .iter()
            .map(|&value| StyleOption {
                value,
                label: style_directive(value).label,
            })
            .collect(),
        tones: Tone::ALL
            .iter()
            .map(|&value| ToneOption {
                value,
                label: tone_label(value),
                email_register: email_register(value),
            })
            .collect(),
        skills: defaults
            .entries()
            .iter()
            .map(|&(key, label, default)| SkillOption {
                key,
                label,
                default,
            })
            .collect(),
        default_style: Style::default(),
        default_tone: Tone::default(),
        limits: FormLimits {
            job_description_max_chars: limits.job_description_max_chars,
            cv_file_max_bytes: limits.cv_file_max_bytes,
            cv_mime_types: ALLOWED_CV_MIME_TYPES,
        },
    })
}

/// Picks the credential for a call: explicit key, then stored session, then
/// the server default. Returns an empty string when none applies.
async fn resolve_credential(
    state: &AppState,
    api_key: Option<String>,
    session_id: Option<Uuid>,
) -> String {
    if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
        debug!("Using credential from request body");
        return key;
    }
    if let Some(session_id) = session_id {
        if let Some(key) = state.credentials.get(session_id, Utc::now()).await {
            debug!("Using stored credential for session {session_id}");
            return key;
        }
        debug!("Credential session {session_id} missing or expired");
    }
    state.config.gemini_api_key.clone().unwrap_or_default()
}
