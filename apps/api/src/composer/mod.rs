//! Request Composer: turns validated `ApplicationData` into a backend-ready
//! `GenerationRequest`.
//!
//! Pure: no I/O, no clock, no randomness. The same input always yields an
//! equal request. Composition cannot fail; input checks live in
//! `application::validation`.

pub mod prompts;
pub mod schema;
pub mod tone;

use bytes::Bytes;
use serde_json::Value;

use crate::application::models::{AiSkills, ApplicationData, CvSource};
use crate::composer::prompts::{
    APPLICATION_PROMPT_TEMPLATE, CV_ATTACHMENT_BLOCK, CV_TEXT_BLOCK, SALARY_NOT_GIVEN,
};
use crate::composer::tone::{cover_letter_register, email_register, style_directive};

/// Sampling temperature for every generation call. Moderate, favouring consistency.
pub const GENERATION_TEMPERATURE: f32 = 0.7;

/// MIME type the backend is asked to reply with.
pub const RESPONSE_MIME_TYPE: &str = "application/json";

/// Binary document sent alongside the instruction text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub content: Bytes,
    pub mime_type: String,
}

/// Sampling and output-format settings.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub response_mime_type: &'static str,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: GENERATION_TEMPERATURE,
            response_mime_type: RESPONSE_MIME_TYPE,
        }
    }
}

/// A composed request, opaque to everything but the backends.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub instruction: String,
    pub attachment: Option<Attachment>,
    pub response_schema: Value,
    pub config: GenerationConfig,
}

/// Deployment-level knobs that shape the prompt but are not part of the form.
#[derive(Debug, Clone)]
pub struct ComposerSettings {
    pub output_language: String,
}

impl Default for ComposerSettings {
    fn default() -> Self {
        Self {
            output_language: "Hungarian".to_string(),
        }
    }
}

/// Builds the generation request for one submission.
pub fn compose(data: &ApplicationData, settings: &ComposerSettings) -> GenerationRequest {
    let style = style_directive(data.style);
    let salary = data
        .salary_expectation
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(SALARY_NOT_GIVEN);

    let (cv_block, attachment) = match &data.cv {
        CvSource::Text(text) => (
            fill_template(CV_TEXT_BLOCK, &[("cv_text", text.as_str())]),
            None,
        ),
        CvSource::File {
            content, mime_type, ..
        } => (
            CV_ATTACHMENT_BLOCK.to_string(),
            Some(Attachment {
                content: content.clone(),
                mime_type: mime_type.clone(),
            }),
        ),
    };

    let skills_block = render_skills(&data.ai_skills);

    let instruction = fill_template(
        APPLICATION_PROMPT_TEMPLATE,
        &[
            ("output_language", settings.output_language.as_str()),
            ("company", data.company.as_str()),
            ("position", data.position.as_str()),
            ("salary", salary),
            ("style_label", style.label),
            ("style_guidance", style.guidance),
            ("email_register", email_register(data.tone)),
            ("cover_letter_register", cover_letter_register(data.tone)),
            ("skills_block", skills_block.as_str()),
            ("job_description", data.job_description.as_str()),
            ("cv_block", cv_block.as_str()),
        ],
    );

    GenerationRequest {
        instruction,
        attachment,
        response_schema: schema::response_schema(),
        config: GenerationConfig::default(),
    }
}

fn render_skills(skills: &AiSkills) -> String {
    skills
        .entries()
        .iter()
        .map(|(_, label, value)| format!("  {label}: {value}"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Replaces `{key}` placeholders in one left-to-right pass.
///
/// Substituted values are never re-scanned, so user text containing `{company}`
/// or similar stays literal. Unknown `{...}` sequences are copied through.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        let replaced = after.find('}').and_then(|close| {
            let key = &after[..close];
            values
                .iter()
                .find(|(k, _)| *k == key)
                .map(|(_, v)| (*v, close))
        });
        match replaced {
            Some((value, close)) => {
                out.push_str(value);
                rest = &after[close + 1..];
            }
            None => {
                out.push('{');
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}
