//! Submission validation: the only gate between the wire form and the composer.
//!
//! Turns an `ApplicationForm` into an `ApplicationData` or fails with
//! `GenerationError::InvalidRequest`. Nothing reaches the gateway unless it
//! passes here.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use bytes::Bytes;
use serde::Deserialize;

use crate::application::models::{
    AiSkills, ApplicationData, CvSource, Style, Tone, SKILL_MAX, SKILL_MIN,
};
use crate::gateway::GenerationError;

/// MIME type assumed when the client sends none.
pub const DEFAULT_CV_MIME_TYPE: &str = "application/pdf";

/// Document formats accepted as CV attachments.
pub const ALLOWED_CV_MIME_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

/// Size and length limits applied before dispatch.
#[derive(Debug, Clone, Copy)]
pub struct SubmissionLimits {
    pub job_description_max_chars: usize,
    pub cv_file_max_bytes: usize,
}

impl Default for SubmissionLimits {
    fn default() -> Self {
        Self {
            job_description_max_chars: 1500,
            cv_file_max_bytes: 3 * 1024 * 1024,
        }
    }
}

/// CV file as sent by the browser form.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CvFileForm {
    pub base64: String,
    #[serde(default)]
    pub mime_type: String,
    #[serde(default)]
    pub file_name: String,
}

/// Raw form contents. Every field is as the user left it.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationForm {
    #[serde(default, alias = "cvData")]
    pub cv_text: Option<String>,
    pub cv_file: Option<CvFileForm>,
    #[serde(default, alias = "jdData")]
    pub job_description: String,
    #[serde(default)]
    pub company: String,
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub salary: Option<String>,
    #[serde(default)]
    pub style: Style,
    #[serde(default)]
    pub tone: Tone,
    #[serde(default)]
    pub ai_skills: AiSkills,
}

fn invalid(message: impl Into<String>) -> GenerationError {
    GenerationError::InvalidRequest(message.into())
}

/// Validates a submission and builds the immutable `ApplicationData`.
///
/// An attached file takes precedence over pasted CV text.
pub fn validate_submission(
    form: ApplicationForm,
    limits: &SubmissionLimits,
) -> Result<ApplicationData, GenerationError> {
    let job_description = form.job_description.trim().to_string();
    if job_description.is_empty() {
        return Err(invalid("job description is required"));
    }
    let jd_chars = job_description.chars().count();
    if jd_chars > limits.job_description_max_chars {
        return Err(invalid(format!(
            "job description is {jd_chars} characters; the limit is {}",
            limits.job_description_max_chars
        )));
    }

    let company = required_field(&form.company, "company")?;
    let position = required_field(&form.position, "position")?;

    validate_skills(&form.ai_skills)?;

    let cv = match form.cv_file {
        Some(file) => decode_cv_file(file, limits)?,
        None => {
            let text = form.cv_text.as_deref().map(str::trim).unwrap_or_default();
            if text.is_empty() {
                return Err(invalid("provide the CV either as text or as an uploaded file"));
            }
            CvSource::Text(text.to_string())
        }
    };

    let salary_expectation = form
        .salary
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty());

    Ok(ApplicationData {
        cv,
        job_description,
        company,
        position,
        salary_expectation,
        style: form.style,
        tone: form.tone,
        ai_skills: form.ai_skills,
    })
}

fn required_field(value: &str, name: &str) -> Result<String, GenerationError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(invalid(format!("{name} is required")));
    }
    Ok(value.to_string())
}

fn validate_skills(skills: &AiSkills) -> Result<(), GenerationError> {
    for (key, _, value) in skills.entries() {
        if !(SKILL_MIN..=SKILL_MAX).contains(&value) {
            return Err(invalid(format!(
                "aiSkills.{key} must be between {SKILL_MIN} and {SKILL_MAX}, got {value}"
            )));
        }
    }
    Ok(())
}

fn decode_cv_file(
    file: CvFileForm,
    limits: &SubmissionLimits,
) -> Result<CvSource, GenerationError> {
    // A FileReader data URL looks like "data:application/pdf;base64,JVBERi0..."
    let encoded = match file.base64.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => file.base64.as_str(),
    };
    let encoded: String = encoded.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    let content = STANDARD
        .decode(encoded.as_bytes())
        .map_err(|e| invalid(format!("CV file is not valid base64: {e}")))?;

    if content.is_empty() {
        return Err(invalid("CV file is empty"));
    }
    if content.len() > limits.cv_file_max_bytes {
        return Err(invalid(format!(
            "CV file is {} bytes; the limit is {} bytes",
            content.len(),
            limits.cv_file_max_bytes
        )));
    }

    let mime_type = match file.mime_type.trim() {
        "" => DEFAULT_CV_MIME_TYPE.to_string(),
        other => other.to_ascii_lowercase(),
    };
    if !ALLOWED_CV_MIME_TYPES.contains(&mime_type.as_str()) {
        return Err(invalid(format!(
            "CV file type '{mime_type}' is not supported; upload a PDF or Word document"
        )));
    }

    let file_name = match file.file_name.trim() {
        "" => "cv".to_string(),
        other => other.to_string(),
    };

    Ok(CvSource::File {
        content: Bytes::from(content),
        mime_type,
        file_name,
    })
}
