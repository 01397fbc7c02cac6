//! Domain types shared by validation, the composer and the gateway.

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

// ────────────────────────────────────────────────────────────────────────────
// Form inputs
// ────────────────────────────────────────────────────────────────────────────

/// Tonal preset for the generated materials.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Style {
    #[default]
    Professional,
    SolutionOriented,
    Innovator,
    Storyteller,
    DataDriven,
    Minimalist,
    Concise,
}

impl Style {
    pub const ALL: [Style; 7] = [
        Style::Professional,
        Style::SolutionOriented,
        Style::Innovator,
        Style::Storyteller,
        Style::DataDriven,
        Style::Minimalist,
        Style::Concise,
    ];
}

/// Register of address used in the email body.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tone {
    Informal,
    #[default]
    Formal,
    Business,
}

impl Tone {
    pub const ALL: [Tone; 3] = [Tone::Informal, Tone::Formal, Tone::Business];
}

/// Self-rated AI competencies, each on a 1–5 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiSkills {
    pub llm: u8,
    pub prompting: u8,
    #[serde(alias = "visualAI")]
    pub visual_ai: u8,
    pub automation: u8,
    pub analysis: u8,
}

pub const SKILL_MIN: u8 = 1;
pub const SKILL_MAX: u8 = 5;

impl Default for AiSkills {
    fn default() -> Self {
        Self {
            llm: 3,
            prompting: 3,
            visual_ai: 1,
            automation: 2,
            analysis: 3,
        }
    }
}

impl AiSkills {
    /// Wire key, human label and rating for each competency, in display order.
    pub fn entries(&self) -> [(&'static str, &'static str, u8); 5] {
        [
            ("llm", "Text LLMs", self.llm),
            ("prompting", "Prompt engineering", self.prompting),
            ("visualAi", "Visual AI", self.visual_ai),
            ("automation", "Automation", self.automation),
            ("analysis", "Data analysis", self.analysis),
        ]
    }
}

/// Where the CV comes from. Exactly one source exists per submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvSource {
    Text(String),
    File {
        content: Bytes,
        mime_type: String,
        file_name: String,
    },
}

/// A validated generation request as entered by the user.
/// Built fresh per submission and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplicationData {
    pub cv: CvSource,
    pub job_description: String,
    pub company: String,
    pub position: String,
    pub salary_expectation: Option<String>,
    pub style: Style,
    pub tone: Tone,
    pub ai_skills: AiSkills,
}

// ────────────────────────────────────────────────────────────────────────────
// Backend output
// ────────────────────────────────────────────────────────────────────────────

/// One competency scored against the job description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillMatch {
    pub label: String,
    /// 0 – 100. Float scores are rounded, out-of-range values clamped.
    #[serde(deserialize_with = "deserialize_score")]
    pub score: u8,
}

/// The generated application package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub subject: String,
    /// Expected to run past ~1000 characters; not enforced.
    pub email_body: String,
    pub cover_letter: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary_note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cv_analysis: Option<String>,
    pub skill_alignment: Vec<SkillMatch>,
}

fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, 100.0) as u8)
}
