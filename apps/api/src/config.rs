use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use chrono::Duration;

use crate::application::validation::SubmissionLimits;
use crate::composer::ComposerSettings;
use crate::gateway::gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
/// Every variable is optional; malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Server-side fallback credential, used when a request brings none.
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub output_language: String,
    pub jd_max_chars: usize,
    pub cv_file_max_bytes: usize,
    /// How long a stored credential stays usable. Always positive.
    pub credential_ttl: Duration,
    /// Single allowed CORS origin. Permissive when unset.
    pub cors_allow_origin: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        let limits = SubmissionLimits::default();
        Config {
            port: 8080,
            rust_log: "info".to_string(),
            gemini_api_key: None,
            gemini_base_url: DEFAULT_BASE_URL.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            output_language: ComposerSettings::default().output_language,
            jd_max_chars: limits.job_description_max_chars,
            cv_file_max_bytes: limits.cv_file_max_bytes,
            credential_ttl: Duration::hours(24),
            cors_allow_origin: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let defaults = Config::default();
        Ok(Config {
            port: parse_env("PORT", defaults.port)?,
            rust_log: std::env::var("RUST_LOG").unwrap_or(defaults.rust_log),
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_base_url: optional_env("GEMINI_BASE_URL").unwrap_or(defaults.gemini_base_url),
            gemini_model: optional_env("GEMINI_MODEL").unwrap_or(defaults.gemini_model),
            output_language: optional_env("OUTPUT_LANGUAGE").unwrap_or(defaults.output_language),
            jd_max_chars: parse_env("JD_MAX_CHARS", defaults.jd_max_chars)?,
            cv_file_max_bytes: parse_env("CV_FILE_MAX_BYTES", defaults.cv_file_max_bytes)?,
            credential_ttl: credential_ttl(parse_env(
                "CREDENTIAL_TTL_SECS",
                defaults.credential_ttl.num_seconds(),
            )?)?,
            cors_allow_origin: optional_env("CORS_ALLOW_ORIGIN"),
        })
    }

    pub fn submission_limits(&self) -> SubmissionLimits {
        SubmissionLimits {
            job_description_max_chars: self.jd_max_chars,
            cv_file_max_bytes: self.cv_file_max_bytes,
        }
    }

    pub fn composer_settings(&self) -> ComposerSettings {
        ComposerSettings {
            output_language: self.output_language.clone(),
        }
    }

    /// Request body limit: a base64-encoded CV of the maximum size plus room
    /// for the rest of the form.
    pub fn max_body_bytes(&self) -> usize {
        self.cv_file_max_bytes.div_ceil(3) * 4 + 64 * 1024
    }
}

/// Reads a variable, treating unset and blank the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_env<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match optional_env(key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Environment variable '{key}' has invalid value '{raw}'")),
        None => Ok(default),
    }
}

fn credential_ttl(secs: i64) -> Result<Duration> {
    if secs <= 0 {
        return Err(anyhow!(
            "Environment variable 'CREDENTIAL_TTL_SECS' must be positive, got {secs}"
        ));
    }
    Duration::try_seconds(secs)
        .ok_or_else(|| anyhow!("Environment variable 'CREDENTIAL_TTL_SECS' is out of range: {secs}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_form_limits() {
        let config = Config::default();
        assert_eq!(config.jd_max_chars, 1500);
        assert_eq!(config.cv_file_max_bytes, 3 * 1024 * 1024);
        assert_eq!(config.credential_ttl.num_seconds(), 86_400);
        assert_eq!(config.gemini_model, "gemini-3-pro-preview");
        assert!(config.gemini_api_key.is_none());
    }

    #[test]
    fn test_body_limit_fits_base64_cv() {
        let config = Config {
            cv_file_max_bytes: 3,
            ..Config::default()
        };
        assert_eq!(config.max_body_bytes(), 4 + 64 * 1024);

        let config = Config::default();
        assert!(config.max_body_bytes() > config.cv_file_max_bytes * 4 / 3);
    }

    #[test]
    fn test_parse_env_reports_variable_name() {
        std::env::set_var("HR_MAGNET_TEST_PORT", "not-a-port");
        let err = parse_env::<u16>("HR_MAGNET_TEST_PORT", 8080).unwrap_err();
        assert!(err.to_string().contains("HR_MAGNET_TEST_PORT"));
        std::env::remove_var("HR_MAGNET_TEST_PORT");
    }

    #[test]
    fn test_parse_env_uses_default_when_unset() {
        let value = parse_env::<usize>("HR_MAGNET_TEST_UNSET_VARIABLE", 42).unwrap();
        assert_eq!(value, 42);
    }

    #[test]
    fn test_credential_ttl_accepts_positive_seconds() {
        assert_eq!(credential_ttl(90).unwrap(), Duration::seconds(90));
    }

    #[test]
    fn test_credential_ttl_rejects_zero_and_negative() {
        for secs in [0, -5] {
            let err = credential_ttl(secs).unwrap_err();
            assert!(err.to_string().contains("CREDENTIAL_TTL_SECS"), "{secs}");
        }
    }

    #[test]
    fn test_credential_ttl_rejects_out_of_range() {
        let err = credential_ttl(i64::MAX).unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }
}
