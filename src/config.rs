//! Configuration types.

use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;
use crate::llm::LlmConfig;

/// Default model used for fallback classification and extraction.
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Default OpenAI-compatible endpoint (Groq).
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default HTTP timeout for model calls, in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Intake configuration, loaded from the environment.
#[derive(Debug, Clone)]
pub struct IntakeConfig {
    /// External model settings.
    pub llm: LlmConfig,
}

impl IntakeConfig {
    /// Load configuration from environment variables (and `.env`, if present).
    ///
    /// - `GROQ_API_KEY` (required)
    /// - `INTAKE_MODEL`
    /// - `INTAKE_LLM_BASE_URL`
    /// - `INTAKE_LLM_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("GROQ_API_KEY")
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingEnvVar("GROQ_API_KEY".to_string()))?;

        let model = lookup("INTAKE_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let base_url =
            lookup("INTAKE_LLM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let timeout_secs = match lookup("INTAKE_LLM_TIMEOUT_SECS") {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidValue {
                key: "INTAKE_LLM_TIMEOUT_SECS".to_string(),
                message: e.to_string(),
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            llm: LlmConfig {
                api_key: SecretString::from(api_key),
                model,
                base_url,
                timeout: Duration::from_secs(timeout_secs),
            },
        })
    }
}
