//! Error types for doc-intake.

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// LLM provider errors.
#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("Provider {provider} request failed: {reason}")]
    RequestFailed { provider: String, reason: String },

    #[error("Provider {provider} rate limited")]
    RateLimited { provider: String },

    #[error("Invalid response from {provider}: {reason}")]
    InvalidResponse { provider: String, reason: String },

    #[error("Authentication failed for provider {provider}")]
    AuthFailed { provider: String },

    #[error("Provider {provider} returned no choices")]
    EmptyResponse { provider: String },
}

/// Conversation store errors.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Conversation {id} already exists; use append to update it")]
    AlreadyExists { id: String },
}

/// Failures inside an extraction agent.
///
/// Never escapes `ExtractionAgent::process`; converted into an `{"error": ...}` result.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error("{0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("No extractable content found")]
    EmptyContent,

    #[error("binary documents must be decoded to text before extraction")]
    UnsupportedBinary,

    #[error("{0}")]
    Llm(#[from] LlmError),

    #[error("model returned malformed output: {0}")]
    MalformedOutput(String),
}

/// Intake pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("Store failed: {0}")]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_error_names_conversation() {
        let err = StoreError::AlreadyExists { id: "abc".into() };
        assert!(err.to_string().contains("abc"));
    }

    #[test]
    fn pipeline_error_wraps_store_error() {
        let err = PipelineError::from(StoreError::AlreadyExists { id: "x".into() });
        assert!(err.to_string().starts_with("Store failed: Conversation x already exists"));
    }

    #[test]
    fn agent_error_from_llm_error() {
        let err: AgentError = LlmError::EmptyResponse {
            provider: "groq".into(),
        }
        .into();
        assert_eq!(err.to_string(), "Provider groq returned no choices");
    }
}
