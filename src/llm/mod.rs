//! External model integration.
//!
//! The only backend is an OpenAI-compatible chat completions endpoint
//! (Groq by default). Everything else talks to `dyn LlmProvider`, so tests
//! and alternative backends plug in without touching callers.

pub mod groq;
pub mod provider;

pub use groq::GroqProvider;
pub use provider::*;

use std::sync::Arc;
use std::time::Duration;

use crate::error::LlmError;

/// Configuration for creating an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: secrecy::SecretString,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

/// Create an LLM provider from configuration.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = GroqProvider::new(config)?;
    tracing::info!("Using OpenAI-compatible endpoint {} (model: {})", config.base_url, config.model);
    Ok(Arc::new(provider))
}

/// Extract a JSON object from model output (handles markdown wrapping and prose).
pub fn extract_json_object(text: &str) -> String {
    let trimmed = text.trim();

    if trimmed.starts_with('{') {
        return trimmed.to_string();
    }

    if let Some(start) = trimmed.find("```json") {
        let after = &trimmed[start + 7..];
        if let Some(end) = after.find("```") {
            return after[..end].trim().to_string();
        }
    }

    if let Some(start) = trimmed.find("```") {
        let after = &trimmed[start + 3..];
        if let Some(end) = after.find("```") {
            let inner = after[..end].trim();
            if inner.starts_with('{') {
                return inner.to_string();
            }
        }
    }

    if let (Some(start), Some(end)) = (trimmed.find('{'), trimmed.rfind('}'))
        && end > start
    {
        return trimmed[start..=end].to_string();
    }

    trimmed.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_provider_reports_model() {
        let config = LlmConfig {
            api_key: secrecy::SecretString::from("gsk-test"),
            model: "llama3-70b-8192".to_string(),
            base_url: "https://api.groq.com/openai/v1".to_string(),
            timeout: Duration::from_secs(5),
        };
        let provider = create_provider(&config).unwrap();
        assert_eq!(provider.model_name(), "llama3-70b-8192");
    }

    #[test]
    fn extract_json_direct_object() {
        let input = r#"{"document_type": "invoice"}"#;
        assert_eq!(extract_json_object(input), input);
    }

    #[test]
    fn extract_json_from_markdown_block() {
        let input = "```json\n{\"Urgency\": \"high\"}\n```";
        let result = extract_json_object(input);
        assert!(result.starts_with('{'));
        assert!(result.contains("high"));
    }

    #[test]
    fn extract_json_from_bare_fence() {
        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json_object(input), "{\"a\": 1}");
    }

    #[test]
    fn extract_json_embedded_in_text() {
        let input = "Here you go: {\"anomalies\": []} hope that helps.";
        let result = extract_json_object(input);
        assert!(result.starts_with('{'));
        assert!(result.ends_with('}'));
    }
}
