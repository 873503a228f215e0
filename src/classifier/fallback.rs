//! Model-backed fallback classification for content no detector recognized.
//!
//! Two independent single-word prompts (format, intent). Any failure or
//! out-of-set answer degrades to `text` / `Other`; this classifier never errors.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::error::LlmError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider};

use super::types::{Format, Intent};

/// Characters of content included in each prompt.
pub const PROMPT_CONTENT_CHARS: usize = 2000;

/// Near-deterministic sampling.
const CLASSIFY_TEMPERATURE: f32 = 0.1;

/// One-word answers only.
const CLASSIFY_MAX_TOKENS: u32 = 10;

/// Format used when the model is unavailable or answers off-list.
pub const DEFAULT_FORMAT: Format = Format::Text;

/// Intent used when the model is unavailable or answers off-list.
pub const DEFAULT_INTENT: Intent = Intent::Other;

/// Fallback classifier over an external text model.
pub struct FallbackClassifier {
    llm: Arc<dyn LlmProvider>,
}

impl FallbackClassifier {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }

    /// Classify format and intent. Always returns labels from the closed sets.
    pub async fn classify(&self, content: &str) -> (Format, Intent) {
        let excerpt: String = content.chars().take(PROMPT_CONTENT_CHARS).collect();

        let format = match self.ask(build_format_prompt(&excerpt)).await {
            Ok(raw) => parse_format(&raw),
            Err(e) => {
                warn!(error = %e, "Format classification call failed, using default");
                DEFAULT_FORMAT
            }
        };

        let intent = match self.ask(build_intent_prompt(&excerpt)).await {
            Ok(raw) => parse_intent(&raw),
            Err(e) => {
                warn!(error = %e, "Intent classification call failed, using default");
                DEFAULT_INTENT
            }
        };

        debug!(%format, %intent, model = self.llm.model_name(), "Fallback classification");
        (format, intent)
    }

    async fn ask(&self, prompt: String) -> Result<String, LlmError> {
        let request = CompletionRequest::new(vec![ChatMessage::user(prompt)])
            .with_temperature(CLASSIFY_TEMPERATURE)
            .with_max_tokens(CLASSIFY_MAX_TOKENS);
        let response = self.llm.complete(request).await?;
        Ok(response.content)
    }
}

fn build_format_prompt(excerpt: &str) -> String {
    format!(
        "Classify this content's format (respond ONLY with one word):\n\
         Options: pdf, json, email, text\n\
         Content: {excerpt}"
    )
}

fn build_intent_prompt(excerpt: &str) -> String {
    format!(
        "Classify this content's intent (respond ONLY with one word):\n\
         Options: Invoice, RFQ, Complaint, Regulation, Other\n\
         Content: {excerpt}"
    )
}

/// Trim and lowercase, then require an exact format label.
fn parse_format(raw: &str) -> Format {
    let label = raw.trim().to_lowercase();
    label.parse().unwrap_or_else(|_| {
        warn!(raw = %raw, "Model returned unknown format label");
        DEFAULT_FORMAT
    })
}

/// Trim, then require an exact (case-sensitive) intent label.
fn parse_intent(raw: &str) -> Intent {
    raw.trim().parse().unwrap_or_else(|_| {
        warn!(raw = %raw, "Model returned unknown intent label");
        DEFAULT_INTENT
    })
}
