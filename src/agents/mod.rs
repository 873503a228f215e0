//! Format-specific extraction agents.
//!
//! Every agent records what happened in the conversation store, success or
//! failure, and never lets an error escape: failures come back as
//! `{"error": "..."}` with a matching `processing_steps` entry.

pub mod email;
pub mod json;
pub mod pdf;

pub use email::EmailAgent;
pub use json::JsonAgent;
pub use pdf::PdfAgent;

use std::borrow::Cow;
use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::classifier::Format;
use crate::error::AgentError;
use crate::llm::{ChatMessage, CompletionRequest, LlmProvider, extract_json_object};
use crate::memory::{ConversationStore, record};

/// Temperature for extraction calls.
const EXTRACTION_TEMPERATURE: f32 = 0.1;

// ── Content ─────────────────────────────────────────────────────────

/// Submitted content: pasted text or uploaded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    Text(String),
    Bytes(Vec<u8>),
}

impl Content {
    /// Text view (invalid UTF-8 is replaced).
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Self::Text(s) => Cow::Borrowed(s),
            Self::Bytes(b) => String::from_utf8_lossy(b),
        }
    }
}

impl From<String> for Content {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for Content {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<Vec<u8>> for Content {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

/// First `max` characters of `text`, with `"..."` appended when truncated.
pub fn preview(text: &str, max: usize) -> String {
    if text.chars().count() > max {
        let head: String = text.chars().take(max).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}

// ── Agent trait ─────────────────────────────────────────────────────

/// Step and error text recorded for a failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReport {
    pub message: String,
    pub step: String,
}

/// A format-specific extractor.
#[async_trait]
pub trait ExtractionAgent: Send + Sync {
    /// Agent name recorded under the `agent` key (e.g. `"email_processor"`).
    fn name(&self) -> &str;

    /// Format this agent handles.
    fn format(&self) -> Format;

    /// Step recorded on success.
    fn success_step(&self) -> &str;

    /// Label used in failure messages (e.g. `"Email"`).
    fn label(&self) -> &str;

    /// Produce the structured extraction. May write intermediate records.
    async fn extract(
        &self,
        content: &Content,
        conversation_id: &str,
        store: &ConversationStore,
    ) -> Result<Value, AgentError>;

    /// Error text and trace step for `err`.
    fn describe_failure(&self, err: &AgentError) -> FailureReport {
        FailureReport {
            message: format!("{} processing failed: {err}", self.label()),
            step: format!("{} processing failed", self.label()),
        }
    }

    /// Run the agent and record the outcome.
    ///
    /// Returns the extraction, or `{"error": "..."}` on failure.
    async fn process(
        &self,
        content: &Content,
        conversation_id: &str,
        store: &ConversationStore,
    ) -> Value {
        match self.extract(content, conversation_id, store).await {
            Ok(result) => {
                store
                    .append(
                        conversation_id,
                        record(json!({
                            "agent": self.name(),
                            "results": result.clone(),
                            "processing_steps": [self.success_step()],
                        })),
                    )
                    .await;
                info!(conversation_id, agent = self.name(), "Extraction completed");
                result
            }
            Err(e) => {
                let report = self.describe_failure(&e);
                warn!(
                    conversation_id,
                    agent = self.name(),
                    error = %report.message,
                    "Extraction failed"
                );
                store
                    .append(
                        conversation_id,
                        record(json!({
                            "agent": self.name(),
                            "error": report.message,
                            "processing_steps": [report.step],
                        })),
                    )
                    .await;
                json!({ "error": report.message })
            }
        }
    }
}

// ── Registry ────────────────────────────────────────────────────────

/// Agents keyed by the format they handle.
#[derive(Default, Clone)]
pub struct AgentRegistry {
    agents: HashMap<Format, Arc<dyn ExtractionAgent>>,
}

impl AgentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Email, JSON and PDF agents sharing one model.
    pub fn with_default_agents(llm: Arc<dyn LlmProvider>) -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(EmailAgent::new(Arc::clone(&llm))));
        registry.register(Arc::new(JsonAgent::new(Arc::clone(&llm))));
        registry.register(Arc::new(PdfAgent::new(llm)));
        registry
    }

    /// Register an agent for its format, replacing any previous one.
    pub fn register(&mut self, agent: Arc<dyn ExtractionAgent>) {
        self.agents.insert(agent.format(), agent);
    }

    pub fn get(&self, format: Format) -> Option<Arc<dyn ExtractionAgent>> {
        self.agents.get(&format).cloned()
    }
}

// ── Shared model call ───────────────────────────────────────────────

/// Ask the model for a JSON object and parse it.
pub(crate) async fn complete_json(
    llm: &dyn LlmProvider,
    system_prompt: Option<&str>,
    user_prompt: String,
) -> Result<Value, AgentError> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system_prompt {
        messages.push(ChatMessage::system(system));
    }
    messages.push(ChatMessage::user(user_prompt));

    let request = CompletionRequest::new(messages)
        .with_temperature(EXTRACTION_TEMPERATURE)
        .with_json_output();

    let response = llm.complete(request).await?;
    let json_str = extract_json_object(&response.content);
    let value: Value = serde_json::from_str(&json_str)
        .map_err(|e| AgentError::MalformedOutput(format!("JSON parse error: {e}")))?;

    if !value.is_object() {
        return Err(AgentError::MalformedOutput(
            "expected a JSON object".to_string(),
        ));
    }
    Ok(value)
}

#[cfg(test)]
pub(crate) mod test_support {
    //! Mock model shared by the agent tests.

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, FinishReason, LlmProvider};

    /// Returns a canned response (or a failure) and records every request.
    pub struct MockLlm {
        response: Option<String>,
        pub requests: Mutex<Vec<CompletionRequest>>,
    }

    impl MockLlm {
        pub fn replying(response: &str) -> Self {
            Self {
                response: Some(response.to_string()),
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn failing() -> Self {
            Self {
                response: None,
                requests: Mutex::new(Vec::new()),
            }
        }

        pub fn last_prompt(&self) -> String {
            let requests = self.requests.lock().unwrap();
            requests
                .last()
                .and_then(|r| r.messages.last())
                .map(|m| m.content.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl LlmProvider for MockLlm {
        fn model_name(&self) -> &str {
            "mock"
        }

        async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.requests.lock().unwrap().push(request);
            match &self.response {
                Some(content) => Ok(CompletionResponse {
                    content: content.clone(),
                    input_tokens: 10,
                    output_tokens: 10,
                    finish_reason: FinishReason::Stop,
                }),
                None => Err(LlmError::RequestFailed {
                    provider: "mock".into(),
                    reason: "connection refused".into(),
                }),
            }
        }
    }
}
