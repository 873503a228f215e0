//! JSON document agent: validates the payload and asks the model for
//! missing fields, anomalies and enhancement suggestions.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};

use crate::classifier::Format;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::memory::ConversationStore;

use super::{Content, ExtractionAgent, FailureReport, complete_json};

const SYSTEM_PROMPT: &str = "You are a precise JSON validator.";

/// JSON extraction agent.
pub struct JsonAgent {
    llm: Arc<dyn LlmProvider>,
}

impl JsonAgent {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

fn build_prompt(content: &str) -> String {
    format!(
        r#"Analyze this JSON document:
{{
    "validation": {{
        "missing_fields": ["list of expected but missing fields"],
        "anomalies": ["list of data anomalies"]
    }},
    "enhancements": {{
        "suggested_fields": ["list of recommended additional fields"],
        "normalization": ["suggested data formatting improvements"]
    }}
}}

JSON Content:
{content}

Rules:
1. For invoices: expect 'id', 'type', 'amount', 'currency', 'date', 'due_date'
2. For RFQs: expect 'items', 'delivery_date', 'payment_terms'
3. Return empty arrays if nothing is missing/anomalous

Return ONLY valid JSON. Do not include commentary or markdown formatting."#
    )
}

#[async_trait]
impl ExtractionAgent for JsonAgent {
    fn name(&self) -> &str {
        "json_processor"
    }

    fn format(&self) -> Format {
        Format::Json
    }

    fn success_step(&self) -> &str {
        "JSON processed successfully"
    }

    fn label(&self) -> &str {
        "JSON"
    }

    fn describe_failure(&self, err: &AgentError) -> FailureReport {
        match err {
            AgentError::InvalidJson(_) => FailureReport {
                message: format!("Invalid JSON: {err}"),
                step: "JSON validation failed".to_string(),
            },
            _ => FailureReport {
                message: format!("JSON processing failed: {err}"),
                step: "JSON processing failed".to_string(),
            },
        }
    }

    async fn extract(
        &self,
        content: &Content,
        _conversation_id: &str,
        _store: &ConversationStore,
    ) -> Result<Value, AgentError> {
        let text = content.as_text();
        let original: Value = serde_json::from_str(&text).map_err(AgentError::InvalidJson)?;

        let analysis = complete_json(self.llm.as_ref(), Some(SYSTEM_PROMPT), build_prompt(&text)).await?;

        Ok(json!({
            "original": original,
            "validation": analysis.get("validation").cloned().unwrap_or_else(|| json!({})),
            "enhancements": analysis.get("enhancements").cloned().unwrap_or_else(|| json!({})),
        }))
    }
}
