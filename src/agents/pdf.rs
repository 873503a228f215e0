//! PDF agent: document type, key entities and anomalies from PDF text.
//!
//! Accepts pasted text or uploaded bytes that are already text. Decoding
//! binary PDF streams happens upstream, before content reaches the router.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Value, json};
use tracing::debug;

use crate::classifier::Format;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::memory::{ConversationStore, record};

use super::{Content, ExtractionAgent, complete_json, preview};

/// Characters of document text kept in the conversation record.
const SAMPLE_CHARS: usize = 1000;

/// Characters of document text sent to the model.
const PROMPT_CONTENT_CHARS: usize = 15_000;

/// PDF extraction agent.
pub struct PdfAgent {
    llm: Arc<dyn LlmProvider>,
}

impl PdfAgent {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

/// Text of the document, and whether it was pasted.
fn document_text(content: &Content) -> Result<(String, bool), AgentError> {
    let (text, pasted) = match content {
        Content::Text(s) => (s.clone(), true),
        Content::Bytes(b) => {
            let text = std::str::from_utf8(b).map_err(|_| AgentError::UnsupportedBinary)?;
            (text.to_string(), false)
        }
    };

    if text.trim().is_empty() {
        return Err(AgentError::EmptyContent);
    }
    Ok((text, pasted))
}

fn build_prompt(text: &str, pasted: bool) -> String {
    let kind = if pasted { "pasted text" } else { "PDF document" };
    let excerpt: String = text.chars().take(PROMPT_CONTENT_CHARS).collect();
    format!(
        "Analyze this {kind}:\n\
         1. Document type (invoice, contract, report, etc.)\n\
         2. Key entities (names, dates, amounts)\n\
         3. Anomalies or special formatting\n\n\
         Return JSON with:\n\
         - document_type: string\n\
         - key_entities: dict\n\
         - anomalies: array\n\n\
         Content:\n{excerpt}"
    )
}

#[async_trait]
impl ExtractionAgent for PdfAgent {
    fn name(&self) -> &str {
        "pdf_processor"
    }

    fn format(&self) -> Format {
        Format::Pdf
    }

    fn success_step(&self) -> &str {
        "PDF analysis completed"
    }

    fn label(&self) -> &str {
        "PDF"
    }

    async fn extract(
        &self,
        content: &Content,
        conversation_id: &str,
        store: &ConversationStore,
    ) -> Result<Value, AgentError> {
        let (text, pasted) = document_text(content)?;

        store
            .append(
                conversation_id,
                record(json!({
                    "pdf_text_sample": preview(&text, SAMPLE_CHARS),
                    "is_pasted_text": pasted,
                    "processing_steps": ["PDF content extracted"],
                })),
            )
            .await;
        debug!(conversation_id, chars = text.chars().count(), pasted, "PDF text extracted");

        // The model's object is kept whole, including fields beyond the three asked for.
        complete_json(self.llm.as_ref(), None, build_prompt(&text, pasted)).await
    }
}
