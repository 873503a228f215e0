//! Intake pipeline: one submission, end to end.
//!
//! Flow:
//! 1. Open a conversation record (source, timestamp, content preview)
//! 2. `ClassificationRouter::classify()` → record the classification
//! 3. Dispatch to the extraction agent registered for the format
//! 4. Read back the accumulated conversation record
//!
//! Each submission runs in the caller's own task; nothing is queued.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::{info, warn};
use uuid::Uuid;

use crate::agents::{AgentRegistry, Content, preview};
use crate::classifier::{ClassificationResult, ClassificationRouter};
use crate::error::PipelineError;
use crate::llm::LlmProvider;
use crate::memory::{ConversationStore, Record, record};

/// Characters of submitted content kept in the initial record.
const ORIGINAL_CONTENT_CHARS: usize = 1000;

/// Source label for pasted text.
pub const TEXT_INPUT_SOURCE: &str = "text_input";

/// Source label for an uploaded file.
pub fn file_source(file_name: &str) -> String {
    format!("file:{file_name}")
}

/// What a caller gets back for one submission.
#[derive(Debug, Clone, Serialize)]
pub struct IntakeOutcome {
    pub conversation_id: String,
    pub classification: ClassificationResult,
    /// Agent output (or `{"error": ...}`); `None` when no agent handles the format.
    pub result: Option<Value>,
    /// Accumulated conversation record after processing.
    pub history: Option<Record>,
}

/// Classification + extraction over a shared conversation store.
pub struct IntakePipeline {
    router: ClassificationRouter,
    agents: AgentRegistry,
    store: Arc<ConversationStore>,
}

impl IntakePipeline {
    pub fn new(router: ClassificationRouter, agents: AgentRegistry, store: Arc<ConversationStore>) -> Self {
        Self {
            router,
            agents,
            store,
        }
    }

    /// Router and default agents over one model.
    pub fn with_llm(llm: Arc<dyn LlmProvider>, store: Arc<ConversationStore>) -> Self {
        Self::new(
            ClassificationRouter::new(Arc::clone(&llm)),
            AgentRegistry::with_default_agents(llm),
            store,
        )
    }

    pub fn store(&self) -> &Arc<ConversationStore> {
        &self.store
    }

    pub fn router(&self) -> &ClassificationRouter {
        &self.router
    }

    /// Process one submission under a fresh conversation id.
    pub async fn run(&self, source: &str, content: Content) -> Result<IntakeOutcome, PipelineError> {
        let conversation_id = Uuid::new_v4().to_string();
        self.run_with_id(&conversation_id, source, content).await
    }

    /// Process one submission under `conversation_id`, which must be unused.
    pub async fn run_with_id(
        &self,
        conversation_id: &str,
        source: &str,
        content: Content,
    ) -> Result<IntakeOutcome, PipelineError> {
        let text = content.as_text().into_owned();

        info!(conversation_id, source, chars = text.chars().count(), "Processing submission");

        self.store
            .store(
                conversation_id,
                record(json!({
                    "source": source,
                    "upload_timestamp": Utc::now().to_rfc3339(),
                    "original_content": preview(&text, ORIGINAL_CONTENT_CHARS),
                    "processing_steps": [],
                })),
            )
            .await?;

        let classification = self.router.classify(source, &text).await;
        info!(
            conversation_id,
            format = %classification.format,
            intent = %classification.intent,
            "Submission classified"
        );

        self.store
            .append(
                conversation_id,
                record(json!({
                    "classification": classification,
                    "processing_steps": [format!(
                        "Classified as {} with intent {}",
                        classification.format, classification.intent
                    )],
                })),
            )
            .await;

        let result = match self.agents.get(classification.format) {
            Some(agent) => Some(agent.process(&content, conversation_id, &self.store).await),
            None => {
                warn!(
                    conversation_id,
                    format = %classification.format,
                    "No extraction agent registered for format"
                );
                self.store
                    .append(
                        conversation_id,
                        record(json!({
                            "processing_steps": [format!(
                                "No extraction agent for format {}",
                                classification.format
                            )],
                        })),
                    )
                    .await;
                None
            }
        };

        let history = self.store.retrieve(conversation_id).await;

        Ok(IntakeOutcome {
            conversation_id: conversation_id.to_string(),
            classification,
            result,
            history,
        })
    }

    /// Process several submissions concurrently.
    ///
    /// Returns one result per submission, in input order.
    pub async fn run_batch(
        &self,
        submissions: Vec<(String, Content)>,
    ) -> Vec<Result<IntakeOutcome, PipelineError>> {
        let count = submissions.len();
        let runs = submissions
            .into_iter()
            .map(|(source, content)| async move { self.run(&source, content).await });

        let results = futures::future::join_all(runs).await;
        for (index, result) in results.iter().enumerate() {
            if let Err(e) = result {
                tracing::error!(index, error = %e, "Failed to process submission in batch");
            }
        }

        let processed = results.iter().filter(|r| r.is_ok()).count();
        info!(processed, total = count, "Batch processing complete");
        results
    }
}
