//! Classification router: one decision per submission.
//!
//! Order (first match wins):
//! 1. Document JSON → `json` + JSON intent heuristics
//! 2. PDF-like text → `pdf` + PDF intent heuristics
//! 3. Otherwise → fallback classifier decides both labels
//!
//! The router never touches the conversation store; callers record the result.

use std::sync::Arc;

use tracing::debug;

use crate::llm::LlmProvider;

use super::detectors::{is_document_json, matching_pdf_signature};
use super::fallback::FallbackClassifier;
use super::intent::{json_intent, pdf_intent};
use super::types::{ClassificationResult, Format};

/// Layered format/intent classifier.
pub struct ClassificationRouter {
    fallback: FallbackClassifier,
}

impl ClassificationRouter {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self {
            fallback: FallbackClassifier::new(llm),
        }
    }

    /// Classify `content` submitted from `source`.
    pub async fn classify(&self, source: &str, content: &str) -> ClassificationResult {
        if is_document_json(content) {
            let intent = json_intent(content);
            debug!(source, %intent, "Document JSON detected, skipping fallback");
            return ClassificationResult::new(Format::Json, intent, source);
        }

        if let Some(signature) = matching_pdf_signature(content) {
            let intent = pdf_intent(content);
            debug!(
                source,
                signature = signature.name,
                %intent,
                "PDF signature matched, skipping fallback"
            );
            return ClassificationResult::new(Format::Pdf, intent, source);
        }

        debug!(source, "No structural signature, using fallback classifier");
        let (format, intent) = self.fallback.classify(content).await;
        ClassificationResult::new(format, intent, source)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::classifier::types::Intent;
    use crate::error::LlmError;
    use crate::llm::{CompletionRequest, CompletionResponse, FinishReason};

    /// Mock LLM that answers every prompt with the same text and counts calls.
    struct FixedLlm {
        answer: &'static str,
        calls: AtomicUsize,
    }

    impl FixedLlm {
        fn new(answer: &'static str) -> Arc<Self> {
            Arc::new(Self {
                answer,
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmProvider for FixedLlm {
        fn model_name(&self) -> &str {
            "fixed"
        }

        async fn complete(&self, _request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CompletionResponse {
                content: self.answer.to_string(),
                input_tokens: 0,
                output_tokens: 1,
                finish_reason: FinishReason::Stop,
            })
        }
    }

    #[tokio::test]
    async fn invoice_json_end_to_end() {
        let llm = FixedLlm::new("pdf");
        let router = ClassificationRouter::new(llm.clone());
        let result = router
            .classify(
                "file:inv.json",
                r#"{"id":"INV-1","total": 500, "due_date":"2024-01-01"}"#,
            )
            .await;
        assert_eq!(result, ClassificationResult::new(Format::Json, Intent::Invoice, "file:inv.json"));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn json_never_falls_through_even_with_pdf_text_inside() {
        let llm = FixedLlm::new("email");
        let router = ClassificationRouter::new(llm.clone());
        let result = router
            .classify("text_input", r#"{"subject": "Invoice page 1 of 2"}"#)
            .await;
        assert_eq!(result.format, Format::Json);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn pagination_routes_to_pdf() {
        let router = ClassificationRouter::new(FixedLlm::new("text"));
        let result = router
            .classify("text_input", "Quarterly report\nPage 1 of 3")
            .await;
        assert_eq!(result.format, Format::Pdf);
        assert_eq!(result.intent, Intent::Other);
    }

    #[tokio::test]
    async fn rfq_text_routes_to_pdf_rfq() {
        let router = ClassificationRouter::new(FixedLlm::new("text"));
        let result = router
            .classify(
                "text_input",
                "Request for Quotation - items: 10 units @ $5.00, page 1 of 1",
            )
            .await;
        assert_eq!(result.format, Format::Pdf);
        assert_eq!(result.intent, Intent::Rfq);
    }

    #[tokio::test]
    async fn pdf_with_invoice_keyword_is_invoice() {
        let router = ClassificationRouter::new(FixedLlm::new("text"));
        let result = router
            .classify("text_input", "Quotation for 10 units @ $5.00\nTotal: $50.00")
            .await;
        assert_eq!(result.format, Format::Pdf);
        assert_eq!(result.intent, Intent::Invoice);
    }

    #[tokio::test]
    async fn unstructured_text_uses_fallback() {
        let llm = FixedLlm::new("bogus_label");
        let router = ClassificationRouter::new(llm.clone());
        let result = router.classify("text_input", "hello world").await;
        assert_eq!(result, ClassificationResult::new(Format::Text, Intent::Other, "text_input"));
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn config_json_uses_fallback() {
        let llm = FixedLlm::new("json");
        let router = ClassificationRouter::new(llm.clone());
        let result = router.classify("text_input", r#"{"port": 8080}"#).await;
        assert_eq!(result.format, Format::Json);
        assert_eq!(result.intent, Intent::Other);
        assert_eq!(llm.calls.load(Ordering::SeqCst), 2);
    }
}
