//! Structural detectors: fixed-pattern format checks, no model involved.
//!
//! - Document JSON: strict JSON object carrying at least one document key
//! - PDF-like: any of five regex signatures (document number, line item,
//!   labeled total, pagination, document-type keyword)
//!
//! JSON always wins: content that is document JSON is never PDF-like, even
//! when a string value inside it matches a PDF signature.

use std::sync::LazyLock;

use regex::Regex;

/// Keys whose presence marks a JSON object as a business document.
pub const DOCUMENT_KEYS: [&str; 7] = ["id", "type", "date", "items", "from", "to", "subject"];

/// A named structural signature for PDF-like text.
#[derive(Debug)]
pub struct PdfSignature {
    /// Short name, used in logs.
    pub name: &'static str,
    /// Compiled, case-insensitive pattern.
    pub regex: Regex,
}

impl PdfSignature {
    fn new(name: &'static str, pattern: &str) -> Self {
        Self {
            name,
            regex: Regex::new(pattern).expect("built-in PDF signature must compile"),
        }
    }
}

static PDF_SIGNATURES: LazyLock<Vec<PdfSignature>> = LazyLock::new(|| {
    vec![
        // Leading token such as "INV-2024 #123" (start of content only)
        PdfSignature::new("document_number", r"(?i)^\s*[A-Z0-9\-_]+\s+#\d+"),
        // "10 units @ $5.00"
        PdfSignature::new("line_item", r"(?i)\b\d+\s+units?\s+@\s+\$\d+\.?\d*"),
        // "Total: $120.00", "Amount due: $15"
        PdfSignature::new(
            "monetary_total",
            r"(?i)\b(?:total|subtotal|amount due)\s*:\s*\$\d+\.?\d*",
        ),
        // "Page 2 of 5"
        PdfSignature::new("pagination", r"(?i)\bpage\s+\d+\s+of\s+\d+\b"),
        PdfSignature::new(
            "document_type",
            r"(?i)\b(?:invoice|receipt|contract|agreement)\b",
        ),
    ]
});

/// All built-in PDF signatures, in evaluation order.
pub fn pdf_signatures() -> &'static [PdfSignature] {
    &PDF_SIGNATURES
}

/// True if `content` parses as a JSON object with at least one document key.
///
/// Arrays, scalars, and objects without any of [`DOCUMENT_KEYS`] (e.g. config
/// blobs) are not documents.
pub fn is_document_json(content: &str) -> bool {
    match serde_json::from_str::<serde_json::Value>(content) {
        Ok(serde_json::Value::Object(map)) => DOCUMENT_KEYS.iter().any(|k| map.contains_key(*k)),
        _ => false,
    }
}

/// The first PDF signature `content` matches, ignoring document JSON.
pub fn matching_pdf_signature(content: &str) -> Option<&'static PdfSignature> {
    if is_document_json(content) {
        return None;
    }
    pdf_signatures().iter().find(|s| s.regex.is_match(content))
}

/// True if `content` looks like text extracted from a PDF document.
pub fn is_pdf_like(content: &str) -> bool {
    matching_pdf_signature(content).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── is_document_json ────────────────────────────────────────────

    #[test]
    fn document_json_with_id() {
        assert!(is_document_json(r#"{"id": "INV-1", "total": 500}"#));
    }

    #[test]
    fn document_json_with_email_keys() {
        assert!(is_document_json(r#"{"from": "a@x.com", "to": "b@x.com"}"#));
    }

    #[test]
    fn document_json_tolerates_surrounding_whitespace() {
        assert!(is_document_json("\n  {\"items\": []}  \n"));
    }

    #[test]
    fn config_json_is_not_a_document() {
        assert!(!is_document_json(r#"{"log_level": "debug", "port": 8080}"#));
    }

    #[test]
    fn json_array_is_not_a_document() {
        assert!(!is_document_json(r#"[{"id": 1}]"#));
    }

    #[test]
    fn invalid_json_is_not_a_document() {
        assert!(!is_document_json("{id: 1}"));
        assert!(!is_document_json("hello world"));
        assert!(!is_document_json(""));
    }

    #[test]
    fn nested_document_key_does_not_count() {
        assert!(!is_document_json(r#"{"meta": {"id": 1}}"#));
    }

    // ── is_pdf_like ─────────────────────────────────────────────────

    #[test]
    fn detects_document_number() {
        let sig = matching_pdf_signature("PO-7781 #42\nShip to: Warehouse 3").unwrap();
        assert_eq!(sig.name, "document_number");
    }

    #[test]
    fn document_number_only_at_start() {
        assert!(!is_pdf_like("See attached PO-7781 #42 for context"));
    }

    #[test]
    fn detects_line_item() {
        let sig = matching_pdf_signature("Widgets: 10 units @ $5.00 each").unwrap();
        assert_eq!(sig.name, "line_item");
    }

    #[test]
    fn detects_single_unit_line_item() {
        assert!(is_pdf_like("1 unit @ $99"));
    }

    #[test]
    fn detects_monetary_total() {
        let sig = matching_pdf_signature("Amount Due: $1200.50").unwrap();
        assert_eq!(sig.name, "monetary_total");
    }

    #[test]
    fn detects_pagination_case_insensitive() {
        let sig = matching_pdf_signature("quarterly summary\nPAGE 3 OF 7").unwrap();
        assert_eq!(sig.name, "pagination");
    }

    #[test]
    fn detects_document_type_keyword() {
        let sig = matching_pdf_signature("Please sign the attached Agreement.").unwrap();
        assert_eq!(sig.name, "document_type");
    }

    #[test]
    fn document_type_needs_word_boundary() {
        assert!(!is_pdf_like("we are contractors"));
    }

    #[test]
    fn plain_text_is_not_pdf_like() {
        assert!(!is_pdf_like("hello world"));
        assert!(!is_pdf_like("Can we meet on Tuesday?"));
    }

    #[test]
    fn document_json_wins_over_pdf_signatures() {
        let content = r#"{"id": "X", "note": "invoice page 1 of 2, Total: $5"}"#;
        assert!(is_document_json(content));
        assert!(!is_pdf_like(content));
    }

    #[test]
    fn non_document_json_can_still_be_pdf_like() {
        assert!(is_pdf_like(r#"{"note": "see invoice"}"#));
    }

    #[test]
    fn signatures_in_documented_order() {
        let names: Vec<&str> = pdf_signatures().iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "document_number",
                "line_item",
                "monetary_total",
                "pagination",
                "document_type"
            ]
        );
    }
}
