//! Keyword intent heuristics layered over the structural detectors.
//!
//! Invoice keywords are always checked before RFQ keywords, so content that
//! carries both is an invoice.

use super::types::Intent;

const JSON_INVOICE_TOKENS: [&str; 4] = ["invoice", "total", "amount", "due_date"];
const JSON_RFQ_TOKENS: [&str; 4] = ["rfq", "request for quotation", "items", "quote"];

const PDF_INVOICE_KEYWORDS: [&str; 5] = ["invoice", "total", "subtotal", "amount due", "balance"];
const PDF_RFQ_KEYWORDS: [&str; 4] = ["rfq", "request for quote", "quotation", "pricing"];

fn first_match(haystack: &str, invoice: &[&str], rfq: &[&str]) -> Intent {
    if invoice.iter().any(|k| haystack.contains(k)) {
        Intent::Invoice
    } else if rfq.iter().any(|k| haystack.contains(k)) {
        Intent::Rfq
    } else {
        Intent::Other
    }
}

/// Intent of a JSON document, searched over its re-serialized keys and values.
///
/// Content that does not parse yields `Other`.
pub fn json_intent(content: &str) -> Intent {
    let Ok(value) = serde_json::from_str::<serde_json::Value>(content) else {
        return Intent::Other;
    };
    let flattened = value.to_string().to_lowercase();
    first_match(&flattened, &JSON_INVOICE_TOKENS, &JSON_RFQ_TOKENS)
}

/// Intent of PDF-like text, by lowercase substring search over the raw content.
pub fn pdf_intent(content: &str) -> Intent {
    let lowered = content.to_lowercase();
    first_match(&lowered, &PDF_INVOICE_KEYWORDS, &PDF_RFQ_KEYWORDS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_invoice_by_key() {
        assert_eq!(
            json_intent(r#"{"id": "INV-1", "total": 500, "due_date": "2024-01-01"}"#),
            Intent::Invoice
        );
    }

    #[test]
    fn json_invoice_by_value_case_insensitive() {
        assert_eq!(json_intent(r#"{"type": "INVOICE"}"#), Intent::Invoice);
    }

    #[test]
    fn json_rfq_by_items() {
        assert_eq!(
            json_intent(r#"{"id": "R-9", "items": [{"sku": "A1", "qty": 3}]}"#),
            Intent::Rfq
        );
    }

    #[test]
    fn json_rfq_by_phrase_in_value() {
        assert_eq!(
            json_intent(r#"{"subject": "Request for Quotation: steel"}"#),
            Intent::Rfq
        );
    }

    #[test]
    fn json_invoice_precedes_rfq() {
        assert_eq!(
            json_intent(r#"{"type": "rfq", "items": [], "amount": 10}"#),
            Intent::Invoice
        );
    }

    #[test]
    fn json_other() {
        assert_eq!(json_intent(r#"{"from": "a@x.com", "to": "b@x.com"}"#), Intent::Other);
    }

    #[test]
    fn json_unparseable_is_other() {
        assert_eq!(json_intent("not json"), Intent::Other);
    }

    #[test]
    fn pdf_invoice_keywords() {
        assert_eq!(pdf_intent("Balance carried forward"), Intent::Invoice);
        assert_eq!(pdf_intent("SUBTOTAL: $4"), Intent::Invoice);
    }

    #[test]
    fn pdf_rfq_keywords() {
        assert_eq!(
            pdf_intent("Request for Quotation: 10 units @ $5.00, page 1 of 1"),
            Intent::Rfq
        );
        assert_eq!(pdf_intent("Please send pricing for Q3"), Intent::Rfq);
    }

    #[test]
    fn pdf_invoice_precedes_rfq() {
        assert_eq!(
            pdf_intent("RFQ follow-up: total for 10 units @ $5.00"),
            Intent::Invoice
        );
    }

    #[test]
    fn pdf_other() {
        assert_eq!(pdf_intent("Service agreement, page 1 of 4"), Intent::Other);
    }
}
