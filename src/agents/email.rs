//! Email extraction agent.
//!
//! The model pulls sender, recipient, subject, key dates, urgency, action
//! items and entities out of the message. Headers that `mail-parser` can read
//! directly fill whatever the model left empty.

use std::sync::{Arc, LazyLock};

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::classifier::Format;
use crate::error::AgentError;
use crate::llm::LlmProvider;
use crate::memory::ConversationStore;

use super::{Content, ExtractionAgent, complete_json};

/// Characters of the cleaned email sent to the model.
const PROMPT_CONTENT_CHARS: usize = 10_000;

const DEFAULT_URGENCY: &str = "medium";

static EXCESS_BLANK_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n{3,}").expect("blank-line regex must compile"));

const SYSTEM_PROMPT: &str = "You are a precise email parsing assistant.";

/// Email extraction agent.
pub struct EmailAgent {
    llm: Arc<dyn LlmProvider>,
}

impl EmailAgent {
    pub fn new(llm: Arc<dyn LlmProvider>) -> Self {
        Self { llm }
    }
}

/// Standardized email extraction.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct EmailExtraction {
    pub sender: Value,
    pub recipient: Value,
    pub subject: Value,
    pub key_dates: Value,
    pub urgency: String,
    pub action_items: Value,
    pub entities: Value,
}

/// Header values read without the model.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderHints {
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub to: Vec<String>,
    pub subject: Option<String>,
}

/// Collapse runs of three or more newlines into one blank line.
pub fn clean_email(content: &str) -> String {
    EXCESS_BLANK_LINES
        .replace_all(content.trim(), "\n\n")
        .into_owned()
}

/// Extract email addresses from an optional mail_parser Address field.
fn extract_addresses(addr: Option<&mail_parser::Address>) -> Vec<String> {
    let Some(addr) = addr else {
        return Vec::new();
    };
    match addr {
        mail_parser::Address::List(addrs) => addrs
            .iter()
            .filter_map(|a| a.address.as_ref().map(|s| s.to_string()))
            .collect(),
        mail_parser::Address::Group(groups) => groups
            .iter()
            .flat_map(|g| {
                g.addresses
                    .iter()
                    .filter_map(|a| a.address.as_ref().map(|s| s.to_string()))
            })
            .collect(),
    }
}

/// Read From/To/Subject headers, if the content carries any.
pub fn parse_header_hints(content: &str) -> HeaderHints {
    let Some(parsed) = mail_parser::MessageParser::default().parse(content.as_bytes()) else {
        return HeaderHints::default();
    };

    let first_from = parsed.from().and_then(|addr| addr.first());
    HeaderHints {
        from_name: first_from.and_then(|a| a.name()).map(|s| s.to_string()),
        from_email: first_from.and_then(|a| a.address()).map(|s| s.to_string()),
        to: extract_addresses(parsed.to()),
        subject: parsed.subject().map(|s| s.to_string()),
    }
}

fn build_prompt(clean_content: &str) -> String {
    let excerpt: String = clean_content.chars().take(PROMPT_CONTENT_CHARS).collect();
    format!(
        r#"Extract structured information from this email:
{{
    "Sender": {{
        "name": "extracted from signature or from address",
        "email": "from address"
    }},
    "Recipient": "to address",
    "Subject": "email subject",
    "KeyDates": ["list of important dates"],
    "Urgency": "low/medium/high",
    "ActionItems": ["list of requested actions"],
    "Entities": {{
        "Products": ["mentioned products"],
        "Quantities": ["mentioned quantities"],
        "Companies": ["mentioned organizations"]
    }}
}}

Email Content:
{excerpt}

Return ONLY valid JSON. Do not include any commentary or markdown formatting."#
    )
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

/// Fill in defaults, normalize urgency, and apply header hints to blank fields.
pub fn standardize(raw: &Value, hints: &HeaderHints) -> EmailExtraction {
    let field = |key: &str, default: Value| raw.get(key).cloned().unwrap_or(default);

    let mut sender = field("Sender", Value::Object(Map::new()));
    if let Value::Object(ref mut map) = sender {
        let email_blank = map.get("email").is_none_or(is_blank);
        if email_blank && let Some(email) = &hints.from_email {
            map.insert("email".to_string(), json!(email));
        }
        let name_blank = map.get("name").is_none_or(is_blank);
        if name_blank && let Some(name) = &hints.from_name {
            map.insert("name".to_string(), json!(name));
        }
    }

    let mut recipient = field("Recipient", json!(""));
    if is_blank(&recipient) && !hints.to.is_empty() {
        recipient = json!(hints.to.join(", "));
    }

    let mut subject = field("Subject", json!(""));
    if is_blank(&subject)
        && let Some(s) = &hints.subject
    {
        subject = json!(s);
    }

    let urgency = raw
        .get("Urgency")
        .and_then(Value::as_str)
        .map(|u| u.trim().to_lowercase())
        .filter(|u| !u.is_empty())
        .unwrap_or_else(|| DEFAULT_URGENCY.to_string());

    EmailExtraction {
        sender,
        recipient,
        subject,
        key_dates: field("KeyDates", json!([])),
        urgency,
        action_items: field("ActionItems", json!([])),
        entities: field("Entities", json!({})),
    }
}

#[async_trait]
impl ExtractionAgent for EmailAgent {
    fn name(&self) -> &str {
        "email_processor"
    }

    fn format(&self) -> Format {
        Format::Email
    }

    fn success_step(&self) -> &str {
        "Email processed successfully"
    }

    fn label(&self) -> &str {
        "Email"
    }

    async fn extract(
        &self,
        content: &Content,
        _conversation_id: &str,
        _store: &ConversationStore,
    ) -> Result<Value, AgentError> {
        let text = content.as_text();
        let clean = clean_email(&text);
        let hints = parse_header_hints(&text);

        let raw = complete_json(self.llm.as_ref(), Some(SYSTEM_PROMPT), build_prompt(&clean)).await?;
        let standardized = standardize(&raw, &hints);

        serde_json::to_value(standardized).map_err(|e| AgentError::MalformedOutput(e.to_string()))
    }
}
