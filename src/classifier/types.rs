//! Classification labels and result.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

// ── Format ──────────────────────────────────────────────────────────

/// Content format label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pdf,
    Json,
    Email,
    Text,
}

impl Format {
    pub const ALL: [Format; 4] = [Format::Pdf, Format::Json, Format::Email, Format::Text];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Json => "json",
            Self::Email => "email",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = String;

    /// Exact label match; callers normalize case first if they need to.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| format!("unknown format label: '{s}'"))
    }
}

// ── Intent ──────────────────────────────────────────────────────────

/// Business intent label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intent {
    Invoice,
    #[serde(rename = "RFQ")]
    Rfq,
    Complaint,
    Regulation,
    Other,
}

impl Intent {
    pub const ALL: [Intent; 5] = [
        Intent::Invoice,
        Intent::Rfq,
        Intent::Complaint,
        Intent::Regulation,
        Intent::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Invoice => "Invoice",
            Self::Rfq => "RFQ",
            Self::Complaint => "Complaint",
            Self::Regulation => "Regulation",
            Self::Other => "Other",
        }
    }
}

impl fmt::Display for Intent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Intent {
    type Err = String;

    /// Case-sensitive: `"invoice"` is not a valid label.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.as_str() == s)
            .ok_or_else(|| format!("unknown intent label: '{s}'"))
    }
}

// ── Result ──────────────────────────────────────────────────────────

/// Outcome of classifying one submission. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub format: Format,
    pub intent: Intent,
    pub source: String,
}

impl ClassificationResult {
    pub fn new(format: Format, intent: Intent, source: impl Into<String>) -> Self {
        Self {
            format,
            intent,
            source: source.into(),
        }
    }
}
