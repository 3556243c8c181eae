//! Core types for the Quotes app

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{Error, Result};

// ============================================================================
// Identifiers
// ============================================================================

/// Store-assigned quote identifier. Monotonic, never reused by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuoteId(pub u64);

impl fmt::Display for QuoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for QuoteId {
    fn from(v: u64) -> Self {
        QuoteId(v)
    }
}

// ============================================================================
// Quote
// ============================================================================

/// A stored quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
    pub id: QuoteId,
    pub text: String,
    pub author: String,
    /// Unix seconds
    pub created_at: i64,
    /// Unix seconds
    pub updated_at: i64,
}

impl Quote {
    /// The list rendering of a quote: `{text} ({author})`
    pub fn display_line(&self) -> String {
        format!("{} ({})", self.text, self.author)
    }

    /// The quote's fields as a draft, as loaded into the form for editing
    pub fn to_draft(&self) -> QuoteDraft {
        QuoteDraft {
            text: self.text.clone(),
            author: self.author.clone(),
        }
    }
}

impl fmt::Display for Quote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.text, self.author)
    }
}

/// Unvalidated quote fields, as submitted by a form or API call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteDraft {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub author: String,
}

impl QuoteDraft {
    pub fn new(text: impl Into<String>, author: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            author: author.into(),
        }
    }

    /// Trim both fields and reject blanks.
    ///
    /// `text` is checked before `author`, so a fully empty draft reports `text`.
    pub fn validate(&self) -> Result<QuoteDraft> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(Error::EmptyField { field: "text" });
        }
        let author = self.author.trim();
        if author.is_empty() {
            return Err(Error::EmptyField { field: "author" });
        }
        Ok(QuoteDraft::new(text, author))
    }

    /// Both fields carry non-blank content
    pub fn is_complete(&self) -> bool {
        !self.text.trim().is_empty() && !self.author.trim().is_empty()
    }
}

/// Current time as Unix seconds
pub fn now_epoch_secs() -> i64 {
    chrono::Utc::now().timestamp()
}
