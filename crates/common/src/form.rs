//! Quote form controller
//!
//! The form is a single-record editing buffer over a [`QuoteStore`]. It is in
//! one of two modes:
//!
//! ```text
//!            edit(id)                      submit / cancel
//!   Create ───────────▶ Editing(id) ───────────────────────▶ Create
//!      ▲                    │ delete(id)
//!      └────────────────────┘
//! ```
//!
//! Independently of the mode, the submit control is `Enabled` only while both
//! fields hold non-blank text.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::store::QuoteStore;
use crate::types::{Quote, QuoteDraft, QuoteId};
use crate::{Error, Result};

/// What a submit will do
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Mode {
    /// Submit appends a new quote
    #[default]
    Create,
    /// Submit replaces the fields of this quote
    Editing(QuoteId),
}

/// Enabled state of the submit control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitState {
    #[default]
    Disabled,
    Enabled,
}

impl SubmitState {
    pub fn is_enabled(self) -> bool {
        self == SubmitState::Enabled
    }
}

/// Effect of a successful submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submitted {
    Created(Quote),
    Updated(Quote),
}

impl Submitted {
    pub fn quote(&self) -> &Quote {
        match self {
            Submitted::Created(q) | Submitted::Updated(q) => q,
        }
    }
}

/// Serializable view of the form, as rendered to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormSnapshot {
    pub text: String,
    pub author: String,
    pub mode: Mode,
    pub submit: SubmitState,
}

/// Two-field quote form with create/edit modes
#[derive(Debug, Clone, Default)]
pub struct QuoteForm {
    text: String,
    author: String,
    mode: Mode,
}

impl QuoteForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.author = author.into();
    }

    /// `Enabled` iff both fields are non-blank
    pub fn submit_state(&self) -> SubmitState {
        if self.draft().is_complete() {
            SubmitState::Enabled
        } else {
            SubmitState::Disabled
        }
    }

    pub fn draft(&self) -> QuoteDraft {
        QuoteDraft::new(self.text.clone(), self.author.clone())
    }

    pub fn snapshot(&self) -> FormSnapshot {
        FormSnapshot {
            text: self.text.clone(),
            author: self.author.clone(),
            mode: self.mode,
            submit: self.submit_state(),
        }
    }

    /// Append or replace depending on the mode, then clear the form.
    ///
    /// A disabled form is rejected without touching the store or the buffer.
    /// If the quote being edited no longer exists, the form is reset and
    /// `NotFound` is returned.
    pub fn submit(&mut self, store: &dyn QuoteStore) -> Result<Submitted> {
        let draft = self.draft();
        if !self.submit_state().is_enabled() {
            warn!("Rejected submit of incomplete form");
            // Reports which field is blank.
            draft.validate()?;
        }

        let result = match self.mode {
            Mode::Create => store.insert(&draft).map(Submitted::Created),
            Mode::Editing(id) => store.replace(id, &draft).map(Submitted::Updated),
        };

        match result {
            Ok(submitted) => {
                self.reset();
                Ok(submitted)
            }
            Err(e @ Error::NotFound { .. }) => {
                warn!("Quote under edit disappeared: {}", e);
                self.reset();
                Err(e)
            }
            Err(e) => Err(e),
        }
    }

    /// Clear both fields and return to create mode. The store is untouched.
    pub fn cancel(&mut self) {
        debug!("Form cancelled");
        self.reset();
    }

    /// Load a quote into the buffer and switch to editing it
    pub fn edit(&mut self, store: &dyn QuoteStore, id: QuoteId) -> Result<Quote> {
        let quote = store.get(id)?;
        let QuoteDraft { text, author } = quote.to_draft();
        self.text = text;
        self.author = author;
        self.mode = Mode::Editing(id);
        info!("Editing quote {}", id);
        Ok(quote)
    }

    /// Remove a quote. Editing the removed quote drops the form back to create mode.
    pub fn delete(&mut self, store: &dyn QuoteStore, id: QuoteId) -> Result<()> {
        store.delete(id)?;
        if self.mode == Mode::Editing(id) {
            self.reset();
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.text.clear();
        self.author.clear();
        self.mode = Mode::Create;
    }
}
