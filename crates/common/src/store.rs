//! Quote storage
//!
//! [`QuoteStore`] is the seam between the form controller / HTTP layer and the
//! backing collection. Two backends exist:
//! - [`MemoryStore`]: process-lifetime `Vec`, the default
//! - [`crate::db::Database`]: SQLite file, used when a database path is configured

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::types::{now_epoch_secs, Quote, QuoteDraft, QuoteId};
use crate::{Error, Result};

/// Collection of quotes kept in insertion order
pub trait QuoteStore: Send + Sync {
    /// All quotes, oldest first
    fn list(&self) -> Result<Vec<Quote>>;

    /// A single quote
    fn get(&self, id: QuoteId) -> Result<Quote>;

    /// Validate and append a new quote with a fresh id
    fn insert(&self, draft: &QuoteDraft) -> Result<Quote>;

    /// Validate and overwrite the fields of an existing quote, keeping its id
    fn replace(&self, id: QuoteId, draft: &QuoteDraft) -> Result<Quote>;

    /// Remove a quote
    fn delete(&self, id: QuoteId) -> Result<()>;

    /// Remove every quote
    fn clear(&self) -> Result<()>;
}

struct MemoryInner {
    quotes: Vec<Quote>,
    next_id: u64,
}

/// In-memory quote store
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(MemoryInner {
                quotes: Vec::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl QuoteStore for MemoryStore {
    fn list(&self) -> Result<Vec<Quote>> {
        Ok(self.inner.lock().quotes.clone())
    }

    fn get(&self, id: QuoteId) -> Result<Quote> {
        self.inner
            .lock()
            .quotes
            .iter()
            .find(|q| q.id == id)
            .cloned()
            .ok_or_else(|| Error::quote_not_found(id))
    }

    fn insert(&self, draft: &QuoteDraft) -> Result<Quote> {
        let draft = draft.validate()?;
        let mut inner = self.inner.lock();

        let now = now_epoch_secs();
        let quote = Quote {
            id: QuoteId(inner.next_id),
            text: draft.text,
            author: draft.author,
            created_at: now,
            updated_at: now,
        };
        inner.next_id += 1;
        inner.quotes.push(quote.clone());

        info!("Created quote {}", quote.id);
        Ok(quote)
    }

    fn replace(&self, id: QuoteId, draft: &QuoteDraft) -> Result<Quote> {
        let draft = draft.validate()?;
        let mut inner = self.inner.lock();

        let quote = inner
            .quotes
            .iter_mut()
            .find(|q| q.id == id)
            .ok_or_else(|| Error::quote_not_found(id))?;
        quote.text = draft.text;
        quote.author = draft.author;
        quote.updated_at = now_epoch_secs();

        info!("Updated quote {}", id);
        Ok(quote.clone())
    }

    fn delete(&self, id: QuoteId) -> Result<()> {
        let mut inner = self.inner.lock();
        let before = inner.quotes.len();
        inner.quotes.retain(|q| q.id != id);
        if inner.quotes.len() == before {
            return Err(Error::quote_not_found(id));
        }

        info!("Deleted quote {}", id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut inner = self.inner.lock();
        debug!("Clearing {} quote(s)", inner.quotes.len());
        inner.quotes.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_preserves_order() {
        let store = MemoryStore::new();
        let a = store.insert(&QuoteDraft::new("first", "A")).unwrap();
        let b = store.insert(&QuoteDraft::new("second", "B")).unwrap();
        let c = store.insert(&QuoteDraft::new("third", "C")).unwrap();

        let ids: Vec<QuoteId> = store.list().unwrap().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![a.id, b.id, c.id]);
    }

    #[test]
    fn test_ids_not_reused_after_delete() {
        let store = MemoryStore::new();
        let a = store.insert(&QuoteDraft::new("CSS rulez", "CRHarding")).unwrap();
        store.delete(a.id).unwrap();
        let b = store.insert(&QuoteDraft::new("CSS rulez", "Kevin")).unwrap();
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_replace_in_place() {
        let store = MemoryStore::new();
        store.insert(&QuoteDraft::new("before", "X")).unwrap();
        let q = store.insert(&QuoteDraft::new("Lorem ipsum", "CRHarding")).unwrap();
        store.insert(&QuoteDraft::new("after", "Y")).unwrap();

        let updated = store
            .replace(q.id, &QuoteDraft::new("Lorem ipsum dolor sit", "CRHarding Rocks!"))
            .unwrap();
        assert_eq!(updated.id, q.id);
        assert_eq!(updated.created_at, q.created_at);

        let all = store.list().unwrap();
        assert_eq!(all.len(), 3);
        assert_eq!(all[1].display_line(), "Lorem ipsum dolor sit (CRHarding Rocks!)");
    }

    #[test]
    fn test_missing_quote() {
        let store = MemoryStore::new();
        assert!(matches!(store.get(QuoteId(9)), Err(Error::NotFound { .. })));
        assert!(matches!(store.delete(QuoteId(9)), Err(Error::NotFound { .. })));
        assert!(matches!(
            store.replace(QuoteId(9), &QuoteDraft::new("a", "b")),
            Err(Error::NotFound { .. })
        ));
    }

    #[test]
    fn test_insert_rejects_blank() {
        let store = MemoryStore::new();
        assert!(store.insert(&QuoteDraft::new("", "Kevin")).is_err());
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_clear() {
        let store = MemoryStore::new();
        store.insert(&QuoteDraft::new("a", "b")).unwrap();
        store.clear().unwrap();
        assert!(store.list().unwrap().is_empty());
    }
}
