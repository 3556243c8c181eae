//! SQLite database for quote persistence

use crate::store::QuoteStore;
use crate::types::{now_epoch_secs, Quote, QuoteDraft, QuoteId};
use crate::{Error, Result};
use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// Database wrapper for quote persistence
#[derive(Clone)]
pub struct Database {
    conn: Arc<Mutex<Connection>>,
}

impl Database {
    /// Open or create database at path
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path.as_ref())?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA synchronous=NORMAL;")?;

        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };

        db.init_schema()?;

        info!("Opened database at {:?}", path.as_ref());
        Ok(db)
    }

    /// Open in-memory database (for testing)
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
        };
        db.init_schema()?;
        Ok(db)
    }

    /// Initialize database schema
    fn init_schema(&self) -> Result<()> {
        let conn = self.conn.lock();

        // AUTOINCREMENT keeps ids from being reused after deletes.
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS quotes (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                text TEXT NOT NULL,
                author TEXT NOT NULL,
                created_at INTEGER NOT NULL,
                updated_at INTEGER NOT NULL
            );
            "#,
        )?;

        debug!("Database schema initialized");
        Ok(())
    }

    fn row_to_quote(row: &Row<'_>) -> rusqlite::Result<Quote> {
        let id: i64 = row.get(0)?;
        Ok(Quote {
            id: QuoteId(id as u64),
            text: row.get(1)?,
            author: row.get(2)?,
            created_at: row.get(3)?,
            updated_at: row.get(4)?,
        })
    }

    fn query_quote(conn: &Connection, id: QuoteId) -> Result<Option<Quote>> {
        let quote = conn
            .query_row(
                "SELECT id, text, author, created_at, updated_at FROM quotes WHERE id = ?1",
                params![id.0 as i64],
                Self::row_to_quote,
            )
            .optional()?;
        Ok(quote)
    }
}

impl QuoteStore for Database {
    fn list(&self) -> Result<Vec<Quote>> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT id, text, author, created_at, updated_at FROM quotes ORDER BY id ASC",
        )?;
        let rows = stmt.query_map([], Self::row_to_quote)?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }

    fn get(&self, id: QuoteId) -> Result<Quote> {
        let conn = self.conn.lock();
        Self::query_quote(&conn, id)?.ok_or_else(|| Error::quote_not_found(id))
    }

    fn insert(&self, draft: &QuoteDraft) -> Result<Quote> {
        let draft = draft.validate()?;
        let conn = self.conn.lock();
        let now = now_epoch_secs();

        conn.execute(
            "INSERT INTO quotes (text, author, created_at, updated_at) VALUES (?1, ?2, ?3, ?4)",
            params![draft.text, draft.author, now, now],
        )?;
        let id = QuoteId(conn.last_insert_rowid() as u64);

        info!("Created quote {}", id);
        Ok(Quote {
            id,
            text: draft.text,
            author: draft.author,
            created_at: now,
            updated_at: now,
        })
    }

    fn replace(&self, id: QuoteId, draft: &QuoteDraft) -> Result<Quote> {
        let draft = draft.validate()?;
        let conn = self.conn.lock();

        let rows = conn.execute(
            "UPDATE quotes SET text = ?1, author = ?2, updated_at = ?3 WHERE id = ?4",
            params![draft.text, draft.author, now_epoch_secs(), id.0 as i64],
        )?;
        if rows == 0 {
            return Err(Error::quote_not_found(id));
        }

        info!("Updated quote {}", id);
        Self::query_quote(&conn, id)?.ok_or_else(|| Error::quote_not_found(id))
    }

    fn delete(&self, id: QuoteId) -> Result<()> {
        let conn = self.conn.lock();
        let rows = conn.execute("DELETE FROM quotes WHERE id = ?1", params![id.0 as i64])?;
        if rows == 0 {
            return Err(Error::quote_not_found(id));
        }

        info!("Deleted quote {}", id);
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let conn = self.conn.lock();
        let rows = conn.execute("DELETE FROM quotes", [])?;
        debug!("Cleared {} quote(s)", rows);
        Ok(())
    }
}
