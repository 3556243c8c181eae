//! Quotes Common Library
//!
//! Shared data model, storage backends and the form controller used by the
//! Quotes web server, CLI and test harness.

pub mod db;
pub mod error;
pub mod form;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use db::Database;
pub use error::{Error, Result};
pub use form::{FormSnapshot, Mode, QuoteForm, SubmitState, Submitted};
pub use store::{MemoryStore, QuoteStore};
pub use types::*;

/// Quotes version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default data directory
pub fn default_store_path() -> std::path::PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join(".quotes")
}

/// Default database path
pub fn default_db_path() -> std::path::PathBuf {
    default_store_path().join("quotes.db")
}

/// Home directory helper
mod dirs {
    pub fn home_dir() -> Option<std::path::PathBuf> {
        std::env::var_os("HOME").map(std::path::PathBuf::from)
    }
}
