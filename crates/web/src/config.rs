//! Web server configuration, read from the environment
//!
//! | Variable               | Default          | Meaning |
//! |------------------------|------------------|---------|
//! | `QUOTES_WEB_ADDR`      | `127.0.0.1:1234` | listen address |
//! | `QUOTES_STORE`         | `memory`         | `memory` or `sqlite` |
//! | `QUOTES_DB_PATH`       | `~/.quotes/quotes.db` | SQLite file; setting it implies `sqlite` |
//! | `QUOTES_E2E_TEST_MODE` | off              | `1`/`true` enables `POST /api/test/reset` |
//! | `QUOTES_LOG_FORMAT`    | `text`           | `text` or `json` |

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_WEB_ADDR: &str = "127.0.0.1:1234";

/// Where quotes are kept
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    Memory,
    Sqlite(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct WebServerConfig {
    pub addr: SocketAddr,
    pub store: StoreBackend,
    /// Enables state-reset endpoints for browser test runs
    pub test_mode: bool,
    pub log_format: LogFormat,
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 1234)),
            store: StoreBackend::Memory,
            test_mode: false,
            log_format: LogFormat::Text,
        }
    }
}

impl WebServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from an arbitrary variable source
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let addr_str = get("QUOTES_WEB_ADDR").unwrap_or_else(|| DEFAULT_WEB_ADDR.to_string());
        let addr: SocketAddr = addr_str
            .parse()
            .with_context(|| format!("invalid QUOTES_WEB_ADDR: {}", addr_str))?;

        let db_path = get("QUOTES_DB_PATH").filter(|v| !v.trim().is_empty());
        let store = match (get("QUOTES_STORE").as_deref(), db_path) {
            (_, Some(path)) => StoreBackend::Sqlite(PathBuf::from(path)),
            (Some("sqlite"), None) => StoreBackend::Sqlite(quotes_common::default_db_path()),
            (None, None) | (Some("memory"), None) => StoreBackend::Memory,
            (Some(other), None) => anyhow::bail!("invalid QUOTES_STORE: {}", other),
        };

        let test_mode = matches!(
            get("QUOTES_E2E_TEST_MODE").as_deref(),
            Some("1") | Some("true")
        );

        let log_format = match get("QUOTES_LOG_FORMAT").as_deref() {
            Some("json") => LogFormat::Json,
            None | Some("text") => LogFormat::Text,
            Some(other) => anyhow::bail!("invalid QUOTES_LOG_FORMAT: {}", other),
        };

        Ok(Self {
            addr,
            store,
            test_mode,
            log_format,
        })
    }
}
