//! Quotes Web Server
//!
//! Serves the quotes page with its create/edit form, the form post routes
//! behind it, and a JSON API over the same store.

pub mod api;
pub mod config;
pub mod page;
pub mod server;
pub mod static_files;

pub use config::{LogFormat, StoreBackend, WebServerConfig};
pub use server::{WebServer, WebServerState};
