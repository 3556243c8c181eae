//! Quotes CLI
//!
//! Command-line client for the Quotes JSON API.

pub mod client;
pub mod commands;
pub mod output;
