//! Quotes E2E Test Framework
//!
//! This crate provides a Rust-controlled E2E testing framework that:
//! - Spawns the quotes web server as a subprocess
//! - Drives a real browser through Playwright
//! - Parses declarative YAML test specs
//! - Resets server state before every spec so specs run in isolation
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    E2E Test Runner (Rust)                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestRunner                                                 │
//! │    ├── start_server() -> ServerHandle                       │
//! │    └── run_spec(spec) -> TestResult                         │
//! │          ├── ServerHandle::reset() (POST /api/test/reset)   │
//! │          └── PlaywrightHandle::run_spec() (one node script) │
//! ├─────────────────────────────────────────────────────────────┤
//! │  TestSpec (YAML)                                            │
//! │    ├── name, description, tags                              │
//! │    └── steps: [Step]                                        │
//! │          ├── navigate { url }                               │
//! │          ├── click { selector }                             │
//! │          ├── fill / type { selector, value | text }         │
//! │          ├── wait { selector, state }                       │
//! │          ├── assert { selector, value?, disabled?, count? } │
//! │          └── screenshot { name }                            │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod playwright;
pub mod runner;
pub mod server;
pub mod spec;

pub use error::{E2eError, E2eResult};
pub use runner::TestRunner;
pub use spec::{TestSpec, TestStep};
