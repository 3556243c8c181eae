//! Errors raised while driving the browser suite

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum E2eError {
    #[error("failed to start quotes-web: {0}")]
    ServerStartup(String),

    #[error("quotes-web at {url} still unhealthy after {attempts} attempts")]
    ServerUnhealthy { url: String, attempts: usize },

    #[error("no server running")]
    ServerNotRunning,

    #[error("@playwright/test not resolvable from {}; run `npm i -D @playwright/test && npx playwright install` there", .0.display())]
    PlaywrightNotFound(PathBuf),

    #[error("playwright: {0}")]
    Playwright(String),

    #[error("unknown browser '{0}' (expected chromium, firefox or webkit)")]
    UnknownBrowser(String),

    #[error("invalid spec: {0}")]
    SpecParse(String),

    #[error("no spec named '{0}'")]
    SpecNotFound(String),

    #[error("step {step} failed: {reason}")]
    StepFailed { step: String, reason: String },

    #[error("spec '{spec}' did not finish within {secs}s")]
    Timeout { spec: String, secs: u64 },

    #[error("state reset returned {0}; is QUOTES_E2E_TEST_MODE set on the server?")]
    Reset(reqwest::StatusCode),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type E2eResult<T> = Result<T, E2eError>;
