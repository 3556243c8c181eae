//! Main test runner that orchestrates the server and Playwright

use std::path::PathBuf;
use std::time::Instant;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::error::{E2eError, E2eResult};
use crate::playwright::{PlaywrightConfig, PlaywrightHandle, StepResult};
use crate::server::{ServerConfig, ServerHandle};
use crate::spec::TestSpec;

/// Result of running a single test
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestResult {
    pub name: String,
    pub success: bool,
    pub duration_ms: u64,
    pub steps: Vec<StepResult>,
    pub error: Option<String>,
}

impl TestResult {
    fn errored(name: &str, error: &E2eError) -> Self {
        Self {
            name: name.to_string(),
            success: false,
            duration_ms: 0,
            steps: vec![],
            error: Some(error.to_string()),
        }
    }
}

/// Result of running all tests
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestSuiteResult {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub duration_ms: u64,
    pub results: Vec<TestResult>,
}

impl TestSuiteResult {
    pub fn from_results(results: Vec<TestResult>, duration_ms: u64) -> Self {
        let passed = results.iter().filter(|r| r.success).count();
        Self {
            total: results.len(),
            passed,
            failed: results.len() - passed,
            duration_ms,
            results,
        }
    }

    pub fn success(&self) -> bool {
        self.failed == 0
    }
}

/// Main E2E test runner
pub struct TestRunner {
    server_config: ServerConfig,
    playwright_config: PlaywrightConfig,

    /// Running server handle (if any)
    server: Option<ServerHandle>,

    specs_dir: PathBuf,
    output_dir: PathBuf,
}

impl TestRunner {
    /// Create a new test runner with default configuration
    pub fn new() -> Self {
        Self::with_config(RunnerConfig::default())
    }

    /// Create a test runner with custom configuration
    pub fn with_config(config: RunnerConfig) -> Self {
        Self {
            server_config: config.server,
            playwright_config: config.playwright,
            server: None,
            specs_dir: config.specs_dir,
            output_dir: config.output_dir,
        }
    }

    /// Fail early when node cannot load Playwright
    pub async fn check_playwright(&self) -> E2eResult<()> {
        PlaywrightHandle::new(self.playwright_config.clone())?
            .check_installed()
            .await
    }

    /// Start the server
    pub async fn start_server(&mut self) -> E2eResult<()> {
        if self.server.is_some() {
            return Ok(());
        }

        let server = ServerHandle::spawn(self.server_config.clone()).await?;

        // Point the browser at the port the server actually bound
        self.playwright_config.base_url = server.base_url().to_string();

        self.server = Some(server);
        Ok(())
    }

    /// Stop the server
    pub fn stop_server(&mut self) -> E2eResult<()> {
        if let Some(mut server) = self.server.take() {
            server.stop()?;
        }
        Ok(())
    }

    /// Run all tests in the specs directory
    pub async fn run_all(&mut self) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        self.run_specs(&specs).await
    }

    /// Run tests matching a tag
    pub async fn run_tagged(&mut self, tag: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let filtered: Vec<TestSpec> = TestSpec::filter_by_tag(&specs, tag)
            .into_iter()
            .cloned()
            .collect();
        self.run_specs(&filtered).await
    }

    /// Run a specific test by name
    pub async fn run_test(&mut self, name: &str) -> E2eResult<TestSuiteResult> {
        let specs = TestSpec::load_all(&self.specs_dir)?;
        let spec = specs
            .into_iter()
            .find(|s| s.name == name)
            .ok_or_else(|| E2eError::SpecNotFound(name.to_string()))?;

        self.run_specs(std::slice::from_ref(&spec)).await
    }

    /// Run a list of test specs
    pub async fn run_specs(&mut self, specs: &[TestSpec]) -> E2eResult<TestSuiteResult> {
        let start = Instant::now();
        let mut results = Vec::with_capacity(specs.len());

        self.start_server().await?;

        info!("Running {} test(s)...", specs.len());

        for spec in specs {
            let result = match self.run_spec(spec).await {
                Ok(result) => result,
                Err(e) => TestResult::errored(&spec.name, &e),
            };

            if result.success {
                info!("✓ {} ({} ms)", result.name, result.duration_ms);
            } else {
                error!(
                    "✗ {} - {}",
                    result.name,
                    result.error.as_deref().unwrap_or("unknown error")
                );
            }
            results.push(result);
        }

        let suite = TestSuiteResult::from_results(results, start.elapsed().as_millis() as u64);

        info!(
            "Test Results: {} passed, {} failed ({} ms)",
            suite.passed, suite.failed, suite.duration_ms
        );

        Ok(suite)
    }

    /// Run a single test spec against the running server
    pub async fn run_spec(&mut self, spec: &TestSpec) -> E2eResult<TestResult> {
        let start = Instant::now();
        debug!("Running test: {}", spec.name);

        let server = self
            .server
            .as_ref()
            .ok_or(E2eError::ServerNotRunning)?;

        if spec.reset_state {
            server.reset().await?;
        }

        let playwright = PlaywrightHandle::new(self.playwright_config.clone())?;
        let steps = playwright.run_spec(spec).await?;

        let error = steps.iter().find(|s| !s.success).map(|s| {
            E2eError::StepFailed {
                step: s.step_name.clone(),
                reason: s.error.clone().unwrap_or_default(),
            }
            .to_string()
        });

        Ok(TestResult {
            name: spec.name.clone(),
            success: error.is_none(),
            duration_ms: start.elapsed().as_millis() as u64,
            steps,
            error,
        })
    }

    /// Write test results to JSON file
    pub fn write_results(&self, results: &TestSuiteResult) -> E2eResult<PathBuf> {
        std::fs::create_dir_all(&self.output_dir)?;

        let path = self.output_dir.join("test-results.json");
        let json = serde_json::to_string_pretty(results)?;
        std::fs::write(&path, json)?;

        info!("Results written to: {}", path.display());
        Ok(path)
    }
}

impl Default for TestRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TestRunner {
    fn drop(&mut self) {
        let _ = self.stop_server();
    }
}

/// Configuration for the test runner
#[derive(Debug, Clone)]
pub struct RunnerConfig {
    pub server: ServerConfig,
    pub playwright: PlaywrightConfig,
    pub specs_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            playwright: PlaywrightConfig::default(),
            specs_dir: PathBuf::from("crates/e2e/specs"),
            output_dir: PathBuf::from("test-results"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, success: bool) -> TestResult {
        TestResult {
            name: name.into(),
            success,
            duration_ms: 1,
            steps: vec![],
            error: (!success).then(|| "boom".to_string()),
        }
    }

    #[test]
    fn test_suite_counts() {
        let suite = TestSuiteResult::from_results(
            vec![result("a", true), result("b", false), result("c", true)],
            10,
        );
        assert_eq!(suite.total, 3);
        assert_eq!(suite.passed, 2);
        assert_eq!(suite.failed, 1);
        assert!(!suite.success());
    }

    #[test]
    fn test_write_results() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TestRunner::with_config(RunnerConfig {
            output_dir: dir.path().to_path_buf(),
            ..Default::default()
        });
        let suite = TestSuiteResult::from_results(vec![result("a", true)], 3);
        let path = runner.write_results(&suite).unwrap();
        let parsed: TestSuiteResult =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(parsed.passed, 1);
        assert_eq!(parsed.results[0].name, "a");
    }

    #[tokio::test]
    async fn test_run_spec_requires_server() {
        let mut runner = TestRunner::new();
        let spec =
            TestSpec::from_yaml("name: x\nsteps:\n  - action: navigate\n    url: /\n").unwrap();
        assert!(matches!(
            runner.run_spec(&spec).await,
            Err(E2eError::ServerNotRunning)
        ));
    }
}
