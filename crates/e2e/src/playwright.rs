//! Playwright browser automation
//!
//! A whole spec is rendered into one Node script so that page state carries
//! over from step to step. The script reports progress on stdout as one JSON
//! object per line:
//!
//! ```text
//! {"event":"step","index":0,"duration_ms":12}
//! {"event":"failed","index":3,"error":"..."}
//! {"event":"done"}
//! ```

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use serde::{Deserialize, Serialize};
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{E2eError, E2eResult};
use crate::spec::{TestSpec, TestStep};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Browser {
    #[default]
    Chromium,
    Firefox,
    Webkit,
}

impl Browser {
    fn as_str(&self) -> &'static str {
        match self {
            Browser::Chromium => "chromium",
            Browser::Firefox => "firefox",
            Browser::Webkit => "webkit",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "chromium" => Some(Browser::Chromium),
            "firefox" => Some(Browser::Firefox),
            "webkit" => Some(Browser::Webkit),
            _ => None,
        }
    }
}

/// Result of executing a test step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepResult {
    pub success: bool,
    pub step_name: String,
    pub duration_ms: Option<u64>,
    pub error: Option<String>,
}

/// One line of the script's progress report
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
enum ReportEvent {
    Step { index: usize, duration_ms: u64 },
    Failed { index: usize, error: String },
    Done,
}

/// Configuration for Playwright
#[derive(Debug, Clone)]
pub struct PlaywrightConfig {
    pub base_url: String,
    pub screenshot_dir: PathBuf,
    pub browser: Browser,
    pub headless: bool,
    /// Directory whose `node_modules` contains `@playwright/test`
    pub node_root: PathBuf,
    /// Upper bound on one spec's script run
    pub script_timeout: Duration,
    /// Default timeout for actions and assertions
    pub step_timeout_ms: u64,
}

impl Default for PlaywrightConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:1234".to_string(),
            screenshot_dir: PathBuf::from("test-results/screenshots"),
            browser: Browser::Chromium,
            headless: true,
            node_root: PathBuf::from("."),
            script_timeout: Duration::from_secs(120),
            step_timeout_ms: 5000,
        }
    }
}

/// Playwright browser handle
pub struct PlaywrightHandle {
    config: PlaywrightConfig,
}

/// JavaScript string literal
fn js_str(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| "\"\"".to_string())
}

impl PlaywrightHandle {
    /// Create a new Playwright handle
    ///
    /// The script runs from `node_root`, so the screenshot directory is made
    /// absolute here.
    pub fn new(mut config: PlaywrightConfig) -> E2eResult<Self> {
        std::fs::create_dir_all(&config.screenshot_dir)?;
        config.screenshot_dir = std::fs::canonicalize(&config.screenshot_dir)?;
        Ok(Self { config })
    }

    /// Check if Playwright can be loaded from `node_root`
    pub async fn check_installed(&self) -> E2eResult<()> {
        let status = Command::new("node")
            .args(["-e", "require.resolve('@playwright/test')"])
            .current_dir(&self.config.node_root)
            .env("NODE_PATH", self.config.node_root.join("node_modules"))
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await;

        match status {
            Ok(status) if status.success() => Ok(()),
            _ => Err(E2eError::PlaywrightNotFound(self.config.node_root.clone())),
        }
    }

    /// Build the Playwright script for a whole spec
    pub fn build_script(&self, spec: &TestSpec) -> String {
        let mut script = String::new();

        // Header
        script.push_str(&format!(
            r#"const {{ chromium, firefox, webkit, expect }} = require('@playwright/test');

function report(event) {{
  console.log(JSON.stringify(event));
}}

(async () => {{
  const browser = await {browser}.launch({{ headless: {headless} }});
  const context = await browser.newContext({{
    viewport: {{ width: {width}, height: {height} }}
  }});
  const page = await context.newPage();
  page.setDefaultTimeout({timeout});
  expect.configure({{ timeout: {timeout} }});
  const baseUrl = {base_url};
  let index = 0;
  let started = Date.now();

  try {{
"#,
            browser = self.config.browser.as_str(),
            headless = self.config.headless,
            width = spec.viewport.width,
            height = spec.viewport.height,
            timeout = self.config.step_timeout_ms,
            base_url = js_str(&self.config.base_url),
        ));

        // Generate step code
        for (i, step) in spec.steps.iter().enumerate() {
            script.push_str(&format!("\n    // Step {}: {}\n", i + 1, step.name()));
            script.push_str(&format!("    index = {}; started = Date.now();\n", i));
            script.push_str(&self.step_to_js(step));
            script.push_str(
                "\n    report({ event: 'step', index, duration_ms: Date.now() - started });\n",
            );
        }

        // Footer
        script.push_str(
            r#"
    report({ event: 'done' });
  } catch (error) {
    report({ event: 'failed', index, error: String(error && error.message || error) });
    process.exitCode = 1;
  } finally {
    await browser.close();
  }
})();
"#,
        );

        script
    }

    /// Convert a step to JavaScript code
    fn step_to_js(&self, step: &TestStep) -> String {
        match step {
            TestStep::Navigate { url, wait_for_selector } => {
                let wait = wait_for_selector
                    .as_ref()
                    .map(|s| format!("\n    await page.locator({}).first().waitFor();", js_str(s)))
                    .unwrap_or_default();
                format!("    await page.goto(baseUrl + {});{}", js_str(url), wait)
            }
            TestStep::Click { selector, timeout_ms } => match timeout_ms {
                Some(t) => format!(
                    "    await page.locator({}).click({{ timeout: {} }});",
                    js_str(selector),
                    t
                ),
                None => format!("    await page.locator({}).click();", js_str(selector)),
            },
            TestStep::Fill { selector, value } => {
                format!("    await page.locator({}).fill({});", js_str(selector), js_str(value))
            }
            TestStep::Type { selector, text, delay_ms } => {
                // Move the caret to the end so typing appends to existing text.
                format!(
                    r#"    {{
      const input = page.locator({sel});
      await input.focus();
      await input.press('End');
      await input.pressSequentially({text}, {{ delay: {delay} }});
    }}"#,
                    sel = js_str(selector),
                    text = js_str(text),
                    delay = delay_ms.unwrap_or(20),
                )
            }
            TestStep::Press { selector, key } => match selector {
                Some(sel) => format!(
                    "    await page.locator({}).press({});",
                    js_str(sel),
                    js_str(key)
                ),
                None => format!("    await page.keyboard.press({});", js_str(key)),
            },
            TestStep::Wait { selector, timeout_ms, state } => format!(
                "    await page.locator({}).first().waitFor({{ state: '{}', timeout: {} }});",
                js_str(selector),
                state.as_str(),
                timeout_ms
            ),
            TestStep::Sleep { ms } => format!("    await page.waitForTimeout({});", ms),
            TestStep::Assert {
                selector,
                visible,
                text,
                text_contains,
                value,
                disabled,
                count,
            } => {
                let loc = format!("page.locator({})", js_str(selector));
                let mut assertions = Vec::new();

                if let Some(vis) = visible {
                    let matcher = if *vis { "toBeVisible()" } else { "toBeHidden()" };
                    assertions.push(format!("    await expect({}).{};", loc, matcher));
                }
                if let Some(t) = text {
                    let matcher = format!("toHaveText({})", js_str(t));
                    assertions.push(format!("    await expect({}).{};", loc, matcher));
                }
                if let Some(tc) = text_contains {
                    let matcher = format!("toContainText({})", js_str(tc));
                    assertions.push(format!("    await expect({}).{};", loc, matcher));
                }
                if let Some(v) = value {
                    let matcher = format!("toHaveValue({})", js_str(v));
                    assertions.push(format!("    await expect({}).{};", loc, matcher));
                }
                if let Some(d) = disabled {
                    let matcher = if *d { "toBeDisabled()" } else { "toBeEnabled()" };
                    assertions.push(format!("    await expect({}).{};", loc, matcher));
                }
                if let Some(c) = count {
                    assertions.push(format!("    await expect({}).toHaveCount({});", loc, c));
                }

                assertions.join("\n")
            }
            TestStep::AssertUrl { contains } => {
                format!("    expect(page.url()).toContain({});", js_str(contains))
            }
            TestStep::Screenshot { name, selector, full_page } => {
                let path = self.config.screenshot_dir.join(format!("{}.png", name));
                let path = js_str(&path.to_string_lossy());
                match selector {
                    Some(sel) => format!(
                        "    await page.locator({}).screenshot({{ path: {} }});",
                        js_str(sel),
                        path
                    ),
                    None => format!(
                        "    await page.screenshot({{ path: {}, fullPage: {} }});",
                        path, full_page
                    ),
                }
            }
            TestStep::Log { message } => {
                format!("    console.error('[TEST] ' + {});", js_str(message))
            }
        }
    }

    /// Run a spec in a fresh browser and collect per-step results
    pub async fn run_spec(&self, spec: &TestSpec) -> E2eResult<Vec<StepResult>> {
        let script = self.build_script(spec);

        let temp_dir = tempfile::tempdir()?;
        let script_path = temp_dir.path().join(format!("{}.js", spec.name));
        std::fs::write(&script_path, &script)?;

        debug!("Running Playwright script: {}", script_path.display());

        // Resolve @playwright/test from node_root rather than the temp dir.
        let node_root = std::fs::canonicalize(&self.config.node_root)?;
        let run = Command::new("node")
            .arg(&script_path)
            .current_dir(&node_root)
            .env("NODE_PATH", node_root.join("node_modules"))
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.config.script_timeout, run)
            .await
            .map_err(|_| E2eError::Timeout {
                spec: spec.name.clone(),
                secs: self.config.script_timeout.as_secs(),
            })??;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let results = collect_results(spec, &stdout);

        if results.len() < spec.steps.len() && results.iter().all(|r| r.success) {
            // The script died without reporting, e.g. Playwright failed to load.
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(E2eError::Playwright(format!(
                "script for '{}' exited with {}:\n{}",
                spec.name,
                output.status,
                stderr.trim()
            )));
        }

        info!(
            "Spec '{}' finished ({} of {} step(s) reported)",
            spec.name,
            results.len(),
            spec.steps.len()
        );
        Ok(results)
    }
}

/// Pair the script's progress report with the spec's steps
fn collect_results(spec: &TestSpec, stdout: &str) -> Vec<StepResult> {
    let mut results = Vec::new();

    for event in stdout
        .lines()
        .filter_map(|line| serde_json::from_str::<ReportEvent>(line.trim()).ok())
    {
        match event {
            ReportEvent::Step { index, duration_ms } => {
                if let Some(step) = spec.steps.get(index) {
                    results.push(StepResult {
                        success: true,
                        step_name: step.name(),
                        duration_ms: Some(duration_ms),
                        error: None,
                    });
                }
            }
            ReportEvent::Failed { index, error } => {
                let step_name = spec
                    .steps
                    .get(index)
                    .map(|s| s.name())
                    .unwrap_or_else(|| format!("step {}", index + 1));
                results.push(StepResult {
                    success: false,
                    step_name,
                    duration_ms: None,
                    error: Some(error),
                });
                break;
            }
            ReportEvent::Done => break,
        }
    }

    results
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec() -> TestSpec {
        TestSpec::from_yaml(
            r##"
name: edit-quote
steps:
  - action: navigate
    url: /
  - action: type
    selector: "input[name=text]"
    text: " dolor sit"
  - action: click
    selector: "xpath=//span[contains(., 'Lorem ipsum')]/following-sibling::button[1]"
  - action: assert
    selector: "#submitBtn"
    disabled: true
    count: 1
"##,
        )
        .unwrap()
    }

    fn handle() -> PlaywrightHandle {
        PlaywrightHandle {
            config: PlaywrightConfig::default(),
        }
    }

    #[test]
    fn test_script_escapes_selectors() {
        let script = handle().build_script(&spec());
        assert!(script.contains(
            r#"page.locator("xpath=//span[contains(., 'Lorem ipsum')]/following-sibling::button[1]").click();"#
        ));
        assert!(script.contains(r#"pressSequentially(" dolor sit""#));
        assert!(script.contains(r##"await expect(page.locator("#submitBtn")).toBeDisabled();"##));
        assert!(script.contains(r##"await expect(page.locator("#submitBtn")).toHaveCount(1);"##));
        assert!(script.contains("const baseUrl = \"http://127.0.0.1:1234\";"));
        assert!(script.contains("index = 3;"));
    }

    #[test]
    fn test_collect_results_success() {
        let stdout = r#"{"event":"step","index":0,"duration_ms":30}
{"event":"step","index":1,"duration_ms":5}
{"event":"step","index":2,"duration_ms":8}
{"event":"step","index":3,"duration_ms":2}
{"event":"done"}"#;
        let results = collect_results(&spec(), stdout);
        assert_eq!(results.len(), 4);
        assert!(results.iter().all(|r| r.success));
        assert_eq!(results[0].step_name, "navigate:/");
    }

    #[test]
    fn test_collect_results_failure() {
        let stdout = "[TEST] noise\n{\"event\":\"step\",\"index\":0,\"duration_ms\":30}\n{\"event\":\"failed\",\"index\":1,\"error\":\"Timeout 5000ms exceeded\"}\n";
        let results = collect_results(&spec(), stdout);
        assert_eq!(results.len(), 2);
        assert!(!results[1].success);
        assert_eq!(results[1].step_name, "type:input[name=text]");
        assert_eq!(results[1].error.as_deref(), Some("Timeout 5000ms exceeded"));
    }

    fn step_js(yaml: &str) -> String {
        let step: TestStep = serde_yaml::from_str(yaml).unwrap();
        handle().step_to_js(&step)
    }

    #[test]
    fn test_press_step() {
        assert_eq!(
            step_js("action: press\nselector: \"input[name=text]\"\nkey: Enter"),
            r#"    await page.locator("input[name=text]").press("Enter");"#
        );
        assert_eq!(
            step_js("action: press\nkey: Escape"),
            r#"    await page.keyboard.press("Escape");"#
        );
    }

    #[test]
    fn test_wait_step_states() {
        assert_eq!(
            step_js("action: wait\nselector: li.quote"),
            r#"    await page.locator("li.quote").first().waitFor({ state: 'visible', timeout: 5000 });"#
        );
        for state in ["hidden", "attached", "detached"] {
            let js = step_js(&format!(
                "action: wait\nselector: li.quote\nstate: {}\ntimeout_ms: 250",
                state
            ));
            assert!(
                js.ends_with(&format!("waitFor({{ state: '{}', timeout: 250 }});", state)),
                "{}",
                js
            );
        }
    }

    #[test]
    fn test_sleep_and_log_steps() {
        assert_eq!(
            step_js("action: sleep\nms: 300"),
            "    await page.waitForTimeout(300);"
        );
        assert_eq!(
            step_js("action: log\nmessage: \"it's \\\"done\\\"\""),
            r#"    console.error('[TEST] ' + "it's \"done\"");"#
        );
    }

    #[test]
    fn test_screenshot_steps() {
        let shots = handle().config.screenshot_dir.join("after-edit.png");
        let path = js_str(&shots.to_string_lossy());

        assert_eq!(
            step_js("action: screenshot\nname: after-edit"),
            format!("    await page.screenshot({{ path: {}, fullPage: false }});", path)
        );
        assert_eq!(
            step_js("action: screenshot\nname: after-edit\nfull_page: true"),
            format!("    await page.screenshot({{ path: {}, fullPage: true }});", path)
        );
        assert_eq!(
            step_js("action: screenshot\nname: after-edit\nselector: \"#quotes\""),
            format!(
                "    await page.locator(\"#quotes\").screenshot({{ path: {} }});",
                path
            )
        );
    }

    #[test]
    fn test_screenshot_dir_made_absolute() {
        // A directory named relative to the current one, as the CLI passes it.
        let scratch = tempfile::tempdir_in(".").unwrap();
        let relative = PathBuf::from(scratch.path().file_name().unwrap()).join("shots");
        assert!(relative.is_relative());

        let handle = PlaywrightHandle::new(PlaywrightConfig {
            screenshot_dir: relative,
            ..Default::default()
        })
        .unwrap();
        let dir = &handle.config.screenshot_dir;
        assert!(dir.is_absolute());
        assert!(dir.is_dir());

        let spec = TestSpec::from_yaml(
            "name: shot\nsteps:\n  - action: screenshot\n    name: home\n",
        )
        .unwrap();
        let expected = js_str(&dir.join("home.png").to_string_lossy());
        assert!(handle.build_script(&spec).contains(&expected));
    }

    #[test]
    fn test_browser_parse() {
        assert_eq!(Browser::parse("webkit"), Some(Browser::Webkit));
        assert_eq!(Browser::parse("lynx"), None);
    }
}
