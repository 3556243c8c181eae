//! The quotes-web process under test

use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::error::{E2eError, E2eResult};

/// How to launch quotes-web for a test run
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Path to the quotes-web binary
    pub binary_path: PathBuf,

    /// Fixed port; a free one is picked when unset
    pub port: Option<u16>,

    pub startup_timeout: Duration,

    /// Expose `POST /api/test/reset`
    pub test_mode: bool,

    /// Forward the server's stderr to ours
    pub show_logs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            binary_path: PathBuf::from("target/debug/quotes-web"),
            port: None,
            startup_timeout: Duration::from_secs(30),
            test_mode: true,
            show_logs: false,
        }
    }
}

impl ServerConfig {
    /// quotes-web always runs on the in-memory store under test
    fn command(&self, port: u16) -> Command {
        let mut cmd = Command::new(&self.binary_path);
        cmd.env("QUOTES_WEB_ADDR", format!("127.0.0.1:{}", port))
            .env("QUOTES_STORE", "memory")
            .env_remove("QUOTES_DB_PATH")
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(if self.show_logs {
                Stdio::inherit()
            } else {
                Stdio::null()
            });
        if self.test_mode {
            cmd.env("QUOTES_E2E_TEST_MODE", "1");
        }
        cmd
    }
}

/// A running quotes-web child process
pub struct ServerHandle {
    child: Child,
    http: reqwest::Client,
    pub base_url: String,
    pub port: u16,
}

impl ServerHandle {
    /// Launch quotes-web and wait until `/health` answers
    pub async fn spawn(config: ServerConfig) -> E2eResult<Self> {
        let port = match config.port {
            Some(port) => port,
            None => find_free_port()?,
        };

        let child = config.command(port).spawn().map_err(|e| {
            E2eError::ServerStartup(format!("{}: {}", config.binary_path.display(), e))
        })?;
        info!("Started quotes-web (pid {}) on port {}", child.id(), port);

        let handle = ServerHandle {
            child,
            http: reqwest::Client::builder()
                .timeout(Duration::from_secs(2))
                .build()?,
            base_url: format!("http://127.0.0.1:{}", port),
            port,
        };

        handle.wait_until_healthy(config.startup_timeout).await?;
        Ok(handle)
    }

    async fn wait_until_healthy(&self, limit: Duration) -> E2eResult<()> {
        let url = format!("{}/health", self.base_url);
        let deadline = Instant::now() + limit;
        let mut attempts = 0;

        while Instant::now() < deadline {
            attempts += 1;
            match self.http.get(&url).send().await {
                Ok(resp) if resp.status().is_success() => {
                    debug!("quotes-web healthy after {} attempt(s)", attempts);
                    return Ok(());
                }
                Ok(resp) => warn!("Health check returned {}", resp.status()),
                // Refused connections are expected until the listener is bound.
                Err(e) if e.is_connect() => {}
                Err(e) => warn!("Health check error: {}", e),
            }
            tokio::time::sleep(Duration::from_millis(100)).await;
        }

        Err(E2eError::ServerUnhealthy { url, attempts })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Drop every quote and clear the form buffer
    pub async fn reset(&self) -> E2eResult<()> {
        let resp = self
            .http
            .post(format!("{}/api/test/reset", self.base_url))
            .send()
            .await?;
        match resp.status() {
            status if status.is_success() => Ok(()),
            status => Err(E2eError::Reset(status)),
        }
    }

    /// SIGTERM, a short grace period, then kill
    pub fn stop(&mut self) -> E2eResult<()> {
        if let Ok(Some(_)) = self.child.try_wait() {
            return Ok(());
        }
        info!("Stopping quotes-web (pid {})", self.child.id());

        #[cfg(unix)]
        {
            use nix::sys::signal::{kill, Signal};
            use nix::unistd::Pid;

            if kill(Pid::from_raw(self.child.id() as i32), Signal::SIGTERM).is_ok() {
                std::thread::sleep(Duration::from_millis(500));
            }
        }

        if self.child.try_wait()?.is_none() {
            self.child.kill()?;
        }
        self.child.wait()?;
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        let _ = self.stop();
    }
}

/// Ask the OS for an unused local port
fn find_free_port() -> E2eResult<u16> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    Ok(listener.local_addr()?.port())
}
