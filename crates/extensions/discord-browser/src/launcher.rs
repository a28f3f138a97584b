//! Chrome discovery and launch.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use mjbridge_protocols::SessionError;

use crate::cdp::{CdpClient, CdpError};

/// Browser lifecycle errors.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("Chrome not found. Please install Google Chrome or set browser.chrome_path.")]
    ChromeNotFound,

    #[error("Failed to launch Chrome: {0}")]
    LaunchFailed(String),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error(transparent)]
    Cdp(CdpError),
}

impl From<CdpError> for BrowserError {
    fn from(e: CdpError) -> Self {
        match e {
            CdpError::ConnectionFailed(msg) | CdpError::ChromeNotAvailable(msg) => {
                BrowserError::ConnectionFailed(msg)
            }
            other => BrowserError::Cdp(other),
        }
    }
}

impl From<BrowserError> for SessionError {
    fn from(e: BrowserError) -> Self {
        match e {
            BrowserError::Cdp(cdp) => cdp.into(),
            other => SessionError::Unavailable(other.to_string()),
        }
    }
}

/// How to find or start Chrome.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Chrome debugging port.
    pub debug_port: u16,
    /// Profile directory for persistent login state.
    pub profile_dir: Option<PathBuf>,
    /// Explicit Chrome binary.
    pub chrome_path: Option<PathBuf>,
    pub headless: bool,
    /// How long to wait for a freshly launched Chrome to answer.
    pub startup_timeout: Duration,
    /// Upper bound for a single CDP command.
    pub request_timeout: Duration,
}

impl Default for LaunchConfig {
    fn default() -> Self {
        Self {
            debug_port: 9222,
            profile_dir: None,
            chrome_path: None,
            headless: false,
            startup_timeout: Duration::from_secs(6),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl LaunchConfig {
    /// HTTP debugging endpoint.
    pub fn endpoint(&self) -> String {
        format!("http://127.0.0.1:{}", self.debug_port)
    }

    /// Profile directory, defaulting to `~/.mjbridge/browser-profile`.
    pub fn profile_dir(&self) -> PathBuf {
        self.profile_dir.clone().unwrap_or_else(|| {
            dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".mjbridge")
                .join("browser-profile")
        })
    }

    /// Command-line flags for a launched Chrome.
    pub fn chrome_args(&self) -> Vec<String> {
        let mut args = vec![
            format!("--remote-debugging-port={}", self.debug_port),
            format!("--user-data-dir={}", self.profile_dir().display()),
            "--no-first-run".to_string(),
            "--no-default-browser-check".to_string(),
            "--disable-background-networking".to_string(),
            "--disable-sync".to_string(),
            "--disable-translate".to_string(),
        ];
        if self.headless {
            args.push("--headless=new".to_string());
        }
        args
    }
}

/// Finds a running Chrome or starts one.
pub struct ChromeLauncher {
    config: LaunchConfig,
}

impl ChromeLauncher {
    pub fn new(config: LaunchConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LaunchConfig {
        &self.config
    }

    /// Find a Chrome executable in the usual install locations.
    pub fn find_chrome() -> Option<PathBuf> {
        let candidates: &[&str] = if cfg!(target_os = "macos") {
            &[
                "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
                "/Applications/Chromium.app/Contents/MacOS/Chromium",
                "/Applications/Microsoft Edge.app/Contents/MacOS/Microsoft Edge",
            ]
        } else if cfg!(target_os = "windows") {
            &[
                r"C:\Program Files\Google\Chrome\Application\chrome.exe",
                r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            ]
        } else {
            &[
                "/usr/bin/google-chrome",
                "/usr/bin/google-chrome-stable",
                "/usr/bin/chromium",
                "/usr/bin/chromium-browser",
                "/snap/bin/chromium",
            ]
        };

        candidates
            .iter()
            .map(PathBuf::from)
            .find(|p| p.exists())
    }

    /// Whether something answers CDP on the debug port.
    pub async fn is_running(&self) -> bool {
        CdpClient::fetch_version(&self.config.endpoint()).await.is_ok()
    }

    /// Make sure Chrome is reachable. Returns the child process when this
    /// call had to start it; the process is killed when the handle drops.
    pub async fn ensure_running(&self) -> Result<Option<Child>, BrowserError> {
        if self.is_running().await {
            info!("Chrome already running on port {}", self.config.debug_port);
            return Ok(None);
        }

        info!(
            "Chrome not running on port {}, launching...",
            self.config.debug_port
        );
        let mut child = self.launch()?;

        let deadline = tokio::time::Instant::now() + self.config.startup_timeout;
        while tokio::time::Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(200)).await;
            if self.is_running().await {
                return Ok(Some(child));
            }
            if let Ok(Some(status)) = child.try_wait() {
                return Err(BrowserError::LaunchFailed(format!(
                    "Chrome exited during startup ({})",
                    status
                )));
            }
        }

        Err(BrowserError::LaunchFailed(
            "Chrome failed to start within timeout".to_string(),
        ))
    }

    fn launch(&self) -> Result<Child, BrowserError> {
        let chrome_path = match &self.config.chrome_path {
            Some(path) => path.clone(),
            None => Self::find_chrome().ok_or(BrowserError::ChromeNotFound)?,
        };
        let profile_dir = self.config.profile_dir();
        prepare_profile_dir(&profile_dir);

        info!("Launching Chrome with profile at: {}", profile_dir.display());
        debug!("Chrome binary: {}", chrome_path.display());

        let child = Command::new(&chrome_path)
            .args(self.config.chrome_args())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        info!("Chrome launched with PID: {:?}", child.id());
        Ok(child)
    }
}

fn prepare_profile_dir(dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(dir) {
        warn!("Failed to create profile directory: {}", e);
    }
}
