//! Browser session configuration: credentials and Chrome settings.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use mjbridge_protocols::Credentials;

/// `[credentials]` table.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub server_id: String,

    #[serde(default)]
    pub channel_id: String,
}

impl CredentialsConfig {
    pub fn to_credentials(&self) -> Credentials {
        Credentials::new(
            self.email.clone(),
            self.password.clone(),
            self.server_id.clone(),
            self.channel_id.clone(),
        )
    }
}

impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("server_id", &self.server_id)
            .field("channel_id", &self.channel_id)
            .finish()
    }
}

/// `[browser]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Chrome remote debugging port.
    #[serde(default = "default_debug_port")]
    pub debug_port: u16,

    /// Persistent profile so the Discord login survives between runs.
    #[serde(default)]
    pub profile_dir: Option<String>,

    /// Explicit Chrome binary; searched in the usual places when unset.
    #[serde(default)]
    pub chrome_path: Option<String>,

    #[serde(default)]
    pub headless: bool,

    /// Upper bound for waiting on login form, channel and autocomplete.
    #[serde(default = "default_ready_timeout")]
    pub ready_timeout_secs: u64,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            debug_port: default_debug_port(),
            profile_dir: None,
            chrome_path: None,
            headless: false,
            ready_timeout_secs: default_ready_timeout(),
        }
    }
}

impl BrowserConfig {
    pub fn ready_timeout(&self) -> Duration {
        Duration::from_secs(self.ready_timeout_secs)
    }

    /// Profile directory with `~` expanded, falling back to `~/.mjbridge/browser-profile`.
    pub fn resolved_profile_dir(&self) -> PathBuf {
        match &self.profile_dir {
            Some(dir) => PathBuf::from(shellexpand::tilde(dir).to_string()),
            None => dirs::home_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join(".mjbridge")
                .join("browser-profile"),
        }
    }
}

fn default_debug_port() -> u16 {
    9222
}

fn default_ready_timeout() -> u64 {
    120
}
