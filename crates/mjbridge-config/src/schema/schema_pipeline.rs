//! Polling, storage and classifier configuration.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// `[poll]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollConfig {
    /// Pause between two snapshots of the channel.
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Give up after this many seconds. Unset means wait forever.
    #[serde(default)]
    pub deadline_secs: Option<u64>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            deadline_secs: None,
        }
    }
}

impl PollConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_secs.map(Duration::from_secs)
    }
}

fn default_interval_ms() -> u64 {
    1000
}

/// `[storage]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    #[serde(default = "default_download_timeout")]
    pub download_timeout_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            download_timeout_secs: default_download_timeout(),
        }
    }
}

impl StorageConfig {
    pub fn output_path(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.output_dir).to_string())
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}

fn default_output_dir() -> String {
    "./images".to_string()
}

fn default_download_timeout() -> u64 {
    60
}

/// `[classifier]` table. Each entry replaces one of the built-in patterns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub progress: Option<String>,

    #[serde(default)]
    pub upscale: Option<String>,

    #[serde(default)]
    pub grid: Option<String>,

    #[serde(default)]
    pub variations: Option<String>,
}

impl ClassifierConfig {
    /// `(field, pattern)` pairs for every override that is set.
    pub fn overrides(&self) -> Vec<(&'static str, &str)> {
        [
            ("progress", &self.progress),
            ("upscale", &self.upscale),
            ("grid", &self.grid),
            ("variations", &self.variations),
        ]
        .into_iter()
        .filter_map(|(name, pattern)| pattern.as_deref().map(|p| (name, p)))
        .collect()
    }
}
