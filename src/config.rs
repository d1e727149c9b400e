//! Watcher configuration loaded from `jobwatch.toml`.
//!
//! Missing keys fall back to defaults. `JOBWATCH_ENDPOINT` takes precedence
//! over the file for the endpoint.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_FILE: &str = "jobwatch.toml";

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    /// Status-check endpoint that receives `job_id` as a form field.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Delay between showing the loading indicator and rendering the message.
    #[serde(default = "default_render_delay_ms")]
    pub render_delay_ms: u64,

    /// Delay between a progress response and the next request.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Fade-in duration handed to the sink with each message.
    #[serde(default = "default_fade_in_ms")]
    pub fade_in_ms: u64,

    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_endpoint() -> String {
    "http://127.0.0.1:3000/groups/poll".to_string()
}

fn default_render_delay_ms() -> u64 {
    2000
}

fn default_poll_interval_ms() -> u64 {
    10_000
}

fn default_fade_in_ms() -> u64 {
    500
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            render_delay_ms: default_render_delay_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            fade_in_ms: default_fade_in_ms(),
            connect_timeout_secs: default_connect_timeout_secs(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl WatchConfig {
    /// Load `jobwatch.toml` from the current directory.
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Load from `path`, using defaults if the file does not exist.
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            toml::from_str::<WatchConfig>(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(endpoint) = std::env::var("JOBWATCH_ENDPOINT")
            && !endpoint.is_empty()
        {
            config.endpoint = endpoint;
        }

        Ok(config)
    }

    pub fn render_delay(&self) -> Duration {
        Duration::from_millis(self.render_delay_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn fade_in(&self) -> Duration {
        Duration::from_millis(self.fade_in_ms)
    }
}
