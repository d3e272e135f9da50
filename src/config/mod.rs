//! Configuration schema and loading.
//!
//! The overlay engine is configured from a single TOML file under the XDG
//! config directory. Every field has a default matching the engine's
//! documented behavior, so a missing file is not an error.

mod paths;

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};

pub use paths::ConfigPaths;

use crate::core::{LoopdeckError, Result};

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackendConfig {
    /// Base origin of the playback backend's HTTP API.
    pub base_url: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
        }
    }
}

/// Engine timing knobs, all in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// Interval between poll cycles.
    pub poll_interval_ms: u64,

    /// How long a local gesture outranks polled remote values.
    pub recency_window_ms: u64,

    /// Minimum spacing between two requests to the same endpoint.
    pub endpoint_debounce_ms: u64,

    /// Minimum spacing between two clicks on the same control.
    pub button_debounce_ms: u64,

    /// Deadline for a single control request.
    pub command_timeout_ms: u64,

    /// Grace period between pointer-leave and minimizing.
    pub minimize_grace_ms: u64,

    /// Idle time before the minimized card dims itself.
    pub auto_hide_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            poll_interval_ms: 2000,
            recency_window_ms: 3000,
            endpoint_debounce_ms: 150,
            button_debounce_ms: 200,
            command_timeout_ms: 3000,
            minimize_grace_ms: 100,
            auto_hide_ms: 8000,
        }
    }
}

/// Playback gesture behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Volume change applied per volume-up/down gesture, in percent.
    pub volume_step: u8,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self { volume_step: 10 }
    }
}

/// Main configuration structure for loopdeck.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Backend connection settings.
    #[serde(default)]
    pub backend: BackendConfig,

    /// Engine timing knobs.
    #[serde(default)]
    pub timing: TimingConfig,

    /// Playback gesture behavior.
    #[serde(default)]
    pub playback: PlaybackConfig,
}

impl Config {
    /// Load configuration from the default XDG location.
    ///
    /// A missing file yields the defaults.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load() -> Result<Self> {
        let path = ConfigPaths::config_file()?;
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path.
    ///
    /// # Errors
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| LoopdeckError::toml_parse(e, Some(path)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_constants() {
        let config = Config::default();

        assert_eq!(config.backend.base_url, "http://127.0.0.1:5000");
        assert_eq!(config.timing.poll_interval_ms, 2000);
        assert_eq!(config.timing.recency_window_ms, 3000);
        assert_eq!(config.timing.endpoint_debounce_ms, 150);
        assert_eq!(config.timing.button_debounce_ms, 200);
        assert_eq!(config.timing.command_timeout_ms, 3000);
        assert_eq!(config.timing.minimize_grace_ms, 100);
        assert_eq!(config.timing.auto_hide_ms, 8000);
        assert_eq!(config.playback.volume_step, 10);
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config: Config = toml::from_str(
            r#"
[backend]
base_url = "http://10.0.0.2:5000"

[timing]
poll_interval_ms = 500
"#,
        )
        .unwrap_or_default();

        assert_eq!(config.backend.base_url, "http://10.0.0.2:5000");
        assert_eq!(config.timing.poll_interval_ms, 500);
        assert_eq!(config.timing.recency_window_ms, 3000);
        assert_eq!(config.playback.volume_step, 10);
    }
}
