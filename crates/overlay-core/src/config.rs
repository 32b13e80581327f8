//! Controls configuration

use crate::{Error, Result, StreamQuality};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Transport controls configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ControlsConfig {
    /// Show controls as soon as the view mounts
    pub show_on_start: bool,
    /// Auto-hide delay after a show or an interaction (milliseconds)
    pub control_timeout_ms: u64,
    /// Hide delay after a rewind/forward hint flash (milliseconds)
    pub seek_hint_timeout_ms: u64,
    /// Quiet period closing a key-repeat burst (milliseconds)
    pub key_debounce_ms: u64,
    /// Seek distance per unit of speed (milliseconds)
    pub seek_step_ms: u64,
    /// Idle time after which acceleration starts over (milliseconds)
    pub acceleration_window_ms: u64,
    /// Ignore fast-forward for seeking
    pub disable_forward: bool,
    /// Ignore rewind for seeking
    pub disable_rewind: bool,
    /// Peak bitrate per stream quality name, 0 = unlimited
    pub peak_bitrates: HashMap<String, u64>,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            show_on_start: false,
            control_timeout_ms: 4000,
            seek_hint_timeout_ms: 100,
            key_debounce_ms: 500,
            seek_step_ms: 10_000,
            acceleration_window_ms: 3000,
            disable_forward: false,
            disable_rewind: false,
            peak_bitrates: HashMap::new(),
        }
    }
}

impl ControlsConfig {
    /// Parse a JSON configuration and validate it
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON configuration file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.control_timeout_ms == 0 {
            return Err(Error::InvalidConfig("control_timeout_ms must be positive".into()));
        }
        if self.key_debounce_ms == 0 {
            return Err(Error::InvalidConfig("key_debounce_ms must be positive".into()));
        }
        Ok(())
    }

    pub fn control_timeout(&self) -> Duration {
        Duration::from_millis(self.control_timeout_ms)
    }

    pub fn seek_hint_timeout(&self) -> Duration {
        Duration::from_millis(self.seek_hint_timeout_ms)
    }

    pub fn key_debounce(&self) -> Duration {
        Duration::from_millis(self.key_debounce_ms)
    }

    pub fn acceleration_window(&self) -> Duration {
        Duration::from_millis(self.acceleration_window_ms)
    }

    /// Configured peak bitrate for `quality`, 0 when not configured
    pub fn peak_bitrate(&self, quality: StreamQuality) -> u64 {
        self.peak_bitrates
            .get(&quality.to_string())
            .copied()
            .unwrap_or(0)
    }
}
