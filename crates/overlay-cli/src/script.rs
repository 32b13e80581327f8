//! Replay script format
//!
//! ```json
//! {
//!   "position_ms": 60000,
//!   "captions": [{"kind": "TEXT", "displayName": "English", "languageCode": "en"}],
//!   "steps": [
//!     {"after_ms": 0, "action": "input", "event": {"type": "tap"}},
//!     {"after_ms": 200, "action": "key", "key": "fastForward"},
//!     {"after_ms": 100, "action": "casting", "enabled": true}
//!   ]
//! }
//! ```

use anyhow::Context;
use overlay_core::{InputEvent, RemoteKey, StreamQuality, TrackInfo};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A scripted session
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Script {
    /// Engine position when the session starts
    #[serde(default)]
    pub position_ms: u64,
    #[serde(default)]
    pub captions: Vec<TrackInfo>,
    #[serde(default)]
    pub audio: Vec<TrackInfo>,
    /// Wait after the last step before reporting; defaults to the control timeout
    #[serde(default)]
    pub settle_ms: Option<u64>,
    pub steps: Vec<Step>,
}

/// One action, delayed relative to the previous step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    #[serde(default)]
    pub after_ms: u64,
    #[serde(flatten)]
    pub action: Action,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    /// Raw input event
    Input { event: InputEvent },
    /// Key-down shorthand
    Key { key: RemoteKey },
    Touch,
    Back,
    Casting { enabled: bool },
    Caption { name: String },
    Audio { name: String },
    Quality { quality: StreamQuality },
    SeekTo { position_ms: u64 },
}

impl Script {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Invalid replay script")
    }

    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&json)
    }
}
