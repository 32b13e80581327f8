//! Core types for transport controls
//!
//! Input events as delivered by remotes and touch surfaces, seek directions,
//! and the track/quality descriptors handed to the playback engine.

use crate::Error;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// Session Types
// =============================================================================

/// Unique controls session identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub Uuid);

impl SessionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SessionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Seek Direction
// =============================================================================

/// Direction of a rewind/fast-forward burst
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Direction {
    #[serde(alias = "fastForward")]
    Forward,
    Rewind,
}

impl Direction {
    /// Sign carried by press counts in this direction
    pub fn sign(self) -> i32 {
        match self {
            Direction::Forward => 1,
            Direction::Rewind => -1,
        }
    }

    /// True if `count` points the same way as this direction
    pub fn agrees_with(self, count: i32) -> bool {
        match self {
            Direction::Forward => count >= 1,
            Direction::Rewind => count <= -1,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Forward => write!(f, "forward"),
            Direction::Rewind => write!(f, "rewind"),
        }
    }
}

impl FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "forward" | "fastForward" => Ok(Direction::Forward),
            "rewind" => Ok(Direction::Rewind),
            other => Err(Error::UnknownDirection(other.to_string())),
        }
    }
}

// =============================================================================
// Input Events
// =============================================================================

/// Keys a TV remote can deliver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RemoteKey {
    FastForward,
    Rewind,
    PlayPause,
    Select,
    Up,
    Down,
    /// Anything the controls do not react to
    #[serde(other)]
    Other,
}

impl RemoteKey {
    /// Seek direction for rewind/fast-forward keys
    pub fn direction(self) -> Option<Direction> {
        match self {
            RemoteKey::FastForward => Some(Direction::Forward),
            RemoteKey::Rewind => Some(Direction::Rewind),
            _ => None,
        }
    }
}

impl FromStr for RemoteKey {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fastForward" => Ok(RemoteKey::FastForward),
            "rewind" => Ok(RemoteKey::Rewind),
            "playPause" => Ok(RemoteKey::PlayPause),
            "select" => Ok(RemoteKey::Select),
            "up" => Ok(RemoteKey::Up),
            "down" => Ok(RemoteKey::Down),
            other => Err(Error::UnknownKey(other.to_string())),
        }
    }
}

/// Key press phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KeyAction {
    Down,
    Up,
}

/// Discrete event from the input source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum InputEvent {
    /// Tap on the video surface
    Tap,
    /// Remote-control key
    #[serde(rename_all = "camelCase")]
    RemoteKey { key: RemoteKey, key_action: KeyAction },
}

impl InputEvent {
    /// Key-down event for `key`
    pub fn key_down(key: RemoteKey) -> Self {
        InputEvent::RemoteKey {
            key,
            key_action: KeyAction::Down,
        }
    }

    /// Key-up event for `key`
    pub fn key_up(key: RemoteKey) -> Self {
        InputEvent::RemoteKey {
            key,
            key_action: KeyAction::Up,
        }
    }
}

// =============================================================================
// Tracks and Quality
// =============================================================================

/// Track variant kinds understood by the playback engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TrackKind {
    Text,
    Audio,
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackKind::Text => write!(f, "TEXT"),
            TrackKind::Audio => write!(f, "AUDIO"),
        }
    }
}

impl FromStr for TrackKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "TEXT" => Ok(TrackKind::Text),
            "AUDIO" => Ok(TrackKind::Audio),
            other => Err(Error::UnknownTrackKind(other.to_string())),
        }
    }
}

/// A selectable caption or audio track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackInfo {
    pub kind: TrackKind,
    pub display_name: String,
    pub language_code: String,
}

impl TrackInfo {
    pub fn new(kind: TrackKind, display_name: impl Into<String>, language_code: impl Into<String>) -> Self {
        Self {
            kind,
            display_name: display_name.into(),
            language_code: language_code.into(),
        }
    }
}

/// Preferred track variant passed to the engine
///
/// Empty name and language switch the track kind off.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackVariant {
    pub kind: TrackKind,
    pub language_code: String,
    pub display_name: String,
    pub mime_type: String,
}

impl TrackVariant {
    /// Variant that disables the track kind
    pub fn off(kind: TrackKind) -> Self {
        Self {
            kind,
            language_code: String::new(),
            display_name: String::new(),
            mime_type: String::new(),
        }
    }

    /// True if this variant disables the track kind
    pub fn is_off(&self) -> bool {
        self.language_code.is_empty() && self.display_name.is_empty()
    }
}

impl From<&TrackInfo> for TrackVariant {
    fn from(track: &TrackInfo) -> Self {
        Self {
            kind: track.kind,
            language_code: track.language_code.clone(),
            display_name: track.display_name.clone(),
            mime_type: String::new(),
        }
    }
}

/// User-facing stream quality preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StreamQuality {
    Auto,
    Low,
    Medium,
    High,
}

impl fmt::Display for StreamQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamQuality::Auto => write!(f, "Auto"),
            StreamQuality::Low => write!(f, "Low"),
            StreamQuality::Medium => write!(f, "Medium"),
            StreamQuality::High => write!(f, "High"),
        }
    }
}

impl FromStr for StreamQuality {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Auto" => Ok(StreamQuality::Auto),
            "Low" => Ok(StreamQuality::Low),
            "Medium" => Ok(StreamQuality::Medium),
            "High" => Ok(StreamQuality::High),
            other => Err(Error::UnknownQuality(other.to_string())),
        }
    }
}

/// Video quality cap passed to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualitySelection {
    /// Peak bitrate in bits/s (0 = unlimited)
    pub peak_bitrate: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_agreement() {
        assert!(Direction::Forward.agrees_with(3));
        assert!(!Direction::Forward.agrees_with(0));
        assert!(!Direction::Forward.agrees_with(-2));
        assert!(Direction::Rewind.agrees_with(-1));
        assert!(!Direction::Rewind.agrees_with(2));
    }

    #[test]
    fn test_direction_labels() {
        assert_eq!("fastForward".parse::<Direction>().unwrap(), Direction::Forward);
        assert_eq!("rewind".parse::<Direction>().unwrap(), Direction::Rewind);
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_input_event_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"remoteKey","key":"fastForward","keyAction":"down"}"#).unwrap();
        assert_eq!(event, InputEvent::key_down(RemoteKey::FastForward));

        let event: InputEvent =
            serde_json::from_str(r#"{"type":"remoteKey","key":"menu","keyAction":"down"}"#).unwrap();
        assert_eq!(event, InputEvent::key_down(RemoteKey::Other));

        let event: InputEvent = serde_json::from_str(r#"{"type":"tap"}"#).unwrap();
        assert_eq!(event, InputEvent::Tap);
    }

    #[test]
    fn test_remote_key_strict_parse() {
        assert_eq!("playPause".parse::<RemoteKey>().unwrap(), RemoteKey::PlayPause);
        assert!(matches!("menu".parse::<RemoteKey>(), Err(Error::UnknownKey(_))));
    }

    #[test]
    fn test_track_variant_off() {
        let off = TrackVariant::off(TrackKind::Text);
        assert!(off.is_off());

        let track = TrackInfo::new(TrackKind::Audio, "English", "en");
        assert!(!TrackVariant::from(&track).is_off());
    }
}
