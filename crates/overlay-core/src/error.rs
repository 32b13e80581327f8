//! Error types for Overlay Core

use thiserror::Error;

/// Result type alias for controls operations
pub type Result<T> = std::result::Result<T, Error>;

/// Controls error types
///
/// The visibility controller and the key-repeat accelerator never produce
/// these; they only surface at the edges (configuration, label parsing,
/// playback engine calls, session plumbing).
#[derive(Error, Debug)]
pub enum Error {
    // Input errors
    #[error("Unknown remote key: {0}")]
    UnknownKey(String),

    #[error("Unknown seek direction: {0}")]
    UnknownDirection(String),

    #[error("Unknown track kind: {0}")]
    UnknownTrackKind(String),

    #[error("Unknown stream quality: {0}")]
    UnknownQuality(String),

    // Playback engine errors
    #[error("Playback engine error: {0}")]
    Playback(String),

    // Session errors
    #[error("Controls session closed")]
    SessionClosed,

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Create a playback engine error
    pub fn playback(msg: impl Into<String>) -> Self {
        Error::Playback(msg.into())
    }

    /// Returns true if the session can keep running after this error
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Error::UnknownKey(_)
                | Error::UnknownDirection(_)
                | Error::UnknownTrackKind(_)
                | Error::UnknownQuality(_)
                | Error::Playback(_)
        )
    }

    /// Returns the error code for reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::UnknownKey(_) => "UNKNOWN_KEY",
            Error::UnknownDirection(_) => "UNKNOWN_DIRECTION",
            Error::UnknownTrackKind(_) => "UNKNOWN_TRACK_KIND",
            Error::UnknownQuality(_) => "UNKNOWN_QUALITY",
            Error::Playback(_) => "PLAYBACK",
            Error::SessionClosed => "SESSION_CLOSED",
            Error::InvalidConfig(_) => "INVALID_CONFIG",
            Error::Json(_) => "JSON",
            Error::Io(_) => "IO",
        }
    }
}
