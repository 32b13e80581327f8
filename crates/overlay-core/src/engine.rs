//! Capabilities consumed by the controls
//!
//! The playback engine and the UI callbacks are owned elsewhere; the controls
//! only call into them.

use crate::{Error, QualitySelection, Result, StreamQuality, TrackVariant};
use async_trait::async_trait;

/// Opaque playback engine
#[async_trait]
pub trait PlaybackEngine: Send + Sync {
    async fn play(&self) -> Result<()>;

    async fn pause(&self) -> Result<()>;

    async fn stop(&self) -> Result<()>;

    /// Seek to an absolute position
    async fn seek(&self, position_ms: u64) -> Result<()>;

    /// Current playback position
    async fn position_ms(&self) -> Result<u64>;

    async fn set_preferred_track_variant(&self, variant: TrackVariant) -> Result<()>;

    async fn set_quality_selection(&self, selection: QualitySelection) -> Result<()>;
}

/// Fire-and-forget notifications for the surrounding screen
///
/// Every method defaults to doing nothing.
pub trait ControlsListener: Send {
    fn on_play(&mut self) {}

    fn on_pause(&mut self) {}

    /// A rewind/fast-forward burst resolved to `speed` and a seek target
    fn on_seek(&mut self, _speed: i32, _position_ms: u64) {}

    fn on_text_option_selected(&mut self, _variant: &TrackVariant) {}

    fn on_audio_option_selected(&mut self, _variant: &TrackVariant) {}

    fn on_quality_selected(&mut self, _quality: StreamQuality) {}

    /// Back press the controls did not consume
    fn on_back_press(&mut self) {}

    /// Engine failure, forwarded untouched
    fn on_error(&mut self, _error: &Error) {}
}

/// Listener that ignores everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopListener;

impl ControlsListener for NoopListener {}
