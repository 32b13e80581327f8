//! Caption and audio track selection

use crate::{TrackInfo, TrackKind, TrackVariant};
use tracing::warn;

/// Display name of the entry that switches captions off
pub const OFF_TRACK_NAME: &str = "Off";

/// Selectable tracks and the active choice for each kind
#[derive(Debug, Clone)]
pub struct TrackSelector {
    captions: Vec<TrackInfo>,
    audio: Vec<TrackInfo>,
    active_caption: usize,
    active_audio: usize,
}

impl TrackSelector {
    /// Captions always start with an `Off` entry, inserted once
    pub fn new(mut captions: Vec<TrackInfo>, audio: Vec<TrackInfo>) -> Self {
        let has_off = captions
            .first()
            .is_some_and(|track| track.display_name == OFF_TRACK_NAME);
        if !has_off {
            captions.insert(0, TrackInfo::new(TrackKind::Text, OFF_TRACK_NAME, ""));
        }

        Self {
            captions,
            audio,
            active_caption: 0,
            active_audio: 0,
        }
    }

    pub fn caption_options(&self) -> &[TrackInfo] {
        &self.captions
    }

    pub fn audio_options(&self) -> &[TrackInfo] {
        &self.audio
    }

    pub fn active_caption(&self) -> Option<&TrackInfo> {
        self.captions.get(self.active_caption)
    }

    pub fn active_audio(&self) -> Option<&TrackInfo> {
        self.audio.get(self.active_audio)
    }

    /// True while the `Off` caption entry is active
    pub fn captions_off(&self) -> bool {
        self.active_caption == 0
    }

    /// Mark a caption as active without producing a variant
    pub fn sync_active_caption(&mut self, display_name: &str) {
        if let Some(index) = position(&self.captions, display_name) {
            self.active_caption = index;
        }
    }

    /// Select a caption by display name
    pub fn select_caption(&mut self, display_name: &str) -> Option<TrackVariant> {
        let Some(index) = position(&self.captions, display_name) else {
            warn!(display_name, "Unknown caption track");
            return None;
        };
        self.active_caption = index;

        if index == 0 {
            Some(TrackVariant::off(TrackKind::Text))
        } else {
            Some(TrackVariant::from(&self.captions[index]))
        }
    }

    /// Select an audio track by display name
    pub fn select_audio(&mut self, display_name: &str) -> Option<TrackVariant> {
        let Some(index) = position(&self.audio, display_name) else {
            warn!(display_name, "Unknown audio track");
            return None;
        };
        self.active_audio = index;
        Some(TrackVariant::from(&self.audio[index]))
    }
}

impl Default for TrackSelector {
    fn default() -> Self {
        Self::new(Vec::new(), Vec::new())
    }
}

fn position(tracks: &[TrackInfo], display_name: &str) -> Option<usize> {
    tracks.iter().position(|track| track.display_name == display_name)
}
