//! Overlay Core - Transport Controls for TV and Mobile Players
//!
//! This crate provides the logic behind on-screen playback controls:
//! - Visibility state machine with idle auto-hide
//! - Auto-hide suppression while casting or paused
//! - Remote-control rewind/fast-forward acceleration
//! - Caption, audio and quality selection forwarded to the engine
//!
//! The playback engine, the animation layer and the screen callbacks are
//! external capabilities; this crate only decides when to call them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                         Overlay Core                            │
//! ├─────────────────────────────────────────────────────────────────┤
//! │                                                                 │
//! │  ┌──────────────┐       ┌──────────────┐    ┌──────────────┐    │
//! │  │    Input     │──────▶│   Controls   │───▶│   Key-Repeat │    │
//! │  │   (remote,   │       │   Session    │    │  Accelerator │    │
//! │  │    touch)    │       └──────┬───────┘    └──────────────┘    │
//! │  └──────────────┘              │                                │
//! │                 ┌──────────────┼──────────────┐                 │
//! │                 │              │              │                 │
//! │          ┌──────┴──────┐ ┌─────┴──────┐ ┌─────┴──────┐          │
//! │          │ Visibility  │ │  Playback  │ │   Track    │          │
//! │          │ Controller  │ │   Engine   │ │  Selector  │          │
//! │          └──────┬──────┘ └────────────┘ └────────────┘          │
//! │          ┌──────┴──────┐                                        │
//! │          │ Hide Timer  │──▶ Animation Sink                      │
//! │          └─────────────┘                                        │
//! └─────────────────────────────────────────────────────────────────┘
//! ```

pub mod error;
pub mod types;
pub mod config;
pub mod accelerator;
pub mod timer;
pub mod visibility;
pub mod engine;
pub mod tracks;
pub mod session;

pub use error::{Error, Result};
pub use types::*;
pub use config::ControlsConfig;
pub use accelerator::{KeyRepeatAccelerator, KeyRepeatState};
pub use timer::{HideTimer, TimerId, TokioHideTimer};
pub use visibility::{
    AnimationSignal, AnimationSink, ControlsCommand, ControlsPhase, ControlsState,
    ControlsVisibilityController,
};
pub use engine::{ControlsListener, NoopListener, PlaybackEngine};
pub use tracks::TrackSelector;
pub use session::{ControlsHandle, ControlsSession, SessionCommand};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Log library initialisation
pub fn init() {
    tracing::info!(version = VERSION, "Overlay Core initialized");
}
