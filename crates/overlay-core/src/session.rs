//! Controls Session - event loop for one mounted player screen
//!
//! Coordinates:
//! - Input events (remote keys, taps) and screen commands
//! - Visibility controller and its hide timers
//! - Debounced rewind/fast-forward bursts and key-repeat acceleration
//! - Play/pause, seek, track and quality calls into the playback engine
//!
//! Everything runs on one task; the session owns all state.

use crate::{
    accelerator::KeyRepeatAccelerator,
    engine::{ControlsListener, PlaybackEngine},
    timer::{TimerId, TokioHideTimer},
    tracks::TrackSelector,
    visibility::{AnimationSink, ControlsPhase, ControlsVisibilityController},
    ControlsConfig, Direction, Error, InputEvent, KeyAction, QualitySelection, RemoteKey, Result,
    SessionId, StreamQuality,
};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;
use tracing::{debug, info, instrument, warn};

/// Command queue depth between the screen and the session
const COMMAND_BUFFER: usize = 64;

/// Commands accepted by a running session
#[derive(Debug)]
pub enum SessionCommand {
    /// Raw input from a remote or touch surface
    Input(InputEvent),
    /// Focus or press on any on-screen control
    Touch,
    /// Hardware back; replies whether the controls consumed it
    Back(oneshot::Sender<bool>),
    SetCasting(bool),
    SelectCaption(String),
    SelectAudio(String),
    SelectQuality(StreamQuality),
    /// Seek bar released at an absolute position
    SeekTo(u64),
    /// Report the current phase
    Phase(oneshot::Sender<ControlsPhase>),
}

/// Cloneable handle for feeding a session
#[derive(Debug, Clone)]
pub struct ControlsHandle {
    tx: mpsc::Sender<SessionCommand>,
}

impl ControlsHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<()> {
        self.tx.send(command).await.map_err(|_| Error::SessionClosed)
    }

    pub async fn input(&self, event: InputEvent) -> Result<()> {
        self.send(SessionCommand::Input(event)).await
    }

    pub async fn key_down(&self, key: RemoteKey) -> Result<()> {
        self.input(InputEvent::key_down(key)).await
    }

    pub async fn touch(&self) -> Result<()> {
        self.send(SessionCommand::Touch).await
    }

    pub async fn back(&self) -> Result<bool> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Back(reply)).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }

    pub async fn set_casting(&self, casting: bool) -> Result<()> {
        self.send(SessionCommand::SetCasting(casting)).await
    }

    pub async fn select_caption(&self, display_name: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::SelectCaption(display_name.into())).await
    }

    pub async fn select_audio(&self, display_name: impl Into<String>) -> Result<()> {
        self.send(SessionCommand::SelectAudio(display_name.into())).await
    }

    pub async fn select_quality(&self, quality: StreamQuality) -> Result<()> {
        self.send(SessionCommand::SelectQuality(quality)).await
    }

    pub async fn seek_to(&self, position_ms: u64) -> Result<()> {
        self.send(SessionCommand::SeekTo(position_ms)).await
    }

    pub async fn phase(&self) -> Result<ControlsPhase> {
        let (reply, rx) = oneshot::channel();
        self.send(SessionCommand::Phase(reply)).await?;
        rx.await.map_err(|_| Error::SessionClosed)
    }
}

/// Rewind/fast-forward presses waiting for the debounce to close
#[derive(Debug, Clone, Copy)]
struct PendingBurst {
    /// Signed press count, +1 per forward press, -1 per rewind press
    count: i32,
    direction: Direction,
    deadline: Instant,
}

type BoxedSink = Box<dyn AnimationSink + Send>;

/// Clamped seek destination for a burst, never below zero
fn seek_target(position_ms: u64, speed: i32, step_ms: u64) -> u64 {
    let target = i128::from(position_ms) + i128::from(speed) * i128::from(step_ms);
    u64::try_from(target.max(0)).unwrap_or(u64::MAX)
}

/// Controls session for one player screen
pub struct ControlsSession<E: PlaybackEngine, L: ControlsListener> {
    id: SessionId,
    config: ControlsConfig,
    controls: ControlsVisibilityController<BoxedSink, TokioHideTimer>,
    timer_rx: mpsc::UnboundedReceiver<TimerId>,
    commands: mpsc::Receiver<SessionCommand>,
    accelerator: KeyRepeatAccelerator,
    burst: Option<PendingBurst>,
    last_burst_at: Option<Instant>,
    engine: Arc<E>,
    listener: L,
    tracks: TrackSelector,
    paused: bool,
    casting: bool,
}

impl<E: PlaybackEngine, L: ControlsListener> ControlsSession<E, L> {
    /// Mount a session; must be called from within a tokio runtime
    pub fn new(
        config: ControlsConfig,
        engine: Arc<E>,
        listener: L,
        sink: impl AnimationSink + Send + 'static,
        tracks: TrackSelector,
    ) -> (Self, ControlsHandle) {
        let (tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (timer, timer_rx) = TokioHideTimer::channel();
        let controls = ControlsVisibilityController::mount(&config, Box::new(sink) as BoxedSink, timer);

        let session = Self {
            id: SessionId::new(),
            config,
            controls,
            timer_rx,
            commands,
            accelerator: KeyRepeatAccelerator::new(),
            burst: None,
            last_burst_at: None,
            engine,
            listener,
            tracks,
            paused: false,
            casting: false,
        };

        (session, ControlsHandle { tx })
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Process commands until every handle is dropped, then unmount
    #[instrument(skip(self), fields(session_id = %self.id))]
    pub async fn run(mut self) {
        info!("Controls session started");

        loop {
            let burst_deadline = self.burst.map(|burst| burst.deadline);

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => break,
                },
                Some(id) = self.timer_rx.recv() => {
                    self.controls.on_timer_fired(id);
                }
                _ = tokio::time::sleep_until(burst_deadline.unwrap_or_else(Instant::now)),
                    if burst_deadline.is_some() =>
                {
                    self.flush_burst().await;
                }
            }
        }

        if let Some(burst) = self.burst.take() {
            debug!(count = burst.count, "Dropping unresolved key burst");
        }
        self.controls.on_unmount();

        info!("Controls session ended");
    }

    async fn handle(&mut self, command: SessionCommand) {
        match command {
            SessionCommand::Input(event) => self.handle_input(event).await,
            SessionCommand::Touch => self.controls.touch(),
            SessionCommand::Back(reply) => {
                let consumed = self.controls.handle_back();
                if !consumed {
                    self.listener.on_back_press();
                }
                let _ = reply.send(consumed);
            }
            SessionCommand::SetCasting(casting) => {
                self.casting = casting;
                self.update_suppression();
            }
            SessionCommand::SelectCaption(name) => {
                self.controls.touch();
                if let Some(variant) = self.tracks.select_caption(&name) {
                    let result = self.engine.set_preferred_track_variant(variant.clone()).await;
                    self.report("set_preferred_track_variant", result);
                    self.listener.on_text_option_selected(&variant);
                }
            }
            SessionCommand::SelectAudio(name) => {
                self.controls.touch();
                if let Some(variant) = self.tracks.select_audio(&name) {
                    let result = self.engine.set_preferred_track_variant(variant.clone()).await;
                    self.report("set_preferred_track_variant", result);
                    self.listener.on_audio_option_selected(&variant);
                }
            }
            SessionCommand::SelectQuality(quality) => {
                self.controls.touch();
                let selection = QualitySelection {
                    peak_bitrate: self.config.peak_bitrate(quality),
                };
                let result = self.engine.set_quality_selection(selection).await;
                self.report("set_quality_selection", result);
                self.listener.on_quality_selected(quality);
            }
            SessionCommand::SeekTo(position_ms) => {
                self.controls.touch();
                let result = self.engine.play().await;
                self.report("play", result);
                let result = self.engine.seek(position_ms).await;
                self.report("seek", result);
                if self.paused {
                    self.paused = false;
                    self.listener.on_play();
                    self.update_suppression();
                }
            }
            SessionCommand::Phase(reply) => {
                let _ = reply.send(self.controls.phase());
            }
        }
    }

    async fn handle_input(&mut self, event: InputEvent) {
        let (key, key_action) = match event {
            InputEvent::Tap => {
                self.controls.toggle();
                return;
            }
            InputEvent::RemoteKey { key, key_action } => (key, key_action),
        };

        if key_action == KeyAction::Up {
            return;
        }

        match key {
            RemoteKey::FastForward | RemoteKey::Rewind => {
                let Some(direction) = key.direction() else {
                    return;
                };
                self.controls.show_seek_hint(direction);
                if self.seek_disabled(direction) {
                    debug!(%direction, "Seeking disabled for direction");
                    return;
                }
                self.record_press(direction);
            }
            RemoteKey::PlayPause => {
                self.controls.toggle();
                self.toggle_play_pause().await;
            }
            RemoteKey::Select => self.controls.toggle(),
            RemoteKey::Up | RemoteKey::Down => self.controls.touch(),
            RemoteKey::Other => warn!("Ignoring unrecognised key"),
        }
    }

    fn seek_disabled(&self, direction: Direction) -> bool {
        match direction {
            Direction::Forward => self.config.disable_forward,
            Direction::Rewind => self.config.disable_rewind,
        }
    }

    fn record_press(&mut self, direction: Direction) {
        let deadline = Instant::now() + self.config.key_debounce();
        let count = self.burst.map_or(0, |burst| burst.count) + direction.sign();
        self.burst = Some(PendingBurst {
            count,
            direction,
            deadline,
        });
    }

    async fn flush_burst(&mut self) {
        let Some(burst) = self.burst.take() else {
            return;
        };

        let now = Instant::now();
        if self
            .last_burst_at
            .is_some_and(|at| now.duration_since(at) > self.config.acceleration_window())
        {
            self.accelerator.reset();
        }
        self.last_burst_at = Some(now);

        // First presses come back unsigned
        let speed = burst.direction.sign() * self.accelerator.compute_speed(burst.count, burst.direction).abs();

        let position = match self.engine.position_ms().await {
            Ok(position) => position,
            Err(e) => {
                self.report("position_ms", Err(e));
                return;
            }
        };
        let target = seek_target(position, speed, self.config.seek_step_ms);

        info!(count = burst.count, direction = %burst.direction, speed, from = position, to = target, "Seeking");

        let result = self.engine.seek(target).await;
        self.report("seek", result);
        self.listener.on_seek(speed, target);
    }

    async fn toggle_play_pause(&mut self) {
        self.paused = !self.paused;

        if self.paused {
            let result = self.engine.pause().await;
            self.report("pause", result);
            self.listener.on_pause();
        } else {
            let result = self.engine.play().await;
            self.report("play", result);
            self.listener.on_play();
        }

        self.update_suppression();
    }

    /// Controls stay up while casting or paused
    fn update_suppression(&mut self) {
        let suppressed = self.casting || self.paused;
        if self.controls.state().suppress_auto_hide != suppressed {
            self.controls.set_suppressed(suppressed);
        }
    }

    fn report(&mut self, call: &'static str, result: Result<()>) {
        if let Err(e) = result {
            warn!(call, code = e.error_code(), error = %e, "Playback engine call failed");
            self.listener.on_error(&e);
        }
    }
}
