//! CLI command implementations

use crate::output::print_output;
use crate::script::{Action, Script};
use anyhow::Context;
use async_trait::async_trait;
use overlay_core::{
    AnimationSignal, AnimationSink, ControlsConfig, ControlsHandle, ControlsListener,
    ControlsPhase, ControlsSession, Direction, Error, KeyRepeatAccelerator, PlaybackEngine,
    QualitySelection, StreamQuality, TrackSelector, TrackVariant,
};
use serde::Serialize;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{info, warn};

// =============================================================================
// Config
// =============================================================================

/// Load the configuration file, or defaults when none is given
pub fn load_config(path: Option<&Path>) -> anyhow::Result<ControlsConfig> {
    match path {
        Some(path) => ControlsConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(ControlsConfig::default()),
    }
}

pub fn show_config(config: &ControlsConfig, format: &str) {
    print_output(config, format, |config| {
        let mut lines = vec![
            format!("show_on_start:          {}", config.show_on_start),
            format!("control_timeout_ms:     {}", config.control_timeout_ms),
            format!("seek_hint_timeout_ms:   {}", config.seek_hint_timeout_ms),
            format!("key_debounce_ms:        {}", config.key_debounce_ms),
            format!("seek_step_ms:           {}", config.seek_step_ms),
            format!("acceleration_window_ms: {}", config.acceleration_window_ms),
            format!("disable_forward:        {}", config.disable_forward),
            format!("disable_rewind:         {}", config.disable_rewind),
        ];
        let mut bitrates: Vec<_> = config.peak_bitrates.iter().collect();
        bitrates.sort();
        for (quality, bitrate) in bitrates {
            lines.push(format!("peak_bitrate[{}]: {}", quality, bitrate));
        }
        lines.join("\n")
    });
}

// =============================================================================
// Speeds
// =============================================================================

#[derive(Debug, Serialize)]
struct SpeedRow {
    burst: u32,
    count: i32,
    speed: i32,
}

/// Seek speeds for consecutive bursts of `presses` presses
fn speed_table(direction: &str, bursts: u32, presses: u32) -> Vec<SpeedRow> {
    let sign = direction.parse::<Direction>().map_or(1, Direction::sign);
    let count = sign * presses as i32;
    let mut accelerator = KeyRepeatAccelerator::new();

    (1..=bursts)
        .map(|burst| SpeedRow {
            burst,
            count,
            speed: accelerator.compute_speed_labeled(count, direction),
        })
        .collect()
}

pub fn speeds(direction: &str, bursts: u32, presses: u32, format: &str) {
    let rows = speed_table(direction, bursts, presses);
    print_output(&rows, format, |rows| {
        rows.iter()
            .map(|row| format!("burst {:>3}  count {:>3}  speed {:>3}", row.burst, row.count, row.speed))
            .collect::<Vec<_>>()
            .join("\n")
    });
}

// =============================================================================
// Replay
// =============================================================================

/// Everything observed during a replay, in order
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReplayEvent {
    Animation { signal: AnimationSignal },
    Engine { call: String },
    Play,
    Pause,
    Seek { speed: i32, position_ms: u64 },
    TextTrack { variant: TrackVariant },
    AudioTrack { variant: TrackVariant },
    Quality { quality: StreamQuality },
    Back { consumed: bool },
    Error { code: String, message: String },
}

type EventLog = Arc<Mutex<Vec<ReplayEvent>>>;

fn push(log: &EventLog, event: ReplayEvent) {
    if let Ok(mut events) = log.lock() {
        events.push(event);
    }
}

/// Engine that only tracks position and records calls
struct ReplayEngine {
    position: Mutex<u64>,
    log: EventLog,
}

impl ReplayEngine {
    fn record(&self, call: String) {
        info!(call = %call, "Engine call");
        push(&self.log, ReplayEvent::Engine { call });
    }
}

#[async_trait]
impl PlaybackEngine for ReplayEngine {
    async fn play(&self) -> overlay_core::Result<()> {
        self.record("play".into());
        Ok(())
    }

    async fn pause(&self) -> overlay_core::Result<()> {
        self.record("pause".into());
        Ok(())
    }

    async fn stop(&self) -> overlay_core::Result<()> {
        self.record("stop".into());
        Ok(())
    }

    async fn seek(&self, position_ms: u64) -> overlay_core::Result<()> {
        self.record(format!("seek({})", position_ms));
        let mut position = self
            .position
            .lock()
            .map_err(|_| Error::playback("position lock poisoned"))?;
        *position = position_ms;
        Ok(())
    }

    async fn position_ms(&self) -> overlay_core::Result<u64> {
        self.position
            .lock()
            .map(|position| *position)
            .map_err(|_| Error::playback("position lock poisoned"))
    }

    async fn set_preferred_track_variant(&self, variant: TrackVariant) -> overlay_core::Result<()> {
        self.record(format!(
            "set_preferred_track_variant({}, {:?})",
            variant.kind, variant.language_code
        ));
        Ok(())
    }

    async fn set_quality_selection(&self, selection: QualitySelection) -> overlay_core::Result<()> {
        self.record(format!("set_quality_selection({})", selection.peak_bitrate));
        Ok(())
    }
}

struct ReplayListener {
    log: EventLog,
}

impl ControlsListener for ReplayListener {
    fn on_play(&mut self) {
        push(&self.log, ReplayEvent::Play);
    }

    fn on_pause(&mut self) {
        push(&self.log, ReplayEvent::Pause);
    }

    fn on_seek(&mut self, speed: i32, position_ms: u64) {
        push(&self.log, ReplayEvent::Seek { speed, position_ms });
    }

    fn on_text_option_selected(&mut self, variant: &TrackVariant) {
        push(&self.log, ReplayEvent::TextTrack { variant: variant.clone() });
    }

    fn on_audio_option_selected(&mut self, variant: &TrackVariant) {
        push(&self.log, ReplayEvent::AudioTrack { variant: variant.clone() });
    }

    fn on_quality_selected(&mut self, quality: StreamQuality) {
        push(&self.log, ReplayEvent::Quality { quality });
    }

    fn on_error(&mut self, error: &Error) {
        push(
            &self.log,
            ReplayEvent::Error {
                code: error.error_code().to_string(),
                message: error.to_string(),
            },
        );
    }
}

struct ReplaySink {
    log: EventLog,
}

impl AnimationSink for ReplaySink {
    fn signal(&mut self, signal: AnimationSignal) {
        info!(?signal, "Animation");
        push(&self.log, ReplayEvent::Animation { signal });
    }
}

#[derive(Debug, Serialize)]
pub struct ReplayReport {
    pub steps: usize,
    pub final_phase: ControlsPhase,
    pub final_position_ms: u64,
    pub events: Vec<ReplayEvent>,
}

async fn apply(handle: &ControlsHandle, action: Action, log: &EventLog) -> overlay_core::Result<()> {
    match action {
        Action::Input { event } => handle.input(event).await,
        Action::Key { key } => handle.key_down(key).await,
        Action::Touch => handle.touch().await,
        Action::Back => {
            let consumed = handle.back().await?;
            push(log, ReplayEvent::Back { consumed });
            Ok(())
        }
        Action::Casting { enabled } => handle.set_casting(enabled).await,
        Action::Caption { name } => handle.select_caption(name).await,
        Action::Audio { name } => handle.select_audio(name).await,
        Action::Quality { quality } => handle.select_quality(quality).await,
        Action::SeekTo { position_ms } => handle.seek_to(position_ms).await,
    }
}

/// Run `script` against a fresh session and collect what happened
pub async fn run_script(script: Script, config: ControlsConfig) -> anyhow::Result<ReplayReport> {
    let log: EventLog = Arc::default();
    let settle = Duration::from_millis(
        script
            .settle_ms
            .unwrap_or(config.control_timeout_ms + config.key_debounce_ms),
    );

    let engine = Arc::new(ReplayEngine {
        position: Mutex::new(script.position_ms),
        log: log.clone(),
    });
    let listener = ReplayListener { log: log.clone() };
    let sink = ReplaySink { log: log.clone() };
    let tracks = TrackSelector::new(script.captions, script.audio);

    let (session, handle) = ControlsSession::new(config, engine.clone(), listener, sink, tracks);
    info!(session_id = %session.id(), steps = script.steps.len(), "Replaying script");
    let task = tokio::spawn(session.run());

    let steps = script.steps.len();
    for (index, step) in script.steps.into_iter().enumerate() {
        tokio::time::sleep(Duration::from_millis(step.after_ms)).await;
        if let Err(e) = apply(&handle, step.action, &log).await {
            warn!(step = index, error = %e, "Step failed");
            return Err(e).with_context(|| format!("Step {} failed", index));
        }
    }

    tokio::time::sleep(settle).await;
    let final_phase = handle.phase().await?;

    drop(handle);
    task.await.context("Controls session panicked")?;

    let final_position_ms = engine.position_ms().await?;
    let events = log
        .lock()
        .map(|events| events.clone())
        .map_err(|_| anyhow::anyhow!("Event log poisoned"))?;

    Ok(ReplayReport {
        steps,
        final_phase,
        final_position_ms,
        events,
    })
}

pub async fn replay(path: &Path, config: ControlsConfig, format: &str) -> anyhow::Result<()> {
    let script = Script::load(path)?;
    let report = run_script(script, config).await?;

    print_output(&report, format, |report| {
        let mut lines = vec![format!("Replayed {} steps", report.steps)];
        for event in &report.events {
            lines.push(format!("  {}", describe(event)));
        }
        lines.push(format!("Final phase:    {}", report.final_phase));
        lines.push(format!("Final position: {} ms", report.final_position_ms));
        lines.join("\n")
    });

    Ok(())
}

fn describe(event: &ReplayEvent) -> String {
    match event {
        ReplayEvent::Animation { signal } => format!("animation  {:?}", signal),
        ReplayEvent::Engine { call } => format!("engine     {}", call),
        ReplayEvent::Play => "listener   play".to_string(),
        ReplayEvent::Pause => "listener   pause".to_string(),
        ReplayEvent::Seek { speed, position_ms } => {
            format!("listener   seek x{} -> {} ms", speed, position_ms)
        }
        ReplayEvent::TextTrack { variant } => format!("listener   captions {:?}", variant.display_name),
        ReplayEvent::AudioTrack { variant } => format!("listener   audio {:?}", variant.display_name),
        ReplayEvent::Quality { quality } => format!("listener   quality {}", quality),
        ReplayEvent::Back { consumed } => format!("back       consumed={}", consumed),
        ReplayEvent::Error { code, message } => format!("error      {} {}", code, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use overlay_core::{InputEvent, RemoteKey};

    #[test]
    fn test_speed_table_forward() {
        let speeds: Vec<i32> = speed_table("forward", 6, 2).iter().map(|row| row.speed).collect();
        assert_eq!(speeds, vec![2, 4, 8, 16, 2, 4]);
    }

    #[test]
    fn test_speed_table_single_presses() {
        let speeds: Vec<i32> = speed_table("rewind", 3, 1).iter().map(|row| row.speed).collect();
        assert_eq!(speeds, vec![1, 1, 1]);
    }

    #[test]
    fn test_speed_table_unknown_direction() {
        let speeds: Vec<i32> = speed_table("sideways", 3, 4).iter().map(|row| row.speed).collect();
        assert_eq!(speeds, vec![1, 1, 1]);
    }

    #[test]
    fn test_load_config_defaults() {
        let config = load_config(None).unwrap();
        assert_eq!(config, ControlsConfig::default());
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_fast_forward_burst() {
        let script = Script {
            position_ms: 60_000,
            steps: vec![
                crate::script::Step {
                    after_ms: 0,
                    action: Action::Input { event: InputEvent::Tap },
                },
                crate::script::Step {
                    after_ms: 100,
                    action: Action::Key { key: RemoteKey::FastForward },
                },
                crate::script::Step {
                    after_ms: 100,
                    action: Action::Key { key: RemoteKey::FastForward },
                },
            ],
            ..Default::default()
        };

        let report = run_script(script, ControlsConfig::default()).await.unwrap();
        assert_eq!(report.final_position_ms, 80_000);
        assert_eq!(report.final_phase, ControlsPhase::Hidden);
        assert!(report
            .events
            .iter()
            .any(|event| matches!(event, ReplayEvent::Seek { speed: 2, position_ms: 80_000 })));
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_back_is_recorded() {
        let script = Script {
            steps: vec![crate::script::Step {
                after_ms: 0,
                action: Action::Back,
            }],
            settle_ms: Some(0),
            ..Default::default()
        };

        let report = run_script(script, ControlsConfig::default()).await.unwrap();
        assert!(matches!(report.events[0], ReplayEvent::Back { consumed: false }));
    }
}
