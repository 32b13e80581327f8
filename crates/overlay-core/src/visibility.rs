//! Transport controls visibility state machine
//!
//! Single owner of "are the controls on screen". Handles:
//! - Entrance/exit signals to the animation sink
//! - Auto-hide after an idle period, with at most one armed timer
//! - Suppression while casting or paused (controls stay up)
//! - Teardown: once unmounted every operation is a no-op

use crate::{
    timer::{HideTimer, TimerId},
    ControlsConfig, Direction,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::Instant;
use tracing::{debug, info};

// =============================================================================
// Animation Sink
// =============================================================================

/// Abstract transition requests for the view layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "signal", content = "direction", rename_all = "snake_case")]
pub enum AnimationSignal {
    /// Fade/slide all chrome in
    Show,
    /// Fade/slide all chrome (and any hint) out
    Hide,
    /// Flash only the rewind or forward control
    SeekHint(Direction),
}

/// Receiver of animation signals; tweening is entirely its business
pub trait AnimationSink {
    fn signal(&mut self, signal: AnimationSignal);
}

impl<S: AnimationSink + ?Sized> AnimationSink for Box<S> {
    fn signal(&mut self, signal: AnimationSignal) {
        (**self).signal(signal)
    }
}

impl AnimationSink for mpsc::UnboundedSender<AnimationSignal> {
    fn signal(&mut self, signal: AnimationSignal) {
        // View already gone; nothing left to animate
        let _ = self.send(signal);
    }
}

// =============================================================================
// State
// =============================================================================

/// Observable phase of the controls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ControlsPhase {
    Hidden,
    Visible,
    VisiblePendingHide,
}

impl fmt::Display for ControlsPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlsPhase::Hidden => write!(f, "hidden"),
            ControlsPhase::Visible => write!(f, "visible"),
            ControlsPhase::VisiblePendingHide => write!(f, "visible_pending_hide"),
        }
    }
}

/// Controller state, mutated only through [`ControlsCommand`]s
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlsState {
    pub visible: bool,
    pub suppress_auto_hide: bool,
    pub pending_hide_timer: Option<TimerId>,
    pub last_interaction_at: Option<Instant>,
    /// A seek hint is on screen while the full chrome is hidden
    pub hint_visible: bool,
}

/// Commands understood by [`ControlsVisibilityController::dispatch`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlsCommand {
    Show,
    Hide { after: Duration },
    Toggle,
    Touch,
    SetSuppressed(bool),
    SeekHint(Direction),
    TimerElapsed(TimerId),
    Unmount,
}

// =============================================================================
// Controller
// =============================================================================

/// Visibility controller for one mounted controls view
pub struct ControlsVisibilityController<A: AnimationSink, T: HideTimer> {
    state: ControlsState,
    control_timeout: Duration,
    seek_hint_timeout: Duration,
    sink: A,
    timer: T,
    next_timer_id: u64,
    mounted: bool,
}

impl<A: AnimationSink, T: HideTimer> ControlsVisibilityController<A, T> {
    /// Mount the controller; visible controls start their idle countdown
    pub fn mount(config: &ControlsConfig, sink: A, timer: T) -> Self {
        let mut controller = Self {
            state: ControlsState {
                visible: config.show_on_start,
                suppress_auto_hide: false,
                pending_hide_timer: None,
                last_interaction_at: None,
                hint_visible: false,
            },
            control_timeout: config.control_timeout(),
            seek_hint_timeout: config.seek_hint_timeout(),
            sink,
            timer,
            next_timer_id: 0,
            mounted: true,
        };

        if controller.state.visible {
            controller.arm(controller.control_timeout);
        }

        debug!(visible = controller.state.visible, "Controls mounted");
        controller
    }

    pub fn state(&self) -> &ControlsState {
        &self.state
    }

    pub fn is_visible(&self) -> bool {
        self.state.visible
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn phase(&self) -> ControlsPhase {
        match (self.state.visible, self.state.pending_hide_timer) {
            (false, _) => ControlsPhase::Hidden,
            (true, Some(_)) => ControlsPhase::VisiblePendingHide,
            (true, None) => ControlsPhase::Visible,
        }
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    /// Single state-transition entry point
    pub fn dispatch(&mut self, command: ControlsCommand) {
        if !self.mounted {
            debug!(?command, "Ignoring command after unmount");
            return;
        }

        let before = self.phase();

        match command {
            ControlsCommand::Show => self.apply_show(),
            ControlsCommand::Hide { after } => self.apply_hide(after),
            ControlsCommand::Toggle => {
                if self.state.visible {
                    self.apply_hide(Duration::ZERO);
                } else {
                    self.apply_show();
                }
            }
            ControlsCommand::Touch => {
                if self.state.visible {
                    self.state.last_interaction_at = Some(Instant::now());
                    self.arm(self.control_timeout);
                }
            }
            ControlsCommand::SetSuppressed(suppressed) => self.apply_suppressed(suppressed),
            ControlsCommand::SeekHint(direction) => self.apply_seek_hint(direction),
            ControlsCommand::TimerElapsed(id) => self.apply_timer_elapsed(id),
            ControlsCommand::Unmount => self.apply_unmount(),
        }

        let after = self.phase();
        if before != after {
            debug!(from = %before, to = %after, "Controls transition");
        }
    }

    /// Show controls and restart the idle countdown
    pub fn show(&mut self) {
        self.dispatch(ControlsCommand::Show);
    }

    /// Hide now when `after` is zero, otherwise after `after`
    pub fn hide(&mut self, after: Duration) {
        self.dispatch(ControlsCommand::Hide { after });
    }

    pub fn toggle(&mut self) {
        self.dispatch(ControlsCommand::Toggle);
    }

    /// Interaction with a control keeps visible controls up
    pub fn touch(&mut self) {
        self.dispatch(ControlsCommand::Touch);
    }

    pub fn set_suppressed(&mut self, suppressed: bool) {
        self.dispatch(ControlsCommand::SetSuppressed(suppressed));
    }

    /// Flash the rewind/forward control for a key press
    pub fn show_seek_hint(&mut self, direction: Direction) {
        self.dispatch(ControlsCommand::SeekHint(direction));
    }

    /// Deliver an expired hide timer
    pub fn on_timer_fired(&mut self, id: TimerId) {
        self.dispatch(ControlsCommand::TimerElapsed(id));
    }

    /// Back press: hides visible controls and reports whether it was consumed
    pub fn handle_back(&mut self) -> bool {
        if self.mounted && self.state.visible {
            self.hide(Duration::ZERO);
            true
        } else {
            false
        }
    }

    pub fn on_unmount(&mut self) {
        self.dispatch(ControlsCommand::Unmount);
    }

    fn apply_show(&mut self) {
        self.state.last_interaction_at = Some(Instant::now());

        if !self.state.visible {
            self.state.visible = true;
            self.state.hint_visible = false;
            self.sink.signal(AnimationSignal::Show);
        }

        if self.state.suppress_auto_hide {
            self.cancel_pending();
        } else {
            self.arm(self.control_timeout);
        }
    }

    fn apply_hide(&mut self, after: Duration) {
        if after.is_zero() {
            self.cancel_pending();
            self.hide_now();
        } else {
            self.arm(after);
        }
    }

    fn apply_suppressed(&mut self, suppressed: bool) {
        if self.state.suppress_auto_hide != suppressed {
            info!(suppressed, "Auto-hide suppression changed");
        }
        self.state.suppress_auto_hide = suppressed;

        if suppressed {
            self.cancel_pending();
            self.apply_show();
        }
    }

    fn apply_seek_hint(&mut self, direction: Direction) {
        if self.state.visible {
            self.state.last_interaction_at = Some(Instant::now());
            self.arm(self.control_timeout);
            return;
        }

        self.state.hint_visible = true;
        self.sink.signal(AnimationSignal::SeekHint(direction));
        self.arm(self.seek_hint_timeout);
    }

    fn apply_timer_elapsed(&mut self, id: TimerId) {
        if self.state.pending_hide_timer != Some(id) {
            debug!(%id, "Ignoring stale hide timer");
            return;
        }
        self.state.pending_hide_timer = None;

        if self.state.suppress_auto_hide {
            return;
        }
        self.hide_now();
    }

    fn apply_unmount(&mut self) {
        self.cancel_pending();
        self.mounted = false;
        debug!("Controls unmounted");
    }

    fn hide_now(&mut self) {
        if self.state.visible || self.state.hint_visible {
            self.state.visible = false;
            self.state.hint_visible = false;
            self.sink.signal(AnimationSignal::Hide);
        }
    }

    /// Replace any pending timer with a fresh one; never arms while suppressed
    fn arm(&mut self, delay: Duration) {
        self.cancel_pending();
        if self.state.suppress_auto_hide {
            return;
        }

        self.next_timer_id += 1;
        let id = TimerId(self.next_timer_id);
        self.timer.schedule(id, delay);
        self.state.pending_hide_timer = Some(id);
    }

    fn cancel_pending(&mut self) {
        if let Some(id) = self.state.pending_hide_timer.take() {
            self.timer.cancel(id);
        }
    }
}

impl<A: AnimationSink, T: HideTimer> Drop for ControlsVisibilityController<A, T> {
    fn drop(&mut self) {
        if self.mounted {
            self.apply_unmount();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[derive(Default)]
    struct RecordingSink {
        signals: Vec<AnimationSignal>,
    }

    impl AnimationSink for RecordingSink {
        fn signal(&mut self, signal: AnimationSignal) {
            self.signals.push(signal);
        }
    }

    /// Virtual-time timer: `advance` returns ids whose deadline passed
    #[derive(Default)]
    struct ManualTimer {
        now: Duration,
        live: BTreeMap<TimerId, Duration>,
        max_live: usize,
    }

    impl ManualTimer {
        fn advance(&mut self, by: Duration) -> Vec<TimerId> {
            self.now += by;
            let now = self.now;
            let due: Vec<TimerId> = self
                .live
                .iter()
                .filter(|(_, deadline)| **deadline <= now)
                .map(|(id, _)| *id)
                .collect();
            for id in &due {
                self.live.remove(id);
            }
            due
        }
    }

    impl HideTimer for ManualTimer {
        fn schedule(&mut self, id: TimerId, delay: Duration) {
            self.live.insert(id, self.now + delay);
            self.max_live = self.max_live.max(self.live.len());
        }

        fn cancel(&mut self, id: TimerId) {
            self.live.remove(&id);
        }
    }

    type Controller = ControlsVisibilityController<RecordingSink, ManualTimer>;

    fn controller(show_on_start: bool) -> Controller {
        let config = ControlsConfig {
            show_on_start,
            ..Default::default()
        };
        ControlsVisibilityController::mount(&config, RecordingSink::default(), ManualTimer::default())
    }

    fn advance(controller: &mut Controller, ms: u64) {
        let fired = controller.timer.advance(Duration::from_millis(ms));
        for id in fired {
            controller.on_timer_fired(id);
        }
    }

    #[test]
    fn test_initial_state() {
        let hidden = controller(false);
        assert_eq!(hidden.phase(), ControlsPhase::Hidden);
        assert!(hidden.timer().live.is_empty());

        let shown = controller(true);
        assert_eq!(shown.phase(), ControlsPhase::VisiblePendingHide);
        assert_eq!(shown.timer().live.len(), 1);
    }

    #[test]
    fn test_show_then_idle_hides() {
        let mut c = controller(false);
        c.show();
        assert!(c.is_visible());
        assert_eq!(c.timer().live.len(), 1);
        assert_eq!(c.sink().signals, vec![AnimationSignal::Show]);

        advance(&mut c, 3999);
        assert!(c.is_visible());

        advance(&mut c, 1);
        assert!(!c.is_visible());
        assert_eq!(c.phase(), ControlsPhase::Hidden);
        assert_eq!(c.sink().signals, vec![AnimationSignal::Show, AnimationSignal::Hide]);
    }

    #[test]
    fn test_repeated_show_keeps_one_timer() {
        let mut c = controller(false);
        for _ in 0..10 {
            c.show();
            advance(&mut c, 1000);
        }
        assert_eq!(c.timer().max_live, 1);
        assert!(c.is_visible());
        // Only the first show animates
        assert_eq!(c.sink().signals, vec![AnimationSignal::Show]);

        advance(&mut c, 3000);
        assert!(!c.is_visible());
    }

    #[test]
    fn test_hide_zero_is_synchronous() {
        let mut c = controller(true);
        c.hide(Duration::ZERO);
        assert!(!c.is_visible());
        assert!(c.timer().live.is_empty());
        assert_eq!(c.state().pending_hide_timer, None);
    }

    #[test]
    fn test_delayed_hide_replaces_timer() {
        let mut c = controller(false);
        c.show();
        c.hide(Duration::from_millis(200));
        assert_eq!(c.timer().live.len(), 1);

        advance(&mut c, 200);
        assert!(!c.is_visible());
    }

    #[test]
    fn test_toggle() {
        let mut c = controller(false);
        c.toggle();
        assert!(c.is_visible());
        c.toggle();
        assert!(!c.is_visible());
        assert!(c.timer().live.is_empty());
    }

    #[test]
    fn test_suppression_keeps_controls_up() {
        let mut c = controller(false);
        c.show();
        advance(&mut c, 1000);
        c.set_suppressed(true);
        assert!(c.timer().live.is_empty());

        advance(&mut c, 60_000);
        assert!(c.is_visible());

        c.show();
        c.touch();
        c.hide(Duration::from_millis(500));
        advance(&mut c, 60_000);
        assert!(c.is_visible());

        c.set_suppressed(false);
        assert!(c.is_visible());
        c.show();
        advance(&mut c, 4000);
        assert!(!c.is_visible());
    }

    #[test]
    fn test_suppression_forces_show() {
        let mut c = controller(false);
        c.set_suppressed(true);
        assert!(c.is_visible());
        assert_eq!(c.phase(), ControlsPhase::Visible);
        assert_eq!(c.sink().signals, vec![AnimationSignal::Show]);
    }

    #[test]
    fn test_stale_timer_is_ignored() {
        let mut c = controller(false);
        c.show();
        let stale = c.state().pending_hide_timer.unwrap();
        c.show();
        c.on_timer_fired(stale);
        assert!(c.is_visible());
    }

    #[test]
    fn test_seek_hint_when_hidden() {
        let mut c = controller(false);
        c.show_seek_hint(Direction::Rewind);
        assert!(!c.is_visible());
        assert!(c.state().hint_visible);

        advance(&mut c, 100);
        assert!(!c.state().hint_visible);
        assert_eq!(
            c.sink().signals,
            vec![AnimationSignal::SeekHint(Direction::Rewind), AnimationSignal::Hide]
        );
    }

    #[test]
    fn test_seek_hint_when_visible_extends() {
        let mut c = controller(false);
        c.show();
        advance(&mut c, 3000);
        c.show_seek_hint(Direction::Forward);
        advance(&mut c, 3000);
        assert!(c.is_visible());
    }

    #[test]
    fn test_back_consumed_only_when_visible() {
        let mut c = controller(true);
        assert!(c.handle_back());
        assert!(!c.is_visible());
        assert!(!c.handle_back());
    }

    #[test]
    fn test_unmount_turns_operations_into_noops() {
        let mut c = controller(false);
        c.show();
        c.on_unmount();
        assert!(c.timer().live.is_empty());

        c.hide(Duration::ZERO);
        assert!(c.is_visible());

        let mut c = controller(false);
        c.on_unmount();
        c.show();
        assert!(!c.is_visible());
        assert!(c.timer().live.is_empty());
        assert!(c.sink().signals.is_empty());
    }
}
