//! Key-repeat acceleration for rewind/fast-forward
//!
//! Turns debounced remote-control bursts into a signed seek speed. The
//! multiplier walks `1, 2, 4, 8, 16, 2, 4, ...` for a sustained burst in one
//! direction; a reversal restarts it at 2. A single press is always speed 1
//! and leaves the multiplier where it was.

use crate::Direction;
use tracing::{debug, warn};

/// Multiplier ceiling before wrapping back to 2
pub const MAX_MULTIPLIER: i32 = 16;

/// Accelerator state for one playback context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRepeatState {
    /// Last normalised press count, sign encodes direction
    pub press_count: i32,
    /// Current speed factor, one of 1, 2, 4, 8, 16
    pub current_multiplier: i32,
}

impl Default for KeyRepeatState {
    fn default() -> Self {
        Self {
            press_count: 0,
            current_multiplier: 1,
        }
    }
}

/// Converts press counts into accelerating seek speeds
#[derive(Debug, Clone, Default)]
pub struct KeyRepeatAccelerator {
    state: KeyRepeatState,
    last_direction: Option<Direction>,
}

impl KeyRepeatAccelerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state snapshot
    pub fn state(&self) -> &KeyRepeatState {
        &self.state
    }

    /// Forget the running burst
    pub fn reset(&mut self) {
        self.state = KeyRepeatState::default();
        self.last_direction = None;
    }

    /// Signed speed for a burst of `count` presses towards `direction`
    ///
    /// Negative results are rewinds. A count whose sign disagrees with
    /// `direction`, or a direction different from the previous call, counts
    /// as a reversal.
    ///
    /// Both `1` and `-1` are first presses: they return an unsigned `1` and
    /// keep the current multiplier, so the caller applies the direction.
    pub fn compute_speed(&mut self, count: i32, direction: Direction) -> i32 {
        if count == 1 || count == -1 {
            self.state.press_count = count;
            self.last_direction = Some(direction);
            return 1;
        }

        let reversed = !direction.agrees_with(count)
            || self.last_direction.is_some_and(|last| last != direction);
        self.last_direction = Some(direction);

        if reversed {
            debug!(count, %direction, "Direction reversed, restarting acceleration");
            self.state.current_multiplier = 2;
            self.state.press_count = direction.sign();
        } else {
            self.state.current_multiplier = if self.state.current_multiplier >= MAX_MULTIPLIER {
                2
            } else {
                self.state.current_multiplier * 2
            };
            self.state.press_count = count;
        }

        let speed = direction.sign() * self.state.current_multiplier;
        debug!(count, %direction, speed, "Computed seek speed");
        speed
    }

    /// Like [`compute_speed`](Self::compute_speed) but for a raw direction
    /// label; unknown labels reset the accelerator and yield 1
    pub fn compute_speed_labeled(&mut self, count: i32, label: &str) -> i32 {
        match label.parse::<Direction>() {
            Ok(direction) => self.compute_speed(count, direction),
            Err(e) => {
                warn!(error = %e, "Falling back to normal speed");
                self.reset();
                self.state.press_count = 1;
                1
            }
        }
    }
}
