//! Single-shot hide timers
//!
//! The controller never sleeps itself; it hands a [`TimerId`] and a delay to
//! a [`HideTimer`] and later receives the id back when the delay elapses.

use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use tracing::debug;

/// Identifies one armed hide timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(pub u64);

impl fmt::Display for TimerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timer-{}", self.0)
    }
}

/// Deferred-callback capability used by the visibility controller
pub trait HideTimer {
    /// Deliver `id` back to the owner once `delay` has elapsed
    fn schedule(&mut self, id: TimerId, delay: Duration);

    /// Stop `id` from being delivered; unknown ids are ignored
    fn cancel(&mut self, id: TimerId);
}

impl<T: HideTimer + ?Sized> HideTimer for Box<T> {
    fn schedule(&mut self, id: TimerId, delay: Duration) {
        (**self).schedule(id, delay)
    }

    fn cancel(&mut self, id: TimerId) {
        (**self).cancel(id)
    }
}

/// Tokio-backed timers delivering expiries on an unbounded channel
///
/// Must be used from within a tokio runtime.
pub struct TokioHideTimer {
    tx: mpsc::UnboundedSender<TimerId>,
    pending: HashMap<TimerId, AbortHandle>,
}

impl TokioHideTimer {
    /// Create a timer and the receiver its expiries arrive on
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<TimerId>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                pending: HashMap::new(),
            },
            rx,
        )
    }

    /// Number of timers that have not yet fired or been cancelled
    pub fn live_count(&self) -> usize {
        self.pending.values().filter(|handle| !handle.is_finished()).count()
    }
}

impl HideTimer for TokioHideTimer {
    fn schedule(&mut self, id: TimerId, delay: Duration) {
        self.pending.retain(|_, handle| !handle.is_finished());

        let tx = self.tx.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(id);
        });

        debug!(%id, delay_ms = delay.as_millis() as u64, "Hide timer scheduled");
        self.pending.insert(id, handle.abort_handle());
    }

    fn cancel(&mut self, id: TimerId) {
        if let Some(handle) = self.pending.remove(&id) {
            handle.abort();
            debug!(%id, "Hide timer cancelled");
        }
    }
}

impl Drop for TokioHideTimer {
    fn drop(&mut self) {
        for (_, handle) in self.pending.drain() {
            handle.abort();
        }
    }
}
