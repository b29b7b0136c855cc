//! Resize scheduling after the surface becomes visible.

use std::time::{Duration, Instant};

/// Schedules a deferred resize when a hidden surface becomes visible again.
///
/// A surface that was hidden (zero size) while the renderer initialized
/// yields a wrongly sized viewport; the resize runs after a short settle
/// delay so host layout has finished. Overlapping visibility toggles may
/// produce more than one resize; resize is idempotent, at-least-once is
/// the contract.
pub struct VisibilityWatcher {
    settle_delay: Duration,
    resize_due: Option<Instant>,
}

impl VisibilityWatcher {
    pub fn new(settle_delay: Duration) -> Self {
        Self {
            settle_delay,
            resize_due: None,
        }
    }

    /// Records that the surface became visible
    pub fn on_visible(&mut self) {
        self.resize_due = Some(Instant::now() + self.settle_delay);
    }

    /// Whether a resize is scheduled and not yet applied
    pub fn pending(&self) -> bool {
        self.resize_due.is_some()
    }

    /// Returns true when the scheduled resize is due, consuming the deadline
    pub fn take_due(&mut self, now: Instant) -> bool {
        match self.resize_due {
            Some(due) if now >= due => {
                self.resize_due = None;
                true
            }
            _ => false,
        }
    }
}
