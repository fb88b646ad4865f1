use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::Millis;

/// Context generation a timer was scheduled under.
pub(crate) type Epoch = u64;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerKind {
    /// End of the initial full-board display.
    Dwell,
    /// Player has been idle long enough to peek.
    IdleReveal,
    /// The peek is over.
    IdleHide,
    /// Displayed clock refresh.
    ClockTick,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Timer {
    pub kind: TimerKind,
    pub due: Millis,
    pub epoch: Epoch,
}

/// Pending timeouts, at most one per kind.
#[derive(Clone, Debug, Default)]
pub(crate) struct TimerQueue {
    pending: Vec<Timer>,
}

impl TimerQueue {
    /// Schedules `kind`, superseding any pending timer of the same kind.
    pub fn schedule(&mut self, kind: TimerKind, due: Millis, epoch: Epoch) {
        self.cancel(kind);
        self.pending.push(Timer { kind, due, epoch });
    }

    pub fn cancel(&mut self, kind: TimerKind) {
        self.pending.retain(|timer| timer.kind != kind);
    }

    pub fn cancel_all(&mut self) {
        self.pending.clear();
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.pending.iter().map(|timer| timer.due).min()
    }

    /// Removes and returns the earliest timer due at or before `now`; ties go to the one
    /// scheduled first.
    pub fn pop_due(&mut self, now: Millis) -> Option<Timer> {
        let (index, _) = self
            .pending
            .iter()
            .enumerate()
            .filter(|(_, timer)| timer.due <= now)
            .min_by_key(|&(index, timer)| (timer.due, index))?;
        Some(self.pending.remove(index))
    }
}
