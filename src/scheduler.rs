//! Cycle scheduler.
//!
//! Gates the control cycle to a fixed cadence.  The main loop polls much
//! faster than the cycle runs (it also services the console), so the
//! scheduler answers one question per poll: is a cycle due at `now`?
//!
//! ```text
//!  poll ─ poll ─ poll ─ poll ─ poll ─ poll ─ poll ─ poll ─ poll
//!   │                           │                           │
//!   ▼ cycle                     ▼ cycle                     ▼ cycle
//!   |<──── control interval ───>|<──── control interval ───>|
//! ```
//!
//! Time is injected by the caller, so tests drive it with a virtual clock.
//! The scheduler also derives the elapsed-time facts the decision engine
//! and switch guard consume.

use core::time::Duration;

use log::debug;

use crate::control::state::{ControllerState, Uptime};

/// Elapsed-time facts for one cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CycleTiming {
    pub since_last_on: Duration,
    pub since_last_switch: Duration,
}

impl CycleTiming {
    pub fn of(state: &ControllerState, now: Uptime) -> Self {
        Self {
            since_last_on: state.since_last_on(now),
            since_last_switch: state.since_last_switch(now),
        }
    }
}

/// Fixed-interval cycle gate.
pub struct CycleScheduler {
    interval: Duration,
    /// When the last cycle ran; `None` until the first one.
    last_cycle: Option<Uptime>,
    cycles: u64,
}

impl CycleScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_cycle: None,
            cycles: 0,
        }
    }

    /// Returns `true` if a cycle should run at `now`, and records it.
    ///
    /// The first poll is always due.  Afterwards a cycle is due once a full
    /// interval has passed since the previous one.  The schedule advances
    /// from the actual run time, so a late poll delays later cycles instead
    /// of bunching them up.
    pub fn poll(&mut self, now: Uptime) -> bool {
        let due = match self.last_cycle {
            None => true,
            Some(last) => now.saturating_sub(last) >= self.interval,
        };
        if due {
            self.last_cycle = Some(now);
            self.cycles += 1;
            debug!("Scheduler: cycle {} due at {:?}", self.cycles, now);
        }
        due
    }

    /// Time since the last cycle ran, or `None` before the first one.
    pub fn since_last_cycle(&self, now: Uptime) -> Option<Duration> {
        self.last_cycle.map(|last| now.saturating_sub(last))
    }

    /// Time remaining until the next cycle is due (zero if overdue).
    pub fn until_next_cycle(&self, now: Uptime) -> Duration {
        match self.since_last_cycle(now) {
            None => Duration::ZERO,
            Some(elapsed) => self.interval.saturating_sub(elapsed),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Number of cycles granted so far.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
