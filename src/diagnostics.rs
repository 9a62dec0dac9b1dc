//! Per-cycle diagnostic report and runtime counters.
//!
//! Every completed cycle produces a [`CycleReport`].  The report is plain
//! data; [`SensorLine`] and [`StatusLine`] render the two human-readable
//! lines the log sink prints:
//!
//! ```text
//! cold=41.5 hot=47.0 tank=39.2 panel=invalid
//! pump=ON since_on=0s since_switch=120s verification=no emergency=no cycles=42 switches=3
//! ```

use core::fmt;
use core::time::Duration;

use crate::control::decision::Decision;
use crate::control::guard::SwitchOutcome;
use crate::control::reading::{Readings, SensorRole, is_valid};
use crate::control::state::{ControllerState, Uptime};

/// Counters maintained by the control service since boot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RuntimeMetrics {
    /// Control cycles run.
    pub cycles: u64,
    /// Relay transitions granted.
    pub switches: u32,
    /// Transitions refused by the dwell rule.
    pub rejected_switches: u32,
    /// Rising edges of the emergency input.
    pub emergency_trips: u32,
    /// Forced verification runs started.
    pub verification_cycles: u32,
    /// Relay writes that failed.
    pub actuator_faults: u32,
}

/// Outcome of one control cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CycleReport {
    /// Uptime at which the cycle ran.
    pub at: Uptime,
    pub readings: Readings,
    pub emergency: bool,
    pub decision: Decision,
    pub outcome: SwitchOutcome,
    /// Controller state after the switch guard.
    pub state: ControllerState,
    pub metrics: RuntimeMetrics,
}

impl CycleReport {
    pub fn sensors(&self) -> SensorLine<'_> {
        SensorLine(&self.readings)
    }

    pub fn status(&self) -> StatusLine<'_> {
        StatusLine(self)
    }

    pub fn since_last_on(&self) -> Duration {
        self.state.since_last_on(self.at)
    }

    pub fn since_last_switch(&self) -> Duration {
        self.state.since_last_switch(self.at)
    }
}

/// `label=value` for every probe, `invalid` where the filter rejects it.
pub struct SensorLine<'a>(pub &'a Readings);

impl fmt::Display for SensorLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, role) in SensorRole::ALL.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            let v = self.0.get(*role);
            if is_valid(v) {
                write!(f, "{}={:.1}", role.label(), v)?;
            } else {
                write!(f, "{}=invalid", role.label())?;
            }
        }
        Ok(())
    }
}

/// Pump state, elapsed times, and counters.
pub struct StatusLine<'a>(pub &'a CycleReport);

impl fmt::Display for StatusLine<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        write!(
            f,
            "pump={} since_on={}s since_switch={}s verification={} emergency={} cycles={} switches={}",
            r.state.pump,
            r.since_last_on().as_secs(),
            r.since_last_switch().as_secs(),
            yes_no(r.state.verification_active),
            yes_no(r.emergency),
            r.metrics.cycles,
            r.metrics.switches,
        )
    }
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}
