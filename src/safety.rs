//! Emergency monitor.
//!
//! Runs **every cycle before the decision engine** and turns the raw
//! emergency input into the flag the engine and switch guard consume.
//!
//! ## Lifecycle
//!
//! 1. The leak sensor asserts (or its input cannot be read).
//! 2. The monitor latches `asserted`, logs the edge and counts a trip.
//! 3. The decision engine forces OFF; the guard applies it without dwell.
//! 4. Each cycle the monitor re-evaluates.  When the input clears it logs
//!    the falling edge and normal control resumes on the same cycle.
//!
//! Boards without the capability never assert.

use log::{error, info, warn};

use crate::config::Capabilities;
use crate::error::SensorError;

/// Edge reported by [`EmergencyMonitor::evaluate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmergencyEdge {
    /// No change since the previous cycle.
    Steady,
    /// The emergency condition just started.
    Raised,
    /// The emergency condition just ended.
    Cleared,
}

/// Emergency input supervisor.
pub struct EmergencyMonitor {
    enabled: bool,
    /// Latched level from the last evaluation.
    asserted: bool,
    /// Rising edges seen since boot.
    trips: u32,
}

impl EmergencyMonitor {
    pub fn new(caps: &Capabilities) -> Self {
        Self {
            enabled: caps.emergency_input,
            asserted: false,
            trips: 0,
        }
    }

    /// Whether the board has an emergency input at all.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Evaluate this cycle's input sample.
    ///
    /// `sample` is `None` when the input was not read.  A read failure
    /// counts as asserted: the pump is stopped rather than run blind.
    pub fn evaluate(&mut self, sample: Option<Result<bool, SensorError>>) -> EmergencyEdge {
        let now_asserted = match (self.enabled, sample) {
            (false, _) | (true, None) => false,
            (true, Some(Ok(level))) => level,
            (true, Some(Err(e))) => {
                warn!("Emergency input unreadable ({e}), treating as asserted");
                true
            }
        };

        let edge = match (self.asserted, now_asserted) {
            (false, true) => {
                self.trips = self.trips.saturating_add(1);
                error!("EMERGENCY RAISED: forcing pump off (trip #{})", self.trips);
                EmergencyEdge::Raised
            }
            (true, false) => {
                info!("EMERGENCY CLEARED: resuming normal control");
                EmergencyEdge::Cleared
            }
            _ => EmergencyEdge::Steady,
        };
        self.asserted = now_asserted;
        edge
    }

    /// Level latched by the last evaluation.
    pub fn is_asserted(&self) -> bool {
        self.asserted
    }

    /// Number of times the emergency has been raised since boot.
    pub fn trips(&self) -> u32 {
        self.trips
    }
}
