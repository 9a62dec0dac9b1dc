//! Controller state owned by the control core.
//!
//! [`ControllerState`] is a plain `Copy` value.  The switch guard takes the
//! current state and returns the next one; nothing else writes it.  All
//! timestamps are monotonic uptime ([`Uptime`]) so elapsed times are a
//! saturating subtraction.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

/// Monotonic time since boot.
pub type Uptime = Duration;

/// The single binary output of the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PumpState {
    On,
    Off,
}

impl PumpState {
    pub fn is_on(self) -> bool {
        matches!(self, Self::On)
    }
}

impl fmt::Display for PumpState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::On => f.write_str("ON"),
            Self::Off => f.write_str("OFF"),
        }
    }
}

/// Everything the control core remembers between cycles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerState {
    /// Current pump output.
    pub pump: PumpState,
    /// When `pump` last actually changed.
    pub last_switch: Uptime,
    /// Last cycle the pump was observed running.
    pub last_on: Uptime,
    /// A forced verification run is in progress.
    pub verification_active: bool,
}

impl ControllerState {
    /// Fresh state at boot.  Both timestamps start at `now`.
    pub fn new(initial: PumpState, now: Uptime) -> Self {
        Self {
            pump: initial,
            last_switch: now,
            last_on: now,
            verification_active: false,
        }
    }

    pub fn since_last_on(&self, now: Uptime) -> Duration {
        now.saturating_sub(self.last_on)
    }

    pub fn since_last_switch(&self, now: Uptime) -> Duration {
        now.saturating_sub(self.last_switch)
    }
}
