//! Port traits — the hexagonal boundary between control logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ ControlService (domain)
//! ```
//!
//! Driven adapters (probes, relay, emergency input, report sinks, clocks)
//! implement these traits.  The [`ControlService`](super::service::ControlService)
//! consumes them via generics, so the control core never touches hardware
//! directly.

use crate::control::reading::SensorRole;
use crate::control::state::{PumpState, Uptime};
use crate::error::{ActuatorError, SensorError};

// ───────────────────────────────────────────────────────────────
// Temperature port (driven adapter: probes → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the four loop temperatures.
pub trait TemperaturePort {
    /// Latest reading for `role` in Celsius.
    ///
    /// Infallible by contract: a probe that cannot be read reports a value
    /// outside the plausible range, which the validity filter rejects.
    fn read_temperature(&mut self, role: SensorRole) -> f32;
}

// ───────────────────────────────────────────────────────────────
// Pump port (driven adapter: domain → relay)
// ───────────────────────────────────────────────────────────────

/// Write-side port for the single pump relay.
pub trait PumpPort {
    /// Drive the relay to `state`.  Idempotent; called every cycle.
    fn set_pump(&mut self, state: PumpState) -> Result<(), ActuatorError>;
}

// ───────────────────────────────────────────────────────────────
// Emergency port (driven adapter: leak sensor → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port for the optional emergency input.
///
/// Only sampled when the deployment enables the capability.  Boards without
/// the input implement it as "never asserted".
pub trait EmergencyPort {
    fn emergency_asserted(&mut self) -> Result<bool, SensorError>;
}

// ───────────────────────────────────────────────────────────────
// Report sink port (driven adapter: domain → diagnostics)
// ───────────────────────────────────────────────────────────────

/// The domain emits [`ControlEvent`](super::events::ControlEvent)s through
/// this port.  Reporting cannot fail and cannot influence a decision.
pub trait ReportSink {
    fn emit(&mut self, event: &super::events::ControlEvent);
}

// ───────────────────────────────────────────────────────────────
// Clock port
// ───────────────────────────────────────────────────────────────

/// Monotonic time source.  Tests substitute a manually advanced clock.
pub trait Clock {
    /// Time since boot.
    fn now(&self) -> Uptime;
}
