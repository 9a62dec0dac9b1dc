//! Outbound control events.
//!
//! The [`ControlService`](super::service::ControlService) emits these
//! through the [`ReportSink`](super::ports::ReportSink) port.  Adapters on
//! the other side decide what to do with them; the shipped one writes
//! diagnostic text to the serial log.

use crate::config::Capabilities;
use crate::control::state::PumpState;
use crate::diagnostics::CycleReport;
use crate::error::ActuatorError;

/// Structured events emitted by the control core.
#[derive(Debug, Clone)]
pub enum ControlEvent {
    /// The service has started and driven the relay to its initial state.
    Started {
        pump: PumpState,
        capabilities: Capabilities,
    },

    /// A control cycle completed.
    Cycle(CycleReport),

    /// The emergency input became asserted.
    EmergencyRaised,

    /// The emergency input returned to normal.
    EmergencyCleared,

    /// Driving the relay failed; it will be re-asserted next cycle.
    ActuatorFault {
        commanded: PumpState,
        error: ActuatorError,
    },
}
