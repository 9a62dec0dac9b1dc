//! Control core — validity filter, decision engine, switch guard.
//!
//! Pure logic with no I/O.  One control cycle is:
//!
//! ```text
//!  Readings ──▶ decide() ──▶ Decision ──▶ arbitrate() ──▶ ControllerState'
//!                  ▲                          ▲
//!     pump state, elapsed times,      ControllerState, emergency, now
//!     emergency flag
//! ```
//!
//! The [`ControlService`](crate::app::service::ControlService) wires it to
//! the hardware ports and the cycle scheduler.

pub mod decision;
pub mod guard;
pub mod reading;
pub mod state;

pub use decision::{Decision, DecisionInput, Reason, decide};
pub use guard::{SwitchOutcome, SwitchRule, arbitrate};
pub use reading::{Readings, SensorRole, is_valid};
pub use state::{ControllerState, PumpState, Uptime};
