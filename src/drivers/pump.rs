//! Circulation pump relay driver.
//!
//! A single digital output energises the relay coil.  Whether the coil
//! needs HIGH or LOW is a property of the relay board, set once from
//! `ControllerConfig::relay_active_high`.
//!
//! ## Safety contract
//!
//! The pump must stop on emergency.  Enforced by the control service; this
//! driver is a dumb actuator that writes whatever it is told, every time.

use embedded_hal::digital::OutputPin;
use log::debug;

use crate::control::state::PumpState;
use crate::error::ActuatorError;

pub struct PumpRelay<P: OutputPin> {
    pin: P,
    active_high: bool,
    /// Last state successfully written; `None` before the first write.
    state: Option<PumpState>,
}

impl<P: OutputPin> PumpRelay<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self {
            pin,
            active_high,
            state: None,
        }
    }

    /// Drive the relay.  The pin is written even if `state` is unchanged.
    pub fn set(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        let high = state.is_on() == self.active_high;
        let res = if high {
            self.pin.set_high()
        } else {
            self.pin.set_low()
        };
        res.map_err(|_| ActuatorError::GpioWriteFailed)?;

        if self.state != Some(state) {
            debug!("Relay: pump {} (pin {})", state, if high { "HIGH" } else { "LOW" });
        }
        self.state = Some(state);
        Ok(())
    }

    pub fn state(&self) -> Option<PumpState> {
        self.state
    }
}
