//! Emergency (leak / flood) input driver.
//!
//! One digital input; the asserted level is set once from
//! `ControllerConfig::emergency_active_high`.

use embedded_hal::digital::InputPin;

use crate::error::SensorError;

pub struct EmergencyInput<P: InputPin> {
    pin: P,
    active_high: bool,
}

impl<P: InputPin> EmergencyInput<P> {
    pub fn new(pin: P, active_high: bool) -> Self {
        Self { pin, active_high }
    }

    pub fn is_asserted(&mut self) -> Result<bool, SensorError> {
        let high = self
            .pin
            .is_high()
            .map_err(|_| SensorError::GpioReadFailed)?;
        Ok(high == self.active_high)
    }
}
