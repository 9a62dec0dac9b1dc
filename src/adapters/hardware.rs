//! Hardware adapter — bridges real peripherals to domain port traits.
//!
//! Owns the [`SensorHub`], the pump relay and the optional emergency input,
//! exposing them through [`TemperaturePort`], [`PumpPort`] and
//! [`EmergencyPort`].  This is the only module in the system that touches
//! actual hardware.  On non-espidf targets the probes read simulated ADC
//! samples and the pins are [`SimPin`](crate::drivers::gpio::SimPin)s.

use embedded_hal::digital::{InputPin, OutputPin};

use crate::app::ports::{EmergencyPort, PumpPort, TemperaturePort};
use crate::control::reading::SensorRole;
use crate::control::state::PumpState;
use crate::drivers::emergency::EmergencyInput;
use crate::drivers::pump::PumpRelay;
use crate::error::{ActuatorError, SensorError};
use crate::sensors::SensorHub;

/// Concrete adapter that combines all hardware behind port traits.
pub struct HardwareAdapter<P: OutputPin, E: InputPin> {
    sensor_hub: SensorHub,
    relay: PumpRelay<P>,
    /// `None` on boards without a leak sensor.
    emergency: Option<EmergencyInput<E>>,
}

impl<P: OutputPin, E: InputPin> HardwareAdapter<P, E> {
    pub fn new(
        sensor_hub: SensorHub,
        relay: PumpRelay<P>,
        emergency: Option<EmergencyInput<E>>,
    ) -> Self {
        Self {
            sensor_hub,
            relay,
            emergency,
        }
    }

    /// Last state the relay was successfully driven to.
    pub fn relay_state(&self) -> Option<PumpState> {
        self.relay.state()
    }
}

// ── TemperaturePort implementation ────────────────────────────

impl<P: OutputPin, E: InputPin> TemperaturePort for HardwareAdapter<P, E> {
    fn read_temperature(&mut self, role: SensorRole) -> f32 {
        self.sensor_hub.read(role)
    }
}

// ── PumpPort implementation ───────────────────────────────────

impl<P: OutputPin, E: InputPin> PumpPort for HardwareAdapter<P, E> {
    fn set_pump(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        self.relay.set(state)
    }
}

// ── EmergencyPort implementation ──────────────────────────────

impl<P: OutputPin, E: InputPin> EmergencyPort for HardwareAdapter<P, E> {
    fn emergency_asserted(&mut self) -> Result<bool, SensorError> {
        match self.emergency.as_mut() {
            Some(input) => input.is_asserted(),
            None => Ok(false),
        }
    }
}
