//! Mock hardware adapters for integration tests.
//!
//! Records every relay call and every emitted event so tests can assert on
//! the full history without touching real GPIO/ADC registers.  Time comes
//! from a manually advanced [`ManualClock`].

use core::cell::Cell;
use core::time::Duration;

use solarpump::app::events::ControlEvent;
use solarpump::app::ports::{Clock, EmergencyPort, PumpPort, ReportSink, TemperaturePort};
use solarpump::control::reading::{DISCONNECTED_C, Readings, SensorRole};
use solarpump::control::state::{PumpState, Uptime};
use solarpump::error::{ActuatorError, SensorError};

// ── MockLoop ──────────────────────────────────────────────────

/// A thermal loop whose probes, leak sensor and relay are all in memory.
pub struct MockLoop {
    pub readings: Readings,
    pub emergency: bool,
    pub emergency_fails: bool,
    pub relay_fails: bool,
    /// Every `set_pump` call, successful or not.
    pub relay_calls: Vec<PumpState>,
    /// Number of probe reads served.
    pub reads: usize,
}

#[allow(dead_code)]
impl MockLoop {
    pub fn new(cold: f32, hot: f32, reservoir: f32, collector: f32) -> Self {
        Self {
            readings: Readings {
                cold,
                hot,
                reservoir,
                collector,
            },
            emergency: false,
            emergency_fails: false,
            relay_fails: false,
            relay_calls: Vec::new(),
            reads: 0,
        }
    }

    /// All probes at 20 °C: nothing to gain.
    pub fn idle() -> Self {
        Self::new(20.0, 20.0, 20.0, 20.0)
    }

    pub fn disconnect(&mut self, role: SensorRole) {
        self.readings.set(role, DISCONNECTED_C);
    }

    pub fn set(&mut self, role: SensorRole, celsius: f32) {
        self.readings.set(role, celsius);
    }

    /// Level the relay was last driven to.
    pub fn relay(&self) -> Option<PumpState> {
        self.relay_calls.last().copied()
    }
}

impl TemperaturePort for MockLoop {
    fn read_temperature(&mut self, role: SensorRole) -> f32 {
        self.reads += 1;
        self.readings.get(role)
    }
}

impl EmergencyPort for MockLoop {
    fn emergency_asserted(&mut self) -> Result<bool, SensorError> {
        if self.emergency_fails {
            return Err(SensorError::GpioReadFailed);
        }
        Ok(self.emergency)
    }
}

impl PumpPort for MockLoop {
    fn set_pump(&mut self, state: PumpState) -> Result<(), ActuatorError> {
        self.relay_calls.push(state);
        if self.relay_fails {
            return Err(ActuatorError::GpioWriteFailed);
        }
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<ControlEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&ControlEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn cycles(&self) -> usize {
        self.count(|e| matches!(e, ControlEvent::Cycle(_)))
    }
}

impl ReportSink for RecordingSink {
    fn emit(&mut self, event: &ControlEvent) {
        self.events.push(event.clone());
    }
}

// ── ManualClock ───────────────────────────────────────────────

/// Virtual clock advanced explicitly by the test.
#[derive(Default)]
pub struct ManualClock {
    now: Cell<Uptime>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) -> Uptime {
        self.now.set(self.now.get() + by);
        self.now.get()
    }

    pub fn advance_secs(&self, secs: u64) -> Uptime {
        self.advance(Duration::from_secs(secs))
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Uptime {
        self.now.get()
    }
}
