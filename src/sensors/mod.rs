//! Sensor subsystem — probe drivers and the aggregating [`SensorHub`].
//!
//! The hub owns one probe per loop role, resolved from the
//! [`SensorMap`] once at construction.  The control core only ever asks
//! for a role; it never sees a channel number.

pub mod temperature;

use crate::config::SensorMap;
use crate::control::reading::SensorRole;
use temperature::NtcProbe;

/// Aggregates the four loop probes.
pub struct SensorHub {
    cold: NtcProbe,
    hot: NtcProbe,
    reservoir: NtcProbe,
    collector: NtcProbe,
}

impl SensorHub {
    pub fn new(map: &SensorMap) -> Self {
        Self {
            cold: NtcProbe::new(map.cold),
            hot: NtcProbe::new(map.hot),
            reservoir: NtcProbe::new(map.reservoir),
            collector: NtcProbe::new(map.collector),
        }
    }

    fn probe(&self, role: SensorRole) -> &NtcProbe {
        match role {
            SensorRole::Cold => &self.cold,
            SensorRole::Hot => &self.hot,
            SensorRole::Reservoir => &self.reservoir,
            SensorRole::Collector => &self.collector,
        }
    }

    /// Read one role.  Never fails: a bad probe reads out of range.
    pub fn read(&self, role: SensorRole) -> f32 {
        self.probe(role).read()
    }

    /// ADC channel backing `role`.
    pub fn channel(&self, role: SensorRole) -> u8 {
        self.probe(role).channel()
    }
}
