//! Temperature readings and the validity filter.
//!
//! A reading is a raw `f32` in degrees Celsius, consumed exactly as the
//! probe reported it.  Validity is a classification, not an error: the
//! decision engine branches on it explicitly and never compares an invalid
//! value against a threshold.

use core::fmt;

/// Lower bound of the plausible range (exclusive).
pub const MIN_PLAUSIBLE_C: f32 = -10.0;
/// Upper bound of the plausible range (exclusive).
pub const MAX_PLAUSIBLE_C: f32 = 400.0;

/// Value reported by a probe that is open, shorted, or otherwise unreadable.
/// Sits well outside the plausible range.
pub const DISCONNECTED_C: f32 = -127.0;

/// `true` if `celsius` lies strictly inside the plausible physical range.
///
/// Total over all `f32` values: NaN and both infinities are invalid.
pub fn is_valid(celsius: f32) -> bool {
    celsius > MIN_PLAUSIBLE_C && celsius < MAX_PLAUSIBLE_C
}

/// Logical position of a probe on the thermal loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorRole {
    /// Feed pipe: fluid leaving the tank toward the panel.
    Cold,
    /// Return pipe: fluid coming back from the panel.
    Hot,
    /// Storage tank.
    Reservoir,
    /// Panel outlet.
    Collector,
}

impl SensorRole {
    /// Every role, in the order probes are read each cycle.
    pub const ALL: [SensorRole; 4] = [Self::Cold, Self::Hot, Self::Reservoir, Self::Collector];

    /// Short label used in diagnostic output.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Cold => "cold",
            Self::Hot => "hot",
            Self::Reservoir => "tank",
            Self::Collector => "panel",
        }
    }
}

impl fmt::Display for SensorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One snapshot of all four probes, taken at the start of a cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Readings {
    pub cold: f32,
    pub hot: f32,
    pub reservoir: f32,
    pub collector: f32,
}

impl Readings {
    /// Snapshot with every probe reporting [`DISCONNECTED_C`].
    pub const fn disconnected() -> Self {
        Self {
            cold: DISCONNECTED_C,
            hot: DISCONNECTED_C,
            reservoir: DISCONNECTED_C,
            collector: DISCONNECTED_C,
        }
    }

    pub fn get(&self, role: SensorRole) -> f32 {
        match role {
            SensorRole::Cold => self.cold,
            SensorRole::Hot => self.hot,
            SensorRole::Reservoir => self.reservoir,
            SensorRole::Collector => self.collector,
        }
    }

    pub fn set(&mut self, role: SensorRole, celsius: f32) {
        match role {
            SensorRole::Cold => self.cold = celsius,
            SensorRole::Hot => self.hot = celsius,
            SensorRole::Reservoir => self.reservoir = celsius,
            SensorRole::Collector => self.collector = celsius,
        }
    }

    /// The reading for `role` if it passes the validity filter.
    pub fn valid(&self, role: SensorRole) -> Option<f32> {
        let v = self.get(role);
        is_valid(v).then_some(v)
    }
}

impl Default for Readings {
    fn default() -> Self {
        Self::disconnected()
    }
}
