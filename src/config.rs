//! System configuration parameters
//!
//! All tunable parameters for the SolarPump controller.  Values are fixed at
//! build time via [`ControllerConfig::default`]; a deployment may override
//! them once at startup from a JSON document.  There is no runtime
//! reconfiguration path.

use core::fmt;
use core::time::Duration;

use serde::{Deserialize, Serialize};

use crate::control::reading::{MAX_PLAUSIBLE_C, MIN_PLAUSIBLE_C};
use crate::control::state::PumpState;
use crate::pins;

/// Control thresholds consumed by the decision engine and switch guard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Tank liner limit (Celsius).  Above this the pump must not add heat.
    pub max_tank_c: f32,
    /// Panel must exceed tank by more than this to start the pump.
    pub min_panel_diff_c: f32,
    /// Return must exceed feed by at least this to keep running.
    pub min_hot_cold_diff_c: f32,
    /// Minimum dwell between two ordinary relay transitions (seconds).
    pub min_switch_interval_secs: u32,
    /// A verification run may stop early once it has lasted this long (seconds).
    pub min_verification_secs: u32,
    /// Longest the pump may stay idle before a verification run (seconds).
    pub max_off_secs: u32,
}

impl Thresholds {
    pub fn min_switch_interval(&self) -> Duration {
        Duration::from_secs(self.min_switch_interval_secs.into())
    }

    pub fn min_verification(&self) -> Duration {
        Duration::from_secs(self.min_verification_secs.into())
    }

    pub fn max_off(&self) -> Duration {
        Duration::from_secs(self.max_off_secs.into())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_tank_c: 60.0,
            min_panel_diff_c: 8.0,
            min_hot_cold_diff_c: 1.0,
            min_switch_interval_secs: 5 * 60,
            min_verification_secs: 60,
            max_off_secs: 2 * 60 * 60,
        }
    }
}

/// Optional hardware/behaviour capabilities of a deployment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    /// A leak/flood input is wired and should force the pump off.
    pub emergency_input: bool,
    /// Periodically force the pump on to refresh stale readings.
    pub verification_cycle: bool,
}

/// ADC channel of each probe.  Resolved once when the sensor hub is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SensorMap {
    pub cold: u8,
    pub hot: u8,
    pub reservoir: u8,
    pub collector: u8,
}

impl SensorMap {
    fn channels(&self) -> [u8; 4] {
        [self.cold, self.hot, self.reservoir, self.collector]
    }
}

impl Default for SensorMap {
    fn default() -> Self {
        Self {
            cold: pins::ADC_CH_COLD,
            hot: pins::ADC_CH_HOT,
            reservoir: pins::ADC_CH_TANK,
            collector: pins::ADC_CH_PANEL,
        }
    }
}

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControllerConfig {
    // --- Control ---
    pub thresholds: Thresholds,
    pub capabilities: Capabilities,
    /// Pump output applied at boot, before the first cycle.
    pub initial_pump_state: PumpState,

    // --- Hardware ---
    pub sensors: SensorMap,
    /// Relay energises on a HIGH output level.
    pub relay_active_high: bool,
    /// Emergency input reads HIGH when asserted.
    pub emergency_active_high: bool,

    // --- Timing ---
    /// Control cycle interval (milliseconds)
    pub control_interval_ms: u32,
    /// Main loop poll interval for console servicing (milliseconds)
    pub poll_interval_ms: u32,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            thresholds: Thresholds::default(),
            capabilities: Capabilities {
                emergency_input: true,
                verification_cycle: true,
            },
            initial_pump_state: PumpState::Off,

            sensors: SensorMap::default(),
            relay_active_high: false, // low-side driven relay board
            emergency_active_high: true,

            control_interval_ms: 10_000, // every 10 s
            poll_interval_ms: 50,        // 20 Hz
        }
    }
}

impl ControllerConfig {
    /// Profile for boards without a leak sensor: no emergency input, no
    /// verification runs, pump on at boot.
    pub fn basic() -> Self {
        Self {
            capabilities: Capabilities {
                emergency_input: false,
                verification_cycle: false,
            },
            initial_pump_state: PumpState::On,
            ..Self::default()
        }
    }

    pub fn control_interval(&self) -> Duration {
        Duration::from_millis(self.control_interval_ms.into())
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms.into())
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json(bytes: &[u8]) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_slice(bytes).map_err(|_| ConfigError::Parse)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Range-check every field.  Out-of-range values are rejected, never
    /// clamped.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.thresholds;
        if !(t.max_tank_c > MIN_PLAUSIBLE_C && t.max_tank_c < MAX_PLAUSIBLE_C) {
            return Err(ConfigError::ValidationFailed(
                "max_tank_c must lie inside the plausible sensor range",
            ));
        }
        if !(0.0..=100.0).contains(&t.min_panel_diff_c) {
            return Err(ConfigError::ValidationFailed(
                "min_panel_diff_c must be 0-100",
            ));
        }
        if !(0.0..=100.0).contains(&t.min_hot_cold_diff_c) {
            return Err(ConfigError::ValidationFailed(
                "min_hot_cold_diff_c must be 0-100",
            ));
        }
        if t.min_switch_interval_secs == 0 {
            return Err(ConfigError::ValidationFailed(
                "min_switch_interval_secs must be non-zero",
            ));
        }
        if t.min_verification_secs > t.min_switch_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "min_verification_secs must not exceed min_switch_interval_secs",
            ));
        }
        if t.max_off_secs <= t.min_switch_interval_secs {
            return Err(ConfigError::ValidationFailed(
                "max_off_secs must exceed min_switch_interval_secs",
            ));
        }
        if self.control_interval_ms == 0 || self.poll_interval_ms == 0 {
            return Err(ConfigError::ValidationFailed("intervals must be non-zero"));
        }
        if self.poll_interval_ms > self.control_interval_ms {
            return Err(ConfigError::ValidationFailed(
                "poll_interval_ms must not exceed control_interval_ms",
            ));
        }
        let channels = self.sensors.channels();
        for (i, ch) in channels.iter().enumerate() {
            if *ch >= pins::ADC_CHANNEL_COUNT {
                return Err(ConfigError::ValidationFailed("sensor channel out of range"));
            }
            if channels[i + 1..].contains(ch) {
                return Err(ConfigError::ValidationFailed(
                    "two sensor roles share one channel",
                ));
            }
        }
        Ok(())
    }
}

/// Errors from loading or validating a [`ControllerConfig`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The document is not valid JSON for this schema.
    Parse,
    /// A field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse => write!(f, "config could not be parsed"),
            Self::ValidationFailed(msg) => write!(f, "validation failed: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}
