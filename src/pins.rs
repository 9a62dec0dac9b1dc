//! GPIO / peripheral pin assignments for the SolarPump controller board.
//!
//! Single source of truth — every driver references this module rather than
//! hard-coding pin numbers.

// ---------------------------------------------------------------------------
// Pump relay
// ---------------------------------------------------------------------------

/// Digital output driving the circulation pump relay coil.
/// Polarity is set by `ControllerConfig::relay_active_high`.
pub const PUMP_RELAY_GPIO: i32 = 2;

// ---------------------------------------------------------------------------
// Emergency input (leak / flood sensor)
// ---------------------------------------------------------------------------

/// Digital input from the leak sensor.  External pull-down; the sensor
/// pulls HIGH when wet unless `emergency_active_high` is cleared.
pub const EMERGENCY_GPIO: i32 = 4;

// ---------------------------------------------------------------------------
// Temperature probes — NTC thermistors on ADC1
// ---------------------------------------------------------------------------

/// Number of usable ADC1 channels on the probe header.
pub const ADC_CHANNEL_COUNT: u8 = 8;

/// Feed line to the collector (cold side).
pub const ADC_CH_COLD: u8 = 0;
/// Return line from the collector (hot side).
pub const ADC_CH_HOT: u8 = 1;
/// Storage tank.
pub const ADC_CH_TANK: u8 = 2;
/// Collector panel absorber plate.
pub const ADC_CH_PANEL: u8 = 3;

/// ADC attenuation for the probes (11 dB, 0-3.1 V range).
pub const PROBE_ADC_ATTEN: u32 = 3; // esp_idf_hal::adc::attenuation::DB_11
