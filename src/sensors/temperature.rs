//! NTC thermistor probe (10 kOhm @ 25 C, B = 3950).
//!
//! Wired in a voltage-divider with a fixed 10 kOhm resistor, read via
//! the ESP32-S3 ADC. The simplified Beta (Steinhart-Hart) equation
//! converts resistance to temperature.
//!
//! An open or shorted probe pins the divider to a rail; such samples (and
//! failed ADC reads) report [`DISCONNECTED_C`], which the validity filter
//! rejects.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: reads ADC1 via the oneshot API (initialised by hw_init).
//! On host/test: hw_init serves samples from atomics for injection.

use log::warn;

use crate::control::reading::DISCONNECTED_C;
use crate::drivers::hw_init;

const R25: f32 = 10_000.0;
const BETA: f32 = 3950.0;
const T25_K: f32 = 298.15;
const R_DIVIDER: f32 = 10_000.0;
const ADC_MAX: f32 = 4095.0;
const V_REF: f32 = 3.3;
/// Divider voltages this close to a rail mean an open or shorted probe.
const RAIL_MARGIN_V: f32 = 0.01;

pub struct NtcProbe {
    channel: u8,
}

impl NtcProbe {
    pub fn new(channel: u8) -> Self {
        Self { channel }
    }

    pub fn channel(&self) -> u8 {
        self.channel
    }

    /// Sample the probe in Celsius.  A failed ADC read reports
    /// [`DISCONNECTED_C`].
    pub fn read(&self) -> f32 {
        match hw_init::adc1_read(self.channel) {
            Ok(raw) => adc_to_celsius(raw),
            Err(e) => {
                warn!("Probe on ADC CH{}: {}", self.channel, e);
                DISCONNECTED_C
            }
        }
    }
}

/// Convert a 12-bit divider sample to Celsius.
pub fn adc_to_celsius(raw: u16) -> f32 {
    let voltage = (raw as f32 / ADC_MAX) * V_REF;
    if voltage <= RAIL_MARGIN_V || voltage >= (V_REF - RAIL_MARGIN_V) {
        return DISCONNECTED_C;
    }
    let r_ntc = R_DIVIDER * voltage / (V_REF - voltage);
    let inv_t = (1.0 / T25_K) + (1.0 / BETA) * (r_ntc / R25).ln();
    if inv_t <= 0.0 {
        return DISCONNECTED_C;
    }
    (1.0 / inv_t) - 273.15
}

/// Inverse of [`adc_to_celsius`]: the sample a healthy probe at `celsius`
/// would produce.  Used to drive the host simulator.
pub fn celsius_to_adc(celsius: f32) -> u16 {
    let t_k = celsius + 273.15;
    let r_ntc = R25 * (BETA * (1.0 / t_k - 1.0 / T25_K)).exp();
    let voltage = V_REF * r_ntc / (R_DIVIDER + r_ntc);
    (voltage / V_REF * ADC_MAX).round().clamp(0.0, ADC_MAX) as u16
}
