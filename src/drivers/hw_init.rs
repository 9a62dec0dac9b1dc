//! One-shot hardware peripheral initialization.
//!
//! Configures the probe ADC channels, the relay output and the emergency
//! input using raw ESP-IDF sys calls.  Called once from `main()` before
//! the control loop starts.
//!
//! On host builds the ADC is an array of atomics the simulator (or a
//! test) writes with [`sim_set_adc`].

#[cfg(target_os = "espidf")]
use esp_idf_svc::sys::*;
#[cfg(target_os = "espidf")]
use log::info;

use crate::config::ControllerConfig;
use crate::error::SensorError;
use crate::pins;

// ── Error type ────────────────────────────────────────────────

/// Errors during one-shot peripheral initialization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HwInitError {
    AdcInitFailed(i32),
    GpioConfigFailed(i32),
}

impl core::fmt::Display for HwInitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::AdcInitFailed(rc) => write!(f, "ADC1 init failed (rc={})", rc),
            Self::GpioConfigFailed(rc) => write!(f, "GPIO config failed (rc={})", rc),
        }
    }
}

impl std::error::Error for HwInitError {}

#[cfg(target_os = "espidf")]
pub fn init_peripherals(config: &ControllerConfig) -> Result<(), HwInitError> {
    // SAFETY: Called once from main() before the control loop; single-threaded.
    unsafe {
        init_adc(config)?;
        init_relay_output(config)?;
        if config.capabilities.emergency_input {
            init_emergency_input(config)?;
        }
    }
    info!("hw_init: all peripherals configured");
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
pub fn init_peripherals(config: &ControllerConfig) -> Result<(), HwInitError> {
    log::info!(
        "hw_init(sim): peripheral init skipped (probes on ADC ch {}/{}/{}/{})",
        config.sensors.cold,
        config.sensors.hot,
        config.sensors.reservoir,
        config.sensors.collector,
    );
    Ok(())
}

// ── ADC (oneshot) ─────────────────────────────────────────────

#[cfg(target_os = "espidf")]
static mut ADC1_HANDLE: adc_oneshot_unit_handle_t = core::ptr::null_mut();

/// SAFETY: Must be called only from the single-threaded init path or the
/// control-loop ADC read path.  `init_adc()` completes before the loop
/// starts, so no concurrent access is possible.
#[cfg(target_os = "espidf")]
unsafe fn adc1_handle() -> adc_oneshot_unit_handle_t {
    unsafe { ADC1_HANDLE }
}

#[cfg(target_os = "espidf")]
unsafe fn init_adc(config: &ControllerConfig) -> Result<(), HwInitError> {
    let init_cfg = adc_oneshot_unit_init_cfg_t {
        unit_id: adc_unit_t_ADC_UNIT_1,
        ulp_mode: adc_ulp_mode_t_ADC_ULP_MODE_DISABLE,
        ..Default::default()
    };
    // SAFETY: ADC1_HANDLE is only written here, once at boot.
    let ret = unsafe { adc_oneshot_new_unit(&init_cfg, &raw mut ADC1_HANDLE) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::AdcInitFailed(ret));
    }

    let chan_cfg = adc_oneshot_chan_cfg_t {
        atten: pins::PROBE_ADC_ATTEN,
        bitwidth: adc_bitwidth_t_ADC_BITWIDTH_12,
    };

    let s = &config.sensors;
    for ch in [s.cold, s.hot, s.reservoir, s.collector] {
        let ret = unsafe { adc_oneshot_config_channel(adc1_handle(), u32::from(ch), &chan_cfg) };
        if ret != ESP_OK as i32 {
            return Err(HwInitError::AdcInitFailed(ret));
        }
    }

    info!(
        "hw_init: ADC1 configured (cold=CH{} hot=CH{} tank=CH{} panel=CH{})",
        s.cold, s.hot, s.reservoir, s.collector
    );
    Ok(())
}

#[cfg(target_os = "espidf")]
pub fn adc1_read(channel: u8) -> Result<u16, SensorError> {
    if channel >= pins::ADC_CHANNEL_COUNT {
        return Err(SensorError::NoSuchChannel);
    }
    let mut raw: i32 = 0;
    // SAFETY: adc1_handle() contract — single-threaded control-loop access only.
    let ret = unsafe { adc_oneshot_read(adc1_handle(), u32::from(channel), &mut raw) };
    if ret != ESP_OK as i32 {
        return Err(SensorError::AdcReadFailed);
    }
    Ok(raw.max(0) as u16)
}

/// Mid-scale: roughly 25 °C on a 10 kΩ NTC divider.
#[cfg(not(target_os = "espidf"))]
const SIM_ADC_DEFAULT: u16 = 2048;

#[cfg(not(target_os = "espidf"))]
static SIM_ADC: [core::sync::atomic::AtomicU16; pins::ADC_CHANNEL_COUNT as usize] =
    [const { core::sync::atomic::AtomicU16::new(SIM_ADC_DEFAULT) }; pins::ADC_CHANNEL_COUNT as usize];

/// Inject a raw 12-bit sample for `channel` (host simulation only).
#[cfg(not(target_os = "espidf"))]
pub fn sim_set_adc(channel: u8, raw: u16) {
    if let Some(slot) = SIM_ADC.get(usize::from(channel)) {
        slot.store(raw.min(4095), core::sync::atomic::Ordering::Relaxed);
    }
}

#[cfg(not(target_os = "espidf"))]
pub fn adc1_read(channel: u8) -> Result<u16, SensorError> {
    SIM_ADC
        .get(usize::from(channel))
        .map(|slot| slot.load(core::sync::atomic::Ordering::Relaxed))
        .ok_or(SensorError::NoSuchChannel)
}

// ── GPIO ──────────────────────────────────────────────────────

#[cfg(target_os = "espidf")]
unsafe fn init_relay_output(config: &ControllerConfig) -> Result<(), HwInitError> {
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::PUMP_RELAY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_OUTPUT,
        pull_up_en: gpio_pullup_t_GPIO_PULLUP_DISABLE,
        pull_down_en: gpio_pulldown_t_GPIO_PULLDOWN_DISABLE,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }
    // Coil de-energised until the service drives the initial state.
    let idle = if config.relay_active_high { 0 } else { 1 };
    unsafe { gpio_set_level(pins::PUMP_RELAY_GPIO, idle) };

    info!("hw_init: relay output on GPIO{}", pins::PUMP_RELAY_GPIO);
    Ok(())
}

#[cfg(target_os = "espidf")]
unsafe fn init_emergency_input(config: &ControllerConfig) -> Result<(), HwInitError> {
    // Pull toward the idle level so a floating input reads as not asserted.
    let (pull_up, pull_down) = if config.emergency_active_high {
        (gpio_pullup_t_GPIO_PULLUP_DISABLE, gpio_pulldown_t_GPIO_PULLDOWN_ENABLE)
    } else {
        (gpio_pullup_t_GPIO_PULLUP_ENABLE, gpio_pulldown_t_GPIO_PULLDOWN_DISABLE)
    };
    let cfg = gpio_config_t {
        pin_bit_mask: 1u64 << pins::EMERGENCY_GPIO,
        mode: gpio_mode_t_GPIO_MODE_INPUT,
        pull_up_en: pull_up,
        pull_down_en: pull_down,
        intr_type: gpio_int_type_t_GPIO_INTR_DISABLE,
    };
    let ret = unsafe { gpio_config(&cfg) };
    if ret != ESP_OK as i32 {
        return Err(HwInitError::GpioConfigFailed(ret));
    }

    info!("hw_init: emergency input on GPIO{}", pins::EMERGENCY_GPIO);
    Ok(())
}
