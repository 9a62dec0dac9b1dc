//! SolarPump Firmware — Main Entry Point
//!
//! Hexagonal architecture with a single cooperative control loop.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter          LogReportSink     MonotonicClock     │
//! │  (Temperature+Pump+       (ReportSink)      (Clock)            │
//! │   Emergency)              Console (serial reader thread)       │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            ControlService (pure logic)                 │    │
//! │  │  Decide · Guard · CycleScheduler · EmergencyMonitor    │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
//!
//! On a host build the same loop runs against simulated pins and ADC
//! samples, driven by a crude thermal model.
#![deny(unused_must_use)]

use std::io;
use std::thread;

use anyhow::{Context, Result};
use log::info;

use solarpump::adapters::hardware::HardwareAdapter;
use solarpump::adapters::log_sink::LogReportSink;
use solarpump::adapters::serial::{Console, spawn_console_reader};
use solarpump::adapters::time::MonotonicClock;
use solarpump::app::ports::Clock;
use solarpump::app::service::ControlService;
use solarpump::config::ControllerConfig;
use solarpump::console::DEFAULT_LINE_CAPACITY;
use solarpump::drivers::emergency::EmergencyInput;
use solarpump::drivers::hw_init;
use solarpump::drivers::pump::PumpRelay;
use solarpump::sensors::SensorHub;

#[cfg(target_os = "espidf")]
use solarpump::drivers::gpio::IdfPin as BoardPin;
#[cfg(not(target_os = "espidf"))]
use solarpump::drivers::gpio::SimPin as BoardPin;

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. Platform bootstrap + logging ───────────────────────
    init_logging()?;

    info!("╔══════════════════════════════════════╗");
    info!("║  SolarPump v{}                    ║", env!("CARGO_PKG_VERSION"));
    info!("╚══════════════════════════════════════╝");

    // ── 2. Configuration (fixed for the process lifetime) ─────
    let config = load_config()?;
    info!(
        "Config: max_tank={:.1}C panel_diff={:.1}C hot_cold_diff={:.1}C dwell={}s \
         verification_min={}s max_off={}s interval={}ms",
        config.thresholds.max_tank_c,
        config.thresholds.min_panel_diff_c,
        config.thresholds.min_hot_cold_diff_c,
        config.thresholds.min_switch_interval_secs,
        config.thresholds.min_verification_secs,
        config.thresholds.max_off_secs,
        config.control_interval_ms,
    );

    // ── 3. Peripherals + adapters ─────────────────────────────
    hw_init::init_peripherals(&config).context("peripheral init failed")?;

    let (relay_pin, emergency_pin) = board_pins();
    #[cfg(not(target_os = "espidf"))]
    let mut sim = sim::Model::new(&config, relay_pin.clone());

    let emergency = config
        .capabilities
        .emergency_input
        .then(|| EmergencyInput::new(emergency_pin, config.emergency_active_high));
    let mut hw = HardwareAdapter::new(
        SensorHub::new(&config.sensors),
        PumpRelay::new(relay_pin, config.relay_active_high),
        emergency,
    );
    let mut sink = LogReportSink::new();
    let clock = MonotonicClock::new();

    let queue = spawn_console_reader().context("failed to start console reader")?;
    let mut console: Console<_, DEFAULT_LINE_CAPACITY> = Console::new(queue, io::stdout());

    // ── 4. Service ────────────────────────────────────────────
    let poll_interval = config.poll_interval();
    let mut service = ControlService::new(config, clock.now());
    service.start(&mut hw, &mut sink);

    // ── 5. Control loop ───────────────────────────────────────
    loop {
        console.service();

        let now = clock.now();
        #[cfg(not(target_os = "espidf"))]
        sim.step(now);

        service.poll(now, &mut hw, &mut sink);

        thread::sleep(poll_interval);
    }
}

#[cfg(target_os = "espidf")]
fn init_logging() -> Result<()> {
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init().context("logger init failed")?;
    Ok(())
}

#[cfg(not(target_os = "espidf"))]
fn init_logging() -> Result<()> {
    tracing_subscriber::fmt::init();
    Ok(())
}

/// Board configuration.  On the host, `SOLARPUMP_CONFIG` may name a JSON
/// file overriding the defaults.
#[cfg(target_os = "espidf")]
fn load_config() -> Result<ControllerConfig> {
    let config = ControllerConfig::default();
    config.validate().context("built-in config invalid")?;
    Ok(config)
}

#[cfg(not(target_os = "espidf"))]
fn load_config() -> Result<ControllerConfig> {
    match std::env::var_os("SOLARPUMP_CONFIG") {
        Some(path) => {
            let bytes = std::fs::read(&path)
                .with_context(|| format!("cannot read config {}", path.to_string_lossy()))?;
            let config = ControllerConfig::from_json(&bytes)
                .with_context(|| format!("invalid config {}", path.to_string_lossy()))?;
            info!("Config loaded from {}", path.to_string_lossy());
            Ok(config)
        }
        None => {
            info!("Using built-in default config");
            Ok(ControllerConfig::default())
        }
    }
}

#[cfg(target_os = "espidf")]
fn board_pins() -> (BoardPin, BoardPin) {
    use solarpump::pins;
    (
        BoardPin::new(pins::PUMP_RELAY_GPIO),
        BoardPin::new(pins::EMERGENCY_GPIO),
    )
}

#[cfg(not(target_os = "espidf"))]
fn board_pins() -> (BoardPin, BoardPin) {
    (BoardPin::new(false), BoardPin::new(false))
}

// ── Host simulation ───────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod sim {
    use core::time::Duration;

    use solarpump::config::ControllerConfig;
    use solarpump::drivers::gpio::SimPin;
    use solarpump::drivers::hw_init::sim_set_adc;
    use solarpump::sensors::temperature::celsius_to_adc;

    /// One simulated day, compressed.
    const DAY_SECS: f32 = 600.0;

    /// Lumped thermal model: the panel follows a sine "sun"; while the relay
    /// is energised the loop carries panel heat into the tank.
    pub struct Model {
        coil: SimPin,
        relay_active_high: bool,
        channels: [u8; 4],
        tank_c: f32,
        last: Option<Duration>,
    }

    impl Model {
        pub fn new(config: &ControllerConfig, coil: SimPin) -> Self {
            let s = &config.sensors;
            Self {
                coil,
                relay_active_high: config.relay_active_high,
                channels: [s.cold, s.hot, s.reservoir, s.collector],
                tank_c: 25.0,
                last: None,
            }
        }

        pub fn step(&mut self, now: Duration) {
            let dt = self
                .last
                .map_or(0.0, |last| now.saturating_sub(last).as_secs_f32());
            self.last = Some(now);

            let phase = (now.as_secs_f32() / DAY_SECS) * core::f32::consts::TAU;
            let panel_c = 20.0 + 60.0 * phase.sin().max(0.0);
            let running = self.coil.level() == self.relay_active_high;

            let (cold_c, hot_c) = if running {
                self.tank_c += (panel_c - self.tank_c) * 0.002 * dt;
                (self.tank_c, self.tank_c + (panel_c - self.tank_c) * 0.5)
            } else {
                // Stagnant pipes drift toward ambient.
                self.tank_c -= 0.0005 * dt;
                (self.tank_c - 2.0, self.tank_c - 2.0)
            };

            let [cold, hot, tank, panel] = self.channels;
            sim_set_adc(cold, celsius_to_adc(cold_c));
            sim_set_adc(hot, celsius_to_adc(hot_c));
            sim_set_adc(tank, celsius_to_adc(self.tank_c));
            sim_set_adc(panel, celsius_to_adc(panel_c));
        }
    }
}
