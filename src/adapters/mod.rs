//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to                    |
//! |------------|--------------------|--------------------------------|
//! | `hardware` | TemperaturePort    | NTC probes on ADC1             |
//! |            | PumpPort           | Relay GPIO                     |
//! |            | EmergencyPort      | Leak sensor GPIO               |
//! | `log_sink` | ReportSink         | Serial log output              |
//! | `time`     | Clock              | ESP32 system timer             |
//! | `serial`   | —                  | Console reader thread + replies|

pub mod hardware;
pub mod log_sink;
pub mod serial;
pub mod time;
