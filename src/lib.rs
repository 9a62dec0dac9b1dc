//! SolarPump controller library.
//!
//! Exposes the control core, ports, adapters and drivers for the binary,
//! integration tests and fuzzing.  All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod console;
pub mod control;
pub mod diagnostics;
pub mod error;
pub mod pins;
pub mod safety;
pub mod scheduler;

pub mod adapters;
pub mod drivers;
pub mod sensors;
