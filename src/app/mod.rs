//! Application core — control orchestration, zero I/O.
//!
//! This module wires the pure control logic (decision engine, switch guard,
//! cycle scheduler, emergency monitor) into one service.  All interaction
//! with hardware happens through **port traits** defined in [`ports`],
//! keeping this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod service;
