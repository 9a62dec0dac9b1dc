//! Actuator and input drivers, hardware initialisation, and pin helpers.

pub mod emergency;
pub mod gpio;
pub mod hw_init;
pub mod pump;
