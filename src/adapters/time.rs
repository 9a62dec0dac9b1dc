//! Monotonic clock adapter.
//!
//! Implements [`Clock`] for the control loop.
//!
//! - **`target_os = "espidf"`** — wraps `esp_timer_get_time()` from the
//!   ESP-IDF high-resolution timer (microsecond precision, monotonic).
//! - **`not(target_os = "espidf")`** — uses `std::time::Instant` for
//!   host-side simulation.

#[cfg(target_os = "espidf")]
use core::time::Duration;

use crate::app::ports::Clock;
use crate::control::state::Uptime;

/// Uptime clock for the ESP32-S3 platform.
pub struct MonotonicClock {
    #[cfg(not(target_os = "espidf"))]
    start: std::time::Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            #[cfg(not(target_os = "espidf"))]
            start: std::time::Instant::now(),
        }
    }
}

impl Clock for MonotonicClock {
    #[cfg(target_os = "espidf")]
    fn now(&self) -> Uptime {
        // SAFETY: esp_timer_get_time is a plain counter read.
        let us = unsafe { esp_idf_svc::sys::esp_timer_get_time() };
        Duration::from_micros(us.max(0) as u64)
    }

    #[cfg(not(target_os = "espidf"))]
    fn now(&self) -> Uptime {
        self.start.elapsed()
    }
}
