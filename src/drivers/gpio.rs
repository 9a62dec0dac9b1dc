//! Digital pins behind `embedded-hal` traits.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: [`IdfPin`] drives a GPIO already configured by `hw_init`
//! through raw `gpio_set_level` / `gpio_get_level` calls.
//! On host/test: [`SimPin`] keeps the level in a shared atomic, so a test
//! (or the simulator) holding a clone can watch or drive it.

use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use embedded_hal::digital::{ErrorType, InputPin, OutputPin};

// ───────────────────────────────────────────────────────────────
// Simulated pin
// ───────────────────────────────────────────────────────────────

/// In-memory pin.  Clones share the same level.
#[derive(Debug, Clone, Default)]
pub struct SimPin {
    level: Arc<AtomicBool>,
}

impl SimPin {
    pub fn new(high: bool) -> Self {
        Self {
            level: Arc::new(AtomicBool::new(high)),
        }
    }

    /// Current level, as seen from outside the driver.
    pub fn level(&self) -> bool {
        self.level.load(Ordering::Relaxed)
    }

    /// Force the level, as external hardware would.
    pub fn drive(&self, high: bool) {
        self.level.store(high, Ordering::Relaxed);
    }
}

impl ErrorType for SimPin {
    type Error = Infallible;
}

impl OutputPin for SimPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.drive(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.drive(true);
        Ok(())
    }
}

impl InputPin for SimPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        Ok(self.level())
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        Ok(!self.level())
    }
}

// ───────────────────────────────────────────────────────────────
// ESP-IDF pin
// ───────────────────────────────────────────────────────────────

/// Raw ESP-IDF return code from a failed GPIO call.
#[cfg(target_os = "espidf")]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GpioError(pub i32);

#[cfg(target_os = "espidf")]
impl embedded_hal::digital::Error for GpioError {
    fn kind(&self) -> embedded_hal::digital::ErrorKind {
        embedded_hal::digital::ErrorKind::Other
    }
}

/// A GPIO configured by [`hw_init::init_peripherals`](super::hw_init::init_peripherals).
#[cfg(target_os = "espidf")]
#[derive(Debug)]
pub struct IdfPin {
    gpio: i32,
}

#[cfg(target_os = "espidf")]
impl IdfPin {
    /// Wrap an already-configured GPIO number.
    pub fn new(gpio: i32) -> Self {
        Self { gpio }
    }
}

#[cfg(target_os = "espidf")]
impl ErrorType for IdfPin {
    type Error = GpioError;
}

#[cfg(target_os = "espidf")]
fn check(ret: i32) -> Result<(), GpioError> {
    if ret != esp_idf_svc::sys::ESP_OK as i32 {
        return Err(GpioError(ret));
    }
    Ok(())
}

#[cfg(target_os = "espidf")]
impl OutputPin for IdfPin {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        // SAFETY: register write on a pin configured as output at boot.
        let ret = unsafe { esp_idf_svc::sys::gpio_set_level(self.gpio, 0) };
        check(ret)
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        // SAFETY: register write on a pin configured as output at boot.
        let ret = unsafe { esp_idf_svc::sys::gpio_set_level(self.gpio, 1) };
        check(ret)
    }
}

#[cfg(target_os = "espidf")]
impl InputPin for IdfPin {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        // SAFETY: register read on a pin configured as input at boot.
        Ok(unsafe { esp_idf_svc::sys::gpio_get_level(self.gpio) } != 0)
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|h| !h)
    }
}
