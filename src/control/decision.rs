//! Decision engine.
//!
//! A pure function from one cycle's inputs to the pump state the loop
//! *wants*.  Whether that wish is granted this cycle is the switch guard's
//! business, not this module's.
//!
//! Rules, highest precedence first:
//!
//! ```text
//!  1. verification   idle too long and panel reading useless  -> ON  (+start)
//!  2. running        feed invalid | no heat signal |
//!                    tank too hot | no heat gain               -> OFF
//!  3. idle           panel usefully warmer than tank           -> ON
//!  4. emergency      asserted                                  -> OFF (always)
//! ```

use core::fmt;
use core::time::Duration;

use super::reading::{Readings, SensorRole};
use super::state::PumpState;
use crate::config::{Capabilities, Thresholds};

/// The panel is considered nowhere near tank temperature when it reads at
/// least this much colder (Celsius).
pub const VERIFICATION_MARGIN_C: f32 = 10.0;

/// Everything the decision engine looks at for one cycle.
#[derive(Debug, Clone, Copy)]
pub struct DecisionInput {
    pub readings: Readings,
    pub pump: PumpState,
    pub verification_active: bool,
    pub since_last_on: Duration,
    pub since_last_switch: Duration,
    pub emergency: bool,
}

/// Why the engine wants what it wants.  `Display` gives the diagnostic text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reason {
    /// Idle for longer than `max_off` with no usable panel signal.
    VerificationDue,
    /// Feed probe invalid while running.
    FeedSensorInvalid,
    /// Neither return nor panel probe is valid while running.
    NoHeatSignal,
    /// Feed temperature above the tank limit.
    TankTooHot,
    /// Return is not meaningfully warmer than feed.
    NoHeatGain,
    /// Return is warmer than feed; keep circulating.
    HeatGain,
    /// Panel is warmer than tank by the required margin.
    PanelWarmerThanTank,
    /// Panel probe or tank probe invalid while idle.
    MissingPanelOrTank,
    /// Tank already at or above its limit while idle.
    TankAtLimit,
    /// Panel not warm enough to be worth pumping.
    PanelTooCold,
    /// Emergency input asserted.
    Emergency,
}

impl Reason {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::VerificationDue => "verification run due",
            Self::FeedSensorInvalid => "feed sensor invalid",
            Self::NoHeatSignal => "return and panel sensors invalid",
            Self::TankTooHot => "tank too hot",
            Self::NoHeatGain => "return not warmer than feed",
            Self::HeatGain => "heat gain",
            Self::PanelWarmerThanTank => "panel warmer than tank",
            Self::MissingPanelOrTank => "panel or tank sensor invalid",
            Self::TankAtLimit => "tank at limit",
            Self::PanelTooCold => "panel too cold",
            Self::Emergency => "emergency input asserted",
        }
    }
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output of [`decide`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub desired: PumpState,
    pub reason: Reason,
    /// Set only by the verification rule; the guard copies it into the
    /// state when it grants an ON transition.
    pub start_verification: bool,
}

impl Decision {
    const fn new(desired: PumpState, reason: Reason) -> Self {
        Self {
            desired,
            reason,
            start_verification: false,
        }
    }
}

/// Decide the desired pump state for this cycle.
pub fn decide(input: &DecisionInput, thresholds: &Thresholds, caps: &Capabilities) -> Decision {
    let decision = if caps.verification_cycle && verification_due(input, thresholds) {
        Decision {
            desired: PumpState::On,
            reason: Reason::VerificationDue,
            start_verification: true,
        }
    } else {
        match input.pump {
            PumpState::On => while_running(&input.readings, thresholds),
            PumpState::Off => while_idle(&input.readings, thresholds),
        }
    };

    if input.emergency {
        return Decision::new(PumpState::Off, Reason::Emergency);
    }
    decision
}

fn verification_due(input: &DecisionInput, t: &Thresholds) -> bool {
    if input.since_last_on <= t.max_off() {
        return false;
    }
    let r = &input.readings;
    match (r.valid(SensorRole::Reservoir), r.valid(SensorRole::Collector)) {
        (Some(tank), Some(panel)) => panel + VERIFICATION_MARGIN_C <= tank,
        _ => true,
    }
}

fn while_running(r: &Readings, t: &Thresholds) -> Decision {
    let Some(cold) = r.valid(SensorRole::Cold) else {
        return Decision::new(PumpState::Off, Reason::FeedSensorInvalid);
    };
    // Return side: the return probe, or the panel probe standing in for it.
    let Some(hot) = r
        .valid(SensorRole::Hot)
        .or_else(|| r.valid(SensorRole::Collector))
    else {
        return Decision::new(PumpState::Off, Reason::NoHeatSignal);
    };
    if cold > t.max_tank_c {
        return Decision::new(PumpState::Off, Reason::TankTooHot);
    }
    if hot - cold < t.min_hot_cold_diff_c {
        return Decision::new(PumpState::Off, Reason::NoHeatGain);
    }
    Decision::new(PumpState::On, Reason::HeatGain)
}

fn while_idle(r: &Readings, t: &Thresholds) -> Decision {
    let (Some(panel), Some(tank)) = (r.valid(SensorRole::Collector), r.valid(SensorRole::Reservoir))
    else {
        return Decision::new(PumpState::Off, Reason::MissingPanelOrTank);
    };
    if tank >= t.max_tank_c {
        return Decision::new(PumpState::Off, Reason::TankAtLimit);
    }
    if panel - tank > t.min_panel_diff_c {
        return Decision::new(PumpState::On, Reason::PanelWarmerThanTank);
    }
    Decision::new(PumpState::Off, Reason::PanelTooCold)
}
