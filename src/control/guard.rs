//! Switch guard.
//!
//! Arbitrates between the current pump state and the decision engine's
//! wish, enforcing the minimum dwell time between relay transitions.  Three
//! rules may grant a transition, checked in this order:
//!
//! | Rule                   | Condition                                          |
//! |------------------------|----------------------------------------------------|
//! | `Emergency`            | emergency asserted                                 |
//! | `VerificationComplete` | verification running, wants OFF, ran > minimum     |
//! | `DwellElapsed`         | time since last switch > minimum switch interval   |
//!
//! A transition none of them grants is rejected for this cycle.  Rejections
//! are not retried; the next cycle simply decides again.

use core::fmt;

use super::decision::Decision;
use super::state::{ControllerState, PumpState, Uptime};
use crate::config::Thresholds;

/// Which rule granted a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchRule {
    Emergency,
    VerificationComplete,
    DwellElapsed,
}

impl fmt::Display for SwitchRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Emergency => f.write_str("emergency override"),
            Self::VerificationComplete => f.write_str("verification complete"),
            Self::DwellElapsed => f.write_str("dwell elapsed"),
        }
    }
}

/// What the guard did this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchOutcome {
    /// The pump is already where the engine wants it.
    Held,
    /// The pump was switched to `to`.
    Switched { to: PumpState, rule: SwitchRule },
    /// A transition to `requested` was refused: too soon since the last one.
    Rejected { requested: PumpState },
}

impl SwitchOutcome {
    pub fn is_switch(&self) -> bool {
        matches!(self, Self::Switched { .. })
    }
}

/// Apply one decision to `state` at time `now`, returning the next state.
pub fn arbitrate(
    state: ControllerState,
    decision: &Decision,
    emergency: bool,
    now: Uptime,
    thresholds: &Thresholds,
) -> (ControllerState, SwitchOutcome) {
    let mut next = state;

    if decision.desired == state.pump {
        if state.pump.is_on() {
            next.last_on = now;
        }
        return (next, SwitchOutcome::Held);
    }

    let since_switch = state.since_last_switch(now);
    let rule = if emergency {
        SwitchRule::Emergency
    } else if state.verification_active
        && decision.desired == PumpState::Off
        && since_switch > thresholds.min_verification()
    {
        SwitchRule::VerificationComplete
    } else if since_switch > thresholds.min_switch_interval() {
        SwitchRule::DwellElapsed
    } else {
        // The pump keeps running this cycle, so it still counts as seen on.
        if state.pump.is_on() {
            next.last_on = now;
        }
        return (
            next,
            SwitchOutcome::Rejected {
                requested: decision.desired,
            },
        );
    };

    next.pump = decision.desired;
    next.last_switch = now;
    // Running up to this instant (OFF) or from it (ON) both count as seen on.
    next.last_on = now;
    next.verification_active = match decision.desired {
        PumpState::On => decision.start_verification,
        PumpState::Off => false,
    };

    (
        next,
        SwitchOutcome::Switched {
            to: decision.desired,
            rule,
        },
    )
}
