//! Integration tests for the ControlService → decide → guard → relay pipeline.
//!
//! These run on the host against [`MockLoop`] and a virtual clock, so dwell
//! times and verification periods of hours take no wall time.

use core::time::Duration;

use crate::mock_hw::{ManualClock, MockLoop, RecordingSink};

use solarpump::app::events::ControlEvent;
use solarpump::app::ports::Clock;
use solarpump::app::service::ControlService;
use solarpump::config::{Capabilities, ControllerConfig, Thresholds};
use solarpump::control::decision::Reason;
use solarpump::control::guard::{SwitchOutcome, SwitchRule};
use solarpump::control::reading::SensorRole;
use solarpump::control::state::PumpState;

const DWELL: u64 = 300;
const VERIFY_MIN: u64 = 60;
const MAX_OFF: u64 = 3600;

fn config(caps: Capabilities, initial: PumpState) -> ControllerConfig {
    ControllerConfig {
        thresholds: Thresholds {
            max_tank_c: 60.0,
            min_panel_diff_c: 10.0,
            min_hot_cold_diff_c: 1.0,
            min_switch_interval_secs: DWELL as u32,
            min_verification_secs: VERIFY_MIN as u32,
            max_off_secs: MAX_OFF as u32,
        },
        capabilities: caps,
        initial_pump_state: initial,
        control_interval_ms: 10_000,
        ..ControllerConfig::default()
    }
}

fn full() -> Capabilities {
    Capabilities {
        emergency_input: true,
        verification_cycle: true,
    }
}

fn basic() -> Capabilities {
    Capabilities {
        emergency_input: false,
        verification_cycle: false,
    }
}

fn make(
    caps: Capabilities,
    initial: PumpState,
    hw: &mut MockLoop,
) -> (ControlService, RecordingSink, ManualClock) {
    let clock = ManualClock::new();
    let mut sink = RecordingSink::new();
    let mut svc = ControlService::new(config(caps, initial), clock.now());
    svc.start(hw, &mut sink);
    (svc, sink, clock)
}

fn secs(s: u64) -> Duration {
    Duration::from_secs(s)
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn start_drives_configured_initial_state() {
    let mut hw = MockLoop::idle();
    let (svc, sink, _) = make(basic(), PumpState::On, &mut hw);
    assert_eq!(hw.relay(), Some(PumpState::On));
    assert_eq!(svc.state().pump, PumpState::On);
    assert!(matches!(
        sink.events.first(),
        Some(ControlEvent::Started {
            pump: PumpState::On,
            ..
        })
    ));

    let mut hw = MockLoop::idle();
    let (svc, _, _) = make(full(), PumpState::Off, &mut hw);
    assert_eq!(hw.relay(), Some(PumpState::Off));
    assert!(!svc.state().verification_active);
}

// ── Cadence ──────────────────────────────────────────────────

#[test]
fn poll_runs_one_cycle_per_interval() {
    let mut hw = MockLoop::idle();
    let (mut svc, mut sink, clock) = make(full(), PumpState::Off, &mut hw);

    let mut ran = 0;
    for _ in 0..100 {
        if svc.poll(clock.now(), &mut hw, &mut sink).is_some() {
            ran += 1;
        }
        clock.advance_secs(1);
    }
    assert_eq!(ran, 10);
    assert_eq!(sink.cycles(), 10);
    assert_eq!(svc.metrics().cycles, 10);

    // Last cycle ran at t=90s; the clock now reads 100s.
    let sched = svc.scheduler();
    assert_eq!(sched.cycles(), 10);
    assert_eq!(sched.interval(), secs(10));
    assert_eq!(sched.since_last_cycle(clock.now()), Some(secs(10)));
    assert_eq!(sched.until_next_cycle(clock.now()), Duration::ZERO);
}

#[test]
fn every_cycle_reads_all_probes_and_reasserts_relay() {
    let mut hw = MockLoop::idle();
    let (mut svc, mut sink, clock) = make(full(), PumpState::Off, &mut hw);
    for _ in 0..5 {
        svc.run_cycle(clock.advance_secs(10), &mut hw, &mut sink);
    }
    assert_eq!(hw.reads, 5 * 4);
    // One write at start, then one per cycle even without a transition.
    assert_eq!(hw.relay_calls.len(), 1 + 5);
    assert!(hw.relay_calls.iter().all(|s| *s == PumpState::Off));
}

// ── Normal operation ─────────────────────────────────────────

#[test]
fn warm_panel_starts_pump_once_dwell_has_passed() {
    let mut hw = MockLoop::new(20.0, 20.0, 20.0, 40.0);
    let (mut svc, mut sink, _) = make(full(), PumpState::Off, &mut hw);

    let early = svc.run_cycle(secs(DWELL), &mut hw, &mut sink);
    assert_eq!(early.decision.desired, PumpState::On);
    assert_eq!(early.decision.reason, Reason::PanelWarmerThanTank);
    assert_eq!(
        early.outcome,
        SwitchOutcome::Rejected {
            requested: PumpState::On
        }
    );
    assert_eq!(hw.relay(), Some(PumpState::Off));

    let late = svc.run_cycle(secs(DWELL + 1), &mut hw, &mut sink);
    assert_eq!(
        late.outcome,
        SwitchOutcome::Switched {
            to: PumpState::On,
            rule: SwitchRule::DwellElapsed
        }
    );
    assert_eq!(hw.relay(), Some(PumpState::On));
    assert_eq!(svc.state().last_switch, secs(DWELL + 1));
    assert_eq!(svc.metrics().switches, 1);
    assert_eq!(svc.metrics().rejected_switches, 1);
}

#[test]
fn running_with_heat_gain_stays_on_and_refreshes_last_on() {
    let mut hw = MockLoop::new(50.0, 52.0, 45.0, 70.0);
    let (mut svc, mut sink, _) = make(basic(), PumpState::On, &mut hw);

    let report = svc.run_cycle(secs(30), &mut hw, &mut sink);
    assert_eq!(report.outcome, SwitchOutcome::Held);
    assert_eq!(report.decision.reason, Reason::HeatGain);
    assert_eq!(svc.state().pump, PumpState::On);
    assert_eq!(svc.state().last_on, secs(30));
    assert_eq!(svc.state().last_switch, Duration::ZERO);
}

#[test]
fn hot_tank_stops_pump_after_dwell() {
    let mut hw = MockLoop::new(65.0, 70.0, 62.0, 90.0);
    let (mut svc, mut sink, _) = make(basic(), PumpState::On, &mut hw);

    let report = svc.run_cycle(secs(DWELL + 1), &mut hw, &mut sink);
    assert_eq!(report.decision.reason, Reason::TankTooHot);
    assert!(!report.decision.reason.to_string().is_empty());
    assert_eq!(svc.state().pump, PumpState::Off);
    assert_eq!(hw.relay(), Some(PumpState::Off));
}

#[test]
fn tank_at_limit_keeps_pump_off() {
    let mut hw = MockLoop::new(20.0, 20.0, 60.0, 90.0);
    let (mut svc, mut sink, _) = make(basic(), PumpState::Off, &mut hw);

    let report = svc.run_cycle(secs(DWELL + 1), &mut hw, &mut sink);
    assert_eq!(report.decision.reason, Reason::TankAtLimit);
    assert_eq!(report.outcome, SwitchOutcome::Held);
    assert_eq!(svc.state().pump, PumpState::Off);
}

#[test]
fn lost_feed_probe_stops_pump() {
    let mut hw = MockLoop::new(50.0, 55.0, 45.0, 70.0);
    hw.disconnect(SensorRole::Cold);
    let (mut svc, mut sink, _) = make(basic(), PumpState::On, &mut hw);

    let report = svc.run_cycle(secs(DWELL + 1), &mut hw, &mut sink);
    assert_eq!(report.decision.reason, Reason::FeedSensorInvalid);
    assert_eq!(svc.state().pump, PumpState::Off);
    assert!(report.sensors().to_string().contains("cold=invalid"));
}

// ── Verification cycle ───────────────────────────────────────

/// Drive an idle loop with a dead tank probe to its first verification run.
fn into_verification() -> (ControlService, MockLoop, RecordingSink) {
    let mut hw = MockLoop::idle();
    hw.disconnect(SensorRole::Reservoir);
    let (mut svc, mut sink, _) = make(full(), PumpState::Off, &mut hw);

    let before = svc.run_cycle(secs(MAX_OFF), &mut hw, &mut sink);
    assert_eq!(before.decision.reason, Reason::MissingPanelOrTank);
    assert_eq!(svc.state().pump, PumpState::Off);

    let forced = svc.run_cycle(secs(MAX_OFF + 1), &mut hw, &mut sink);
    assert_eq!(forced.decision.reason, Reason::VerificationDue);
    assert!(forced.decision.start_verification);
    assert_eq!(svc.state().pump, PumpState::On);
    assert!(svc.state().verification_active);
    assert_eq!(svc.metrics().verification_cycles, 1);
    (svc, hw, sink)
}

#[test]
fn verification_run_is_forced_after_max_off() {
    let (_svc, hw, _sink) = into_verification();
    assert_eq!(hw.relay(), Some(PumpState::On));
}

#[test]
fn verification_run_stops_early_after_its_minimum() {
    let (mut svc, mut hw, mut sink) = into_verification();
    let start = MAX_OFF + 1;

    // Nothing gained, but the run has not lasted its minimum yet.
    let early = svc.run_cycle(secs(start + VERIFY_MIN), &mut hw, &mut sink);
    assert_eq!(early.decision.reason, Reason::NoHeatGain);
    assert!(matches!(early.outcome, SwitchOutcome::Rejected { .. }));
    assert!(svc.state().verification_active);

    // Past the verification minimum but well inside the normal dwell.
    let done = svc.run_cycle(secs(start + VERIFY_MIN + 1), &mut hw, &mut sink);
    assert_eq!(
        done.outcome,
        SwitchOutcome::Switched {
            to: PumpState::Off,
            rule: SwitchRule::VerificationComplete
        }
    );
    assert!(!svc.state().verification_active);
    assert_eq!(hw.relay(), Some(PumpState::Off));
}

#[test]
fn basic_profile_never_forces_verification() {
    let mut hw = MockLoop::idle();
    hw.disconnect(SensorRole::Reservoir);
    let (mut svc, mut sink, _) = make(basic(), PumpState::Off, &mut hw);

    let report = svc.run_cycle(secs(MAX_OFF * 3), &mut hw, &mut sink);
    assert_eq!(report.decision.reason, Reason::MissingPanelOrTank);
    assert_eq!(svc.state().pump, PumpState::Off);
}

// ── Emergency ────────────────────────────────────────────────

#[test]
fn emergency_during_verification_stops_pump_immediately() {
    let (mut svc, mut hw, mut sink) = into_verification();
    hw.emergency = true;

    let report = svc.run_cycle(secs(MAX_OFF + 5), &mut hw, &mut sink);
    assert!(report.emergency);
    assert_eq!(report.decision.reason, Reason::Emergency);
    assert_eq!(
        report.outcome,
        SwitchOutcome::Switched {
            to: PumpState::Off,
            rule: SwitchRule::Emergency
        }
    );
    assert_eq!(hw.relay(), Some(PumpState::Off));
    assert!(!svc.state().verification_active);
    assert_eq!(svc.metrics().emergency_trips, 1);
    assert_eq!(
        sink.count(|e| matches!(e, ControlEvent::EmergencyRaised)),
        1
    );
}

#[test]
fn cleared_emergency_resumes_under_dwell_rules() {
    let mut hw = MockLoop::new(50.0, 55.0, 30.0, 70.0);
    let (mut svc, mut sink, _) = make(full(), PumpState::On, &mut hw);

    hw.emergency = true;
    svc.run_cycle(secs(10), &mut hw, &mut sink);
    assert_eq!(svc.state().pump, PumpState::Off);

    // Still asserted: stays off, no second trip.
    svc.run_cycle(secs(20), &mut hw, &mut sink);
    assert_eq!(svc.metrics().emergency_trips, 1);

    hw.emergency = false;
    let resumed = svc.run_cycle(secs(30), &mut hw, &mut sink);
    assert_eq!(
        sink.count(|e| matches!(e, ControlEvent::EmergencyCleared)),
        1
    );
    assert_eq!(resumed.decision.desired, PumpState::On);
    assert!(matches!(resumed.outcome, SwitchOutcome::Rejected { .. }));

    let restarted = svc.run_cycle(secs(10 + DWELL + 1), &mut hw, &mut sink);
    assert!(restarted.outcome.is_switch());
    assert_eq!(svc.state().pump, PumpState::On);
}

#[test]
fn unreadable_emergency_input_fails_safe() {
    let mut hw = MockLoop::new(50.0, 55.0, 30.0, 70.0);
    hw.emergency_fails = true;
    let (mut svc, mut sink, _) = make(full(), PumpState::On, &mut hw);

    let report = svc.run_cycle(secs(1), &mut hw, &mut sink);
    assert!(report.emergency);
    assert_eq!(svc.state().pump, PumpState::Off);
}

#[test]
fn basic_profile_ignores_emergency_input() {
    let mut hw = MockLoop::new(50.0, 55.0, 30.0, 70.0);
    hw.emergency = true;
    let (mut svc, mut sink, _) = make(basic(), PumpState::On, &mut hw);

    let report = svc.run_cycle(secs(1), &mut hw, &mut sink);
    assert!(!report.emergency);
    assert_eq!(svc.state().pump, PumpState::On);
    assert_eq!(sink.count(|e| matches!(e, ControlEvent::EmergencyRaised)), 0);
}

// ── Actuator faults ──────────────────────────────────────────

#[test]
fn failed_relay_write_is_reported_and_retried() {
    let mut hw = MockLoop::idle();
    let (mut svc, mut sink, _) = make(full(), PumpState::Off, &mut hw);

    hw.relay_fails = true;
    svc.run_cycle(secs(10), &mut hw, &mut sink);
    assert_eq!(
        sink.count(|e| matches!(e, ControlEvent::ActuatorFault { .. })),
        1
    );

    hw.relay_fails = false;
    svc.run_cycle(secs(20), &mut hw, &mut sink);
    assert_eq!(hw.relay(), Some(PumpState::Off));
    assert_eq!(svc.metrics().actuator_faults, 1);
}

// ── Diagnostics ──────────────────────────────────────────────

#[test]
fn report_status_reflects_post_guard_state() {
    let mut hw = MockLoop::new(50.0, 55.0, 30.0, 70.0);
    let (mut svc, mut sink, _) = make(basic(), PumpState::Off, &mut hw);

    let report = svc.run_cycle(secs(DWELL + 1), &mut hw, &mut sink);
    let status = report.status().to_string();
    assert!(status.starts_with("pump=ON since_on=0s since_switch=0s"), "{status}");
    assert!(status.contains("switches=1"), "{status}");
    assert_eq!(
        report.sensors().to_string(),
        "cold=50.0 hot=55.0 tank=30.0 panel=70.0"
    );
}
