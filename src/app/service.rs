//! Control service — the hexagonal core.
//!
//! [`ControlService`] owns the controller state, cycle scheduler, emergency
//! monitor and runtime counters.  It exposes a hardware-agnostic API; all
//! I/O flows through port traits injected at call sites, making the whole
//! service testable with mock adapters.
//!
//! ```text
//!  TemperaturePort ──▶ ┌──────────────────────────┐ ──▶ ReportSink
//!    EmergencyPort ──▶ │      ControlService      │
//!         PumpPort ◀── │ Decide · Guard · Schedule│
//!                      └──────────────────────────┘
//! ```

use log::{error, info};

use crate::config::ControllerConfig;
use crate::control::decision::{DecisionInput, decide};
use crate::control::guard::{SwitchOutcome, arbitrate};
use crate::control::reading::{Readings, SensorRole};
use crate::control::state::{ControllerState, Uptime};
use crate::diagnostics::{CycleReport, RuntimeMetrics};
use crate::safety::{EmergencyEdge, EmergencyMonitor};
use crate::scheduler::{CycleScheduler, CycleTiming};

use super::events::ControlEvent;
use super::ports::{EmergencyPort, PumpPort, ReportSink, TemperaturePort};

// ───────────────────────────────────────────────────────────────
// ControlService
// ───────────────────────────────────────────────────────────────

/// The control service orchestrates one pump loop.
pub struct ControlService {
    config: ControllerConfig,
    state: ControllerState,
    scheduler: CycleScheduler,
    emergency: EmergencyMonitor,
    metrics: RuntimeMetrics,
}

impl ControlService {
    /// Construct the service from configuration.
    ///
    /// The pump is *not* driven yet — call [`start`](Self::start) next.
    pub fn new(config: ControllerConfig, now: Uptime) -> Self {
        let state = ControllerState::new(config.initial_pump_state, now);
        let scheduler = CycleScheduler::new(config.control_interval());
        let emergency = EmergencyMonitor::new(&config.capabilities);
        Self {
            config,
            state,
            scheduler,
            emergency,
            metrics: RuntimeMetrics::default(),
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Drive the relay to the configured initial state.
    pub fn start(&mut self, hw: &mut impl PumpPort, sink: &mut impl ReportSink) {
        self.apply_pump(hw, sink);
        sink.emit(&ControlEvent::Started {
            pump: self.state.pump,
            capabilities: self.config.capabilities,
        });
        info!(
            "ControlService started: pump={} emergency_input={} verification={}",
            self.state.pump,
            self.config.capabilities.emergency_input,
            self.config.capabilities.verification_cycle,
        );
    }

    // ── Per-cycle orchestration ───────────────────────────────

    /// Run a cycle if the scheduler says one is due at `now`.
    pub fn poll(
        &mut self,
        now: Uptime,
        hw: &mut (impl TemperaturePort + EmergencyPort + PumpPort),
        sink: &mut impl ReportSink,
    ) -> Option<CycleReport> {
        if self.scheduler.poll(now) {
            Some(self.run_cycle(now, hw, sink))
        } else {
            None
        }
    }

    /// Run one full control cycle: probes → emergency → decide → guard →
    /// relay → report.
    ///
    /// The `hw` parameter satisfies every hardware port at once; this avoids
    /// multiple mutable borrows while keeping the port boundary explicit.
    pub fn run_cycle(
        &mut self,
        now: Uptime,
        hw: &mut (impl TemperaturePort + EmergencyPort + PumpPort),
        sink: &mut impl ReportSink,
    ) -> CycleReport {
        // 1. All four probes before any decision
        let mut readings = Readings::disconnected();
        for role in SensorRole::ALL {
            readings.set(role, hw.read_temperature(role));
        }

        // 2. Emergency input
        let sample = self
            .emergency
            .is_enabled()
            .then(|| hw.emergency_asserted());
        match self.emergency.evaluate(sample) {
            EmergencyEdge::Raised => {
                self.metrics.emergency_trips = self.emergency.trips();
                sink.emit(&ControlEvent::EmergencyRaised);
            }
            EmergencyEdge::Cleared => sink.emit(&ControlEvent::EmergencyCleared),
            EmergencyEdge::Steady => {}
        }
        let emergency = self.emergency.is_asserted();

        // 3. Decide
        let timing = CycleTiming::of(&self.state, now);
        let input = DecisionInput {
            readings,
            pump: self.state.pump,
            verification_active: self.state.verification_active,
            since_last_on: timing.since_last_on,
            since_last_switch: timing.since_last_switch,
            emergency,
        };
        let decision = decide(&input, &self.config.thresholds, &self.config.capabilities);

        // 4. Guard
        let (next, outcome) = arbitrate(
            self.state,
            &decision,
            emergency,
            now,
            &self.config.thresholds,
        );
        self.metrics.cycles += 1;
        match outcome {
            SwitchOutcome::Switched { .. } => {
                self.metrics.switches += 1;
                if next.verification_active {
                    self.metrics.verification_cycles += 1;
                }
            }
            SwitchOutcome::Rejected { .. } => self.metrics.rejected_switches += 1,
            SwitchOutcome::Held => {}
        }
        self.state = next;

        // 5. Relay is re-asserted every cycle, not only on transitions
        self.apply_pump(hw, sink);

        // 6. Report
        let report = CycleReport {
            at: now,
            readings,
            emergency,
            decision,
            outcome,
            state: self.state,
            metrics: self.metrics,
        };
        sink.emit(&ControlEvent::Cycle(report));
        report
    }

    // ── Queries ───────────────────────────────────────────────

    /// Current controller state.
    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    /// Counters since boot.
    pub fn metrics(&self) -> &RuntimeMetrics {
        &self.metrics
    }

    /// Active configuration.
    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    /// The cycle scheduler, for cadence queries.
    pub fn scheduler(&self) -> &CycleScheduler {
        &self.scheduler
    }

    // ── Internal ──────────────────────────────────────────────

    fn apply_pump(&mut self, hw: &mut impl PumpPort, sink: &mut impl ReportSink) {
        let commanded = self.state.pump;
        if let Err(e) = hw.set_pump(commanded) {
            self.metrics.actuator_faults += 1;
            error!("Relay write failed ({e}); will retry next cycle");
            sink.emit(&ControlEvent::ActuatorFault {
                commanded,
                error: e,
            });
        }
    }
}
