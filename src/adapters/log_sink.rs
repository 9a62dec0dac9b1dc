//! Log-based report sink adapter.
//!
//! Implements [`ReportSink`] by writing control events to the `log`
//! facade, which goes to UART / USB-CDC on the board and to the terminal
//! on host runs.

use log::{debug, error, info, warn};

use crate::app::events::ControlEvent;
use crate::app::ports::ReportSink;
use crate::control::guard::SwitchOutcome;

/// Adapter that logs every [`ControlEvent`] to the serial console.
#[derive(Default)]
pub struct LogReportSink;

impl LogReportSink {
    pub fn new() -> Self {
        Self
    }
}

impl ReportSink for LogReportSink {
    fn emit(&mut self, event: &ControlEvent) {
        match event {
            ControlEvent::Cycle(report) => {
                info!("SENS  | {}", report.sensors());
                let reason = report.decision.reason;
                match report.outcome {
                    SwitchOutcome::Switched { to, rule } => {
                        info!("PUMP  | -> {} ({}; {})", to, reason, rule);
                    }
                    SwitchOutcome::Rejected { requested } => {
                        warn!(
                            "PUMP  | {} wanted ({}) but rejected: too soon since last switch",
                            requested, reason
                        );
                    }
                    SwitchOutcome::Held => {
                        debug!("PUMP  | hold {} ({})", report.state.pump, reason);
                    }
                }
                info!("STAT  | {}", report.status());
            }
            ControlEvent::Started { pump, capabilities } => {
                info!(
                    "START | pump={} emergency_input={} verification={}",
                    pump, capabilities.emergency_input, capabilities.verification_cycle
                );
            }
            ControlEvent::EmergencyRaised => {
                error!("EMERG | raised, pump forced off");
            }
            ControlEvent::EmergencyCleared => {
                info!("EMERG | cleared");
            }
            ControlEvent::ActuatorFault { commanded, error } => {
                error!("FAULT | relay write for {} failed: {}", commanded, error);
            }
        }
    }
}
