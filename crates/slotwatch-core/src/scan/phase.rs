use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of the polling controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// Nothing running.
    #[default]
    Idle,
    /// A one-shot fetch started by an explicit user action is outstanding.
    ScanningInitial,
    /// Periodic alerting is on and waiting for the next tick.
    AlertingIdle,
    /// Periodic alerting is on and a scan request is outstanding.
    AlertingInFlight,
}

impl Phase {
    pub fn is_alerting(&self) -> bool {
        matches!(self, Phase::AlertingIdle | Phase::AlertingInFlight)
    }

    /// Whether an oracle call is outstanding.
    pub fn is_busy(&self) -> bool {
        matches!(self, Phase::ScanningInitial | Phase::AlertingInFlight)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Phase::Idle => "idle",
            Phase::ScanningInitial => "scanning",
            Phase::AlertingIdle => "alerting",
            Phase::AlertingInFlight => "alerting (scan in flight)",
        };
        f.write_str(label)
    }
}
