use serde::Serialize;
use slotwatch_core::{AppointmentQuery, DateKey, ScanKind, ScanOutcome, TargetMonth};

/// Notifications published by the [`PollingController`](super::PollingController).
///
/// Front-ends redraw on these instead of polling snapshots.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ControllerEvent {
    ScanStarted {
        kind: ScanKind,
    },
    /// A scan completed and was applied. `outcome` is the status as it stands
    /// afterwards; an alert scan that found nothing new leaves it unchanged.
    ScanFinished {
        kind: ScanKind,
        outcome: ScanOutcome,
    },
    NewDatesFound {
        dates: Vec<DateKey>,
    },
    HighlightsExpired {
        dates: Vec<DateKey>,
    },
    AlertingEnabled {
        query: AppointmentQuery,
        month: TargetMonth,
    },
    AlertingDisabled,
    ContextChanged {
        query: AppointmentQuery,
        month: TargetMonth,
    },
}
