use serde::Serialize;
use slotwatch_core::{AppointmentQuery, DateKey, Phase, ScanOutcome, TargetMonth};
use std::collections::BTreeSet;

/// Read-only view of the controller for rendering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ControllerSnapshot {
    pub query: AppointmentQuery,
    pub month: TargetMonth,
    /// Sorted ascending.
    pub available_dates: Vec<DateKey>,
    /// Dates still inside their highlight window.
    pub highlighted: BTreeSet<DateKey>,
    pub phase: Phase,
    pub outcome: ScanOutcome,
    pub status_text: String,
}

impl ControllerSnapshot {
    pub fn is_available(&self, date: &DateKey) -> bool {
        self.available_dates.binary_search(date).is_ok()
    }

    pub fn is_highlighted(&self, date: &DateKey) -> bool {
        self.highlighted.contains(date)
    }
}
