use super::outcome::ScanOutcome;
use super::phase::Phase;
use crate::calendar::TargetMonth;
use crate::query::AppointmentQuery;

/// Turns controller state into the one-line status shown to the user.
///
/// Output never carries error detail; failures collapse to a generic line.
pub struct StatusNarrator;

impl StatusNarrator {
    pub fn narrate(
        phase: Phase,
        outcome: &ScanOutcome,
        query: &AppointmentQuery,
        month: TargetMonth,
    ) -> String {
        if phase == Phase::ScanningInitial {
            return format!("Searching for appointments in {}...", query.consulate);
        }

        match outcome {
            ScanOutcome::NotStarted => {
                "Select a location and run a search to begin.".to_string()
            }
            ScanOutcome::Found { count: 1 } => {
                format!("Found 1 available date for {}.", month.name())
            }
            ScanOutcome::Found { count } => {
                format!("Found {} available dates for {}.", count, month.name())
            }
            ScanOutcome::NoResults => format!(
                "No appointments found for {}. Try another month.",
                month.name()
            ),
            ScanOutcome::Failed => "An error occurred. Please try again.".to_string(),
            ScanOutcome::AlertingStarted => format!(
                "Real-time alerts enabled for {}. Scanning for new appointments...",
                query.consulate
            ),
            ScanOutcome::AlertingStopped => "Real-time alerts disabled.".to_string(),
            ScanOutcome::NewDates { dates } => {
                let joined = dates
                    .iter()
                    .map(|d| d.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                format!("🎉 New appointment found on {}!", joined)
            }
        }
    }
}
