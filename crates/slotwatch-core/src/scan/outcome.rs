use crate::calendar::DateKey;
use serde::{Deserialize, Serialize};

/// Which path issued an oracle call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanKind {
    /// Explicit one-shot fetch; replaces the set wholesale.
    Initial,
    /// Periodic alerting scan; merges into the set.
    Alert,
}

/// Most recent user-visible result, used to derive the status line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ScanOutcome {
    /// No search has run for the current query and month.
    #[default]
    NotStarted,
    /// A one-shot fetch returned dates.
    Found { count: usize },
    /// A one-shot fetch returned nothing.
    NoResults,
    /// A one-shot fetch failed.
    Failed,
    AlertingStarted,
    AlertingStopped,
    /// An alerting scan discovered dates that were not known before.
    NewDates { dates: Vec<DateKey> },
}

impl ScanOutcome {
    /// Outcome of a completed one-shot fetch with `count` dates.
    pub fn from_initial_count(count: usize) -> Self {
        if count == 0 {
            Self::NoResults
        } else {
            Self::Found { count }
        }
    }

    pub fn is_new_dates(&self) -> bool {
        matches!(self, Self::NewDates { .. })
    }
}
