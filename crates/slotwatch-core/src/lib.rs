//! Domain layer of Slotwatch.
//!
//! Holds the data structures the polling controller reconciles oracle results
//! into ([`AvailabilitySet`], [`HighlightScheduler`]), the oracle seam
//! ([`oracle::DateOracle`]), and the vocabulary shared with front-ends.

pub mod availability;
pub mod calendar;
pub mod config;
pub mod error;
pub mod highlight;
pub mod oracle;
pub mod query;
pub mod scan;
pub mod secret;

// Re-export common types
pub use availability::AvailabilitySet;
pub use calendar::{DateKey, TargetMonth};
pub use error::{Result, SlotwatchError};
pub use highlight::{DEFAULT_HIGHLIGHT_TTL, HighlightScheduler};
pub use oracle::{DateOracle, OracleError};
pub use query::AppointmentQuery;
pub use scan::{Phase, ScanKind, ScanOutcome, StatusNarrator};
