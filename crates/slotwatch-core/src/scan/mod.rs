//! Scan lifecycle vocabulary shared by the controller and front-ends.
//!
//! # Module Structure
//!
//! - `phase`: controller state machine phases (`Phase`)
//! - `outcome`: last user-visible result (`ScanOutcome`, `ScanKind`)
//! - `narrator`: status line derivation (`StatusNarrator`)

mod narrator;
mod outcome;
mod phase;

pub use narrator::StatusNarrator;
pub use outcome::{ScanKind, ScanOutcome};
pub use phase::Phase;
