//! Application layer for Slotwatch.
//!
//! Coordinates the domain types of `slotwatch-core` with an oracle
//! implementation to run availability scans and alerting sessions.

pub mod bootstrap;
pub mod polling;

pub use bootstrap::{AppContext, InitReport, init_config_files};
pub use polling::{ControllerEvent, ControllerSettings, ControllerSnapshot, PollingController};
