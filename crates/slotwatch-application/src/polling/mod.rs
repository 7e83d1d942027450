//! Polling session control.
//!
//! [`PollingController`] owns the availability set and highlight schedule and
//! drives one-shot and periodic scans against a [`DateOracle`](slotwatch_core::DateOracle).

mod controller;
mod events;
mod snapshot;

pub use controller::{ControllerSettings, PollingController};
pub use events::ControllerEvent;
pub use snapshot::ControllerSnapshot;
