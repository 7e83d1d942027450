//! Appointment query model and the location catalog it is built from.

pub mod catalog;
mod model;

pub use catalog::{Consulate, Country};
pub use model::AppointmentQuery;
