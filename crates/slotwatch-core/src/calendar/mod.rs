//! Calendar primitives: canonical date keys and target months.

mod date_key;
mod month;

pub use date_key::{DateKey, DateKeyError, parse_all};
pub use month::{MAX_YEAR, MIN_YEAR, TargetMonth};
