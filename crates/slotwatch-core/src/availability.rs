//! The set of dates known to be available for the active query and month.

use crate::calendar::DateKey;
use std::collections::BTreeSet;

/// Everything observed available so far in the current session.
///
/// Grows through [`merge`](Self::merge) and only shrinks through
/// [`reset`](Self::reset) or [`populate`](Self::populate).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AvailabilitySet {
    dates: BTreeSet<DateKey>,
}

impl AvailabilitySet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts every date not already present and returns the ones that were
    /// newly inserted, in input order without duplicates.
    ///
    /// Merging the same batch twice yields no additions the second time.
    pub fn merge<I>(&mut self, batch: I) -> Vec<DateKey>
    where
        I: IntoIterator<Item = DateKey>,
    {
        batch
            .into_iter()
            .filter(|date| self.dates.insert(date.clone()))
            .collect()
    }

    /// Replaces the contents wholesale. Used for the initial fetch, which is
    /// not a novelty event.
    pub fn populate<I>(&mut self, batch: I)
    where
        I: IntoIterator<Item = DateKey>,
    {
        self.dates.clear();
        self.dates.extend(batch);
    }

    pub fn reset(&mut self) {
        self.dates.clear();
    }

    /// All members in ascending (chronological) order.
    pub fn snapshot(&self) -> Vec<DateKey> {
        self.dates.iter().cloned().collect()
    }

    pub fn contains(&self, date: &DateKey) -> bool {
        self.dates.contains(date)
    }

    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }
}
