//! Transient "just discovered" markers with per-date expiry.

use crate::calendar::DateKey;
use std::collections::{BTreeSet, HashMap};
use std::time::Duration;
use tokio::time::Instant;

/// How long a newly discovered date stays highlighted.
pub const DEFAULT_HIGHLIGHT_TTL: Duration = Duration::from_millis(5000);

/// Tracks highlighted dates, each with its own expiry.
///
/// Overlapping highlight windows from different batches compose: a date
/// added again keeps only its latest expiry, and every other date expires on
/// its own schedule. Reads never report an entry at or past its expiry, even
/// if [`tick`](Self::tick) has not run yet.
///
/// The `*_at` variants take the current instant explicitly. The plain
/// variants read `tokio::time::Instant::now()`, which follows the paused
/// clock in tests.
#[derive(Debug, Clone, Default)]
pub struct HighlightScheduler {
    entries: HashMap<DateKey, Instant>,
}

impl HighlightScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<'a, I>(&mut self, dates: I, ttl: Duration)
    where
        I: IntoIterator<Item = &'a DateKey>,
    {
        self.add_at(dates, ttl, Instant::now());
    }

    /// Highlights each date until `now + ttl`, replacing any earlier expiry.
    pub fn add_at<'a, I>(&mut self, dates: I, ttl: Duration, now: Instant)
    where
        I: IntoIterator<Item = &'a DateKey>,
    {
        let expires_at = now + ttl;
        for date in dates {
            self.entries.insert(date.clone(), expires_at);
        }
    }

    pub fn is_highlighted(&self, date: &DateKey) -> bool {
        self.is_highlighted_at(date, Instant::now())
    }

    pub fn is_highlighted_at(&self, date: &DateKey, now: Instant) -> bool {
        self.entries
            .get(date)
            .is_some_and(|expires_at| *expires_at > now)
    }

    /// Unexpired dates at `now`, sorted.
    pub fn highlighted_at(&self, now: Instant) -> BTreeSet<DateKey> {
        self.entries
            .iter()
            .filter(|(_, expires_at)| **expires_at > now)
            .map(|(date, _)| date.clone())
            .collect()
    }

    /// Drops every entry whose expiry is at or before `now` and returns the
    /// dropped dates, sorted.
    pub fn tick(&mut self, now: Instant) -> Vec<DateKey> {
        let mut expired: Vec<DateKey> = self
            .entries
            .iter()
            .filter(|(_, expires_at)| **expires_at <= now)
            .map(|(date, _)| date.clone())
            .collect();
        for date in &expired {
            self.entries.remove(date);
        }
        expired.sort();
        expired
    }

    /// Earliest pending expiry, if any.
    pub fn next_expiry(&self) -> Option<Instant> {
        self.entries.values().min().copied()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
