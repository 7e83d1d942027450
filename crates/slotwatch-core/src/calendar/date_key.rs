use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

const ISO_FORMAT: &str = "%Y-%m-%d";

/// A date string that could not be read as a calendar date.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid calendar date '{input}', expected YYYY-MM-DD")]
pub struct DateKeyError {
    pub input: String,
}

/// A calendar date in canonical `YYYY-MM-DD` form.
///
/// Equality and ordering are plain string comparisons, which for the
/// canonical form coincide with chronological order. Construction always goes
/// through [`DateKey::parse`] or [`DateKey::from_date`], so two keys for the
/// same day are always equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateKey(String);

impl DateKey {
    /// Parses and normalizes a date string.
    ///
    /// Surrounding whitespace is ignored and single-digit months/days are
    /// zero-padded (`2024-3-7` becomes `2024-03-07`). The year must be
    /// exactly four digits.
    pub fn parse(input: &str) -> Result<Self, DateKeyError> {
        let trimmed = input.trim();
        let invalid = || DateKeyError {
            input: input.to_string(),
        };

        if !has_four_digit_year(trimmed) {
            return Err(invalid());
        }
        NaiveDate::parse_from_str(trimmed, ISO_FORMAT)
            .map(Self::from_date)
            .map_err(|_| invalid())
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self(date.format(ISO_FORMAT).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_date(&self) -> NaiveDate {
        // Every DateKey was produced from a NaiveDate, so this parse cannot fail.
        NaiveDate::parse_from_str(&self.0, ISO_FORMAT).unwrap_or_default()
    }
}

// chrono's `%Y` also takes signed, short and five-digit years.
fn has_four_digit_year(input: &str) -> bool {
    let bytes = input.as_bytes();
    bytes.len() > 4 && bytes[..4].iter().all(u8::is_ascii_digit) && bytes[4] == b'-'
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl TryFrom<&str> for DateKey {
    type Error = DateKeyError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<DateKey> for String {
    fn from(key: DateKey) -> Self {
        key.0
    }
}

impl From<NaiveDate> for DateKey {
    fn from(date: NaiveDate) -> Self {
        Self::from_date(date)
    }
}

/// Parses every string, failing on the first malformed entry.
pub fn parse_all<I, S>(inputs: I) -> Result<Vec<DateKey>, DateKeyError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    inputs
        .into_iter()
        .map(|s| DateKey::parse(s.as_ref()))
        .collect()
}
