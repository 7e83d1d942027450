use super::date_key::DateKey;
use crate::error::{Result, SlotwatchError};
use chrono::{Datelike, Local, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Years a [`TargetMonth`] may take; the same four-digit range as [`DateKey`].
pub const MIN_YEAR: i32 = 0;
pub const MAX_YEAR: i32 = 9999;

/// The month a scan targets.
///
/// `month` is 1-indexed, matching the oracle request contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawMonth")]
pub struct TargetMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawMonth> for TargetMonth {
    type Error = SlotwatchError;

    fn try_from(raw: RawMonth) -> Result<Self> {
        Self::new(raw.year, raw.month)
    }
}

impl TargetMonth {
    pub fn new(year: i32, month: u32) -> Result<Self> {
        if !(1..=12).contains(&month) {
            return Err(SlotwatchError::invalid_input(format!(
                "month must be between 1 and 12, got {month}"
            )));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(SlotwatchError::invalid_input(format!(
                "year {year} is out of range"
            )));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`, clamped to the supported years.
    pub fn containing(date: NaiveDate) -> Self {
        match date.year() {
            year if year > MAX_YEAR => Self {
                year: MAX_YEAR,
                month: 12,
            },
            year if year < MIN_YEAR => Self {
                year: MIN_YEAR,
                month: 1,
            },
            year => Self {
                year,
                month: date.month(),
            },
        }
    }

    /// The month containing today's local date.
    pub fn current() -> Self {
        Self::containing(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// The following month. December of [`MAX_YEAR`] stays where it is.
    pub fn next(&self) -> Self {
        if self.month == 12 {
            if self.year >= MAX_YEAR {
                return *self;
            }
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// The preceding month. January of [`MIN_YEAR`] stays where it is.
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            if self.year <= MIN_YEAR {
                return *self;
            }
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Full English month name, e.g. "March".
    pub fn name(&self) -> String {
        self.first_day().format("%B").to_string()
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or_default()
    }

    pub fn days_in_month(&self) -> u32 {
        (28..=31)
            .rev()
            .find(|day| NaiveDate::from_ymd_opt(self.year, self.month, *day).is_some())
            .unwrap_or(28)
    }

    pub fn first_weekday(&self) -> Weekday {
        self.first_day().weekday()
    }

    /// The key for `day` of this month, if that day exists.
    pub fn date(&self, day: u32) -> Option<DateKey> {
        NaiveDate::from_ymd_opt(self.year, self.month, day).map(DateKey::from_date)
    }

    /// Every day of the month in order.
    pub fn dates(&self) -> Vec<DateKey> {
        (1..=self.days_in_month())
            .filter_map(|day| self.date(day))
            .collect()
    }

    pub fn contains(&self, key: &DateKey) -> bool {
        let date = key.to_date();
        date.year() == self.year && date.month() == self.month
    }
}

impl Default for TargetMonth {
    fn default() -> Self {
        Self::current()
    }
}

impl fmt::Display for TargetMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name(), self.year)
    }
}

/// Parses `YYYY-MM`.
impl FromStr for TargetMonth {
    type Err = SlotwatchError;

    fn from_str(s: &str) -> Result<Self> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| SlotwatchError::invalid_input(format!("expected YYYY-MM, got '{s}'")))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| SlotwatchError::invalid_input(format!("invalid year in '{s}'")))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| SlotwatchError::invalid_input(format!("invalid month in '{s}'")))?;
        Self::new(year, month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range_month() {
        assert!(TargetMonth::new(2024, 0).is_err());
        assert!(TargetMonth::new(2024, 13).is_err());
        assert!(TargetMonth::new(2024, 12).is_ok());
    }

    #[test]
    fn test_navigation_rolls_over_years() {
        let dec = TargetMonth::new(2024, 12).unwrap();
        assert_eq!(dec.next(), TargetMonth::new(2025, 1).unwrap());
        let jan = TargetMonth::new(2025, 1).unwrap();
        assert_eq!(jan.prev(), dec);
    }

    #[test]
    fn test_new_rejects_years_outside_four_digits() {
        assert!(TargetMonth::new(-1, 6).is_err());
        assert!(TargetMonth::new(10_000, 1).is_err());
        assert!("+10000-01".parse::<TargetMonth>().is_err());
        assert!(TargetMonth::new(MIN_YEAR, 1).is_ok());
        assert!(TargetMonth::new(MAX_YEAR, 12).is_ok());
    }

    #[test]
    fn test_deserialize_validates() {
        let month: TargetMonth = serde_json::from_str(r#"{"year":2024,"month":3}"#).unwrap();
        assert_eq!(month, TargetMonth::new(2024, 3).unwrap());
        assert!(serde_json::from_str::<TargetMonth>(r#"{"year":10000,"month":1}"#).is_err());
        assert!(serde_json::from_str::<TargetMonth>(r#"{"year":2024,"month":13}"#).is_err());
    }

    #[test]
    fn test_navigation_stops_at_year_bounds() {
        let last = TargetMonth::new(MAX_YEAR, 12).unwrap();
        assert_eq!(last.next(), last);
        assert_eq!(last.days_in_month(), 31);
        assert_eq!(last.dates().last().unwrap().as_str(), "9999-12-31");

        let first = TargetMonth::new(MIN_YEAR, 1).unwrap();
        assert_eq!(first.prev(), first);
        assert_eq!(first.days_in_month(), 31);
        assert_eq!(first.first_day(), NaiveDate::from_ymd_opt(0, 1, 1).unwrap());

        let far = NaiveDate::from_ymd_opt(12_345, 6, 1).unwrap();
        assert_eq!(TargetMonth::containing(far), last);
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(TargetMonth::new(2024, 2).unwrap().days_in_month(), 29);
        assert_eq!(TargetMonth::new(2023, 2).unwrap().days_in_month(), 28);
        assert_eq!(TargetMonth::new(2024, 4).unwrap().days_in_month(), 30);
        assert_eq!(TargetMonth::new(2024, 12).unwrap().days_in_month(), 31);
    }

    #[test]
    fn test_name_and_display() {
        let march = TargetMonth::new(2024, 3).unwrap();
        assert_eq!(march.name(), "March");
        assert_eq!(march.to_string(), "March 2024");
    }

    #[test]
    fn test_first_weekday() {
        // 1 March 2024 was a Friday
        assert_eq!(TargetMonth::new(2024, 3).unwrap().first_weekday(), Weekday::Fri);
    }

    #[test]
    fn test_contains_and_dates() {
        let march = TargetMonth::new(2024, 3).unwrap();
        assert!(march.contains(&DateKey::parse("2024-03-31").unwrap()));
        assert!(!march.contains(&DateKey::parse("2024-04-01").unwrap()));
        assert!(!march.contains(&DateKey::parse("2023-03-15").unwrap()));
        let dates = march.dates();
        assert_eq!(dates.len(), 31);
        assert_eq!(dates[0].as_str(), "2024-03-01");
        assert_eq!(march.date(32), None);
    }

    #[test]
    fn test_from_str() {
        let month: TargetMonth = "2025-7".parse().unwrap();
        assert_eq!((month.year(), month.month()), (2025, 7));
        assert!("2025/07".parse::<TargetMonth>().is_err());
        assert!("2025-13".parse::<TargetMonth>().is_err());
    }
}
