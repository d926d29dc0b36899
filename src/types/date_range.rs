//! Inclusive calendar date ranges used for every source request.

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The date format both upstream APIs accept and return.
pub(crate) const API_DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar dates, `start <= end`.
///
/// # Examples
///
/// ```
/// use trendwx::DateRange;
/// use chrono::NaiveDate;
///
/// let june = DateRange::new(
///     NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
///     NaiveDate::from_ymd_opt(2024, 6, 30).unwrap(),
/// )
/// .unwrap();
/// assert_eq!(june.num_days(), 30);
///
/// // Inverted ranges are rejected.
/// assert!(DateRange::new(june.end, june.start).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Creates a range, or `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// January 1st through December 31st of `year`.
    pub fn year(year: i32) -> Option<Self> {
        Self::new(
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year, 12, 31)?,
        )
    }

    /// The `days` days ending at (and including) `end`.
    ///
    /// `last_days(today, 31)` covers the same window as "today minus 30 days to today".
    pub fn last_days(end: NaiveDate, days: u32) -> Option<Self> {
        let span = i64::from(days.checked_sub(1)?);
        Self::new(end.checked_sub_signed(Duration::days(span))?, end)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days in the range, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn start_param(&self) -> String {
        self.start.format(API_DATE_FORMAT).to_string()
    }

    pub fn end_param(&self) -> String {
        self.end.format(API_DATE_FORMAT).to_string()
    }

    /// True when the range lies within a single calendar year.
    pub fn is_single_year(&self) -> bool {
        self.start.year() == self.end.year()
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..={}", self.start_param(), self.end_param())
    }
}
