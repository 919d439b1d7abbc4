//! Calendar month model.
//!
//! This module contains the [`YearMonth`] type. Payroll is computed one
//! calendar month at a time, and every rate history, upad, loan start and
//! loan transaction is keyed by a (year, month) pair.

use std::fmt;

use chrono::{Datelike, Months, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// A calendar month, ordered chronologically.
///
/// # Example
///
/// ```
/// use factory_payroll::models::YearMonth;
/// use chrono::NaiveDate;
///
/// let period = YearMonth::new(2024, 2).unwrap();
/// assert_eq!(period.days_in_month(), 29);
/// assert_eq!(period.key(), 202402);
/// assert!(period.contains_date(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()));
/// assert!(YearMonth::new(2024, 13).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawYearMonth")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

#[derive(Deserialize)]
struct RawYearMonth {
    year: i32,
    month: u32,
}

impl TryFrom<RawYearMonth> for YearMonth {
    type Error = EngineError;

    fn try_from(raw: RawYearMonth) -> EngineResult<Self> {
        YearMonth::new(raw.year, raw.month)
    }
}

impl YearMonth {
    /// Creates a month, rejecting months outside 1-12.
    pub fn new(year: i32, month: u32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::validation(
                "month",
                format!("{} is not a calendar month (expected 1-12)", month),
            ));
        }
        // the following month must exist too, for month lengths
        let representable = NaiveDate::from_ymd_opt(year, month, 1)
            .and_then(|first| first.checked_add_months(Months::new(1)))
            .is_some();
        if !representable {
            return Err(EngineError::validation(
                "year",
                format!("{} is outside the supported calendar range", year),
            ));
        }
        Ok(Self { year, month })
    }

    /// Returns the month containing the given date.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The calendar month, 1-12.
    pub fn month(&self) -> u32 {
        self.month
    }

    /// Comparison key `year * 100 + month`.
    pub fn key(&self) -> i64 {
        i64::from(self.year) * 100 + i64::from(self.month)
    }

    /// The first day of the month.
    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .expect("YearMonth is validated on construction")
    }

    /// Returns the date of the given day of this month, if it exists.
    pub fn day(&self, day: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, day)
    }

    /// Number of days in the month, leap years included.
    pub fn days_in_month(&self) -> u32 {
        let days = self
            .next()
            .first_day()
            .signed_duration_since(self.first_day())
            .num_days();
        days as u32
    }

    /// The following month.
    pub fn next(&self) -> Self {
        if self.month == 12 {
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

    /// Checks whether the date falls in this month.
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Iterates every month from `self` through `end`, both inclusive.
    ///
    /// Yields nothing when `end` precedes `self`.
    ///
    /// ```
    /// use factory_payroll::models::YearMonth;
    ///
    /// let start = YearMonth::new(2023, 11).unwrap();
    /// let end = YearMonth::new(2024, 2).unwrap();
    /// let months: Vec<String> = start.through(end).map(|m| m.to_string()).collect();
    /// assert_eq!(months, vec!["2023-11", "2023-12", "2024-01", "2024-02"]);
    /// ```
    pub fn through(self, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        let mut current = Some(self);
        std::iter::from_fn(move || {
            let month = current.filter(|m| *m <= end)?;
            current = Some(month.next());
            Some(month)
        })
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.year, self.month)
    }
}
