//! Rate history model.
//!
//! A [`RateHistory`] is the time-varying rate owned by a job type (piece
//! rate) or an employee (daily / roj rate). Entries are addressed by their
//! effective month rather than their position in the list.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::YearMonth;
use crate::calculation::resolve_rate;
use crate::error::{EngineError, EngineResult};

/// A rate that takes effect from a given month onwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateHistoryEntry {
    /// The rate in effect from the effective month.
    pub rate: Decimal,
    /// Year the rate takes effect.
    pub effective_from_year: i32,
    /// Month (1-12) the rate takes effect.
    pub effective_from_month: u32,
}

impl RateHistoryEntry {
    /// Creates a validated entry.
    pub fn new(rate: Decimal, effective_from: YearMonth) -> EngineResult<Self> {
        let entry = Self {
            rate,
            effective_from_year: effective_from.year(),
            effective_from_month: effective_from.month(),
        };
        entry.validate()?;
        Ok(entry)
    }

    /// The month this entry takes effect, if the stored fields are valid.
    pub fn effective_from(&self) -> EngineResult<YearMonth> {
        YearMonth::new(self.effective_from_year, self.effective_from_month)
    }

    fn validate(&self) -> EngineResult<YearMonth> {
        if self.rate < Decimal::ZERO {
            return Err(EngineError::validation(
                "rate",
                format!("rate {} must not be negative", self.rate),
            ));
        }
        self.effective_from()
    }
}

/// A base rate plus its dated revisions, kept sorted by effective month.
///
/// # Example
///
/// ```
/// use factory_payroll::models::{RateHistory, RateHistoryEntry, YearMonth};
/// use rust_decimal::Decimal;
///
/// let mut history = RateHistory::new(Decimal::new(500, 0));
/// history
///     .insert(RateHistoryEntry::new(Decimal::new(550, 0), YearMonth::new(2024, 4).unwrap()).unwrap())
///     .unwrap();
///
/// assert_eq!(history.rate_for(YearMonth::new(2024, 3).unwrap()), Decimal::new(500, 0));
/// assert_eq!(history.rate_for(YearMonth::new(2024, 4).unwrap()), Decimal::new(550, 0));
/// assert_eq!(history.current_rate(), Decimal::new(550, 0));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawRateHistory")]
pub struct RateHistory {
    base_rate: Decimal,
    entries: Vec<RateHistoryEntry>,
}

#[derive(Deserialize)]
struct RawRateHistory {
    base_rate: Decimal,
    #[serde(default)]
    entries: Vec<RateHistoryEntry>,
}

impl TryFrom<RawRateHistory> for RateHistory {
    type Error = EngineError;

    fn try_from(raw: RawRateHistory) -> EngineResult<Self> {
        RateHistory::with_entries(raw.base_rate, raw.entries)
    }
}

impl RateHistory {
    /// Creates an empty history with the given base rate.
    pub fn new(base_rate: Decimal) -> Self {
        Self {
            base_rate,
            entries: Vec::new(),
        }
    }

    /// Builds a history from unsorted entries, validating each one.
    pub fn with_entries(base_rate: Decimal, entries: Vec<RateHistoryEntry>) -> EngineResult<Self> {
        if base_rate < Decimal::ZERO {
            return Err(EngineError::validation(
                "base_rate",
                format!("base rate {} must not be negative", base_rate),
            ));
        }
        let mut history = Self::new(base_rate);
        for entry in entries {
            history.insert(entry)?;
        }
        Ok(history)
    }

    /// The rate used for months before the first entry.
    pub fn base_rate(&self) -> Decimal {
        self.base_rate
    }

    /// Entries in ascending effective order.
    pub fn entries(&self) -> &[RateHistoryEntry] {
        &self.entries
    }

    /// The latest entry's rate, or the base rate when there are none.
    pub fn current_rate(&self) -> Decimal {
        self.entries
            .last()
            .map(|entry| entry.rate)
            .unwrap_or(self.base_rate)
    }

    /// The rate in effect for the given month.
    pub fn rate_for(&self, period: YearMonth) -> Decimal {
        resolve_rate(&self.entries, self.base_rate, period)
    }

    /// Adds an entry, keeping the list sorted.
    ///
    /// Fails with [`EngineError::DuplicateRateEntry`] when the month already
    /// has an entry.
    pub fn insert(&mut self, entry: RateHistoryEntry) -> EngineResult<()> {
        let effective = entry.validate()?;
        match self.position(effective) {
            Ok(_) => Err(EngineError::DuplicateRateEntry {
                year: effective.year(),
                month: effective.month(),
            }),
            Err(index) => {
                self.entries.insert(index, entry);
                Ok(())
            }
        }
    }

    /// Replaces the entry effective `at` with `entry`.
    ///
    /// The replacement may move to a different month as long as that month is
    /// free.
    pub fn update(&mut self, at: YearMonth, entry: RateHistoryEntry) -> EngineResult<()> {
        let effective = entry.validate()?;
        let index = self.position(at).map_err(|_| EngineError::RateEntryNotFound {
            year: at.year(),
            month: at.month(),
        })?;

        if effective == at {
            self.entries[index] = entry;
            return Ok(());
        }
        if self.position(effective).is_ok() {
            return Err(EngineError::DuplicateRateEntry {
                year: effective.year(),
                month: effective.month(),
            });
        }
        self.entries.remove(index);
        self.insert(entry)
    }

    /// Removes and returns the entry effective `at`.
    pub fn remove(&mut self, at: YearMonth) -> EngineResult<RateHistoryEntry> {
        let index = self.position(at).map_err(|_| EngineError::RateEntryNotFound {
            year: at.year(),
            month: at.month(),
        })?;
        Ok(self.entries.remove(index))
    }

    fn position(&self, at: YearMonth) -> Result<usize, usize> {
        let key = at.key();
        self.entries.binary_search_by_key(&key, |entry| {
            i64::from(entry.effective_from_year) * 100 + i64::from(entry.effective_from_month)
        })
    }
}
