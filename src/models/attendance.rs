//! Attendance and overtime records.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Whether an employee was present on a calendar day.
///
/// There is one logical record per (employee, date); writing a record for a
/// date that already has one overwrites it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceRecord {
    /// The employee the record belongs to.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Whether the employee was present.
    pub present: bool,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Overtime worked on a present day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeEntry {
    /// The employee the entry belongs to.
    pub employee_id: String,
    /// The calendar day.
    pub date: NaiveDate,
    /// Hours of overtime worked.
    pub hours: Decimal,
    /// Explicit hourly rate; when absent the roj rate / 8 applies.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate: Option<Decimal>,
}

/// A single write produced by attendance reconciliation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "action", content = "date", rename_all = "snake_case")]
pub enum AttendanceWrite {
    /// Set an existing present record to absent.
    MarkAbsent(NaiveDate),
    /// Create or overwrite the record for this day as present.
    MarkPresent(NaiveDate),
}

impl AttendanceWrite {
    /// The day the write targets.
    pub fn date(&self) -> NaiveDate {
        match self {
            AttendanceWrite::MarkAbsent(date) | AttendanceWrite::MarkPresent(date) => *date,
        }
    }
}
