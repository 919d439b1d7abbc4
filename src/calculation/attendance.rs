//! Attendance aggregation.
//!
//! This module counts present days, reconciles a month's attendance to a
//! target present-day count, and totals overtime. Attendance records have
//! upsert semantics: when two records share a date the later one wins.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{EngineError, EngineResult};
use crate::models::{AttendanceRecord, AttendanceWrite, OvertimeEntry, YearMonth};

/// The write set produced by [`reconcile_to_target`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendanceReconciliation {
    /// The month being reconciled.
    pub period: YearMonth,
    /// Present days before the writes are applied.
    pub present_before: u32,
    /// Present days after the writes are applied (the requested target).
    pub present_after: u32,
    /// Writes to apply, absences first, then presences in calendar order.
    pub writes: Vec<AttendanceWrite>,
}

impl AttendanceReconciliation {
    /// Returns true when the month is already at the target.
    pub fn is_noop(&self) -> bool {
        self.writes.is_empty()
    }
}

/// Overtime for an employee's month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OvertimeTotals {
    /// Sum of overtime hours.
    pub total_hours: Decimal,
    /// The entries, in date order.
    pub rows: Vec<OvertimeEntry>,
}

/// Collapses records to one presence flag per day, last write winning.
fn presence_by_day(records: &[AttendanceRecord]) -> BTreeMap<NaiveDate, bool> {
    records
        .iter()
        .map(|record| (record.date, record.present))
        .collect()
}

fn single_employee<'a>(
    ids: impl IntoIterator<Item = &'a str>,
    field: &str,
) -> EngineResult<Option<&'a str>> {
    let mut ids = ids.into_iter();
    let Some(first) = ids.next() else {
        return Ok(None);
    };
    if let Some(other) = ids.find(|id| *id != first) {
        return Err(EngineError::validation(
            field,
            format!("records mix employees '{}' and '{}'", first, other),
        ));
    }
    Ok(Some(first))
}

/// Counts the days marked present.
///
/// # Examples
///
/// ```
/// use factory_payroll::calculation::present_days;
/// use factory_payroll::models::AttendanceRecord;
/// use chrono::NaiveDate;
///
/// let record = |day, present| AttendanceRecord {
///     employee_id: "emp_1".to_string(),
///     date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
///     present,
///     note: None,
/// };
///
/// assert_eq!(present_days(&[record(1, true), record(2, false), record(3, true)]), 2);
/// ```
pub fn present_days(records: &[AttendanceRecord]) -> u32 {
    presence_by_day(records)
        .values()
        .filter(|present| **present)
        .count() as u32
}

/// Plans the writes that set a month to exactly `desired_present` present days.
///
/// The month is reset so that the first `desired_present` calendar days are
/// present and every other day is not. Which days were present before is not
/// preserved. Writes that would not change a record are left out, so running
/// the plan again on its own result yields no writes.
///
/// Records outside `period` are ignored.
///
/// # Errors
///
/// Returns a validation error when `desired_present` exceeds the days in the
/// month, or when the records belong to more than one employee.
pub fn reconcile_to_target(
    records: &[AttendanceRecord],
    desired_present: u32,
    period: YearMonth,
) -> EngineResult<AttendanceReconciliation> {
    let days_in_month = period.days_in_month();
    if desired_present > days_in_month {
        return Err(EngineError::validation(
            "desired_present_days",
            format!(
                "{} present days requested but {} has {} days",
                desired_present, period, days_in_month
            ),
        ));
    }

    let in_month: Vec<AttendanceRecord> = records
        .iter()
        .filter(|record| period.contains_date(record.date))
        .cloned()
        .collect();
    single_employee(in_month.iter().map(|r| r.employee_id.as_str()), "employee_id")?;

    let presence = presence_by_day(&in_month);
    let target_days: Vec<NaiveDate> = (1..=desired_present)
        .filter_map(|day| period.day(day))
        .collect();
    let cutoff = target_days.last().copied();
    let within_target = |date: NaiveDate| cutoff.is_some_and(|last| date <= last);

    let mut writes: Vec<AttendanceWrite> = presence
        .iter()
        .filter(|(date, present)| **present && !within_target(**date))
        .map(|(date, _)| AttendanceWrite::MarkAbsent(*date))
        .collect();

    writes.extend(
        target_days
            .iter()
            .filter(|date| presence.get(*date) != Some(&true))
            .map(|date| AttendanceWrite::MarkPresent(*date)),
    );

    let present_before = presence.values().filter(|present| **present).count() as u32;
    debug!(
        period = %period,
        present_before,
        desired_present,
        writes = writes.len(),
        "Planned attendance reconciliation"
    );

    Ok(AttendanceReconciliation {
        period,
        present_before,
        present_after: desired_present,
        writes,
    })
}

/// Applies attendance writes to a record set with upsert semantics.
///
/// Existing records keep their notes; records created by a write carry none.
pub fn apply_attendance_writes(
    employee_id: &str,
    records: &[AttendanceRecord],
    writes: &[AttendanceWrite],
) -> Vec<AttendanceRecord> {
    let mut by_day: BTreeMap<NaiveDate, AttendanceRecord> = records
        .iter()
        .map(|record| (record.date, record.clone()))
        .collect();

    for write in writes {
        let present = matches!(write, AttendanceWrite::MarkPresent(_));
        by_day
            .entry(write.date())
            .and_modify(|record| record.present = present)
            .or_insert_with(|| AttendanceRecord {
                employee_id: employee_id.to_string(),
                date: write.date(),
                present,
                note: None,
            });
    }

    by_day.into_values().collect()
}

/// Totals a month's overtime.
///
/// # Errors
///
/// Returns a validation error for negative hours or rates, or when the
/// entries belong to more than one employee.
pub fn overtime_totals(entries: &[OvertimeEntry]) -> EngineResult<OvertimeTotals> {
    single_employee(entries.iter().map(|e| e.employee_id.as_str()), "employee_id")?;

    for entry in entries {
        if entry.hours < Decimal::ZERO {
            return Err(EngineError::validation(
                "overtime.hours",
                format!("{} hours on {} must not be negative", entry.hours, entry.date),
            ));
        }
        if entry.rate.is_some_and(|rate| rate < Decimal::ZERO) {
            return Err(EngineError::validation(
                "overtime.rate",
                format!("overtime rate on {} must not be negative", entry.date),
            ));
        }
    }

    let mut rows = entries.to_vec();
    rows.sort_by_key(|entry| entry.date);
    let total_hours = rows.iter().map(|entry| entry.hours).sum();

    Ok(OvertimeTotals { total_hours, rows })
}

/// Checks the write-time rule that overtime may only be logged on a present day.
pub fn validate_overtime_entry(
    entry: &OvertimeEntry,
    attendance: &[AttendanceRecord],
) -> EngineResult<()> {
    let present = attendance
        .iter()
        .rev()
        .find(|record| record.employee_id == entry.employee_id && record.date == entry.date)
        .is_some_and(|record| record.present);

    if !present {
        return Err(EngineError::validation(
            "overtime.date",
            format!(
                "employee '{}' is not marked present on {}",
                entry.employee_id, entry.date
            ),
        ));
    }
    Ok(())
}
