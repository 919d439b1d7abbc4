//! Piece-rate earnings aggregation.
//!
//! Turns a month of work logs into per-line amounts, per-day totals, per-job
//! columns and a month total. Rates come from a [`JobRateSource`], resolved
//! for the month each log was recorded in.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{PartType, WorkLogEntry, YearMonth};

/// Supplies the piece rate for a job in a given month.
///
/// Implemented by the configured job catalog and by any closure with the
/// matching signature.
pub trait JobRateSource {
    /// Returns the rate per OK part for the job in `period`.
    fn job_rate(&self, part_type: PartType, job_name: &str, period: YearMonth)
    -> EngineResult<Decimal>;
}

impl<F> JobRateSource for F
where
    F: Fn(PartType, &str, YearMonth) -> EngineResult<Decimal>,
{
    fn job_rate(
        &self,
        part_type: PartType,
        job_name: &str,
        period: YearMonth,
    ) -> EngineResult<Decimal> {
        self(part_type, job_name, period)
    }
}

/// One priced work log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogLine {
    /// The work log this line prices.
    pub log_id: String,
    /// The part family.
    pub part_type: PartType,
    /// The job name.
    pub job_name: String,
    /// Parts produced.
    pub quantity: u32,
    /// Parts rejected.
    pub rejection: u32,
    /// Parts paid for.
    pub ok_parts: u32,
    /// Rate per OK part.
    pub rate: Decimal,
    /// `ok_parts * rate`.
    pub amount: Decimal,
}

/// All priced lines for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyWorkLog {
    /// The calendar day.
    pub date: NaiveDate,
    /// Lines in the order they were logged.
    pub lines: Vec<WorkLogLine>,
    /// Sum of the line amounts.
    pub day_total: Decimal,
}

/// Month totals for one (job name, part type) report column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobColumn {
    /// The part family.
    pub part_type: PartType,
    /// The job name.
    pub job_name: String,
    /// OK parts across the month.
    pub ok_parts: u64,
    /// Amount across the month.
    pub amount: Decimal,
}

/// Piece-rate earnings for an employee's month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEarnings {
    /// Days with logged work, in calendar order.
    pub daily_logs: Vec<DailyWorkLog>,
    /// Per-job totals, ordered by job name then part type.
    pub job_columns: Vec<JobColumn>,
    /// Sum of the day totals.
    pub month_total: Decimal,
}

fn price_line<R: JobRateSource + ?Sized>(
    log: &WorkLogEntry,
    rates: &R,
) -> EngineResult<WorkLogLine> {
    let ok_parts = log.ok_parts()?;
    let rate = rates.job_rate(log.part_type, &log.job_name, YearMonth::from_date(log.date))?;
    if rate < Decimal::ZERO {
        return Err(EngineError::validation(
            "rate",
            format!(
                "{} / {} resolved to negative rate {}",
                log.part_type, log.job_name, rate
            ),
        ));
    }

    Ok(WorkLogLine {
        log_id: log.id.clone(),
        part_type: log.part_type,
        job_name: log.job_name.clone(),
        quantity: log.quantity,
        rejection: log.rejection,
        ok_parts,
        rate,
        amount: Decimal::from(ok_parts) * rate,
    })
}

/// Prices a month of work logs.
///
/// A rate of zero is valid and prices the line at zero. Two jobs with the same
/// name under different part types stay in separate columns.
///
/// # Errors
///
/// - A log rejects more parts than it produced (`Validation`)
/// - Logs belong to more than one employee (`Validation`)
/// - The rate source cannot price a job (propagated, e.g. `JobTypeNotFound`)
///
/// # Examples
///
/// ```
/// use factory_payroll::calculation::compute_daily_and_month_totals;
/// use factory_payroll::error::EngineResult;
/// use factory_payroll::models::{PartType, WorkLogEntry, YearMonth};
/// use chrono::NaiveDate;
/// use rust_decimal::Decimal;
///
/// let logs = vec![WorkLogEntry {
///     id: "wl_1".to_string(),
///     employee_id: "emp_1".to_string(),
///     part_type: PartType::Sleeve,
///     job_name: "boring".to_string(),
///     quantity: 100,
///     rejection: 4,
///     date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
///     size: None,
/// }];
/// let rates = |_: PartType, _: &str, _: YearMonth| -> EngineResult<Decimal> { Ok(Decimal::new(25, 1)) };
///
/// let earnings = compute_daily_and_month_totals(&logs, &rates).unwrap();
/// assert_eq!(earnings.month_total, Decimal::new(240, 0));
/// ```
pub fn compute_daily_and_month_totals<R: JobRateSource + ?Sized>(
    logs: &[WorkLogEntry],
    rates: &R,
) -> EngineResult<WorkLogEarnings> {
    if let Some(first) = logs.first() {
        if let Some(other) = logs.iter().find(|log| log.employee_id != first.employee_id) {
            return Err(EngineError::validation(
                "employee_id",
                format!(
                    "work logs mix employees '{}' and '{}'",
                    first.employee_id, other.employee_id
                ),
            ));
        }
    }

    let mut by_day: BTreeMap<NaiveDate, Vec<WorkLogLine>> = BTreeMap::new();
    let mut columns: BTreeMap<(String, PartType), (u64, Decimal)> = BTreeMap::new();

    for log in logs {
        let line = price_line(log, rates)?;
        let column = columns
            .entry((line.job_name.clone(), line.part_type))
            .or_insert((0, Decimal::ZERO));
        column.0 += u64::from(line.ok_parts);
        column.1 += line.amount;
        by_day.entry(log.date).or_default().push(line);
    }

    let daily_logs: Vec<DailyWorkLog> = by_day
        .into_iter()
        .map(|(date, lines)| {
            let day_total = lines.iter().map(|line| line.amount).sum();
            DailyWorkLog {
                date,
                lines,
                day_total,
            }
        })
        .collect();

    let month_total = daily_logs.iter().map(|day| day.day_total).sum();

    let job_columns = columns
        .into_iter()
        .map(|((job_name, part_type), (ok_parts, amount))| JobColumn {
            part_type,
            job_name,
            ok_parts,
            amount,
        })
        .collect();

    Ok(WorkLogEarnings {
        daily_logs,
        job_columns,
        month_total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn log(id: &str, part_type: PartType, job: &str, day: u32, qty: u32, rej: u32) -> WorkLogEntry {
        WorkLogEntry {
            id: id.to_string(),
            employee_id: "emp_001".to_string(),
            part_type,
            job_name: job.to_string(),
            quantity: qty,
            rejection: rej,
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            size: None,
        }
    }

    fn flat_rates(
        part_type: PartType,
        job_name: &str,
        _period: YearMonth,
    ) -> EngineResult<Decimal> {
        match (part_type, job_name) {
            (PartType::Sleeve, "cutting") => Ok(dec("1.50")),
            (PartType::Rod, "cutting") => Ok(dec("2.00")),
            (PartType::Pin, "polish") => Ok(Decimal::ZERO),
            _ => Err(EngineError::JobTypeNotFound {
                part_type: part_type.to_string(),
                job_name: job_name.to_string(),
            }),
        }
    }

    #[test]
    fn test_line_amount_uses_ok_parts() {
        let logs = vec![log("a", PartType::Sleeve, "cutting", 1, 100, 10)];

        let earnings = compute_daily_and_month_totals(&logs, &flat_rates).unwrap();

        let line = &earnings.daily_logs[0].lines[0];
        assert_eq!(line.ok_parts, 90);
        assert_eq!(line.rate, dec("1.50"));
        assert_eq!(line.amount, dec("135.00"));
    }

    #[test]
    fn test_day_and_month_totals() {
        let logs = vec![
            log("a", PartType::Sleeve, "cutting", 2, 100, 0),
            log("b", PartType::Rod, "cutting", 1, 10, 0),
            log("c", PartType::Sleeve, "cutting", 2, 20, 0),
        ];

        let earnings = compute_daily_and_month_totals(&logs, &flat_rates).unwrap();

        assert_eq!(earnings.daily_logs.len(), 2);
        assert_eq!(earnings.daily_logs[0].date.to_string(), "2024-03-01");
        assert_eq!(earnings.daily_logs[0].day_total, dec("20.00"));
        assert_eq!(earnings.daily_logs[1].day_total, dec("180.00"));
        assert_eq!(earnings.month_total, dec("200.00"));
    }

    #[test]
    fn test_same_job_name_different_part_type_stays_separate() {
        let logs = vec![
            log("a", PartType::Sleeve, "cutting", 1, 10, 0),
            log("b", PartType::Rod, "cutting", 1, 10, 0),
        ];

        let earnings = compute_daily_and_month_totals(&logs, &flat_rates).unwrap();

        assert_eq!(earnings.job_columns.len(), 2);
        let rod = earnings
            .job_columns
            .iter()
            .find(|c| c.part_type == PartType::Rod)
            .unwrap();
        assert_eq!(rod.amount, dec("20.00"));
    }

    #[test]
    fn test_zero_rate_job_yields_zero_amount() {
        let logs = vec![log("a", PartType::Pin, "polish", 1, 500, 0)];

        let earnings = compute_daily_and_month_totals(&logs, &flat_rates).unwrap();

        assert_eq!(earnings.month_total, Decimal::ZERO);
        assert_eq!(earnings.job_columns[0].ok_parts, 500);
    }

    #[test]
    fn test_rate_resolved_per_log_month() {
        let rates = |_: PartType, _: &str, period: YearMonth| -> EngineResult<Decimal> {
            if period >= YearMonth::new(2024, 3)? {
                Ok(dec("2"))
            } else {
                Ok(dec("1"))
            }
        };
        let mut february = log("a", PartType::Rod, "cutting", 1, 10, 0);
        february.date = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let logs = vec![february, log("b", PartType::Rod, "cutting", 1, 10, 0)];

        let earnings = compute_daily_and_month_totals(&logs, &rates).unwrap();

        assert_eq!(earnings.month_total, dec("30"));
    }

    #[test]
    fn test_rejection_above_quantity_fails() {
        let logs = vec![log("a", PartType::Sleeve, "cutting", 1, 5, 6)];
        let result = compute_daily_and_month_totals(&logs, &flat_rates);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_unknown_job_propagates_not_found() {
        let logs = vec![log("a", PartType::Pin, "threading", 1, 5, 0)];
        let result = compute_daily_and_month_totals(&logs, &flat_rates);
        assert!(matches!(result, Err(EngineError::JobTypeNotFound { .. })));
    }

    #[test]
    fn test_mixed_employees_rejected() {
        let mut stranger = log("b", PartType::Sleeve, "cutting", 1, 5, 0);
        stranger.employee_id = "emp_002".to_string();
        let logs = vec![log("a", PartType::Sleeve, "cutting", 1, 5, 0), stranger];

        let result = compute_daily_and_month_totals(&logs, &flat_rates);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_no_logs_yields_zero_total() {
        let earnings = compute_daily_and_month_totals(&[], &flat_rates).unwrap();
        assert!(earnings.daily_logs.is_empty());
        assert_eq!(earnings.month_total, Decimal::ZERO);
    }
}
