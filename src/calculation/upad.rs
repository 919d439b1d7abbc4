//! Salary advance (upad) totals.

use rust_decimal::Decimal;

use crate::error::{EngineError, EngineResult};
use crate::models::{UpadEntry, YearMonth};

/// Sums an employee's advances for `period`.
///
/// Entries for other employees or months are skipped.
///
/// # Errors
///
/// Returns a validation error if a matching entry has a negative amount.
///
/// # Examples
///
/// ```
/// use factory_payroll::calculation::upad_total;
/// use factory_payroll::models::{UpadEntry, YearMonth};
/// use rust_decimal::Decimal;
///
/// let march = YearMonth::new(2024, 3).unwrap();
/// let advance = |employee: &str, amount| UpadEntry {
///     id: String::new(),
///     employee_id: employee.to_string(),
///     period: march,
///     amount: Decimal::new(amount, 0),
///     note: None,
/// };
///
/// let entries = vec![advance("emp_1", 500), advance("emp_1", 250), advance("emp_2", 900)];
/// assert_eq!(upad_total(&entries, "emp_1", march).unwrap(), Decimal::new(750, 0));
/// ```
pub fn upad_total(
    entries: &[UpadEntry],
    employee_id: &str,
    period: YearMonth,
) -> EngineResult<Decimal> {
    let mut total = Decimal::ZERO;
    for entry in entries
        .iter()
        .filter(|e| e.employee_id == employee_id && e.period == period)
    {
        if entry.amount < Decimal::ZERO {
            return Err(EngineError::validation(
                "upad.amount",
                format!("advance '{}' amount {} must not be negative", entry.id, entry.amount),
            ));
        }
        total += entry.amount;
    }
    Ok(total)
}
