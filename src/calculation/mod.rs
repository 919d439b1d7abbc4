//! Calculation logic for the payroll engine.
//!
//! This module contains the month-level computations: rate resolution from a
//! rate history, attendance counting and reconciliation, piece-rate work-log
//! earnings, the loan ledger (EMI, pending balance, status), salary advances
//! and the salary composer that ties them together.

mod attendance;
mod loan_ledger;
mod rate_resolution;
mod salary;
mod upad;
mod work_log_earnings;

pub use attendance::{
    AttendanceReconciliation, OvertimeTotals, apply_attendance_writes, overtime_totals,
    present_days, reconcile_to_target, validate_overtime_entry,
};
pub use loan_ledger::{
    CLOSE_TOLERANCE, LedgerUpdate, LoanLedger, LoanPayoff, LoanPosition, LoanSummary,
    apply_missing_emis, derive_status, edit_transaction, employee_loan_position,
    find_orphaned_transactions, lump_sum_payoff, monthly_emi, pending_balance,
    record_transaction, remove_transaction, total_paid, validate_ledger,
};
pub use rate_resolution::{RateLookupResult, lookup_rate, resolve_rate};
pub use salary::{
    Deductions, EarningsBasis, NEGATIVE_NET_AMOUNT, ORPHANED_LOAN_TRANSACTIONS, SalaryInputs,
    calculate_salary, compose_salary, overtime_amount,
};
pub use upad::upad_total;
pub use work_log_earnings::{
    DailyWorkLog, JobColumn, JobRateSource, WorkLogEarnings, WorkLogLine,
    compute_daily_and_month_totals,
};
