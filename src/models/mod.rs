//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod attendance;
mod employee;
mod loan;
mod period;
mod rate_history;
mod salary_report;
mod work_log;

pub use attendance::{AttendanceRecord, AttendanceWrite, OvertimeEntry};
pub use employee::{Employee, EmploymentType};
pub use loan::{Loan, LoanStatus, LoanTransaction, TransactionMode, UpadEntry};
pub use period::YearMonth;
pub use rate_history::{RateHistory, RateHistoryEntry};
pub use salary_report::{
    AuditStep, AuditTrace, AuditWarning, SalaryBreakdown, SalaryReport,
};
pub use work_log::{PartType, WorkLogEntry};
