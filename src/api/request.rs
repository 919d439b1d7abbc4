//! Request types for the payroll engine API.
//!
//! Each endpoint takes the records it computes over in the request body; the
//! API owns no storage.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::{SalaryInputs, validate_ledger};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, Employee, Loan, LoanTransaction, OvertimeEntry, UpadEntry, WorkLogEntry,
    YearMonth,
};

/// Request body for `POST /salary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SalaryRequest {
    /// The employee being paid.
    pub employee: Employee,
    /// The month being paid.
    pub period: YearMonth,
    /// Attendance records.
    #[serde(default)]
    pub attendance: Vec<AttendanceRecord>,
    /// Overtime entries.
    #[serde(default)]
    pub overtime: Vec<OvertimeEntry>,
    /// Piece-rate work logs.
    #[serde(default)]
    pub work_logs: Vec<WorkLogEntry>,
    /// Salary advances.
    #[serde(default)]
    pub upads: Vec<UpadEntry>,
    /// The employee's loans.
    #[serde(default)]
    pub loans: Vec<Loan>,
    /// Transactions of the employee's loans, all months.
    #[serde(default)]
    pub loan_transactions: Vec<LoanTransaction>,
}

impl SalaryRequest {
    /// Rejects records that name another employee, and invalid loans or
    /// loan transactions.
    pub fn validate(&self) -> EngineResult<()> {
        if self.employee.id.trim().is_empty() {
            return Err(EngineError::validation("employee.id", "must not be empty"));
        }
        let expected = &self.employee.id;
        let owners = self
            .attendance
            .iter()
            .map(|r| (r.date.to_string(), &r.employee_id))
            .chain(
                self.overtime
                    .iter()
                    .map(|o| (o.date.to_string(), &o.employee_id)),
            )
            .chain(self.work_logs.iter().map(|w| (w.id.clone(), &w.employee_id)))
            .chain(self.upads.iter().map(|u| (u.id.clone(), &u.employee_id)))
            .chain(self.loans.iter().map(|l| (l.id.clone(), &l.employee_id)))
            .chain(
                self.loan_transactions
                    .iter()
                    .map(|tx| (tx.id.clone(), &tx.employee_id)),
            );
        for (record, owner) in owners {
            if owner != expected {
                return Err(EngineError::EmployeeMismatch {
                    record,
                    expected: expected.clone(),
                    found: owner.clone(),
                });
            }
        }
        validate_ledger(&self.loans, &self.loan_transactions)
    }

    /// Borrows the request as salary inputs.
    pub fn inputs(&self) -> SalaryInputs<'_> {
        SalaryInputs {
            employee: &self.employee,
            period: self.period,
            attendance: &self.attendance,
            overtime: &self.overtime,
            work_logs: &self.work_logs,
            upads: &self.upads,
            loans: &self.loans,
            loan_transactions: &self.loan_transactions,
        }
    }
}

/// Request body for `POST /attendance/reconcile`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileRequest {
    /// The employee whose month is reconciled.
    pub employee_id: String,
    /// The month to reconcile.
    pub period: YearMonth,
    /// Present days the month should end up with.
    pub desired_present_days: u32,
    /// The employee's current attendance records.
    #[serde(default)]
    pub records: Vec<AttendanceRecord>,
}

impl ReconcileRequest {
    /// Rejects records that belong to another employee.
    pub fn validate(&self) -> EngineResult<()> {
        if let Some(record) = self
            .records
            .iter()
            .find(|r| r.employee_id != self.employee_id)
        {
            return Err(EngineError::EmployeeMismatch {
                record: record.date.to_string(),
                expected: self.employee_id.clone(),
                found: record.employee_id.clone(),
            });
        }
        Ok(())
    }
}

/// Request body for `POST /loans/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummaryRequest {
    /// The borrowing employee.
    pub employee_id: String,
    /// The month to report.
    pub period: YearMonth,
    /// The employee's loans.
    #[serde(default)]
    pub loans: Vec<Loan>,
    /// Transactions of those loans, all months.
    #[serde(default)]
    pub transactions: Vec<LoanTransaction>,
    /// Overrides the configured close tolerance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Decimal>,
}

impl LoanSummaryRequest {
    /// Rejects invalid loans, transactions and a negative tolerance.
    pub fn validate(&self) -> EngineResult<()> {
        if self.tolerance.is_some_and(|t| t < Decimal::ZERO) {
            return Err(EngineError::validation("tolerance", "must not be negative"));
        }
        validate_ledger(&self.loans, &self.transactions)
    }
}

/// Request body for `POST /loans/apply-missing-emis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyMissingEmisRequest {
    /// Last month to fill.
    pub through: YearMonth,
    /// Loans to fill.
    pub loans: Vec<Loan>,
    /// Existing transactions of those loans.
    #[serde(default)]
    pub transactions: Vec<LoanTransaction>,
}

impl ApplyMissingEmisRequest {
    /// Rejects invalid loans and transactions.
    pub fn validate(&self) -> EngineResult<()> {
        validate_ledger(&self.loans, &self.transactions)
    }
}

/// Request body for `POST /loans/payoff`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayoffRequest {
    /// The loan to settle.
    pub loan: Loan,
    /// The month the payoff is recorded in.
    pub month: YearMonth,
    /// Existing transactions of the loan.
    #[serde(default)]
    pub transactions: Vec<LoanTransaction>,
}

impl PayoffRequest {
    /// Rejects an invalid loan or transactions.
    pub fn validate(&self) -> EngineResult<()> {
        validate_ledger(std::slice::from_ref(&self.loan), &self.transactions)
    }
}
