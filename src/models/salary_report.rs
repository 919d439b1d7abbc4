//! Salary report models.
//!
//! This module contains the [`SalaryReport`] type and its associated structures
//! that capture all outputs from a monthly salary calculation, including the
//! net-salary breakdown, the earnings detail it was derived from, and the audit
//! trace.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{EmploymentType, YearMonth};
use crate::calculation::{LoanSummary, OvertimeTotals, WorkLogEarnings};

/// The figures that make up a month's net salary.
///
/// `net_amount = basic - upad - loan_installment`. `pending_loan` is
/// outstanding principal and is reported only. A negative `net_amount` is
/// kept as-is.
///
/// # Example
///
/// ```
/// use factory_payroll::models::SalaryBreakdown;
/// use rust_decimal::Decimal;
///
/// let breakdown = SalaryBreakdown {
///     basic: Decimal::new(15000, 0),
///     overtime_amount: Decimal::ZERO,
///     upad: Decimal::new(2000, 0),
///     loan_installment: Decimal::new(1000, 0),
///     pending_loan: Decimal::new(5000, 0),
///     net_amount: Decimal::new(12000, 0),
/// };
/// assert!(!breakdown.is_negative());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryBreakdown {
    /// Gross pay for the month, overtime included.
    pub basic: Decimal,
    /// The overtime portion of `basic` (daily workers only).
    pub overtime_amount: Decimal,
    /// Total salary advances deducted.
    pub upad: Decimal,
    /// Total loan EMI deducted.
    pub loan_installment: Decimal,
    /// Outstanding loan principal after this month.
    pub pending_loan: Decimal,
    /// Amount payable.
    pub net_amount: Decimal,
}

impl SalaryBreakdown {
    /// Returns true when deductions exceed gross pay.
    pub fn is_negative(&self) -> bool {
        self.net_amount < Decimal::ZERO
    }
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A condition that needs human review but did not stop the calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
    /// The total calculation duration in microseconds.
    pub duration_us: u64,
}

impl AuditTrace {
    /// Returns true if a warning with this code was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|w| w.code == code)
    }
}

/// The complete result of a monthly salary calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryReport {
    /// Unique identifier for this calculation.
    pub calculation_id: Uuid,
    /// When the calculation was performed.
    pub timestamp: DateTime<Utc>,
    /// The version of the engine that performed the calculation.
    pub engine_version: String,
    /// The ID of the employee the calculation is for.
    pub employee_id: String,
    /// The employee's employment type.
    pub employment_type: EmploymentType,
    /// The month being paid.
    pub period: YearMonth,
    /// The resolved daily or roj rate (attendance-based employees only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub daily_rate: Option<Decimal>,
    /// Present days in the month (attendance-based employees only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub present_days: Option<u32>,
    /// Overtime detail (daily workers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overtime: Option<OvertimeTotals>,
    /// Piece-rate earnings detail (contract workers only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub earnings: Option<WorkLogEarnings>,
    /// Per-loan EMI and pending figures.
    pub loans: Vec<LoanSummary>,
    /// The net-salary figures.
    pub breakdown: SalaryBreakdown,
    /// Complete audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}
