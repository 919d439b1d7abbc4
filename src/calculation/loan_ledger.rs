//! Loan ledger: EMI, pending balance and loan status.
//!
//! Every screen or report that needs a loan figure goes through this module.
//! The rules:
//!
//! - A month with a manual payment (including the zero-amount "skipped EMI"
//!   marker) has no salary deduction.
//! - A month with salary-deduction transactions deducts their sum.
//! - A month with no transaction deducts the default installment
//!   implicitly, unless payments recorded before it already closed the loan.
//! - Pending balance is principal minus recorded salary deductions, minus the
//!   implicit installment for an as-of month with nothing recorded. Manual
//!   payments only clear the balance once they settle the loan.
//! - A loan is closed once everything paid reaches the principal (within
//!   [`CLOSE_TOLERANCE`]) and reopens if edits take it back below.
//!
//! Nothing here mutates its inputs: status changes and new transactions are
//! returned for the caller to persist.
//!
//! The ledger computes over whatever it is given. Run [`validate_ledger`]
//! on loans and transactions from outside the engine first.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Loan, LoanStatus, LoanTransaction, TransactionMode, YearMonth};

/// Shortfall under which a loan counts as fully paid (0.01).
pub const CLOSE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Per-loan figures for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanSummary {
    /// The loan.
    pub loan_id: String,
    /// Status derived from the recorded transactions.
    pub status: LoanStatus,
    /// Amount lent.
    pub principal: Decimal,
    /// Default monthly installment.
    pub default_installment: Decimal,
    /// Everything recorded against the loan, any mode.
    pub total_paid: Decimal,
    /// Salary deduction for the month.
    pub emi: Decimal,
    /// Outstanding balance as of the month.
    pub pending: Decimal,
}

/// An employee's combined loan figures for one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPosition {
    /// Sum of the month's EMIs.
    pub emi_total: Decimal,
    /// Sum of the pending balances.
    pub pending_total: Decimal,
    /// Per-loan detail, cancelled loans excluded.
    pub loans: Vec<LoanSummary>,
}

/// A transaction list after a write, with the status it implies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerUpdate {
    /// The loan's transactions after the write.
    pub transactions: Vec<LoanTransaction>,
    /// Status derived from `transactions`.
    pub status: LoanStatus,
    /// Whether `status` differs from the loan's stored status.
    pub status_changed: bool,
}

/// The outcome of a lump-sum payoff.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanPayoff {
    /// The manual payment settling the loan.
    pub transaction: LoanTransaction,
    /// Always [`LoanStatus::Closed`].
    pub status: LoanStatus,
}

/// One loan with its transactions.
///
/// # Example
///
/// ```
/// use factory_payroll::calculation::LoanLedger;
/// use factory_payroll::models::{Loan, LoanStatus, YearMonth};
/// use rust_decimal::Decimal;
///
/// let loan = Loan {
///     id: "loan_1".to_string(),
///     employee_id: "emp_1".to_string(),
///     start: YearMonth::new(2024, 1).unwrap(),
///     principal: Decimal::new(6000, 0),
///     default_installment: Decimal::new(1000, 0),
///     status: LoanStatus::Active,
///     note: None,
/// };
/// let ledger = LoanLedger::new(&loan, &[]);
/// let march = YearMonth::new(2024, 3).unwrap();
///
/// assert_eq!(ledger.monthly_emi(march), Decimal::new(1000, 0));
/// assert_eq!(ledger.pending_balance(march), Decimal::new(5000, 0));
/// ```
#[derive(Debug, Clone)]
pub struct LoanLedger<'a> {
    loan: &'a Loan,
    transactions: Vec<&'a LoanTransaction>,
    tolerance: Decimal,
}

impl<'a> LoanLedger<'a> {
    /// Builds a ledger from the loan and any transaction list; transactions
    /// for other loans are ignored.
    pub fn new(loan: &'a Loan, transactions: &'a [LoanTransaction]) -> Self {
        Self {
            loan,
            transactions: transactions
                .iter()
                .filter(|tx| tx.loan_id == loan.id)
                .collect(),
            tolerance: CLOSE_TOLERANCE,
        }
    }

    /// Overrides the close tolerance.
    pub fn with_tolerance(mut self, tolerance: Decimal) -> Self {
        self.tolerance = tolerance;
        self
    }

    fn in_month(&self, period: YearMonth) -> impl Iterator<Item = &&'a LoanTransaction> {
        self.transactions.iter().filter(move |tx| tx.period == period)
    }

    fn paid_before(&self, period: YearMonth) -> Decimal {
        self.transactions
            .iter()
            .filter(|tx| tx.period < period)
            .map(|tx| tx.amount)
            .sum()
    }

    fn is_settled(&self, paid: Decimal) -> bool {
        paid >= self.loan.principal - self.tolerance
    }

    /// Whether payments recorded before `period` already closed the loan.
    fn closed_before(&self, period: YearMonth) -> bool {
        self.is_settled(self.paid_before(period))
    }

    /// Everything recorded against the loan, any mode, any month.
    pub fn total_paid(&self) -> Decimal {
        self.transactions.iter().map(|tx| tx.amount).sum()
    }

    /// The status implied by the recorded transactions.
    ///
    /// Cancelled loans stay cancelled; otherwise the loan is closed when the
    /// total paid is within tolerance of the principal, else active.
    pub fn status(&self) -> LoanStatus {
        match self.loan.status {
            LoanStatus::Cancelled => LoanStatus::Cancelled,
            _ if self.is_settled(self.total_paid()) => LoanStatus::Closed,
            _ => LoanStatus::Active,
        }
    }

    /// The installment deducted implicitly in a month with no transaction.
    fn implicit_installment(&self, period: YearMonth) -> Decimal {
        if self.closed_before(period) {
            Decimal::ZERO
        } else {
            self.loan.default_installment
        }
    }

    /// The salary deduction attributable to `target`.
    pub fn monthly_emi(&self, target: YearMonth) -> Decimal {
        if self.loan.status == LoanStatus::Cancelled || !self.loan.has_started_by(target) {
            return Decimal::ZERO;
        }

        let month: Vec<&LoanTransaction> = self.in_month(target).copied().collect();
        if let Some(waiver) = month
            .iter()
            .find(|tx| tx.mode == TransactionMode::ManualPayment)
        {
            debug!(
                loan_id = %self.loan.id,
                month = %target,
                skipped = waiver.is_skip_marker(),
                "EMI waived by manual payment"
            );
            return Decimal::ZERO;
        }
        if !month.is_empty() {
            return month.iter().map(|tx| tx.amount).sum();
        }
        self.implicit_installment(target)
    }

    /// The balance outstanding as of `as_of`.
    pub fn pending_balance(&self, as_of: YearMonth) -> Decimal {
        if self.loan.status == LoanStatus::Cancelled {
            return Decimal::ZERO;
        }

        let to_date: Vec<&LoanTransaction> = self
            .transactions
            .iter()
            .copied()
            .filter(|tx| tx.period <= as_of)
            .collect();

        let paid: Decimal = to_date.iter().map(|tx| tx.amount).sum();
        if self.is_settled(paid) {
            return Decimal::ZERO;
        }

        let deducted: Decimal = to_date
            .iter()
            .filter(|tx| tx.mode == TransactionMode::SalaryDeduction)
            .map(|tx| tx.amount)
            .sum();
        let mut pending = (self.loan.principal - deducted).max(Decimal::ZERO);

        if self.loan.has_started_by(as_of) && self.in_month(as_of).next().is_none() {
            pending = (pending - self.implicit_installment(as_of)).max(Decimal::ZERO);
        }
        pending
    }

    /// EMI, pending and status for `period`.
    pub fn summary(&self, period: YearMonth) -> LoanSummary {
        LoanSummary {
            loan_id: self.loan.id.clone(),
            status: self.status(),
            principal: self.loan.principal,
            default_installment: self.loan.default_installment,
            total_paid: self.total_paid(),
            emi: self.monthly_emi(period),
            pending: self.pending_balance(period),
        }
    }

    /// Plans a lump-sum payoff in `month`.
    ///
    /// The payment is a manual payment of everything not yet recorded as
    /// paid, and the loan is closed directly.
    ///
    /// # Errors
    ///
    /// - The loan is not active, or nothing is outstanding (`Validation`)
    /// - `month` already has a salary deduction, which the manual payment
    ///   would waive (`Validation`)
    pub fn payoff(&self, month: YearMonth) -> EngineResult<LoanPayoff> {
        if self.loan.status != LoanStatus::Active {
            return Err(EngineError::validation(
                "loan.status",
                format!("loan '{}' is not active", self.loan.id),
            ));
        }
        if self
            .in_month(month)
            .any(|tx| tx.mode == TransactionMode::SalaryDeduction)
        {
            return Err(EngineError::validation(
                "payoff.month",
                format!(
                    "loan '{}' already has a salary deduction in {}",
                    self.loan.id, month
                ),
            ));
        }

        let outstanding = (self.loan.principal - self.total_paid()).max(Decimal::ZERO);
        if outstanding.is_zero() {
            return Err(EngineError::validation(
                "loan.principal",
                format!("loan '{}' has nothing outstanding", self.loan.id),
            ));
        }

        info!(
            loan_id = %self.loan.id,
            month = %month,
            amount = %outstanding,
            "Planned lump-sum payoff"
        );

        Ok(LoanPayoff {
            transaction: LoanTransaction {
                id: Uuid::new_v4().to_string(),
                loan_id: self.loan.id.clone(),
                employee_id: self.loan.employee_id.clone(),
                period: month,
                amount: outstanding,
                mode: TransactionMode::ManualPayment,
                note: Some("lump-sum payoff".to_string()),
            },
            status: LoanStatus::Closed,
        })
    }

    /// Salary deductions for every month from the loan's start through
    /// `through` that has no transaction.
    ///
    /// Each generated row deducts the default installment. Months after the
    /// loan is closed by recorded or generated payments get nothing, and
    /// neither do cancelled loans.
    pub fn missing_emis(&self, through: YearMonth) -> Vec<LoanTransaction> {
        if self.loan.status == LoanStatus::Cancelled {
            return Vec::new();
        }

        let mut generated: Vec<LoanTransaction> = Vec::new();
        for month in self.loan.start.through(through) {
            if self.in_month(month).next().is_some() {
                continue;
            }
            let paid_generated: Decimal = generated.iter().map(|tx| tx.amount).sum();
            if self.is_settled(self.paid_before(month) + paid_generated) {
                break;
            }
            generated.push(LoanTransaction {
                id: Uuid::new_v4().to_string(),
                loan_id: self.loan.id.clone(),
                employee_id: self.loan.employee_id.clone(),
                period: month,
                amount: self.loan.default_installment,
                mode: TransactionMode::SalaryDeduction,
                note: Some("auto-deducted EMI".to_string()),
            });
        }
        generated
    }
}

/// Checks loans and transactions before any ledger figure is computed.
///
/// # Errors
///
/// - A loan with an empty id or a non-positive principal or installment
/// - A transaction with an empty loan id or a negative amount
pub fn validate_ledger(loans: &[Loan], transactions: &[LoanTransaction]) -> EngineResult<()> {
    loans.iter().try_for_each(Loan::validate)?;
    transactions.iter().try_for_each(LoanTransaction::validate)
}

/// The salary deduction for `loan` in `target`.
pub fn monthly_emi(loan: &Loan, transactions: &[LoanTransaction], target: YearMonth) -> Decimal {
    LoanLedger::new(loan, transactions).monthly_emi(target)
}

/// The balance outstanding on `loan` as of `as_of`.
pub fn pending_balance(loan: &Loan, transactions: &[LoanTransaction], as_of: YearMonth) -> Decimal {
    LoanLedger::new(loan, transactions).pending_balance(as_of)
}

/// Everything recorded against `loan`.
pub fn total_paid(loan: &Loan, transactions: &[LoanTransaction]) -> Decimal {
    LoanLedger::new(loan, transactions).total_paid()
}

/// The status implied by `loan`'s transactions.
pub fn derive_status(loan: &Loan, transactions: &[LoanTransaction]) -> LoanStatus {
    LoanLedger::new(loan, transactions).status()
}

/// Plans a lump-sum payoff of `loan` in `month`.
pub fn lump_sum_payoff(
    loan: &Loan,
    transactions: &[LoanTransaction],
    month: YearMonth,
) -> EngineResult<LoanPayoff> {
    LoanLedger::new(loan, transactions).payoff(month)
}

/// Salary deductions filling every transaction-less month through `through`
/// for each active or closed loan. Existing transactions are never touched.
pub fn apply_missing_emis(
    loans: &[Loan],
    transactions: &[LoanTransaction],
    through: YearMonth,
) -> Vec<LoanTransaction> {
    let generated: Vec<LoanTransaction> = loans
        .iter()
        .flat_map(|loan| LoanLedger::new(loan, transactions).missing_emis(through))
        .collect();

    debug!(
        loans = loans.len(),
        through = %through,
        generated = generated.len(),
        "Applied missing EMIs"
    );
    generated
}

fn own_transactions(loan: &Loan, transactions: &[LoanTransaction]) -> Vec<LoanTransaction> {
    transactions
        .iter()
        .filter(|tx| tx.loan_id == loan.id)
        .cloned()
        .collect()
}

fn check_transaction(loan: &Loan, tx: &LoanTransaction) -> EngineResult<()> {
    tx.validate()?;
    if tx.loan_id != loan.id {
        return Err(EngineError::LoanNotFound {
            loan_id: tx.loan_id.clone(),
        });
    }
    if tx.employee_id != loan.employee_id {
        return Err(EngineError::EmployeeMismatch {
            record: tx.id.clone(),
            expected: loan.employee_id.clone(),
            found: tx.employee_id.clone(),
        });
    }
    if loan.status == LoanStatus::Cancelled {
        return Err(EngineError::validation(
            "loan.status",
            format!("loan '{}' is cancelled", loan.id),
        ));
    }
    Ok(())
}

fn finish_update(loan: &Loan, transactions: Vec<LoanTransaction>) -> LedgerUpdate {
    let status = derive_status(loan, &transactions);
    let status_changed = status != loan.status;
    if status_changed {
        info!(
            loan_id = %loan.id,
            from = ?loan.status,
            to = ?status,
            "Loan status changed"
        );
    }
    LedgerUpdate {
        transactions,
        status,
        status_changed,
    }
}

/// Adds a transaction and re-derives the loan status.
pub fn record_transaction(
    loan: &Loan,
    transactions: &[LoanTransaction],
    transaction: LoanTransaction,
) -> EngineResult<LedgerUpdate> {
    check_transaction(loan, &transaction)?;
    let mut updated = own_transactions(loan, transactions);
    if updated.iter().any(|tx| tx.id == transaction.id) {
        return Err(EngineError::validation(
            "transaction.id",
            format!("transaction '{}' already exists", transaction.id),
        ));
    }
    updated.push(transaction);
    Ok(finish_update(loan, updated))
}

/// Replaces the transaction with the same id and re-derives the loan status.
pub fn edit_transaction(
    loan: &Loan,
    transactions: &[LoanTransaction],
    transaction: LoanTransaction,
) -> EngineResult<LedgerUpdate> {
    check_transaction(loan, &transaction)?;
    let mut updated = own_transactions(loan, transactions);
    let existing = updated
        .iter_mut()
        .find(|tx| tx.id == transaction.id)
        .ok_or_else(|| EngineError::TransactionNotFound {
            transaction_id: transaction.id.clone(),
        })?;
    *existing = transaction;
    Ok(finish_update(loan, updated))
}

/// Removes a transaction and re-derives the loan status.
pub fn remove_transaction(
    loan: &Loan,
    transactions: &[LoanTransaction],
    transaction_id: &str,
) -> EngineResult<LedgerUpdate> {
    let mut updated = own_transactions(loan, transactions);
    let before = updated.len();
    updated.retain(|tx| tx.id != transaction_id);
    if updated.len() == before {
        return Err(EngineError::TransactionNotFound {
            transaction_id: transaction_id.to_string(),
        });
    }
    Ok(finish_update(loan, updated))
}

/// Combined EMI and pending figures for an employee's loans in `period`.
///
/// Cancelled loans and loans of other employees are skipped.
pub fn employee_loan_position(
    employee_id: &str,
    loans: &[Loan],
    transactions: &[LoanTransaction],
    period: YearMonth,
    tolerance: Decimal,
) -> LoanPosition {
    let summaries: Vec<LoanSummary> = loans
        .iter()
        .filter(|loan| loan.employee_id == employee_id && loan.status != LoanStatus::Cancelled)
        .map(|loan| {
            LoanLedger::new(loan, transactions)
                .with_tolerance(tolerance)
                .summary(period)
        })
        .collect();

    LoanPosition {
        emi_total: summaries.iter().map(|s| s.emi).sum(),
        pending_total: summaries.iter().map(|s| s.pending).sum(),
        loans: summaries,
    }
}

/// Transactions whose loan is not in `loans`.
///
/// Deleting a loan leaves its transactions behind; they are reported here
/// for review rather than dropped.
pub fn find_orphaned_transactions<'a>(
    loans: &[Loan],
    transactions: &'a [LoanTransaction],
) -> Vec<&'a LoanTransaction> {
    let orphans: Vec<&LoanTransaction> = transactions
        .iter()
        .filter(|tx| !loans.iter().any(|loan| loan.id == tx.loan_id))
        .collect();
    if !orphans.is_empty() {
        warn!(count = orphans.len(), "Found loan transactions without a loan");
    }
    orphans
}
