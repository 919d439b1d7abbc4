//! Loan, loan transaction and upad (salary advance) models.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::YearMonth;
use crate::error::{EngineError, EngineResult};

/// Lifecycle state of a loan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoanStatus {
    /// Being repaid.
    Active,
    /// Fully repaid.
    Closed,
    /// Written off by an administrator. Terminal.
    Cancelled,
}

/// How a loan installment was paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionMode {
    /// Deducted from that month's salary.
    SalaryDeduction,
    /// Paid outside payroll; waives the month's salary deduction.
    ManualPayment,
}

/// A loan extended to an employee and repaid in monthly installments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Loan {
    /// Unique identifier for the loan.
    pub id: String,
    /// The borrowing employee.
    pub employee_id: String,
    /// First month an installment is due.
    pub start: YearMonth,
    /// Amount lent.
    pub principal: Decimal,
    /// Installment deducted each month unless a transaction says otherwise.
    pub default_installment: Decimal,
    /// Current lifecycle state.
    pub status: LoanStatus,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Loan {
    /// Checks the loan's amounts.
    pub fn validate(&self) -> EngineResult<()> {
        if self.id.trim().is_empty() {
            return Err(EngineError::validation("loan.id", "must not be empty"));
        }
        if self.principal <= Decimal::ZERO {
            return Err(EngineError::validation(
                "loan.principal",
                format!("loan '{}' principal must be positive", self.id),
            ));
        }
        if self.default_installment <= Decimal::ZERO {
            return Err(EngineError::validation(
                "loan.default_installment",
                format!("loan '{}' installment must be positive", self.id),
            ));
        }
        Ok(())
    }

    /// Returns true once the loan's first installment month has arrived.
    pub fn has_started_by(&self, period: YearMonth) -> bool {
        period >= self.start
    }
}

/// A recorded installment against a loan.
///
/// A manual payment of zero records a skipped EMI: nothing was paid, but the
/// month is not auto-deducted either.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTransaction {
    /// Unique identifier for the transaction.
    pub id: String,
    /// The loan being repaid.
    pub loan_id: String,
    /// The borrowing employee.
    pub employee_id: String,
    /// The month the installment is attributed to.
    pub period: YearMonth,
    /// Amount paid.
    pub amount: Decimal,
    /// How it was paid.
    pub mode: TransactionMode,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl LoanTransaction {
    /// Checks the transaction's amount.
    pub fn validate(&self) -> EngineResult<()> {
        if self.loan_id.trim().is_empty() {
            return Err(EngineError::validation(
                "transaction.loan_id",
                "must not be empty",
            ));
        }
        if self.amount < Decimal::ZERO {
            return Err(EngineError::validation(
                "transaction.amount",
                format!("transaction '{}' amount must not be negative", self.id),
            ));
        }
        Ok(())
    }

    /// Returns true for the amount-zero manual "skipped EMI" marker.
    pub fn is_skip_marker(&self) -> bool {
        self.mode == TransactionMode::ManualPayment && self.amount.is_zero()
    }
}

/// A salary advance, deducted from the month's net salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpadEntry {
    /// Identifier of the advance.
    #[serde(default)]
    pub id: String,
    /// The employee who received the advance.
    pub employee_id: String,
    /// The month the advance is deducted in.
    pub period: YearMonth,
    /// Amount advanced.
    pub amount: Decimal,
    /// Optional free-text note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan() -> Loan {
        Loan {
            id: "loan_1".to_string(),
            employee_id: "emp_1".to_string(),
            start: YearMonth::new(2024, 1).unwrap(),
            principal: Decimal::new(6000, 0),
            default_installment: Decimal::new(1000, 0),
            status: LoanStatus::Active,
            note: None,
        }
    }

    #[test]
    fn test_loan_validation() {
        assert!(loan().validate().is_ok());

        let mut zero_principal = loan();
        zero_principal.principal = Decimal::ZERO;
        assert!(zero_principal.validate().is_err());

        let mut zero_installment = loan();
        zero_installment.default_installment = Decimal::ZERO;
        assert!(zero_installment.validate().is_err());
    }

    #[test]
    fn test_has_started_by() {
        let loan = loan();
        assert!(!loan.has_started_by(YearMonth::new(2023, 12).unwrap()));
        assert!(loan.has_started_by(YearMonth::new(2024, 1).unwrap()));
    }

    #[test]
    fn test_deserialize_transaction() {
        let json = r#"{
            "id": "tx_1",
            "loan_id": "loan_1",
            "employee_id": "emp_1",
            "period": {"year": 2024, "month": 2},
            "amount": "0",
            "mode": "manual_payment"
        }"#;
        let tx: LoanTransaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.mode, TransactionMode::ManualPayment);
        assert!(tx.is_skip_marker());
        assert!(tx.validate().is_ok());
    }

    #[test]
    fn test_negative_transaction_amount_is_invalid() {
        let tx = LoanTransaction {
            id: "tx_1".to_string(),
            loan_id: "loan_1".to_string(),
            employee_id: "emp_1".to_string(),
            period: YearMonth::new(2024, 2).unwrap(),
            amount: Decimal::new(-1, 0),
            mode: TransactionMode::SalaryDeduction,
            note: None,
        };
        assert!(tx.validate().is_err());
    }

    #[test]
    fn test_status_serialization() {
        assert_eq!(
            serde_json::to_string(&LoanStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        assert_eq!(
            serde_json::to_string(&TransactionMode::SalaryDeduction).unwrap(),
            "\"salary_deduction\""
        );
    }
}
