//! Error types for the payroll engine.
//!
//! Every fallible operation returns [`EngineError`]. Inconsistent-state
//! conditions (negative net pay, orphaned loan transactions) are not errors;
//! they are reported as warnings on the salary report.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// # Example
///
/// ```
/// use factory_payroll::error::EngineError;
///
/// let error = EngineError::LoanNotFound {
///     loan_id: "loan_001".to_string(),
/// };
/// assert_eq!(error.to_string(), "Loan not found: loan_001");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed or failed validation.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// An input value was rejected before any computation took place.
    #[error("Invalid value for '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A rate history already holds an entry for this month.
    #[error("Rate history already has an entry effective {year}-{month:02}")]
    DuplicateRateEntry {
        /// Effective year of the conflicting entry.
        year: i32,
        /// Effective month of the conflicting entry.
        month: u32,
    },

    /// No rate history entry exists for this month.
    #[error("No rate history entry effective {year}-{month:02}")]
    RateEntryNotFound {
        /// Effective year that was requested.
        year: i32,
        /// Effective month that was requested.
        month: u32,
    },

    /// A referenced loan was absent.
    #[error("Loan not found: {loan_id}")]
    LoanNotFound {
        /// The loan id that was not found.
        loan_id: String,
    },

    /// A referenced loan transaction was absent.
    #[error("Loan transaction not found: {transaction_id}")]
    TransactionNotFound {
        /// The transaction id that was not found.
        transaction_id: String,
    },

    /// A record belongs to a different employee than the one being computed.
    #[error("Record '{record}' belongs to employee '{found}', expected '{expected}'")]
    EmployeeMismatch {
        /// Identifies the offending record.
        record: String,
        /// The employee being computed.
        expected: String,
        /// The employee on the record.
        found: String,
    },

    /// A work log referenced a job type missing from the catalog.
    #[error("Job type not found: {part_type} / {job_name}")]
    JobTypeNotFound {
        /// The part type of the job.
        part_type: String,
        /// The job name (operation).
        job_name: String,
    },
}

impl EngineError {
    /// Shorthand for building a [`EngineError::Validation`].
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
