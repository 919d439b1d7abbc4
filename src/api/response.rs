//! Response types for the payroll engine API.
//!
//! This module defines the success bodies that are not plain engine values,
//! the error body, and the mapping from [`EngineError`] to HTTP status.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

use crate::calculation::LoanPosition;
use crate::error::EngineError;
use crate::models::{LoanStatus, LoanTransaction};

/// Response body for `POST /loans/summary`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummaryResponse {
    /// The employee's combined loan figures.
    #[serde(flatten)]
    pub position: LoanPosition,
    /// Ids of transactions whose loan was not supplied.
    pub orphaned_transactions: Vec<String>,
}

/// Response body for `POST /loans/apply-missing-emis`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplyMissingEmisResponse {
    /// Salary deductions to persist.
    pub transactions: Vec<LoanTransaction>,
    /// Loans whose status the new deductions change.
    pub status_changes: Vec<LoanStatusChange>,
}

/// A loan whose derived status differs from its stored one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanStatusChange {
    /// The loan.
    pub loan_id: String,
    /// The stored status.
    pub from: LoanStatus,
    /// The derived status.
    pub to: LoanStatus,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl ApiErrorResponse {
    fn bad_request(error: ApiError) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error,
        }
    }

    fn not_found(code: &str, message: String) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            error: ApiError::new(code, message),
        }
    }
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        let message = error.to_string();
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::Validation { field, .. } => {
                Self::bad_request(ApiError::with_details("VALIDATION_ERROR", message, field))
            }
            EngineError::DuplicateRateEntry { .. } => {
                Self::bad_request(ApiError::new("DUPLICATE_RATE_ENTRY", message))
            }
            EngineError::RateEntryNotFound { .. } => {
                Self::not_found("RATE_ENTRY_NOT_FOUND", message)
            }
            EngineError::LoanNotFound { .. } => Self::not_found("LOAN_NOT_FOUND", message),
            EngineError::TransactionNotFound { .. } => {
                Self::not_found("TRANSACTION_NOT_FOUND", message)
            }
            EngineError::EmployeeMismatch { .. } => {
                Self::not_found("EMPLOYEE_MISMATCH", message)
            }
            EngineError::JobTypeNotFound { .. } => Self::not_found("JOB_TYPE_NOT_FOUND", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_serialization() {
        let error = ApiError::new("TEST_ERROR", "Test message");
        let json = serde_json::to_string(&error).unwrap();
        assert!(json.contains("\"code\":\"TEST_ERROR\""));
        assert!(json.contains("\"message\":\"Test message\""));
        assert!(!json.contains("details"));
    }

    #[test]
    fn test_validation_maps_to_400() {
        let api_error: ApiErrorResponse =
            EngineError::validation("desired_present_days", "too many").into();
        assert_eq!(api_error.status, StatusCode::BAD_REQUEST);
        assert_eq!(api_error.error.code, "VALIDATION_ERROR");
        assert_eq!(api_error.error.details.as_deref(), Some("desired_present_days"));
    }

    #[test]
    fn test_job_type_not_found_maps_to_404() {
        let api_error: ApiErrorResponse = EngineError::JobTypeNotFound {
            part_type: "pin".to_string(),
            job_name: "anodizing".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::NOT_FOUND);
        assert_eq!(api_error.error.code, "JOB_TYPE_NOT_FOUND");
        assert!(api_error.error.message.contains("anodizing"));
    }

    #[test]
    fn test_config_error_maps_to_500() {
        let api_error: ApiErrorResponse = EngineError::ConfigNotFound {
            path: "payroll.yaml".to_string(),
        }
        .into();
        assert_eq!(api_error.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(api_error.error.code, "CONFIG_ERROR");
    }
}
