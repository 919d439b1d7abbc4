//! HTTP request handlers for the payroll engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::post,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    AttendanceReconciliation, LoanPayoff, apply_missing_emis, calculate_salary, derive_status,
    employee_loan_position, find_orphaned_transactions, lump_sum_payoff, reconcile_to_target,
};
use crate::error::EngineError;
use crate::models::{LoanTransaction, SalaryReport};

use super::request::{
    ApplyMissingEmisRequest, LoanSummaryRequest, PayoffRequest, ReconcileRequest, SalaryRequest,
};
use super::response::{
    ApiError, ApiErrorResponse, ApplyMissingEmisResponse, LoanStatusChange, LoanSummaryResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/salary", post(salary_handler))
        .route("/attendance/reconcile", post(reconcile_handler))
        .route("/loans/summary", post(loan_summary_handler))
        .route("/loans/apply-missing-emis", post(apply_missing_emis_handler))
        .route("/loans/payoff", post(payoff_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

/// Converts a body extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // serde's message carries the offending field
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") || body_text.contains("Invalid value") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn engine_error_response(correlation_id: Uuid, err: EngineError) -> Response {
    warn!(
        correlation_id = %correlation_id,
        error = %err,
        "Request failed"
    );
    let api_error: ApiErrorResponse = err.into();
    json_response(api_error.status, api_error.error)
}

/// Handler for `POST /salary`.
///
/// Computes a salary report from the records in the request.
async fn salary_handler(
    State(state): State<AppState>,
    payload: Result<Json<SalaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing salary request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    let result = request
        .validate()
        .and_then(|()| calculate_salary(&request.inputs(), state.config().config()));

    match result {
        Ok(report) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %report.employee_id,
                period = %report.period,
                net_amount = %report.breakdown.net_amount,
                warnings = report.audit_trace.warnings.len(),
                duration_us = start_time.elapsed().as_micros(),
                "Salary calculated"
            );
            json_response::<SalaryReport>(StatusCode::OK, report)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for `POST /attendance/reconcile`.
///
/// Returns the writes that bring the month to the requested present days.
async fn reconcile_handler(
    payload: Result<Json<ReconcileRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing attendance reconcile request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = request.validate().and_then(|()| {
        reconcile_to_target(
            &request.records,
            request.desired_present_days,
            request.period,
        )
    });

    match result {
        Ok(plan) => {
            info!(
                correlation_id = %correlation_id,
                employee_id = %request.employee_id,
                period = %plan.period,
                writes = plan.writes.len(),
                "Attendance reconciled"
            );
            json_response::<AttendanceReconciliation>(StatusCode::OK, plan)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}

/// Handler for `POST /loans/summary`.
///
/// Reports the month's EMI and pending balance for each of the employee's
/// loans.
async fn loan_summary_handler(
    State(state): State<AppState>,
    payload: Result<Json<LoanSummaryRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing loan summary request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(err) = request.validate() {
        return engine_error_response(correlation_id, err);
    }
    let tolerance = request
        .tolerance
        .unwrap_or(state.config().settings().loan_close_tolerance);

    let transactions: Vec<LoanTransaction> = request
        .transactions
        .iter()
        .filter(|tx| tx.employee_id == request.employee_id)
        .cloned()
        .collect();
    let position = employee_loan_position(
        &request.employee_id,
        &request.loans,
        &transactions,
        request.period,
        tolerance,
    );
    let orphaned_transactions = find_orphaned_transactions(&request.loans, &transactions)
        .into_iter()
        .map(|tx| tx.id.clone())
        .collect();

    info!(
        correlation_id = %correlation_id,
        employee_id = %request.employee_id,
        period = %request.period,
        emi_total = %position.emi_total,
        pending_total = %position.pending_total,
        "Loan summary computed"
    );
    json_response(
        StatusCode::OK,
        LoanSummaryResponse {
            position,
            orphaned_transactions,
        },
    )
}

/// Handler for `POST /loans/apply-missing-emis`.
///
/// Returns the salary deductions that fill every transaction-less month.
async fn apply_missing_emis_handler(
    payload: Result<Json<ApplyMissingEmisRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing apply-missing-EMIs request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    if let Err(err) = request.validate() {
        return engine_error_response(correlation_id, err);
    }

    let generated = apply_missing_emis(&request.loans, &request.transactions, request.through);

    let combined: Vec<LoanTransaction> = request
        .transactions
        .iter()
        .chain(generated.iter())
        .cloned()
        .collect();
    let status_changes: Vec<LoanStatusChange> = request
        .loans
        .iter()
        .filter_map(|loan| {
            let derived = derive_status(loan, &combined);
            (derived != loan.status).then(|| LoanStatusChange {
                loan_id: loan.id.clone(),
                from: loan.status,
                to: derived,
            })
        })
        .collect();

    info!(
        correlation_id = %correlation_id,
        through = %request.through,
        generated = generated.len(),
        status_changes = status_changes.len(),
        "Missing EMIs applied"
    );
    json_response(
        StatusCode::OK,
        ApplyMissingEmisResponse {
            transactions: generated,
            status_changes,
        },
    )
}

/// Handler for `POST /loans/payoff`.
///
/// Returns the manual payment that settles the loan.
async fn payoff_handler(payload: Result<Json<PayoffRequest>, JsonRejection>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing loan payoff request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let result = request
        .validate()
        .and_then(|()| lump_sum_payoff(&request.loan, &request.transactions, request.month));

    match result {
        Ok(payoff) => {
            info!(
                correlation_id = %correlation_id,
                loan_id = %request.loan.id,
                amount = %payoff.transaction.amount,
                "Loan payoff planned"
            );
            json_response::<LoanPayoff>(StatusCode::OK, payoff)
        }
        Err(err) => engine_error_response(correlation_id, err),
    }
}
