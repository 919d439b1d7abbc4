//! HTTP API module for the payroll engine.
//!
//! This module exposes the engine's computations as stateless JSON endpoints.
//! Callers send the records to compute over and persist whatever the
//! response tells them to.

mod handlers;
mod request;
mod response;
mod state;

pub use handlers::create_router;
pub use request::{
    ApplyMissingEmisRequest, LoanSummaryRequest, PayoffRequest, ReconcileRequest, SalaryRequest,
};
pub use response::{
    ApiError, ApiErrorResponse, ApplyMissingEmisResponse, LoanStatusChange, LoanSummaryResponse,
};
pub use state::AppState;
