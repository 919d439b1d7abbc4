//! Payroll and loan ledger engine for a small manufacturing unit.
//!
//! This crate computes monthly salaries for monthly-salaried, daily-wage
//! (roj) and piece-rate contract workers. It resolves rates from dated rate
//! histories, aggregates attendance and work logs, and keeps the loan ledger
//! that drives EMI deductions and pending balances.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
