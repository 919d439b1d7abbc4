//! Configuration loading and management for the payroll engine.
//!
//! This module loads payroll settings and the piece-rate job catalog from
//! YAML files.
//!
//! # Example
//!
//! ```no_run
//! use factory_payroll::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/factory").unwrap();
//! println!("Loan close tolerance: {}", config.settings().loan_close_tolerance);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{JobCatalog, JobTypeConfig, JobTypesFile, PayrollConfig, PayrollSettings};
