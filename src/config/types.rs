//! Configuration types for payroll computation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files.

use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::calculation::{CLOSE_TOLERANCE, JobRateSource};
use crate::error::{EngineError, EngineResult};
use crate::models::{PartType, RateHistory, YearMonth};

fn default_close_tolerance() -> Decimal {
    CLOSE_TOLERANCE
}

fn default_overtime_hours_per_day() -> Decimal {
    Decimal::from(8)
}

/// Engine-wide payroll settings from `payroll.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PayrollSettings {
    /// Shortfall under which a loan counts as fully paid.
    #[serde(default = "default_close_tolerance")]
    pub loan_close_tolerance: Decimal,
    /// Hours in a roj day; the default overtime rate is roj rate / this.
    #[serde(default = "default_overtime_hours_per_day")]
    pub overtime_hours_per_day: Decimal,
}

impl Default for PayrollSettings {
    fn default() -> Self {
        Self {
            loan_close_tolerance: default_close_tolerance(),
            overtime_hours_per_day: default_overtime_hours_per_day(),
        }
    }
}

impl PayrollSettings {
    /// Checks that the settings are usable.
    pub fn validate(&self) -> EngineResult<()> {
        if self.loan_close_tolerance < Decimal::ZERO {
            return Err(EngineError::validation(
                "loan_close_tolerance",
                "must not be negative",
            ));
        }
        if self.overtime_hours_per_day <= Decimal::ZERO {
            return Err(EngineError::validation(
                "overtime_hours_per_day",
                "must be positive",
            ));
        }
        Ok(())
    }
}

/// One job type in `job_types.yaml`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobTypeConfig {
    /// The part family.
    pub part_type: PartType,
    /// The job (operation) name.
    pub job_name: String,
    /// Piece rate over time.
    pub rates: RateHistory,
}

/// Job types file structure.
#[derive(Debug, Clone, Deserialize)]
pub struct JobTypesFile {
    /// Every configured job type.
    pub job_types: Vec<JobTypeConfig>,
}

/// Piece rates keyed by (part type, job name).
#[derive(Debug, Clone, Default)]
pub struct JobCatalog {
    jobs: HashMap<(PartType, String), RateHistory>,
}

impl JobCatalog {
    /// Builds a catalog, rejecting duplicate (part type, job name) pairs.
    pub fn new(job_types: Vec<JobTypeConfig>) -> EngineResult<Self> {
        let mut jobs = HashMap::new();
        for job in job_types {
            let key = (job.part_type, job.job_name);
            if jobs.contains_key(&key) {
                return Err(EngineError::validation(
                    "job_types",
                    format!("duplicate job type {} / {}", key.0, key.1),
                ));
            }
            jobs.insert(key, job.rates);
        }
        Ok(Self { jobs })
    }

    /// Number of configured job types.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true when no job types are configured.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// The rate history for a job.
    pub fn get(&self, part_type: PartType, job_name: &str) -> EngineResult<&RateHistory> {
        self.jobs
            .get(&(part_type, job_name.to_string()))
            .ok_or_else(|| EngineError::JobTypeNotFound {
                part_type: part_type.to_string(),
                job_name: job_name.to_string(),
            })
    }
}

impl JobRateSource for JobCatalog {
    fn job_rate(
        &self,
        part_type: PartType,
        job_name: &str,
        period: YearMonth,
    ) -> EngineResult<Decimal> {
        Ok(self.get(part_type, job_name)?.rate_for(period))
    }
}

/// The complete payroll configuration loaded from YAML files.
#[derive(Debug, Clone, Default)]
pub struct PayrollConfig {
    settings: PayrollSettings,
    catalog: JobCatalog,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(settings: PayrollSettings, catalog: JobCatalog) -> Self {
        Self { settings, catalog }
    }

    /// Returns the payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        &self.settings
    }

    /// Returns the job-type catalog.
    pub fn catalog(&self) -> &JobCatalog {
        &self.catalog
    }
}
