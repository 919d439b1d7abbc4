//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading payroll
//! configuration from YAML files.

use std::fs;
use std::path::Path;

use rust_decimal::Decimal;
use tracing::info;

use crate::error::{EngineError, EngineResult};
use crate::models::{PartType, YearMonth};

use super::types::{JobCatalog, JobTypesFile, PayrollConfig, PayrollSettings};

/// Loads and provides access to payroll configuration.
///
/// # Directory Structure
///
/// ```text
/// config/factory/
/// ├── payroll.yaml    # Loan tolerance, overtime hours per day
/// └── job_types.yaml  # Piece-rate catalog with rate histories
/// ```
///
/// # Example
///
/// ```no_run
/// use factory_payroll::config::ConfigLoader;
/// use factory_payroll::models::{PartType, YearMonth};
///
/// let loader = ConfigLoader::load("./config/factory")?;
/// let rate = loader.get_job_rate(PartType::Sleeve, "cutting", YearMonth::new(2024, 5)?)?;
/// println!("Cutting sleeves pays {} per part", rate);
/// # Ok::<(), factory_payroll::error::EngineError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Errors
    ///
    /// - A required file is missing (`ConfigNotFound`)
    /// - A file is not valid YAML, or its contents fail validation
    ///   (`ConfigParseError`)
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let settings_path = path.join("payroll.yaml");
        let settings = Self::load_yaml::<PayrollSettings>(&settings_path)?;
        settings
            .validate()
            .map_err(|e| Self::invalid(&settings_path, e))?;

        let job_types_path = path.join("job_types.yaml");
        let job_types = Self::load_yaml::<JobTypesFile>(&job_types_path)?;
        let catalog =
            JobCatalog::new(job_types.job_types).map_err(|e| Self::invalid(&job_types_path, e))?;

        info!(
            path = %path.display(),
            job_types = catalog.len(),
            "Loaded payroll configuration"
        );

        Ok(Self {
            config: PayrollConfig::new(settings, catalog),
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: PayrollConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    fn invalid(path: &Path, error: EngineError) -> EngineError {
        EngineError::ConfigParseError {
            path: path.display().to_string(),
            message: error.to_string(),
        }
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the payroll settings.
    pub fn settings(&self) -> &PayrollSettings {
        self.config.settings()
    }

    /// Gets the piece rate for a job in a given month.
    pub fn get_job_rate(
        &self,
        part_type: PartType,
        job_name: &str,
        period: YearMonth,
    ) -> EngineResult<Decimal> {
        Ok(self
            .config
            .catalog()
            .get(part_type, job_name)?
            .rate_for(period))
    }
}
