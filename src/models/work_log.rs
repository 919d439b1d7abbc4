//! Piece-rate work log model.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The family of part a job is performed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartType {
    /// Sleeve parts.
    Sleeve,
    /// Rod parts.
    Rod,
    /// Pin parts.
    Pin,
}

impl fmt::Display for PartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PartType::Sleeve => "sleeve",
            PartType::Rod => "rod",
            PartType::Pin => "pin",
        };
        f.write_str(name)
    }
}

/// One line of piece-rate production.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkLogEntry {
    /// Identifier of the log line.
    pub id: String,
    /// The employee who did the work.
    pub employee_id: String,
    /// The part family.
    pub part_type: PartType,
    /// The job (operation) name.
    pub job_name: String,
    /// Total parts produced.
    pub quantity: u32,
    /// Parts rejected as defective.
    #[serde(default)]
    pub rejection: u32,
    /// The day the work was done.
    pub date: NaiveDate,
    /// Optional part size, informational only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl WorkLogEntry {
    /// Billable parts: produced minus rejected.
    ///
    /// Fails when more parts were rejected than produced.
    pub fn ok_parts(&self) -> EngineResult<u32> {
        self.quantity.checked_sub(self.rejection).ok_or_else(|| {
            EngineError::validation(
                "rejection",
                format!(
                    "work log '{}' rejects {} of {} parts",
                    self.id, self.rejection, self.quantity
                ),
            )
        })
    }
}
