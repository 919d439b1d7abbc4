//! Employee model and related types.
//!
//! This module defines the Employee struct and EmploymentType enum
//! for representing workers paid by the engine.

use serde::{Deserialize, Serialize};

use super::RateHistory;

/// How an employee's basic pay is earned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmploymentType {
    /// Piece-rate worker paid per OK part from work logs.
    Contract,
    /// Fixed monthly employee paid a daily rate per present day.
    Monthly,
    /// Daily-wage (roj) worker paid per present day plus overtime.
    DailyRoj,
}

impl EmploymentType {
    /// Returns true when basic pay is derived from attendance.
    pub fn is_attendance_based(&self) -> bool {
        matches!(self, EmploymentType::Monthly | EmploymentType::DailyRoj)
    }
}

/// An employee whose salary is computed by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Unique identifier for the employee.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// The type of employment arrangement.
    pub employment_type: EmploymentType,
    /// Daily rate (monthly staff) or roj rate (daily workers) over time.
    ///
    /// Piece-rate workers are paid from the job catalog and leave this at a
    /// zero base rate.
    pub salary_rates: RateHistory,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_deserialize_daily_roj_employee() {
        let json = r#"{
            "id": "emp_014",
            "name": "Ramesh",
            "employment_type": "daily_roj",
            "salary_rates": {
                "base_rate": "450",
                "entries": [
                    {"rate": "480", "effective_from_year": 2024, "effective_from_month": 4}
                ]
            }
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert_eq!(employee.employment_type, EmploymentType::DailyRoj);
        assert_eq!(employee.salary_rates.base_rate(), Decimal::new(450, 0));
        assert_eq!(employee.salary_rates.current_rate(), Decimal::new(480, 0));
    }

    #[test]
    fn test_name_defaults_to_empty() {
        let json = r#"{
            "id": "emp_002",
            "employment_type": "contract",
            "salary_rates": {"base_rate": "0"}
        }"#;

        let employee: Employee = serde_json::from_str(json).unwrap();
        assert!(employee.name.is_empty());
        assert!(employee.salary_rates.entries().is_empty());
    }

    #[test]
    fn test_employment_type_serialization() {
        assert_eq!(
            serde_json::to_string(&EmploymentType::Contract).unwrap(),
            "\"contract\""
        );
        assert_eq!(
            serde_json::to_string(&EmploymentType::Monthly).unwrap(),
            "\"monthly\""
        );
        assert_eq!(
            serde_json::to_string(&EmploymentType::DailyRoj).unwrap(),
            "\"daily_roj\""
        );
    }

    #[test]
    fn test_is_attendance_based() {
        assert!(EmploymentType::Monthly.is_attendance_based());
        assert!(EmploymentType::DailyRoj.is_attendance_based());
        assert!(!EmploymentType::Contract.is_attendance_based());
    }
}
