//! Monthly salary composition.
//!
//! [`compose_salary`] applies the per-employment-type pay formula to already
//! aggregated figures. [`calculate_salary`] runs the whole pipeline from raw
//! records: rate resolution, attendance or piece-rate earnings, upad, loan
//! EMI, and the net figure, recording each step in an audit trace.

use std::time::Instant;

use chrono::Utc;
use rust_decimal::{Decimal, RoundingStrategy};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::attendance::{OvertimeTotals, overtime_totals, present_days};
use super::loan_ledger::{employee_loan_position, find_orphaned_transactions, validate_ledger};
use super::rate_resolution::lookup_rate;
use super::upad::upad_total;
use super::work_log_earnings::{WorkLogEarnings, compute_daily_and_month_totals};
use crate::config::{PayrollConfig, PayrollSettings};
use crate::error::{EngineError, EngineResult};
use crate::models::{
    AttendanceRecord, AuditStep, AuditTrace, AuditWarning, Employee, EmploymentType, Loan,
    LoanTransaction, OvertimeEntry, SalaryBreakdown, SalaryReport, UpadEntry, WorkLogEntry,
    YearMonth,
};

/// Warning code raised when deductions exceed gross pay.
pub const NEGATIVE_NET_AMOUNT: &str = "NEGATIVE_NET_AMOUNT";

/// Warning code raised when loan transactions reference a missing loan.
pub const ORPHANED_LOAN_TRANSACTIONS: &str = "ORPHANED_LOAN_TRANSACTIONS";

/// What basic pay is computed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EarningsBasis {
    /// Present days, plus overtime for daily workers.
    Attendance {
        /// Days marked present in the month.
        present_days: u32,
        /// The month's overtime; daily workers only.
        overtime: Option<OvertimeTotals>,
    },
    /// Piece-rate month total from work logs.
    PieceRate {
        /// Sum of the month's priced work logs.
        month_total: Decimal,
    },
}

/// Amounts deducted from (or reported alongside) basic pay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Deductions {
    /// Total salary advances for the month.
    pub upad: Decimal,
    /// Total loan EMI for the month.
    pub loan_emi: Decimal,
    /// Outstanding loan balance; reported, not deducted.
    pub pending_loan: Decimal,
}

/// Overtime pay: each row's hours at its explicit rate, or at
/// `roj_rate / hours_per_day` when it has none. Rounded to paise.
pub fn overtime_amount(
    overtime: &OvertimeTotals,
    roj_rate: Decimal,
    hours_per_day: Decimal,
) -> EngineResult<Decimal> {
    if hours_per_day <= Decimal::ZERO {
        return Err(EngineError::validation(
            "overtime_hours_per_day",
            "must be positive",
        ));
    }
    let default_rate = roj_rate / hours_per_day;
    let amount: Decimal = overtime
        .rows
        .iter()
        .map(|row| row.hours * row.rate.unwrap_or(default_rate))
        .sum();
    Ok(amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Applies the pay formula for the employee's employment type.
///
/// - Monthly: `present_days * daily rate`
/// - Daily roj: `present_days * roj rate + overtime`
/// - Contract: the piece-rate month total
///
/// Then `net = basic - upad - loan EMI`. The pending loan balance is carried
/// through for reporting only. A negative net is returned as-is.
///
/// # Errors
///
/// - The basis does not fit the employment type (`Validation`)
/// - A deduction is negative (`Validation`)
pub fn compose_salary(
    employee: &Employee,
    period: YearMonth,
    basis: &EarningsBasis,
    deductions: Deductions,
    settings: &PayrollSettings,
) -> EngineResult<SalaryBreakdown> {
    for (field, value) in [
        ("upad", deductions.upad),
        ("loan_emi", deductions.loan_emi),
        ("pending_loan", deductions.pending_loan),
    ] {
        if value < Decimal::ZERO {
            return Err(EngineError::validation(
                field,
                format!("{} must not be negative", value),
            ));
        }
    }

    let (basic, overtime) = match (employee.employment_type, basis) {
        (
            EmploymentType::Monthly,
            EarningsBasis::Attendance {
                present_days,
                overtime,
            },
        ) => {
            if overtime.as_ref().is_some_and(|o| !o.rows.is_empty()) {
                return Err(EngineError::validation(
                    "overtime",
                    "overtime is paid to daily roj employees only",
                ));
            }
            let rate = employee.salary_rates.rate_for(period);
            (Decimal::from(*present_days) * rate, Decimal::ZERO)
        }
        (
            EmploymentType::DailyRoj,
            EarningsBasis::Attendance {
                present_days,
                overtime,
            },
        ) => {
            let rate = employee.salary_rates.rate_for(period);
            let overtime = match overtime {
                Some(totals) => overtime_amount(totals, rate, settings.overtime_hours_per_day)?,
                None => Decimal::ZERO,
            };
            (Decimal::from(*present_days) * rate + overtime, overtime)
        }
        (EmploymentType::Contract, EarningsBasis::PieceRate { month_total }) => {
            (*month_total, Decimal::ZERO)
        }
        (employment_type, _) => {
            return Err(EngineError::validation(
                "basis",
                format!(
                    "earnings basis does not apply to {:?} employee '{}'",
                    employment_type, employee.id
                ),
            ));
        }
    };

    Ok(SalaryBreakdown {
        basic,
        overtime_amount: overtime,
        upad: deductions.upad,
        loan_installment: deductions.loan_emi,
        pending_loan: deductions.pending_loan,
        net_amount: basic - deductions.upad - deductions.loan_emi,
    })
}

/// Everything needed to pay one employee for one month.
///
/// Collections may hold records for other employees or months; they are
/// filtered out. Loan transactions must cover all months so that
/// paid-to-date is complete.
#[derive(Debug, Clone, Copy)]
pub struct SalaryInputs<'a> {
    /// The employee being paid.
    pub employee: &'a Employee,
    /// The month being paid.
    pub period: YearMonth,
    /// Attendance records.
    pub attendance: &'a [AttendanceRecord],
    /// Overtime entries.
    pub overtime: &'a [OvertimeEntry],
    /// Piece-rate work logs.
    pub work_logs: &'a [WorkLogEntry],
    /// Salary advances.
    pub upads: &'a [UpadEntry],
    /// The employee's loans.
    pub loans: &'a [Loan],
    /// Transactions of the employee's loans, all months.
    pub loan_transactions: &'a [LoanTransaction],
}

struct StepRecorder {
    steps: Vec<AuditStep>,
}

impl StepRecorder {
    fn next_number(&self) -> u32 {
        self.steps.len() as u32 + 1
    }

    fn push(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.next_number();
        self.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            input,
            output,
            reasoning,
        });
    }
}

/// Computes an employee's salary report for a month from raw records.
///
/// # Errors
///
/// Propagates validation and not-found errors from the individual steps.
/// Negative net pay and orphaned loan transactions are reported as warnings
/// on the report, not as errors.
pub fn calculate_salary(
    inputs: &SalaryInputs<'_>,
    config: &PayrollConfig,
) -> EngineResult<SalaryReport> {
    let start_time = Instant::now();
    let employee = inputs.employee;
    let period = inputs.period;
    let settings = config.settings();
    let mut recorder = StepRecorder { steps: Vec::new() };
    let mut warnings: Vec<AuditWarning> = Vec::new();

    debug!(employee_id = %employee.id, period = %period, "Calculating salary");

    let mut daily_rate = None;
    let mut days_present = None;
    let mut overtime_detail = None;
    let mut earnings: Option<WorkLogEarnings> = None;

    let basis = match employee.employment_type {
        EmploymentType::Monthly | EmploymentType::DailyRoj => {
            let subject = if employee.employment_type == EmploymentType::Monthly {
                "daily rate"
            } else {
                "roj rate"
            };
            let lookup = lookup_rate(
                &employee.salary_rates,
                period,
                subject,
                recorder.next_number(),
            );
            recorder.steps.push(lookup.audit_step);
            daily_rate = Some(lookup.rate);

            let records: Vec<AttendanceRecord> = inputs
                .attendance
                .iter()
                .filter(|r| r.employee_id == employee.id && period.contains_date(r.date))
                .cloned()
                .collect();
            let present = present_days(&records);
            recorder.push(
                "attendance_presence",
                "Attendance Presence",
                serde_json::json!({ "records": records.len() }),
                serde_json::json!({ "present_days": present }),
                format!("{} present days recorded in {}", present, period),
            );
            days_present = Some(present);

            let overtime = if employee.employment_type == EmploymentType::DailyRoj {
                let entries: Vec<OvertimeEntry> = inputs
                    .overtime
                    .iter()
                    .filter(|o| o.employee_id == employee.id && period.contains_date(o.date))
                    .cloned()
                    .collect();
                let totals = overtime_totals(&entries)?;
                let amount =
                    overtime_amount(&totals, lookup.rate, settings.overtime_hours_per_day)?;
                recorder.push(
                    "overtime_amount",
                    "Roj Overtime",
                    serde_json::json!({
                        "total_hours": totals.total_hours.to_string(),
                        "roj_rate": lookup.rate.to_string(),
                        "hours_per_day": settings.overtime_hours_per_day.to_string()
                    }),
                    serde_json::json!({ "amount": amount.to_string() }),
                    format!(
                        "{} overtime hours paid {} (explicit rates, else roj rate / {})",
                        totals.total_hours, amount, settings.overtime_hours_per_day
                    ),
                );
                overtime_detail = Some(totals.clone());
                Some(totals)
            } else {
                None
            };

            EarningsBasis::Attendance {
                present_days: present,
                overtime,
            }
        }
        EmploymentType::Contract => {
            let logs: Vec<WorkLogEntry> = inputs
                .work_logs
                .iter()
                .filter(|l| l.employee_id == employee.id && period.contains_date(l.date))
                .cloned()
                .collect();
            let priced = compute_daily_and_month_totals(&logs, config.catalog())?;
            recorder.push(
                "piece_rate_earnings",
                "Piece-Rate Earnings",
                serde_json::json!({ "work_logs": logs.len() }),
                serde_json::json!({
                    "days": priced.daily_logs.len(),
                    "job_columns": priced.job_columns.len(),
                    "month_total": priced.month_total.to_string()
                }),
                format!(
                    "{} work logs over {} days earned {}",
                    logs.len(),
                    priced.daily_logs.len(),
                    priced.month_total
                ),
            );
            let month_total = priced.month_total;
            earnings = Some(priced);
            EarningsBasis::PieceRate { month_total }
        }
    };

    let upad = upad_total(inputs.upads, &employee.id, period)?;
    recorder.push(
        "upad_total",
        "Salary Advances",
        serde_json::json!({ "period": period.to_string() }),
        serde_json::json!({ "upad": upad.to_string() }),
        format!("Advances of {} deducted for {}", upad, period),
    );

    let employee_transactions: Vec<LoanTransaction> = inputs
        .loan_transactions
        .iter()
        .filter(|tx| tx.employee_id == employee.id)
        .cloned()
        .collect();
    validate_ledger(inputs.loans, &employee_transactions)?;
    let position = employee_loan_position(
        &employee.id,
        inputs.loans,
        &employee_transactions,
        period,
        settings.loan_close_tolerance,
    );
    recorder.push(
        "loan_emi",
        "Loan EMI",
        serde_json::json!({ "loans": position.loans.len() }),
        serde_json::json!({
            "emi_total": position.emi_total.to_string(),
            "pending_total": position.pending_total.to_string()
        }),
        format!(
            "{} loans deduct {} this month with {} pending",
            position.loans.len(),
            position.emi_total,
            position.pending_total
        ),
    );

    let orphans = find_orphaned_transactions(inputs.loans, &employee_transactions);
    if !orphans.is_empty() {
        warnings.push(AuditWarning {
            code: ORPHANED_LOAN_TRANSACTIONS.to_string(),
            message: format!(
                "{} loan transactions reference loans that no longer exist",
                orphans.len()
            ),
            severity: "medium".to_string(),
        });
    }

    let breakdown = compose_salary(
        employee,
        period,
        &basis,
        Deductions {
            upad,
            loan_emi: position.emi_total,
            pending_loan: position.pending_total,
        },
        settings,
    )?;
    recorder.push(
        "net_salary",
        "Net Salary",
        serde_json::json!({
            "basic": breakdown.basic.to_string(),
            "upad": breakdown.upad.to_string(),
            "loan_installment": breakdown.loan_installment.to_string()
        }),
        serde_json::json!({ "net_amount": breakdown.net_amount.to_string() }),
        format!(
            "{} - {} upad - {} EMI = {}",
            breakdown.basic, breakdown.upad, breakdown.loan_installment, breakdown.net_amount
        ),
    );

    if breakdown.is_negative() {
        warn!(
            employee_id = %employee.id,
            period = %period,
            net_amount = %breakdown.net_amount,
            "Deductions exceed gross pay"
        );
        warnings.push(AuditWarning {
            code: NEGATIVE_NET_AMOUNT.to_string(),
            message: format!(
                "Net salary is {}; deductions exceed gross pay",
                breakdown.net_amount
            ),
            severity: "high".to_string(),
        });
    }

    let duration = start_time.elapsed();
    info!(
        employee_id = %employee.id,
        period = %period,
        net_amount = %breakdown.net_amount,
        duration_us = duration.as_micros(),
        "Salary calculated"
    );

    Ok(SalaryReport {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        employee_id: employee.id.clone(),
        employment_type: employee.employment_type,
        period,
        daily_rate,
        present_days: days_present,
        overtime: overtime_detail,
        earnings,
        loans: position.loans,
        breakdown,
        audit_trace: AuditTrace {
            steps: recorder.steps,
            warnings,
            duration_us: duration.as_micros() as u64,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{JobCatalog, JobTypeConfig};
    use crate::models::{LoanStatus, PartType, RateHistory, RateHistoryEntry, TransactionMode};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn employee(employment_type: EmploymentType, base: &str) -> Employee {
        Employee {
            id: "emp_001".to_string(),
            name: "Test Worker".to_string(),
            employment_type,
            salary_rates: RateHistory::new(dec(base)),
        }
    }

    fn attendance(day: u32, present: bool) -> AttendanceRecord {
        AttendanceRecord {
            employee_id: "emp_001".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            present,
            note: None,
        }
    }

    fn config() -> PayrollConfig {
        let catalog = JobCatalog::new(vec![JobTypeConfig {
            part_type: PartType::Rod,
            job_name: "cutting".to_string(),
            rates: RateHistory::new(dec("2.00")),
        }])
        .unwrap();
        PayrollConfig::new(PayrollSettings::default(), catalog)
    }

    fn inputs<'a>(employee: &'a Employee) -> SalaryInputs<'a> {
        SalaryInputs {
            employee,
            period: ym(2024, 3),
            attendance: &[],
            overtime: &[],
            work_logs: &[],
            upads: &[],
            loans: &[],
            loan_transactions: &[],
        }
    }

    #[test]
    fn test_monthly_basic_is_present_days_times_daily_rate() {
        let employee = employee(EmploymentType::Monthly, "600");
        let basis = EarningsBasis::Attendance {
            present_days: 25,
            overtime: None,
        };

        let breakdown = compose_salary(
            &employee,
            ym(2024, 3),
            &basis,
            Deductions {
                upad: dec("2000"),
                loan_emi: dec("1000"),
                pending_loan: dec("5000"),
            },
            &PayrollSettings::default(),
        )
        .unwrap();

        assert_eq!(breakdown.basic, dec("15000"));
        assert_eq!(breakdown.net_amount, dec("12000"));
        assert_eq!(breakdown.pending_loan, dec("5000"));
    }

    fn compose(
        employee: &Employee,
        period: YearMonth,
        basis: &EarningsBasis,
    ) -> EngineResult<SalaryBreakdown> {
        compose_salary(
            employee,
            period,
            basis,
            Deductions::default(),
            &PayrollSettings::default(),
        )
    }

    #[test]
    fn test_monthly_rate_follows_history() {
        let mut employee = employee(EmploymentType::Monthly, "600");
        employee
            .salary_rates
            .insert(RateHistoryEntry::new(dec("650"), ym(2024, 4)).unwrap())
            .unwrap();
        let basis = EarningsBasis::Attendance {
            present_days: 10,
            overtime: None,
        };

        let march = compose(&employee, ym(2024, 3), &basis).unwrap();
        let april = compose(&employee, ym(2024, 4), &basis).unwrap();

        assert_eq!(march.basic, dec("6000"));
        assert_eq!(april.basic, dec("6500"));
    }

    #[test]
    fn test_roj_overtime_uses_explicit_rate_or_roj_over_eight() {
        let employee = employee(EmploymentType::DailyRoj, "480");
        let overtime = overtime_totals(&[
            OvertimeEntry {
                employee_id: "emp_001".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap(),
                hours: dec("2"),
                rate: None,
            },
            OvertimeEntry {
                employee_id: "emp_001".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
                hours: dec("3"),
                rate: Some(dec("75")),
            },
        ])
        .unwrap();
        let basis = EarningsBasis::Attendance {
            present_days: 20,
            overtime: Some(overtime),
        };

        let breakdown = compose(&employee, ym(2024, 3), &basis).unwrap();

        // 2h * 60 + 3h * 75
        assert_eq!(breakdown.overtime_amount, dec("345.00"));
        assert_eq!(breakdown.basic, dec("9945.00"));
    }

    #[test]
    fn test_contract_basic_is_month_total() {
        let employee = employee(EmploymentType::Contract, "0");
        let basis = EarningsBasis::PieceRate {
            month_total: dec("8420.50"),
        };

        let breakdown = compose_salary(
            &employee,
            ym(2024, 3),
            &basis,
            Deductions {
                upad: dec("420.50"),
                loan_emi: Decimal::ZERO,
                pending_loan: Decimal::ZERO,
            },
            &PayrollSettings::default(),
        )
        .unwrap();

        assert_eq!(breakdown.net_amount, dec("8000.00"));
    }

    #[test]
    fn test_negative_net_is_not_clamped() {
        let employee = employee(EmploymentType::Contract, "0");
        let basis = EarningsBasis::PieceRate {
            month_total: dec("500"),
        };

        let breakdown = compose_salary(
            &employee,
            ym(2024, 3),
            &basis,
            Deductions {
                upad: dec("800"),
                loan_emi: dec("1000"),
                pending_loan: dec("3000"),
            },
            &PayrollSettings::default(),
        )
        .unwrap();

        assert_eq!(breakdown.net_amount, dec("-1300"));
        assert!(breakdown.is_negative());
    }

    #[test]
    fn test_mismatched_basis_rejected() {
        let employee = employee(EmploymentType::Contract, "0");
        let basis = EarningsBasis::Attendance {
            present_days: 3,
            overtime: None,
        };

        let result = compose(&employee, ym(2024, 3), &basis);
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_negative_deduction_rejected() {
        let employee = employee(EmploymentType::Contract, "0");
        let basis = EarningsBasis::PieceRate {
            month_total: dec("10"),
        };
        let deductions = Deductions {
            upad: dec("-1"),
            ..Deductions::default()
        };

        let result = compose_salary(
            &employee,
            ym(2024, 3),
            &basis,
            deductions,
            &PayrollSettings::default(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_calculate_salary_monthly_with_loan_and_upad() {
        let employee = employee(EmploymentType::Monthly, "500");
        let records: Vec<AttendanceRecord> = (1..=22).map(|d| attendance(d, true)).collect();
        let upads = vec![UpadEntry {
            id: "u1".to_string(),
            employee_id: "emp_001".to_string(),
            period: ym(2024, 3),
            amount: dec("1500"),
            note: None,
        }];
        let loans = vec![Loan {
            id: "loan_1".to_string(),
            employee_id: "emp_001".to_string(),
            start: ym(2024, 1),
            principal: dec("6000"),
            default_installment: dec("1000"),
            status: LoanStatus::Active,
            note: None,
        }];

        let mut inputs = inputs(&employee);
        inputs.attendance = &records;
        inputs.upads = &upads;
        inputs.loans = &loans;

        let report = calculate_salary(&inputs, &config()).unwrap();

        assert_eq!(report.present_days, Some(22));
        assert_eq!(report.daily_rate, Some(dec("500")));
        assert_eq!(report.breakdown.basic, dec("11000"));
        assert_eq!(report.breakdown.upad, dec("1500"));
        assert_eq!(report.breakdown.loan_installment, dec("1000"));
        assert_eq!(report.breakdown.pending_loan, dec("5000"));
        assert_eq!(report.breakdown.net_amount, dec("8500"));

        let rule_ids: Vec<&str> = report
            .audit_trace
            .steps
            .iter()
            .map(|s| s.rule_id.as_str())
            .collect();
        assert_eq!(
            rule_ids,
            vec!["rate_resolution", "attendance_presence", "upad_total", "loan_emi", "net_salary"]
        );
        assert!(report.audit_trace.warnings.is_empty());
    }

    #[test]
    fn test_calculate_salary_contract_uses_catalog() {
        let employee = employee(EmploymentType::Contract, "0");
        let logs = vec![WorkLogEntry {
            id: "wl_1".to_string(),
            employee_id: "emp_001".to_string(),
            part_type: PartType::Rod,
            job_name: "cutting".to_string(),
            quantity: 1000,
            rejection: 50,
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            size: Some("12mm".to_string()),
        }];
        let mut inputs = inputs(&employee);
        inputs.work_logs = &logs;

        let report = calculate_salary(&inputs, &config()).unwrap();

        assert_eq!(report.breakdown.basic, dec("1900.00"));
        assert!(report.earnings.is_some());
        assert!(report.present_days.is_none());
    }

    #[test]
    fn test_calculate_salary_filters_other_months_and_employees() {
        let employee = employee(EmploymentType::Monthly, "100");
        let mut other_employee = attendance(1, true);
        other_employee.employee_id = "emp_999".to_string();
        let mut other_month = attendance(1, true);
        other_month.date = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let records = vec![attendance(1, true), other_employee, other_month];

        let mut inputs = inputs(&employee);
        inputs.attendance = &records;

        let report = calculate_salary(&inputs, &config()).unwrap();
        assert_eq!(report.present_days, Some(1));
    }

    #[test]
    fn test_calculate_salary_flags_negative_net_and_orphans() {
        let employee = employee(EmploymentType::Monthly, "100");
        let upads = vec![UpadEntry {
            id: "u1".to_string(),
            employee_id: "emp_001".to_string(),
            period: ym(2024, 3),
            amount: dec("900"),
            note: None,
        }];
        let orphan = vec![LoanTransaction {
            id: "tx_orphan".to_string(),
            loan_id: "deleted".to_string(),
            employee_id: "emp_001".to_string(),
            period: ym(2024, 3),
            amount: dec("100"),
            mode: TransactionMode::SalaryDeduction,
            note: None,
        }];
        let mut inputs = inputs(&employee);
        inputs.upads = &upads;
        inputs.loan_transactions = &orphan;

        let report = calculate_salary(&inputs, &config()).unwrap();

        assert_eq!(report.breakdown.net_amount, dec("-900"));
        assert!(report.audit_trace.has_warning(NEGATIVE_NET_AMOUNT));
        assert!(report.audit_trace.has_warning(ORPHANED_LOAN_TRANSACTIONS));
    }

    #[test]
    fn test_calculate_salary_rejects_negative_loan_transaction() {
        let employee = employee(EmploymentType::Monthly, "100");
        let loans = vec![Loan {
            id: "loan_1".to_string(),
            employee_id: "emp_001".to_string(),
            start: ym(2024, 1),
            principal: dec("6000"),
            default_installment: dec("1000"),
            status: LoanStatus::Active,
            note: None,
        }];
        let transactions = vec![LoanTransaction {
            id: "tx_1".to_string(),
            loan_id: "loan_1".to_string(),
            employee_id: "emp_001".to_string(),
            period: ym(2024, 1),
            amount: dec("-500"),
            mode: TransactionMode::SalaryDeduction,
            note: None,
        }];
        let mut inputs = inputs(&employee);
        inputs.loans = &loans;
        inputs.loan_transactions = &transactions;

        let result = calculate_salary(&inputs, &config());
        assert!(matches!(result, Err(EngineError::Validation { .. })));
    }

    #[test]
    fn test_calculate_salary_unknown_job_is_not_found() {
        let employee = employee(EmploymentType::Contract, "0");
        let logs = vec![WorkLogEntry {
            id: "wl_1".to_string(),
            employee_id: "emp_001".to_string(),
            part_type: PartType::Sleeve,
            job_name: "knurling".to_string(),
            quantity: 10,
            rejection: 0,
            date: NaiveDate::from_ymd_opt(2024, 3, 8).unwrap(),
            size: None,
        }];
        let mut inputs = inputs(&employee);
        inputs.work_logs = &logs;

        let result = calculate_salary(&inputs, &config());
        assert!(matches!(result, Err(EngineError::JobTypeNotFound { .. })));
    }
}
