//! Rate history resolution.
//!
//! This module answers "what was the rate in month M" for any dated rate
//! history. Every consumer (piece rates, daily rates, roj rates) goes through
//! [`resolve_rate`] so that a revision effective in a later month is never
//! applied to an earlier one.

use rust_decimal::Decimal;

use crate::models::{AuditStep, RateHistory, RateHistoryEntry, YearMonth};

/// The result of a rate lookup, including the rate and audit step.
#[derive(Debug, Clone)]
pub struct RateLookupResult {
    /// The rate in effect for the requested month.
    pub rate: Decimal,
    /// The month the applied entry took effect, or `None` for the base rate.
    pub effective_from: Option<YearMonth>,
    /// The audit step recording this lookup.
    pub audit_step: AuditStep,
}

fn entry_key(entry: &RateHistoryEntry) -> i64 {
    i64::from(entry.effective_from_year) * 100 + i64::from(entry.effective_from_month)
}

fn applicable_entry(history: &[RateHistoryEntry], target: YearMonth) -> Option<&RateHistoryEntry> {
    let target_key = target.key();
    history
        .iter()
        .filter(|entry| entry_key(entry) <= target_key)
        .max_by_key(|entry| entry_key(entry))
}

/// Returns the rate in effect for `target`.
///
/// Picks the entry with the latest effective month that is on or before
/// `target`; falls back to `base_rate` when no entry qualifies. The input does
/// not have to be sorted.
///
/// # Examples
///
/// ```
/// use factory_payroll::calculation::resolve_rate;
/// use factory_payroll::models::{RateHistoryEntry, YearMonth};
/// use rust_decimal::Decimal;
///
/// let history = vec![
///     RateHistoryEntry::new(Decimal::new(12, 0), YearMonth::new(2024, 1).unwrap()).unwrap(),
///     RateHistoryEntry::new(Decimal::new(15, 0), YearMonth::new(2024, 7).unwrap()).unwrap(),
/// ];
/// let base = Decimal::new(10, 0);
///
/// assert_eq!(resolve_rate(&history, base, YearMonth::new(2023, 12).unwrap()), base);
/// assert_eq!(resolve_rate(&history, base, YearMonth::new(2024, 6).unwrap()), Decimal::new(12, 0));
/// assert_eq!(resolve_rate(&history, base, YearMonth::new(2024, 7).unwrap()), Decimal::new(15, 0));
/// ```
pub fn resolve_rate(
    history: &[RateHistoryEntry],
    base_rate: Decimal,
    target: YearMonth,
) -> Decimal {
    applicable_entry(history, target)
        .map(|entry| entry.rate)
        .unwrap_or(base_rate)
}

/// Resolves a rate and records the decision as an audit step.
///
/// `subject` names what the rate is for (e.g. "daily rate", "rod / turning").
pub fn lookup_rate(
    history: &RateHistory,
    target: YearMonth,
    subject: &str,
    step_number: u32,
) -> RateLookupResult {
    let applied = applicable_entry(history.entries(), target);
    let rate = applied
        .map(|entry| entry.rate)
        .unwrap_or(history.base_rate());
    let effective_from = applied.and_then(|entry| entry.effective_from().ok());

    let (source, reasoning) = match effective_from {
        Some(from) => (
            "history",
            format!(
                "{} for {} is {} from the revision effective {}",
                subject, target, rate, from
            ),
        ),
        None => (
            "base_rate",
            format!(
                "No {} revision on or before {}; using base rate {}",
                subject, target, rate
            ),
        ),
    };

    let audit_step = AuditStep {
        step_number,
        rule_id: "rate_resolution".to_string(),
        rule_name: "Rate History Resolution".to_string(),
        input: serde_json::json!({
            "subject": subject,
            "period": target.to_string(),
            "base_rate": history.base_rate().to_string(),
            "revisions": history.entries().len()
        }),
        output: serde_json::json!({
            "rate": rate.to_string(),
            "source": source,
            "effective_from": effective_from.map(|m| m.to_string())
        }),
        reasoning,
    };

    RateLookupResult {
        rate,
        effective_from,
        audit_step,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    fn entry(rate: &str, year: i32, month: u32) -> RateHistoryEntry {
        RateHistoryEntry::new(dec(rate), ym(year, month)).unwrap()
    }

    #[test]
    fn test_empty_history_uses_base_rate() {
        assert_eq!(resolve_rate(&[], dec("3.50"), ym(2024, 5)), dec("3.50"));
    }

    #[test]
    fn test_before_first_entry_uses_base_rate() {
        let history = vec![entry("4.00", 2024, 3)];
        assert_eq!(resolve_rate(&history, dec("3.50"), ym(2024, 2)), dec("3.50"));
    }

    #[test]
    fn test_entry_applies_from_its_effective_month() {
        let history = vec![entry("4.00", 2024, 3)];
        assert_eq!(resolve_rate(&history, dec("3.50"), ym(2024, 3)), dec("4.00"));
        assert_eq!(resolve_rate(&history, dec("3.50"), ym(2025, 1)), dec("4.00"));
    }

    #[test]
    fn test_future_revision_not_applied_retroactively() {
        let history = vec![entry("4.00", 2024, 3), entry("9.00", 2024, 11)];
        assert_eq!(resolve_rate(&history, dec("3.50"), ym(2024, 10)), dec("4.00"));
    }

    #[test]
    fn test_year_boundary_compares_year_before_month() {
        // 2023-12 must not beat 2024-01 just because 12 > 1.
        let history = vec![entry("5.00", 2023, 12), entry("6.00", 2024, 1)];
        assert_eq!(resolve_rate(&history, dec("1"), ym(2024, 2)), dec("6.00"));
        assert_eq!(resolve_rate(&history, dec("1"), ym(2023, 12)), dec("5.00"));
    }

    #[test]
    fn test_unsorted_input_resolves_same_as_sorted() {
        let history = vec![entry("6.00", 2024, 6), entry("5.00", 2024, 1)];
        assert_eq!(resolve_rate(&history, dec("1"), ym(2024, 4)), dec("5.00"));
    }

    #[test]
    fn test_zero_rate_entry_is_honoured() {
        let history = vec![entry("0", 2024, 1)];
        assert_eq!(resolve_rate(&history, dec("2"), ym(2024, 1)), Decimal::ZERO);
    }

    #[test]
    fn test_lookup_rate_audit_step_for_revision() {
        let history =
            RateHistory::with_entries(dec("450"), vec![entry("480", 2024, 4)]).unwrap();

        let result = lookup_rate(&history, ym(2024, 6), "roj rate", 3);

        assert_eq!(result.rate, dec("480"));
        assert_eq!(result.effective_from, Some(ym(2024, 4)));
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.rule_id, "rate_resolution");
        assert_eq!(result.audit_step.output["source"], "history");
        assert_eq!(result.audit_step.output["effective_from"], "2024-04");
        assert!(result.audit_step.reasoning.contains("480"));
    }

    #[test]
    fn test_lookup_rate_audit_step_for_base_rate() {
        let history = RateHistory::new(dec("450"));

        let result = lookup_rate(&history, ym(2024, 6), "roj rate", 1);

        assert_eq!(result.rate, dec("450"));
        assert!(result.effective_from.is_none());
        assert_eq!(result.audit_step.output["source"], "base_rate");
    }
}
