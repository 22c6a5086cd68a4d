// fraudlake-core/src/domain/quality/battery.rs

use crate::domain::quality::check::{Predicate, QualityCheck};
use crate::domain::transactions::transaction_type_sql_list;

/// The fixed battery run against the silver table before the gold layer.
///
/// Order only matters for reporting. Every check runs regardless of
/// earlier failures; the gate aggregates afterwards.
pub fn silver_battery(table: &str) -> Vec<QualityCheck> {
    vec![
        QualityCheck {
            name: "The table must not be empty".into(),
            query: format!("SELECT COUNT(*) FROM {}", table),
            predicate: Predicate::GreaterThan { threshold: 0.0 },
            error_message: format!("The table '{}' is empty.", table),
        },
        QualityCheck {
            name: "The 'timestamp' column must not contain nulls".into(),
            query: format!("SELECT COUNT(*) FROM {} WHERE timestamp IS NULL", table),
            predicate: Predicate::Equals { expected: 0.0 },
            error_message: "Found null values in the 'timestamp' column.".into(),
        },
        QualityCheck {
            name: "The null-rate of 'amount' must be < 1%".into(),
            query: format!(
                "SELECT CAST(SUM(CASE WHEN amount IS NULL THEN 1 ELSE 0 END) AS DOUBLE) / COUNT(*) FROM {}",
                table
            ),
            predicate: Predicate::BelowPercent { pct: 1.0 },
            error_message: "Null-rate conformity for 'amount' failed (observed rate: {result})."
                .into(),
        },
        QualityCheck {
            name: "The 'transaction_type' column must only hold valid values".into(),
            query: format!(
                "SELECT COUNT(*) FROM {} WHERE transaction_type NOT IN ({})",
                table,
                transaction_type_sql_list()
            ),
            predicate: Predicate::Equals { expected: 0.0 },
            error_message:
                "Found invalid values in the 'transaction_type' column ({result} rows).".into(),
        },
        QualityCheck {
            name: "The 'amount' column must not contain negative values".into(),
            query: format!("SELECT COUNT(*) FROM {} WHERE amount < 0", table),
            predicate: Predicate::Equals { expected: 0.0 },
            error_message: "Found negative values in the 'amount' column ({result} rows).".into(),
        },
        QualityCheck {
            name: "The 'risk_score' column must stay within [0, 100]".into(),
            query: format!(
                "SELECT COUNT(*) FROM {} WHERE risk_score < 0 OR risk_score > 100",
                table
            ),
            predicate: Predicate::Equals { expected: 0.0 },
            error_message: "Found 'risk_score' values outside [0, 100] ({result} rows).".into(),
        },
        QualityCheck {
            name: "The mean 'risk_score' must sit in the expected band".into(),
            query: format!("SELECT ROUND(AVG(risk_score), 2) FROM {}", table),
            predicate: Predicate::Within {
                min: 30.0,
                max: 60.0,
            },
            error_message:
                "Mean 'risk_score' is outside the expected band [30, 60] (observed mean: {result})."
                    .into(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_battery_shape() {
        let checks = silver_battery("silver_transactions");
        assert_eq!(checks.len(), 7);
        // Every query targets the requested table.
        for check in &checks {
            assert!(check.query.contains("silver_transactions"), "{}", check.name);
        }
    }

    #[test]
    fn test_empty_table_outcomes() {
        // An empty table yields no-row/NULL scalars, coerced to 0 by the
        // gate: the emptiness check fails, the zero-count checks pass
        // vacuously, and the mean band fails (0 is outside [30, 60]).
        let checks = silver_battery("t");
        let verdicts: Vec<bool> = checks.iter().map(|c| c.predicate.evaluate(0.0)).collect();
        assert_eq!(
            verdicts,
            vec![false, true, true, true, true, true, false]
        );
    }

    #[test]
    fn test_type_domain_check_lists_all_values() {
        let checks = silver_battery("t");
        let domain_check = &checks[3];
        for t in ["PURCHASE", "SALE", "TRANSFER", "PHISHING", "SCAM"] {
            assert!(domain_check.query.contains(t));
        }
    }
}
