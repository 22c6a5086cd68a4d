// fraudlake-core/src/domain/quality/check.rs

use serde::{Deserialize, Serialize};

/// Comparison applied to the scalar a check computes.
///
/// Checks are plain data (tagged-list-of-rules pattern): an enumerated
/// comparison kind plus operands, never an opaque closure. This keeps the
/// battery serializable and each predicate testable in isolation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Predicate {
    GreaterThan { threshold: f64 },
    Equals { expected: f64 },
    LessThan { threshold: f64 },
    /// Passes while `value * 100 < pct` (null-rate style thresholds).
    BelowPercent { pct: f64 },
    /// Inclusive on both bounds.
    Within { min: f64, max: f64 },
}

impl Predicate {
    pub fn evaluate(&self, value: f64) -> bool {
        match *self {
            Predicate::GreaterThan { threshold } => value > threshold,
            Predicate::Equals { expected } => value == expected,
            Predicate::LessThan { threshold } => value < threshold,
            Predicate::BelowPercent { pct } => value * 100.0 < pct,
            Predicate::Within { min, max } => value >= min && value <= max,
        }
    }
}

/// One declarative quality rule: a scalar-producing query, the predicate
/// that must hold over it, and the message emitted when it does not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityCheck {
    pub name: String,
    pub query: String,
    pub predicate: Predicate,
    /// `{result}` is replaced with the observed scalar (2 decimals).
    pub error_message: String,
}

impl QualityCheck {
    pub fn render_failure(&self, observed: f64) -> String {
        let detail = self
            .error_message
            .replace("{result}", &format!("{:.2}", observed));
        format!("Check '{}' failed: {}", self.name, detail)
    }
}

/// What the gate records for a single check, pass or fail.
#[derive(Debug, Clone, Serialize)]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    /// Scalar the query produced (already coerced: no row / NULL -> 0).
    /// `None` only when the query itself failed to execute.
    pub observed: Option<f64>,
    /// Rendered failure (or execution error) message; `None` on pass.
    pub message: Option<String>,
}
