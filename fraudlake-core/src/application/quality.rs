// fraudlake-core/src/application/quality.rs

use tracing::{error, info};

use crate::domain::error::DomainError;
use crate::domain::quality::{CheckOutcome, silver_battery};
use crate::domain::transactions::SILVER_TABLE;
use crate::error::FraudlakeError;
use crate::ports::connector::{AccessMode, Connector, Store};

/// Runs the fixed check battery against one relation and turns the
/// aggregated result into a single pipeline-halting verdict.
///
/// Two failure modes, deliberately distinct:
/// - a failing predicate or a check whose query cannot execute is
///   recorded and the battery keeps going;
/// - only after every check ran, one `DomainError::QualityGateFailed`
///   carries the concatenated report (the orchestrator must skip the
///   gold layer on this, not retry it).
pub struct QualityGate {
    table_name: String,
}

impl QualityGate {
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
        }
    }

    pub fn for_silver() -> Self {
        Self::new(SILVER_TABLE)
    }

    /// Evaluate every check, never short-circuiting.
    ///
    /// A scalar of "no row / NULL" counts as 0 — absence of a result is
    /// indistinguishable from a legitimate zero by convention.
    pub async fn evaluate(
        &self,
        connector: &dyn Connector,
    ) -> Result<Vec<CheckOutcome>, FraudlakeError> {
        info!(
            "DATA QUALITY: starting validations for '{}'",
            self.table_name
        );

        let mut outcomes = Vec::new();

        for check in silver_battery(&self.table_name) {
            info!("Running check: {}", check.name);

            let outcome = match connector.query_scalar(&check.query).await {
                Ok(scalar) => {
                    let observed = scalar.unwrap_or(0.0);
                    if check.predicate.evaluate(observed) {
                        info!("Check '{}' passed. (Result: {})", check.name, observed);
                        CheckOutcome {
                            name: check.name.clone(),
                            passed: true,
                            observed: Some(observed),
                            message: None,
                        }
                    } else {
                        let message = check.render_failure(observed);
                        error!("{}", message);
                        CheckOutcome {
                            name: check.name.clone(),
                            passed: false,
                            observed: Some(observed),
                            message: Some(message),
                        }
                    }
                }
                // A broken query (evolved schema, bad SQL) is a failed
                // check, not a battery abort.
                Err(e) => {
                    let message = format!("Execution of check '{}' failed: {}", check.name, e);
                    error!("{}", message);
                    CheckOutcome {
                        name: check.name.clone(),
                        passed: false,
                        observed: None,
                        message: Some(message),
                    }
                }
            };

            outcomes.push(outcome);
        }

        Ok(outcomes)
    }

    /// Evaluate, then aggregate into the run verdict.
    pub async fn run(&self, connector: &dyn Connector) -> Result<(), FraudlakeError> {
        let outcomes = self.evaluate(connector).await?;

        let failures: Vec<String> = outcomes
            .iter()
            .filter(|o| !o.passed)
            .filter_map(|o| o.message.clone())
            .collect();

        if !failures.is_empty() {
            return Err(FraudlakeError::Domain(DomainError::QualityGateFailed {
                table: self.table_name.clone(),
                report: failures.join("\n"),
            }));
        }

        info!(
            "All data quality checks for '{}' passed successfully!",
            self.table_name
        );
        Ok(())
    }

    /// Orchestrator entry point: the gate only ever reads.
    pub async fn execute(&self, store: &dyn Store) -> Result<(), FraudlakeError> {
        let connector = store.connect(AccessMode::ReadOnly)?;
        self.run(connector.as_ref()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::error::{DatabaseError, InfrastructureError};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::{Arc, Mutex};

    /// One scripted answer per check, consumed in battery order.
    #[derive(Clone, Copy)]
    enum Script {
        Scalar(Option<f64>),
        ExecutionError,
    }

    struct ScriptedConnector {
        responses: Mutex<VecDeque<Script>>,
        queries_seen: Arc<Mutex<Vec<String>>>,
    }

    impl ScriptedConnector {
        fn with(responses: Vec<Script>) -> Self {
            Self {
                responses: Mutex::new(responses.into()),
                queries_seen: Arc::new(Mutex::new(Vec::new())),
            }
        }
    }

    #[async_trait]
    impl Connector for ScriptedConnector {
        async fn execute(&self, _query: &str) -> Result<(), FraudlakeError> {
            Ok(())
        }
        async fn query_scalar(&self, query: &str) -> Result<Option<f64>, FraudlakeError> {
            self.queries_seen.lock().unwrap().push(query.to_string());
            match self.responses.lock().unwrap().pop_front() {
                Some(Script::Scalar(v)) => Ok(v),
                Some(Script::ExecutionError) | None => Err(FraudlakeError::Infrastructure(
                    InfrastructureError::Database(DatabaseError::DuckDB(
                        duckdb::Error::InvalidQuery,
                    )),
                )),
            }
        }
        fn engine_name(&self) -> &str {
            "scripted"
        }
    }

    /// Battery order: count, ts nulls, amount null-rate, type domain,
    /// negative amounts, risk bounds, risk mean.
    fn healthy_script() -> Vec<Script> {
        vec![
            Script::Scalar(Some(120.0)),
            Script::Scalar(Some(0.0)),
            Script::Scalar(Some(0.0)),
            Script::Scalar(Some(0.0)),
            Script::Scalar(Some(0.0)),
            Script::Scalar(Some(0.0)),
            Script::Scalar(Some(45.5)),
        ]
    }

    #[tokio::test]
    async fn test_gate_passes_on_healthy_table() {
        let connector = ScriptedConnector::with(healthy_script());
        let gate = QualityGate::for_silver();

        gate.run(&connector).await.unwrap();
        // Every check executed exactly once
        assert_eq!(connector.queries_seen.lock().unwrap().len(), 7);
    }

    #[tokio::test]
    async fn test_empty_table_fails_but_all_checks_run() {
        // Every scalar is NULL/no-row (empty table): the coercion to 0
        // fails the emptiness check and the mean band, nothing else.
        let connector = ScriptedConnector::with(vec![Script::Scalar(None); 7]);
        let gate = QualityGate::for_silver();

        let outcomes = gate.evaluate(&connector).await.unwrap();
        assert_eq!(outcomes.len(), 7);
        let passed: Vec<bool> = outcomes.iter().map(|o| o.passed).collect();
        assert_eq!(passed, vec![false, true, true, true, true, true, false]);

        let connector = ScriptedConnector::with(vec![Script::Scalar(None); 7]);
        let err = gate.run(&connector).await.unwrap_err();
        assert!(err.is_quality_verdict());
    }

    #[tokio::test]
    async fn test_mean_band_failure_embeds_observed_value() {
        let mut script = healthy_script();
        script[6] = Script::Scalar(Some(61.0));
        let connector = ScriptedConnector::with(script);
        let gate = QualityGate::for_silver();

        let err = gate.run(&connector).await.unwrap_err();
        let report = err.to_string();
        assert!(report.contains("61.0"), "report was: {}", report);
        assert!(report.contains("[30, 60]"));
    }

    #[tokio::test]
    async fn test_execution_error_is_a_failure_not_an_abort() {
        // The type-domain check errors out mid-battery and the mean band
        // fails: all 7 checks still run and both failures aggregate.
        let mut script = healthy_script();
        script[3] = Script::ExecutionError;
        script[6] = Script::Scalar(Some(75.0));
        let connector = ScriptedConnector::with(script.clone());
        let gate = QualityGate::for_silver();

        let outcomes = gate.evaluate(&connector).await.unwrap();
        assert_eq!(outcomes.len(), 7);
        assert_eq!(outcomes.iter().filter(|o| !o.passed).count(), 2);

        let connector = ScriptedConnector::with(script);
        let err = gate.run(&connector).await.unwrap_err();
        let report = err.to_string();
        // Both the execution error and the predicate failure, newline-joined
        assert!(report.contains("Execution of check"));
        assert!(report.contains("expected band"));
        assert!(report.lines().count() >= 2);
    }
}
