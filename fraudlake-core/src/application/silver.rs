// fraudlake-core/src/application/silver.rs

use tracing::info;

use crate::application::materialization::Materializer;
use crate::domain::transactions::{BRONZE_TABLE, SILVER_TABLE};
use crate::error::FraudlakeError;
use crate::infrastructure::config::PipelineConfig;
use crate::ports::connector::{AccessMode, Connector, Store};

/// Cleaning layer: `bronze_transactions` -> `silver_transactions`.
///
/// Pure row-level reshaping, no filtering: output cardinality equals
/// input cardinality. Per-field rules:
/// - timestamp: epoch seconds to a real timestamp (hard requirement —
///   an unparseable column fails the whole stage);
/// - amount: best-effort decimal, rounded to 2 digits, NULL becomes 0;
/// - risk_score: same parse/round but NULL stays NULL;
/// - location_region: trim, upper, then strip every digit character;
/// - addresses and ip_prefix: trim only;
/// - type / pattern / age group / anomaly: trim + upper;
/// - login_frequency, session_duration: passed through.
pub struct SilverStage {
    parquet_path: String,
}

impl SilverStage {
    pub fn new(parquet_path: impl Into<String>) -> Self {
        Self {
            parquet_path: parquet_path.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.storage.silver_parquet)
    }

    fn select_sql(&self) -> String {
        format!(
            r#"WITH raw AS (
            SELECT * FROM {bronze}
        )
        SELECT
            TO_TIMESTAMP("timestamp") AS timestamp,
            TRIM(sending_address) AS sending_address,
            TRIM(receiving_address) AS receiving_address,
            COALESCE(ROUND(TRY_CAST(amount AS DOUBLE), 2), 0) AS amount,
            TRIM(UPPER(transaction_type)) AS transaction_type,
            REGEXP_REPLACE(TRIM(UPPER(location_region)), '\d', '', 'g') AS location_region,
            TRIM(ip_prefix) AS ip_prefix,
            login_frequency,
            session_duration,
            TRIM(UPPER(purchase_pattern)) AS purchase_pattern,
            TRIM(UPPER(age_group)) AS age_group,
            ROUND(TRY_CAST(risk_score AS DOUBLE), 2) AS risk_score,
            TRIM(UPPER(anomaly)) AS anomaly
        FROM
            raw"#,
            bronze = BRONZE_TABLE
        )
    }

    pub async fn run(&self, connector: &dyn Connector) -> Result<(), FraudlakeError> {
        info!("SILVER: cleaning '{}' into '{}'", BRONZE_TABLE, SILVER_TABLE);

        Materializer::replace_table(connector, SILVER_TABLE, &self.select_sql()).await?;
        Materializer::export_parquet(connector, SILVER_TABLE, &self.parquet_path).await?;

        info!("SILVER: relation '{}' created", SILVER_TABLE);
        Ok(())
    }

    /// Orchestrator entry point: scoped read-write session, dropped on exit.
    pub async fn execute(&self, store: &dyn Store) -> Result<(), FraudlakeError> {
        let connector = store.connect(AccessMode::ReadWrite)?;
        self.run(connector.as_ref()).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_silver_field_rules_present() {
        let sql = SilverStage::new("/tmp/s.parquet").select_sql();

        // amount defaults to 0, risk_score keeps NULL (no COALESCE)
        assert!(sql.contains("COALESCE(ROUND(TRY_CAST(amount AS DOUBLE), 2), 0) AS amount"));
        assert!(sql.contains("ROUND(TRY_CAST(risk_score AS DOUBLE), 2) AS risk_score"));
        assert!(!sql.contains("COALESCE(ROUND(TRY_CAST(risk_score"));

        // global digit strip on the region, not just leading/trailing
        assert!(sql.contains(r"REGEXP_REPLACE(TRIM(UPPER(location_region)), '\d', '', 'g')"));

        // untouched passthrough fields
        assert!(sql.contains("login_frequency,"));
        assert!(sql.contains("session_duration,"));

        // ip_prefix is trimmed but never upper-cased
        assert!(sql.contains("TRIM(ip_prefix) AS ip_prefix"));
        assert!(!sql.contains("UPPER(ip_prefix)"));
    }
}
