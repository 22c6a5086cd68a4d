// fraudlake-core/src/application/gold.rs

use tracing::info;

use crate::application::materialization::Materializer;
use crate::domain::transactions::{GOLD_AVG_RISK_TABLE, GOLD_TOP_SALES_TABLE, SILVER_TABLE};
use crate::error::FraudlakeError;
use crate::infrastructure::config::PipelineConfig;
use crate::ports::connector::{AccessMode, Connector, Store};

/// Mean risk score per region, ordered by riskiest region first.
///
/// Null regions are excluded before grouping; only the empty string is
/// bucketed as 'UNKNOWN'. All groups are retained.
pub struct GoldAvgRiskStage {
    parquet_path: String,
}

impl GoldAvgRiskStage {
    pub fn new(parquet_path: impl Into<String>) -> Self {
        Self {
            parquet_path: parquet_path.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.storage.gold_avg_risk_parquet)
    }

    fn select_sql(&self) -> String {
        format!(
            r#"SELECT
            CASE WHEN
                location_region = '' THEN 'UNKNOWN'
                ELSE location_region
            END AS location_region,
            ROUND(AVG(risk_score), 2) AS avg_risk_score,
            COUNT(*) AS total_transactions
        FROM
            {silver}
        WHERE
            location_region IS NOT NULL
        GROUP BY
            location_region
        ORDER BY
            avg_risk_score DESC"#,
            silver = SILVER_TABLE
        )
    }

    pub async fn run(&self, connector: &dyn Connector) -> Result<(), FraudlakeError> {
        info!("GOLD: building '{}'", GOLD_AVG_RISK_TABLE);

        Materializer::replace_table(connector, GOLD_AVG_RISK_TABLE, &self.select_sql()).await?;
        Materializer::export_parquet(connector, GOLD_AVG_RISK_TABLE, &self.parquet_path).await?;

        info!("GOLD: relation '{}' created", GOLD_AVG_RISK_TABLE);
        Ok(())
    }

    /// Orchestrator entry point: scoped read-write session, dropped on exit.
    pub async fn execute(&self, store: &dyn Store) -> Result<(), FraudlakeError> {
        let connector = store.connect(AccessMode::ReadWrite)?;
        self.run(connector.as_ref()).await
    }
}

/// The 3 highest-amount rows among each recipient's single most recent
/// SALE.
///
/// Ties are broken deterministically: the per-recipient ranking orders
/// by timestamp then amount (both descending), and the final cut orders
/// by amount descending then recipient address ascending.
pub struct GoldTopSalesStage {
    parquet_path: String,
}

impl GoldTopSalesStage {
    pub fn new(parquet_path: impl Into<String>) -> Self {
        Self {
            parquet_path: parquet_path.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.storage.gold_top_sales_parquet)
    }

    fn select_sql(&self) -> String {
        format!(
            r#"WITH latest AS (
            SELECT
                receiving_address,
                amount,
                timestamp,
                ROW_NUMBER() OVER(
                    PARTITION BY receiving_address
                    ORDER BY timestamp DESC, amount DESC
                ) AS sale_rank
            FROM
                {silver}
            WHERE
                transaction_type = 'SALE'
        )
        SELECT
            receiving_address,
            amount,
            timestamp
        FROM
            latest
        WHERE
            sale_rank = 1
        ORDER BY
            amount DESC, receiving_address ASC
        LIMIT 3"#,
            silver = SILVER_TABLE
        )
    }

    pub async fn run(&self, connector: &dyn Connector) -> Result<(), FraudlakeError> {
        info!("GOLD: building '{}'", GOLD_TOP_SALES_TABLE);

        Materializer::replace_table(connector, GOLD_TOP_SALES_TABLE, &self.select_sql()).await?;
        Materializer::export_parquet(connector, GOLD_TOP_SALES_TABLE, &self.parquet_path).await?;

        info!("GOLD: relation '{}' created", GOLD_TOP_SALES_TABLE);
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
    fn test_avg_risk_excludes_null_regions_before_grouping() {
        let sql = GoldAvgRiskStage::new("/tmp/a.parquet").select_sql();
        assert!(sql.contains("location_region IS NOT NULL"));
        // Only the empty string maps to the UNKNOWN bucket
        assert!(sql.contains("location_region = '' THEN 'UNKNOWN'"));
        assert!(sql.contains("ORDER BY\n            avg_risk_score DESC"));
        assert!(!sql.contains("LIMIT"));
    }

    #[test]
    fn test_top_sales_ranks_then_cuts() {
        let sql = GoldTopSalesStage::new("/tmp/t.parquet").select_sql();
        assert!(sql.contains("transaction_type = 'SALE'"));
        assert!(sql.contains("PARTITION BY receiving_address"));
        assert!(sql.contains("sale_rank = 1"));
        assert!(sql.contains("LIMIT 3"));
        // Deterministic tie-breaks on both sorts
        assert!(sql.contains("ORDER BY timestamp DESC, amount DESC"));
        assert!(sql.contains("amount DESC, receiving_address ASC"));
    }
}
