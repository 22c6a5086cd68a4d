// fraudlake-core/src/application/bronze.rs

use tracing::info;

use crate::application::materialization::Materializer;
use crate::domain::transactions::{BRONZE_TABLE, RAW_COLUMNS};
use crate::error::FraudlakeError;
use crate::infrastructure::config::PipelineConfig;
use crate::ports::connector::{AccessMode, Connector, Store};

/// Raw ingestion: landing CSV -> `bronze_transactions` + Parquet snapshot.
///
/// No validation happens here. Malformed rows pass through untouched; the
/// only coercion is a non-throwing cast of `ip_prefix` to text (failures
/// become NULL, never an error). Row count always equals the source.
pub struct BronzeStage {
    csv_path: String,
    parquet_path: String,
}

impl BronzeStage {
    pub fn new(csv_path: impl Into<String>, parquet_path: impl Into<String>) -> Self {
        Self {
            csv_path: csv_path.into(),
            parquet_path: parquet_path.into(),
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(&config.storage.landing_csv, &config.storage.bronze_parquet)
    }

    /// Fixed projection over the auto-detected CSV.
    fn select_sql(&self) -> String {
        let projection = RAW_COLUMNS
            .iter()
            .map(|col| match *col {
                // Source files occasionally carry junk here; keep the row.
                "ip_prefix" => "TRY_CAST(ip_prefix AS VARCHAR) AS ip_prefix".to_string(),
                name => name.to_string(),
            })
            .collect::<Vec<_>>()
            .join(",\n            ");

        format!(
            "SELECT\n            {}\n        FROM read_csv_auto('{}')",
            projection, self.csv_path
        )
    }

    pub async fn run(&self, connector: &dyn Connector) -> Result<(), FraudlakeError> {
        info!(
            "BRONZE: ingesting CSV '{}' into '{}'",
            self.csv_path, BRONZE_TABLE
        );

        Materializer::replace_table(connector, BRONZE_TABLE, &self.select_sql()).await?;
        Materializer::export_parquet(connector, BRONZE_TABLE, &self.parquet_path).await?;

        info!("BRONZE: relation '{}' created", BRONZE_TABLE);
        Ok(())
    }

    /// Orchestrator entry point: scoped read-write session, dropped on exit.
    pub async fn execute(&self, store: &dyn Store) -> Result<(), FraudlakeError> {
        let connector = store.connect(AccessMode::ReadWrite)?;
        self.run(connector.as_ref()).await
    }
}
