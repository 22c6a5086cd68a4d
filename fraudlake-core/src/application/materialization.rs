// fraudlake-core/src/application/materialization.rs

use crate::error::FraudlakeError;
use crate::infrastructure::fs::ensure_parent_dir;
use crate::ports::connector::Connector;

pub struct Materializer;

impl Materializer {
    /// Replace a relation wholesale from a SELECT (full-refresh semantics).
    ///
    /// Every stage owns exactly one table; DuckDB's CREATE OR REPLACE
    /// makes the rerun idempotent without manual DROPs.
    pub async fn replace_table(
        connector: &dyn Connector,
        table_name: &str,
        select_sql: &str,
    ) -> Result<(), FraudlakeError> {
        let ddl_query = format!("CREATE OR REPLACE TABLE {} AS {}", table_name, select_sql);

        connector.execute(&ddl_query).await.map_err(|e| {
            FraudlakeError::InternalError(format!(
                "Relation '{}' failed.\n    🛑 DB Error: {}\n    📄 Query: {}",
                table_name, e, ddl_query
            ))
        })
    }

    /// Export a relation's full contents to a Parquet snapshot,
    /// overwriting the previous run's file at the same path.
    pub async fn export_parquet(
        connector: &dyn Connector,
        table_name: &str,
        output_path: &str,
    ) -> Result<(), FraudlakeError> {
        ensure_parent_dir(output_path)?;

        let copy_query = format!(
            "COPY (SELECT * FROM {}) TO '{}' (FORMAT PARQUET)",
            table_name, output_path
        );
        connector.execute(&copy_query).await
    }
}
