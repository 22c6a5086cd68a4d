// fraudlake-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use duckdb::types::Value;
use duckdb::{Config, Connection};
use std::sync::{Arc, Mutex};

// Imports Hexagonaux
use crate::error::FraudlakeError;
use crate::ports::connector::{AccessMode, Connector, Store};

pub struct DuckDBConnector {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBConnector {
    /// Open a session on the shared store file.
    ///
    /// The quality gate opens `ReadOnly`; the transform stages open
    /// `ReadWrite` (the duckdb default).
    pub fn open(db_path: &str, mode: AccessMode) -> Result<Self, FraudlakeError> {
        let config = match mode {
            AccessMode::ReadWrite => Config::default(),
            AccessMode::ReadOnly => Config::default().access_mode(duckdb::AccessMode::ReadOnly)?,
        };

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, FraudlakeError> {
        self.conn
            .lock()
            .map_err(|_| FraudlakeError::InternalError("DuckDB Mutex Poisoned".into()))
    }
}

#[async_trait]
impl Connector for DuckDBConnector {
    async fn execute(&self, query: &str) -> Result<(), FraudlakeError> {
        let conn = self.lock()?;
        conn.execute_batch(query)?;
        Ok(())
    }

    async fn query_scalar(&self, query: &str) -> Result<Option<f64>, FraudlakeError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(query)?;
        let mut rows = stmt.query([])?;

        let Some(row) = rows.next()? else {
            return Ok(None);
        };

        let cell: Value = row.get(0)?;
        value_to_f64(cell)
    }

    fn engine_name(&self) -> &str {
        "duckdb"
    }
}

/// Numeric widening of whatever DuckDB hands back for a scalar cell.
/// COUNT yields BIGINT, AVG/ROUND yield DOUBLE; NULL becomes `None`.
fn value_to_f64(value: Value) -> Result<Option<f64>, FraudlakeError> {
    let v = match value {
        Value::Null => return Ok(None),
        Value::TinyInt(v) => v as f64,
        Value::SmallInt(v) => v as f64,
        Value::Int(v) => v as f64,
        Value::BigInt(v) => v as f64,
        Value::HugeInt(v) => v as f64,
        Value::UTinyInt(v) => v as f64,
        Value::USmallInt(v) => v as f64,
        Value::UInt(v) => v as f64,
        Value::UBigInt(v) => v as f64,
        Value::Float(v) => v as f64,
        Value::Double(v) => v,
        other => {
            return Err(FraudlakeError::InternalError(format!(
                "Scalar query returned a non-numeric value: {:?}",
                other
            )));
        }
    };
    Ok(Some(v))
}

/// Connection factory over one store file. Stages connect, work, and drop
/// their session before the next stage starts.
pub struct DuckDBStore {
    db_path: String,
}

impl DuckDBStore {
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }
}

impl Store for DuckDBStore {
    fn connect(&self, mode: AccessMode) -> Result<Box<dyn Connector>, FraudlakeError> {
        Ok(Box::new(DuckDBConnector::open(&self.db_path, mode)?))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;

    #[tokio::test]
    async fn test_scalar_count_and_avg() -> Result<()> {
        let connector = DuckDBConnector::open(":memory:", AccessMode::ReadWrite)?;

        connector
            .execute("CREATE TABLE scores (v DOUBLE); INSERT INTO scores VALUES (10), (20)")
            .await?;

        // COUNT comes back as BIGINT
        let count = connector
            .query_scalar("SELECT COUNT(*) FROM scores")
            .await?;
        assert_eq!(count, Some(2.0));

        // AVG comes back as DOUBLE
        let avg = connector.query_scalar("SELECT AVG(v) FROM scores").await?;
        assert_eq!(avg, Some(15.0));
        Ok(())
    }

    #[tokio::test]
    async fn test_scalar_null_and_empty_result() -> Result<()> {
        let connector = DuckDBConnector::open(":memory:", AccessMode::ReadWrite)?;
        connector.execute("CREATE TABLE empty_t (v DOUBLE)").await?;

        // AVG over zero rows is SQL NULL
        let avg = connector.query_scalar("SELECT AVG(v) FROM empty_t").await?;
        assert_eq!(avg, None);

        // A query producing no row at all is also None
        let none = connector
            .query_scalar("SELECT v FROM empty_t LIMIT 1")
            .await?;
        assert_eq!(none, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_execution_error_surfaces() -> Result<()> {
        let connector = DuckDBConnector::open(":memory:", AccessMode::ReadWrite)?;
        let result = connector
            .query_scalar("SELECT COUNT(*) FROM missing_table")
            .await;
        assert!(result.is_err());
        Ok(())
    }

    #[tokio::test]
    async fn test_read_only_session_rejects_ddl() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let db_path = dir.path().join("store.duckdb");
        let db_path = db_path.to_string_lossy().to_string();

        // Seed the file with a read-write session, then drop it.
        {
            let rw = DuckDBConnector::open(&db_path, AccessMode::ReadWrite)?;
            rw.execute("CREATE TABLE t (v INTEGER)").await?;
        }

        let ro = DuckDBConnector::open(&db_path, AccessMode::ReadOnly)?;
        assert_eq!(ro.query_scalar("SELECT COUNT(*) FROM t").await?, Some(0.0));
        assert!(ro.execute("CREATE TABLE t2 (v INTEGER)").await.is_err());
        Ok(())
    }
}
