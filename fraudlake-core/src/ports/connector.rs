// fraudlake-core/src/ports/connector.rs

// This file defines what the application needs from the embedded store,
// without knowing how it's done. The stages only ever see these traits;
// DuckDB lives behind them in infrastructure/adapters.

use crate::error::FraudlakeError;
use async_trait::async_trait;

/// How a stage opens its session against the shared store.
///
/// Transform stages need `ReadWrite` (they replace their own table);
/// the quality gate only ever reads and opens `ReadOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    ReadWrite,
    ReadOnly,
}

#[async_trait]
pub trait Connector: Send + Sync {
    /// Execute a statement that produces no result set (DDL, COPY...).
    async fn execute(&self, query: &str) -> Result<(), FraudlakeError>;

    /// Run a query expected to yield a single numeric cell.
    ///
    /// Returns `None` when the query yields no row or a SQL NULL — the
    /// quality gate coerces both to 0 (absence of a result row is
    /// indistinguishable from a legitimate zero).
    async fn query_scalar(&self, query: &str) -> Result<Option<f64>, FraudlakeError>;

    fn engine_name(&self) -> &str;
}

/// Factory for per-stage connections.
///
/// Each stage acquires its own scoped session and drops it before the
/// next stage runs; nothing holds a connection across stage boundaries.
pub trait Store: Send + Sync {
    fn connect(&self, mode: AccessMode) -> Result<Box<dyn Connector>, FraudlakeError>;
}
