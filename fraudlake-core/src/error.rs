// fraudlake-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FraudlakeError {
    // --- ERREURS DU DOMAINE (Quality gate verdict, bad stage input) ---
    #[error(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, DuckDB, Config) ---
    #[error(transparent)]
    Infrastructure(#[from] InfrastructureError),

    // --- ERREURS GÉNÉRIQUES / APPLICATIVES ---
    #[error("Internal Error: {0}")]
    InternalError(String),
}

impl FraudlakeError {
    /// True when the error is the quality gate rejecting the run.
    ///
    /// The orchestrator must treat this as "halt downstream aggregation",
    /// not as a retryable infrastructure failure.
    pub fn is_quality_verdict(&self) -> bool {
        matches!(
            self,
            FraudlakeError::Domain(DomainError::QualityGateFailed { .. })
        )
    }
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for FraudlakeError {
    fn from(err: std::io::Error) -> Self {
        FraudlakeError::Infrastructure(InfrastructureError::Io(err))
    }
}

// Same shortcut for the SQL engine: lets adapters use `?` directly on duckdb calls
impl From<duckdb::Error> for FraudlakeError {
    fn from(err: duckdb::Error) -> Self {
        FraudlakeError::Infrastructure(InfrastructureError::from(err))
    }
}
