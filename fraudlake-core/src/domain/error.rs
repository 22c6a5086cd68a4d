// fraudlake-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DomainError {
    #[error("Quality gate rejected '{table}':\n{report}")]
    #[diagnostic(
        code(fraudlake::domain::quality_gate),
        help("One failing check halts the gold layer. Fix the silver data or the offending rule.")
    )]
    QualityGateFailed { table: String, report: String },
}
