// fraudlake-core/src/domain/quality/mod.rs

pub mod battery;
pub mod check;

// Re-exports
pub use battery::silver_battery;
pub use check::{CheckOutcome, Predicate, QualityCheck};
