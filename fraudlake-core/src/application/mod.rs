// fraudlake-core/src/application/mod.rs

pub mod bronze;
pub mod engine;
pub mod gold;
pub mod materialization;
pub mod pipeline;
pub mod quality;
pub mod silver;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Cela permet au CLI de faire :
// `use fraudlake_core::application::{run_pipeline, BronzeStage, QualityGate};`
// sans avoir à connaître la structure interne des fichiers.

pub use bronze::BronzeStage;
pub use engine::execute_query;
pub use gold::{GoldAvgRiskStage, GoldTopSalesStage};
pub use materialization::Materializer;
pub use pipeline::{RunResult, run_pipeline};
pub use quality::QualityGate;
pub use silver::SilverStage;
