// fraudlake-core/src/infrastructure/config/mod.rs

pub mod project;

pub use project::{PipelineConfig, StorageConfig, load_pipeline_config};
