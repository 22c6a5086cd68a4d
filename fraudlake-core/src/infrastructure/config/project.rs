// fraudlake-core/src/infrastructure/config/project.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, instrument};

use crate::infrastructure::error::InfrastructureError;

/// Explicit configuration handed to every stage at construction.
///
/// The file paths and the store location used to be implicit deployment
/// constants; here they are one YAML document, overridable per-key from
/// the environment (pattern 'Layering').
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PipelineConfig {
    pub name: String,
    pub version: String,

    /// Where run reports (run_results.json) land.
    #[serde(rename = "target-path", default = "default_target_path")]
    pub target_path: String,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// The shared store file plus the landing CSV and the four Parquet
/// snapshot targets, one per materialized relation.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct StorageConfig {
    #[serde(default = "default_db_path")]
    pub db_path: String,
    #[serde(default = "default_landing_csv")]
    pub landing_csv: String,
    #[serde(default = "default_bronze_parquet")]
    pub bronze_parquet: String,
    #[serde(default = "default_silver_parquet")]
    pub silver_parquet: String,
    #[serde(default = "default_gold_avg_risk_parquet")]
    pub gold_avg_risk_parquet: String,
    #[serde(default = "default_gold_top_sales_parquet")]
    pub gold_top_sales_parquet: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            landing_csv: default_landing_csv(),
            bronze_parquet: default_bronze_parquet(),
            silver_parquet: default_silver_parquet(),
            gold_avg_risk_parquet: default_gold_avg_risk_parquet(),
            gold_top_sales_parquet: default_gold_top_sales_parquet(),
        }
    }
}

fn default_target_path() -> String {
    "target".to_string()
}
fn default_db_path() -> String {
    "storage/db/fraud_credit.duckdb".to_string()
}
fn default_landing_csv() -> String {
    "storage/landing/df_fraud_credit.csv".to_string()
}
fn default_bronze_parquet() -> String {
    "storage/bronze/bronze_transactions.parquet".to_string()
}
fn default_silver_parquet() -> String {
    "storage/silver/silver_transactions.parquet".to_string()
}
fn default_gold_avg_risk_parquet() -> String {
    "storage/gold/gold_avg_risk_by_region.parquet".to_string()
}
fn default_gold_top_sales_parquet() -> String {
    "storage/gold/gold_top_3_latest_sales.parquet".to_string()
}

// --- LOADER ---

#[instrument(skip(project_dir))]
pub fn load_pipeline_config(project_dir: &Path) -> Result<PipelineConfig, InfrastructureError> {
    // 1. Découverte du fichier principal
    let config_path = find_main_config(project_dir)?;
    info!(path = ?config_path, "Loading pipeline configuration");

    // 2. Chargement YAML
    let content = fs::read_to_string(&config_path)?;
    let mut config: PipelineConfig = serde_yaml::from_str(&content)?;

    // 3. Override via Variables d'Environnement
    // Permet de faire: FRAUDLAKE_DB_PATH=/tmp/test.duckdb fraudlake run
    apply_env_overrides(&mut config);

    // 4. Resolve storage paths against the project directory
    config.anchor_paths(project_dir);

    Ok(config)
}

fn find_main_config(root: &Path) -> Result<PathBuf, InfrastructureError> {
    let candidates = ["fraudlake.yaml", "fraudlake_pipeline.yaml"];
    for filename in candidates {
        let p = root.join(filename);
        if p.exists() {
            return Ok(p);
        }
    }
    Err(InfrastructureError::ConfigNotFound(format!(
        "No configuration file found in {:?}. Checked: {:?}",
        root, candidates
    )))
}

fn apply_env_overrides(config: &mut PipelineConfig) {
    let overrides = [
        ("FRAUDLAKE_DB_PATH", &mut config.storage.db_path),
        ("FRAUDLAKE_LANDING_CSV", &mut config.storage.landing_csv),
    ];
    for (var, slot) in overrides {
        if let Ok(value) = std::env::var(var)
            && !value.is_empty()
        {
            *slot = value;
        }
    }
    if let Ok(value) = std::env::var("FRAUDLAKE_TARGET_PATH")
        && !value.is_empty()
    {
        config.target_path = value;
    }
}

impl PipelineConfig {
    /// Rebase every relative storage path onto the project directory.
    fn anchor_paths(&mut self, project_dir: &Path) {
        for slot in [
            &mut self.storage.db_path,
            &mut self.storage.landing_csv,
            &mut self.storage.bronze_parquet,
            &mut self.storage.silver_parquet,
            &mut self.storage.gold_avg_risk_parquet,
            &mut self.storage.gold_top_sales_parquet,
            &mut self.target_path,
        ] {
            let raw = Path::new(slot.as_str());
            if raw.is_relative() {
                *slot = project_dir.join(raw).to_string_lossy().into_owned();
            }
        }
    }
}
