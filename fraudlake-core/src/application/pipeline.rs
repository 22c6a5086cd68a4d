// fraudlake-core/src/application/pipeline.rs

use std::fs;
use std::path::Path;

use crate::application::bronze::BronzeStage;
use crate::application::gold::{GoldAvgRiskStage, GoldTopSalesStage};
use crate::application::quality::QualityGate;
use crate::application::silver::SilverStage;
use crate::error::FraudlakeError;
use crate::infrastructure::config::PipelineConfig;
use crate::ports::connector::Store;

/// Machine-readable summary written to `<target>/run_results.json`.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct RunResult {
    pub success: bool,
    pub stages_executed: usize,
    pub errors: Vec<String>,
    pub finished_at: String,
}

/// Full medallion run: Bronze -> Silver -> Quality Gate -> {Gold A, Gold B}.
///
/// Each stage opens its own scoped session on the store and releases it
/// before the next stage starts. The two gold stages only depend on
/// silver, not on each other; the external orchestrator may invoke them
/// in either order through their own entry points — here they simply run
/// back to back.
pub async fn run_pipeline(
    store: &dyn Store,
    config: &PipelineConfig,
) -> Result<RunResult, FraudlakeError> {
    println!("🚀 Starting Medallion Pipeline ({})...", config.name);
    let start_time = std::time::Instant::now();

    // 1. SETUP (Infra/IO)
    let target_dir = Path::new(&config.target_path);
    if !target_dir.exists() {
        fs::create_dir_all(target_dir)?;
    }

    let mut stages_executed = 0;

    // 2. BRONZE (raw ingest)
    println!("  🔹 Bronze: ingesting landing CSV...");
    BronzeStage::from_config(config).execute(store).await?;
    stages_executed += 1;

    // 3. SILVER (cleaning)
    println!("  🔹 Silver: normalizing transactions...");
    SilverStage::from_config(config).execute(store).await?;
    stages_executed += 1;

    // 4. QUALITY GATE (read-only; halts the gold layer on verdict)
    println!("  🔹 Quality Gate: validating silver layer...");
    if let Err(e) = QualityGate::for_silver().execute(store).await {
        if e.is_quality_verdict() {
            eprintln!("    ❌ Quality gate rejected the run:\n{}", e);
            let result = RunResult {
                success: false,
                stages_executed,
                errors: vec![e.to_string()],
                finished_at: chrono::Utc::now().to_rfc3339(),
            };
            save_json(&target_dir.join("run_results.json"), &result)?;
        }
        // Infra errors propagate without a report; the orchestrator retries.
        return Err(e);
    }
    stages_executed += 1;

    // 5. GOLD (two independent consumers of silver)
    println!("  🔹 Gold: building aggregates...");
    GoldAvgRiskStage::from_config(config).execute(store).await?;
    stages_executed += 1;
    GoldTopSalesStage::from_config(config).execute(store).await?;
    stages_executed += 1;

    // 6. FINALIZE
    let duration = start_time.elapsed();
    println!(
        "✨ Done in {:.2}s. Executed {} stages.",
        duration.as_secs_f64(),
        stages_executed
    );

    let result = RunResult {
        success: true,
        stages_executed,
        errors: Vec::new(),
        finished_at: chrono::Utc::now().to_rfc3339(),
    };

    save_json(&target_dir.join("run_results.json"), &result)?;

    Ok(result)
}

fn save_json<T: serde::Serialize>(path: &Path, data: &T) -> Result<(), FraudlakeError> {
    let content = serde_json::to_string_pretty(data)
        .map_err(|e| FraudlakeError::InternalError(format!("Serialization: {}", e)))?;
    crate::infrastructure::fs::atomic_write(path, content)?;
    Ok(())
}
