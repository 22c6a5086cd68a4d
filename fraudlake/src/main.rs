// fraudlake/src/main.rs

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

// Infrastructure (Config & Adapters)
use fraudlake_core::FraudlakeError;
use fraudlake_core::infrastructure::adapters::duckdb::{DuckDBConnector, DuckDBStore};
use fraudlake_core::infrastructure::config::{PipelineConfig, load_pipeline_config};

// Application (Use Cases)
use fraudlake_core::application::{
    BronzeStage, GoldAvgRiskStage, GoldTopSalesStage, QualityGate, SilverStage, execute_query,
    run_pipeline,
};
use fraudlake_core::ports::connector::AccessMode;

#[derive(Parser)]
#[command(name = "fraudlake")]
#[command(about = "Medallion pipeline for fraud-credit transactions on DuckDB", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

// Each stage is exposed as its own subcommand so the external workflow
// orchestrator can sequence, retry and skip stages independently. A stage
// either completes silently (exit 0) or signals failure: exit 2 for a
// quality-gate verdict (halt the gold layer, do not retry), exit 1 for
// infrastructure errors (retryable).
#[derive(Subcommand)]
enum Commands {
    /// 🚀 Runs the full pipeline (Bronze -> Silver -> Gate -> Gold)
    Run {
        /// Project directory
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🥉 Ingests the landing CSV into 'bronze_transactions'
    Bronze {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🥈 Cleans bronze into 'silver_transactions'
    Silver {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🛡️ Validates the silver layer (read-only check battery)
    QualityGate {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🥇 Builds 'gold_avg_risk_by_region'
    GoldAvgRisk {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// 🥇 Builds 'gold_top_3_latest_sales'
    GoldTopSales {
        #[arg(long, default_value = ".")]
        project_dir: PathBuf,
    },

    /// ⚡ Executes a raw SQL query (Ad-hoc)
    Query {
        query: String,
        #[arg(long, default_value = "fraudlake_db.duckdb")]
        db_path: String,
    },
}

fn load_context(project_dir: &Path) -> anyhow::Result<(PipelineConfig, DuckDBStore)> {
    println!("⚙️  Loading configuration...");
    // The '?' propagates automatically InfrastructureError -> anyhow::Error
    let config = load_pipeline_config(project_dir)?;
    println!("   Project: {} (v{})", config.name, config.version);

    let store = DuckDBStore::new(&config.storage.db_path);
    Ok((config, store))
}

/// Map a stage outcome to the orchestrator-facing exit contract.
fn finish_stage(stage: &str, result: Result<(), FraudlakeError>) {
    match result {
        Ok(()) => println!("✅ Stage '{}' completed.", stage),
        Err(e) if e.is_quality_verdict() => {
            eprintln!("❌ {}", e);
            std::process::exit(2);
        }
        Err(e) => {
            eprintln!("💥 Stage '{}' failed: {}", stage, e);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 1. Setup Logging (Tracing)
    // RUST_LOG=debug fraudlake run ... pour voir les détails
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        // --- USE CASE: FULL RUN ---
        Commands::Run { project_dir } => {
            let start = std::time::Instant::now();
            let (config, store) = load_context(&project_dir)?;

            match run_pipeline(&store, &config).await {
                Ok(_) => {
                    println!("\n✨ SUCCESS! Pipeline finished in {:.2?}", start.elapsed());
                }
                Err(e) if e.is_quality_verdict() => {
                    eprintln!("\n❌ FAILURE. {}", e);
                    // Exit code 2: pipeline-halting data verdict, not retryable
                    std::process::exit(2);
                }
                Err(e) => {
                    eprintln!("\n💥 CRITICAL PIPELINE ERROR: {}", e);
                    std::process::exit(1);
                }
            }
        }

        // --- USE CASE: SINGLE STAGES (orchestrator entry points) ---
        Commands::Bronze { project_dir } => {
            let (config, store) = load_context(&project_dir)?;
            let result = BronzeStage::from_config(&config).execute(&store).await;
            finish_stage("bronze", result);
        }

        Commands::Silver { project_dir } => {
            let (config, store) = load_context(&project_dir)?;
            let result = SilverStage::from_config(&config).execute(&store).await;
            finish_stage("silver", result);
        }

        Commands::QualityGate { project_dir } => {
            let (_config, store) = load_context(&project_dir)?;
            let result = QualityGate::for_silver().execute(&store).await;
            finish_stage("quality-gate", result);
        }

        Commands::GoldAvgRisk { project_dir } => {
            let (config, store) = load_context(&project_dir)?;
            let result = GoldAvgRiskStage::from_config(&config).execute(&store).await;
            finish_stage("gold-avg-risk", result);
        }

        Commands::GoldTopSales { project_dir } => {
            let (config, store) = load_context(&project_dir)?;
            let result = GoldTopSalesStage::from_config(&config).execute(&store).await;
            finish_stage("gold-top-sales", result);
        }

        // --- USE CASE: AD-HOC QUERY ---
        Commands::Query { query, db_path } => {
            let connector = DuckDBConnector::open(&db_path, AccessMode::ReadWrite)?;
            if let Err(e) = execute_query(&connector, &query).await {
                eprintln!("❌ Query failed: {}", e);
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_run_defaults() {
        let args = Cli::parse_from(["fraudlake", "run"]);
        match args.command {
            Commands::Run { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), ".");
            }
            _ => panic!("Expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_stage_subcommands() {
        let args = Cli::parse_from(["fraudlake", "quality-gate", "--project-dir", "/tmp"]);
        match args.command {
            Commands::QualityGate { project_dir } => {
                assert_eq!(project_dir.to_string_lossy(), "/tmp");
            }
            _ => panic!("Expected QualityGate command"),
        }

        let args = Cli::parse_from(["fraudlake", "gold-top-sales"]);
        assert!(matches!(args.command, Commands::GoldTopSales { .. }));
    }

    #[test]
    fn test_cli_parse_query() {
        let args = Cli::parse_from(["fraudlake", "query", "SELECT 1"]);
        match args.command {
            Commands::Query { query, db_path } => {
                assert_eq!(query, "SELECT 1");
                assert_eq!(db_path, "fraudlake_db.duckdb");
            }
            _ => panic!("Expected Query command"),
        }
    }
}
