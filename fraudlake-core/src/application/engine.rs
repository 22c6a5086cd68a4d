// fraudlake-core/src/application/engine.rs

use std::time::Instant;
use tracing::{debug, error, instrument};

// Imports Hexagonaux
use crate::error::FraudlakeError;
use crate::ports::connector::Connector;

/// Exécute une requête SQL brute avec instrumentation (Logs + Timing).
/// Ce wrapper permet de surveiller la performance de toutes les requêtes ad-hoc.
#[instrument(skip(connector), fields(query.len = query.len()))]
pub async fn execute_query(connector: &dyn Connector, query: &str) -> Result<(), FraudlakeError> {
    let start = Instant::now();
    debug!("⚡ Executing Query: {}", query);

    // Exécution déléguée au Port
    let result = connector.execute(query).await;

    let duration = start.elapsed();

    match result {
        Ok(_) => {
            debug!("✅ Query finished in {:.2?}", duration);
            Ok(())
        }
        Err(e) => {
            error!("❌ Query failed after {:.2?}: {}", duration, e);
            Err(e)
        }
    }
}
