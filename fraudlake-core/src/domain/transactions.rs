// fraudlake-core/src/domain/transactions.rs

//! Table layout of the medallion layers.
//!
//! Every stage owns exactly one relation and replaces it wholesale on each
//! run (create-or-replace, no append). Names are fixed: the orchestrator
//! and downstream consumers address the layers by these identifiers.

pub const BRONZE_TABLE: &str = "bronze_transactions";
pub const SILVER_TABLE: &str = "silver_transactions";
pub const GOLD_AVG_RISK_TABLE: &str = "gold_avg_risk_by_region";
pub const GOLD_TOP_SALES_TABLE: &str = "gold_top_3_latest_sales";

/// Source column order of the landing CSV. Ingestion projects exactly
/// these columns and never filters a row.
pub const RAW_COLUMNS: [&str; 13] = [
    "timestamp",
    "sending_address",
    "receiving_address",
    "amount",
    "transaction_type",
    "location_region",
    "ip_prefix",
    "login_frequency",
    "session_duration",
    "purchase_pattern",
    "age_group",
    "risk_score",
    "anomaly",
];

/// Accepted values for `transaction_type` after silver normalization.
pub const VALID_TRANSACTION_TYPES: [&str; 5] =
    ["PURCHASE", "SALE", "TRANSFER", "PHISHING", "SCAM"];

/// `'PURCHASE', 'SALE', ...` — ready to splice into a SQL `IN (...)` list.
pub fn transaction_type_sql_list() -> String {
    VALID_TRANSACTION_TYPES
        .iter()
        .map(|t| format!("'{}'", t))
        .collect::<Vec<_>>()
        .join(", ")
}
