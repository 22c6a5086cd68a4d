// fraudlake-core/src/lib.rs

// 1. Mandatory documentation for production code
#![allow(missing_docs)] // On autorise le manque de doc pour le moment

// 2. Memory safety
#![deny(unsafe_code)]
// 3. Robustness
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]
// 4. Performance
#![warn(clippy::perf)]

// --- MODULES HEXAGONAUX ---

// 1. Ports (Interfaces / Traits)
// Contracts against the embedded store (Connector, Store, AccessMode).
pub mod ports;

// 2. Domain (Cœur du métier)
// Table layout, quality check value objects, the fixed silver battery.
// Ne dépend de RIEN d'autre (ni infra, ni app).
pub mod domain;

// 3. Infrastructure (Adapters)
// Implémentation technique (DuckDB, YAML config, atomic file writes).
pub mod infrastructure;

// 4. Application (Use Cases)
// The medallion stages (bronze, silver, gate, gold) and run orchestration.
pub mod application;

// --- GESTION DES ERREURS GLOBALE ---
pub mod error;

// --- RE-EXPORTS (FACADE) ---
// Permet d'importer l'erreur principale facilement : use fraudlake_core::FraudlakeError;
pub use error::FraudlakeError;
