pub mod error;
pub mod quality;
pub mod transactions;

// Re-exports pratiques pour simplifier les imports ailleurs
pub use error::DomainError;
