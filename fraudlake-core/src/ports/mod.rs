// fraudlake-core/src/ports/mod.rs

pub mod connector;

pub use connector::{AccessMode, Connector, Store};
