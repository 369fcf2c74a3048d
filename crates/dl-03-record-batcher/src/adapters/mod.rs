//! # Adapters Module
//!
//! - `chain_commit`: the commit pipeline as a sink
//! - `memory`: in-process sink for tests and dry runs

pub mod chain_commit;
pub mod memory;

pub use memory::MemorySink;
