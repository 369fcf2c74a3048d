//! # DL-01 Ledger RPC
//!
//! The ledger capability consumed by the commit pipeline.
//!
//! **Subsystem ID:** 1
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Everything the pipeline needs from the ledger, and nothing more:
//!
//! | Operation | Used by |
//! |-----------|---------|
//! | `get_info` | Block-scan upper bound |
//! | `get_table_rows` | Permission keys, most recent chain row |
//! | `get_block` | Block-scan resolver |
//! | `submit_transaction` | Commit submitter |
//!
//! ## Module Structure
//!
//! ```text
//! dl-01-ledger-rpc/
//! ├── ports.rs        # LedgerRpc trait (outbound port of dl-02)
//! ├── errors.rs       # RpcError
//! ├── config.rs       # RpcConfig
//! └── adapters/
//!     ├── http.rs     # JSON over HTTP (reqwest)
//!     └── memory.rs   # Deterministic in-process ledger
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod config;
pub mod errors;
pub mod ports;

// Re-exports
pub use adapters::{HttpLedgerRpc, InMemoryLedger};
pub use config::RpcConfig;
pub use errors::RpcError;
pub use ports::LedgerRpc;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
