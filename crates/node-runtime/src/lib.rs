//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Wiring
//!
//! ```text
//! stdin ──→ ingest ──→ RecordBatcher (dl-03) ──→ ChainCommitService (dl-02) ──→ LedgerRpc (dl-01)
//!                          ↑
//!                 BenchmarkDriver (dl-03)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod cli;
pub mod container;
pub mod ingest;

pub use cli::{Cli, Command, ConfigOverrides};
pub use container::{ConfigError, NodeConfig, SubsystemContainer};
