//! # DL-03 Record Batcher
//!
//! Ingestion side of the commit pipeline.
//!
//! **Subsystem ID:** 3
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Captured records are too small to commit one by one. The batcher groups
//! them and hands one payload per group to a `LogSink`, normally the
//! chained commit pipeline.
//!
//! | Threshold | Default |
//! |-----------|---------|
//! | `max_records_per_trx` | 10 records |
//! | `max_trx_content_size` | 20 000 payload bytes |
//!
//! The benchmark driver bypasses batching and feeds synthetic payloads,
//! throttled on `LogSink::is_busy`.
//!
//! ## Module Structure
//!
//! ```text
//! dl-03-record-batcher/
//! ├── domain/          # LogRecord, BatcherError
//! ├── application/
//! │   ├── batcher.rs   # RecordBatcher
//! │   └── benchmark.rs # BenchmarkDriver
//! ├── ports/           # LogSink
//! ├── adapters/        # ChainCommitService sink, MemorySink
//! └── config.rs
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use adapters::MemorySink;
pub use application::{BenchmarkDriver, RecordBatcher, RoundReport};
pub use config::{BatcherConfig, BenchmarkConfig};
pub use domain::*;
pub use ports::LogSink;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;
    use dl_01_ledger_rpc::InMemoryLedger;
    use dl_02_chain_commit::{ChainCommitConfig, ChainCommitService};
    use std::sync::Arc;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_batches_reach_commit_pipeline() {
        let ledger = Arc::new(InMemoryLedger::default());
        let service = Arc::new(
            ChainCommitService::new(ledger.clone(), ChainCommitConfig::for_testing()).unwrap(),
        );
        let batcher = RecordBatcher::new(
            BatcherConfig {
                max_records_per_trx: 2,
                max_trx_content_size: 1_000,
            },
            service.clone(),
        )
        .unwrap();

        batcher.push(LogRecord::workstation("10.0.0.1", 26501, "first")).unwrap();
        batcher.push(LogRecord::workstation("10.0.0.1", 26501, "second")).unwrap();
        // No runtime here: the payload waits in the queue
        assert!(LogSink::is_busy(service.as_ref()));

        assert_eq!(tokio_test::block_on(service.drain()).unwrap(), 1);
        let committed = &ledger.submitted_updates()[0];
        let records: Vec<LogRecord> = serde_json::from_str(&committed.data).unwrap();
        assert_eq!(records[0].payload, "second");
        assert_eq!(records[1].payload, "first");
    }
}
