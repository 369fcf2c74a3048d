//! # DL-02 Chained Commit Pipeline
//!
//! Commits log payloads to the ledger as a linked chain of entries.
//!
//! **Subsystem ID:** 2
//! **Architecture:** Hexagonal (Ports/Adapters)
//!
//! ## Purpose
//!
//! Every entry carries the block number and transaction id of the entry
//! committed before it. Walking the ledger along these references proves the
//! log is complete and in order.
//!
//! ## Components
//!
//! | Component | Role |
//! |-----------|------|
//! | `PermissionKeyCache` | Recipient keys from the permission table |
//! | `encryption` | Multi-recipient sealing of a payload |
//! | `ChainStateTracker` | Last committed entry (the predecessor) |
//! | `BlockScanResolver` | Own position of a table row, found by scanning blocks |
//! | `CommitSubmitter` | One commit transaction per entry |
//! | `ChainCommitService` | Pending queue and single-flight uploader |
//!
//! ## Guarantees
//!
//! | Guarantee | Mechanism |
//! |-----------|-----------|
//! | Strict order | One drain pass at a time, head removed after commit |
//! | At-least-once | Failure stalls the pass, queue untouched |
//! | No plaintext fallback | Missing keys fail the pass |
//! | Bounded recovery | Block-scan stops at head or `max_scan_blocks` |
//!
//! ## Module Structure
//!
//! ```text
//! dl-02-chain-commit/
//! ├── domain/
//! │   ├── errors.rs        # ChainCommitError
//! │   ├── queue.rs         # PendingQueue
//! │   ├── value_objects.rs # RecipientKeySet, Predecessor
//! │   └── invariants.rs    # Chain link rule, scan bounds
//! ├── algorithms/
//! │   └── block_scan.rs    # Matching a commit inside a block
//! ├── application/
//! │   ├── key_cache.rs
//! │   ├── encryption.rs
//! │   ├── tracker.rs
//! │   ├── resolver.rs
//! │   ├── submitter.rs
//! │   └── service.rs       # ChainCommitService
//! ├── ports/
//! │   ├── inbound.rs       # ChainCommitApi
//! │   └── outbound.rs      # LedgerRpc
//! └── config.rs
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod algorithms;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;

// Re-exports
pub use application::{
    BlockScanResolver, ChainCommitService, ChainStateTracker, CommitSubmitter, PermissionKeyCache,
};
pub use config::ChainCommitConfig;
pub use domain::*;
pub use ports::{ChainCommitApi, LedgerRpc};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
