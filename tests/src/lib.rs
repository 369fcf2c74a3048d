//! # DataLog-Chain Test Suite
//!
//! ## Structure
//!
//! ```text
//! tests/
//! ├── src/integration/
//! │   ├── support.rs      # Ledger walking and wait helpers
//! │   ├── flows.rs        # Pipeline flows across dl-01, dl-02, dl-03
//! │   ├── recovery.rs     # Failures, restarts, cold-start resolution
//! │   └── properties.rs   # Chain invariant over arbitrary inputs
//! └── benches/
//!     └── pipeline_benchmarks.rs
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test -p dl-tests
//! cargo bench -p dl-tests
//! ```

pub mod integration;
