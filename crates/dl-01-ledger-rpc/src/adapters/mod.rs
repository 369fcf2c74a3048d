//! # Adapters Layer (Hexagonal Architecture)
//!
//! Implementations of the `LedgerRpc` port.

mod http;
mod memory;

pub use http::HttpLedgerRpc;
pub use memory::InMemoryLedger;
