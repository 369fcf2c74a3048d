//! # Outbound Ports
//!
//! The pipeline depends on the ledger only; the trait lives with its
//! adapters in `dl-01-ledger-rpc`.

pub use dl_01_ledger_rpc::{LedgerRpc, RpcError};
