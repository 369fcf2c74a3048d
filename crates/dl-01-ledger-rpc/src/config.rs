//! # RPC Configuration

use serde::{Deserialize, Serialize};

/// Ledger endpoint configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RpcConfig {
    /// Chain API base URL (e.g. `http://localhost:8888/`).
    pub endpoint: String,

    /// Signing relay URL accepting `{ actions, blocksBehind, expireSeconds }`.
    /// Defaults to `<endpoint>/v1/transact` when empty.
    pub transact_endpoint: String,

    /// Request timeout in milliseconds.
    pub timeout_ms: u64,

    /// Connect timeout in milliseconds.
    pub connect_timeout_ms: u64,
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8888/".to_string(),
            transact_endpoint: String::new(),
            timeout_ms: 10_000,
            connect_timeout_ms: 2_000,
        }
    }
}

impl RpcConfig {
    /// Chain API URL for `path` (e.g. `get_info`).
    pub fn chain_url(&self, path: &str) -> String {
        format!("{}/v1/chain/{}", self.endpoint.trim_end_matches('/'), path)
    }

    /// Effective transaction submission URL.
    pub fn transact_url(&self) -> String {
        if self.transact_endpoint.is_empty() {
            format!("{}/v1/transact", self.endpoint.trim_end_matches('/'))
        } else {
            self.transact_endpoint.clone()
        }
    }
}
