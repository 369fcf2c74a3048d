//! # RPC Errors

use thiserror::Error;

/// Ledger RPC error types.
#[derive(Debug, Clone, Error)]
pub enum RpcError {
    /// Connection, timeout or other transport failure.
    #[error("Transport error: {0}")]
    Transport(String),

    /// Non-success HTTP status.
    #[error("HTTP status {code}: {body}")]
    Status {
        /// Status code
        code: u16,
        /// Response body
        body: String,
    },

    /// The ledger rejected the request (validation, assertion, auth).
    #[error("Ledger rejected request: {0}")]
    Rejected(String),

    /// Response could not be decoded.
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Requested block does not exist (yet).
    #[error("Block not found: {0}")]
    BlockNotFound(u64),
}
