//! # Domain Errors
//!
//! Error types for the chained commit pipeline.

use dl_01_ledger_rpc::RpcError;
use shared_crypto::CryptoError;
use thiserror::Error;

/// Chain commit error types.
#[derive(Debug, Error)]
pub enum ChainCommitError {
    /// Ledger I/O failed (table read, block read or submission).
    #[error("Ledger error: {0}")]
    Rpc(#[from] RpcError),

    /// Encryption failed.
    #[error("Encryption error: {0}")]
    Crypto(#[from] CryptoError),

    /// Encryption is enabled but no recipient key is available.
    #[error("No recipient public keys available")]
    MissingRecipientKeys,

    /// The block-scan did not find the transaction that produced the entry.
    #[error("Chain entry not found between blocks {from_block} and {to_block}")]
    PredecessorNotFound {
        /// First block scanned
        from_block: u64,
        /// Last block scanned
        to_block: u64,
    },

    /// The ledger included the transaction with a status other than `executed`.
    #[error("Transaction {trx_id} not executed: {status}")]
    TransactionNotExecuted {
        /// Transaction id
        trx_id: String,
        /// Receipt status
        status: String,
    },

    /// A committed sequence violates the link rule.
    #[error("Broken chain at entry {index}: {reason}")]
    BrokenChain {
        /// Offending entry
        index: usize,
        /// What is wrong
        reason: String,
    },

    /// The predecessor could not be loaded.
    #[error("Chain state unavailable")]
    ChainStateUnavailable,

    /// A ledger row or action payload could not be decoded.
    #[error("Decode error: {0}")]
    Decode(String),

    /// Another drain pass is already running.
    #[error("Upload already in progress")]
    Busy,

    /// Configuration rejected.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Background task failed.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<serde_json::Error> for ChainCommitError {
    fn from(e: serde_json::Error) -> Self {
        Self::Decode(e.to_string())
    }
}
