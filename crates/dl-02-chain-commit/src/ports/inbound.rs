//! # Inbound Ports
//!
//! What producers can ask of the commit pipeline.

use async_trait::async_trait;

use crate::domain::ChainCommitError;

/// Chain Commit API - inbound port.
#[async_trait]
pub trait ChainCommitApi: Send + Sync {
    /// Queue one payload for commit and wake the uploader. Never blocks.
    fn enqueue(&self, payload: String);

    /// True while uncommitted payloads remain. Producers throttle on it.
    fn is_busy(&self) -> bool;

    /// Number of uncommitted payloads.
    fn pending(&self) -> usize;

    /// Run one drain pass in the caller's task.
    async fn drain(&self) -> Result<usize, ChainCommitError>;

    /// Load recipient keys and chain state ahead of the first commit.
    async fn warm_up(&self) -> Result<(), ChainCommitError>;
}
