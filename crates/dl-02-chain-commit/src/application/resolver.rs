//! # Block-Scan Resolver
//!
//! Recovers the commit position of an entry that only knows its
//! predecessor's position.
//!
//! ## Algorithm
//!
//! 1. Start at `max(candidate.refBlock, 1)`.
//! 2. Read blocks one by one; the first transaction whose commit action
//!    carries exactly the candidate wins.
//! 3. Stop at the ledger head or after `max_scan_blocks` blocks, whichever
//!    comes first, and report `PredecessorNotFound`.

use std::sync::Arc;

use dl_01_ledger_rpc::LedgerRpc;
use shared_types::ChainEntry;
use tracing::{debug, info, warn};

use crate::algorithms::match_in_block;
use crate::config::ChainCommitConfig;
use crate::domain::{scan_start, ChainCommitError, SCAN_PROGRESS_INTERVAL};

/// Bounded linear block-scan.
pub struct BlockScanResolver {
    ledger: Arc<dyn LedgerRpc>,
    contract: String,
    commit_action: String,
    max_scan_blocks: u64,
}

impl BlockScanResolver {
    /// Create a resolver for the commit action named in `config`.
    pub fn new(ledger: Arc<dyn LedgerRpc>, config: &ChainCommitConfig) -> Self {
        Self {
            ledger,
            contract: config.contract.clone(),
            commit_action: config.commit_action.clone(),
            max_scan_blocks: config.max_scan_blocks.max(1),
        }
    }

    /// Return `candidate` with its own commit position filled in.
    pub async fn resolve(&self, candidate: ChainEntry) -> Result<ChainEntry, ChainCommitError> {
        let from_block = scan_start(&candidate);
        let head = self.ledger.get_info().await?.head_block_num;
        let to_block = head.min(from_block.saturating_add(self.max_scan_blocks - 1));

        info!(
            "[dl-02] Searching chain entry of {} from block {} to {}",
            candidate.user, from_block, to_block
        );

        for block_num in from_block..=to_block {
            if block_num % SCAN_PROGRESS_INTERVAL == 0 {
                debug!("[dl-02] Block-scan at block {}", block_num);
            }

            let block = self.ledger.get_block(block_num).await?;
            if let Some(position) =
                match_in_block(&block, &candidate, &self.contract, &self.commit_action)
            {
                info!(
                    "[dl-02] Found chain entry in block {} (trx {})",
                    position.block, position.trx
                );
                return Ok(candidate.committed_at(position));
            }
        }

        warn!(
            "[dl-02] Chain entry not found between blocks {} and {}",
            from_block, to_block
        );
        Err(ChainCommitError::PredecessorNotFound {
            from_block,
            to_block,
        })
    }
}
