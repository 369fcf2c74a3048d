//! # Domain Invariants
//!
//! Business rules that must always hold true.

use shared_types::ChainEntry;

use super::errors::ChainCommitError;

/// Default upper bound on blocks examined by one block-scan.
pub const DEFAULT_MAX_SCAN_BLOCKS: u64 = 100_000;

/// Block-scan progress is logged every this many blocks.
pub const SCAN_PROGRESS_INTERVAL: u64 = 100;

/// Lowest valid block number.
pub const FIRST_BLOCK: u64 = 1;

/// Invariant: every committed entry links to its predecessor's own position.
///
/// `entries` are ordered by commit time. The first must be a chain start
/// unless `anchor` (the entry committed before them) is given.
pub fn invariant_chain_links(
    anchor: Option<&ChainEntry>,
    entries: &[ChainEntry],
) -> Result<(), ChainCommitError> {
    let mut previous = anchor;
    for (index, entry) in entries.iter().enumerate() {
        if !entry.links_to(previous) {
            return Err(ChainCommitError::BrokenChain {
                index,
                reason: format!(
                    "links to {}/{:?}, expected {:?}",
                    entry.ref_block,
                    entry.ref_trx,
                    previous.and_then(|p| p.this_ref.as_ref())
                ),
            });
        }
        if entry.this_ref.is_none() {
            return Err(ChainCommitError::BrokenChain {
                index,
                reason: "no commit position".to_string(),
            });
        }
        previous = Some(entry);
    }
    Ok(())
}

/// First block a scan for `candidate` may start at.
pub fn scan_start(candidate: &ChainEntry) -> u64 {
    candidate.ref_block.max(FIRST_BLOCK)
}
