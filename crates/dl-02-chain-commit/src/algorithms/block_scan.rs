//! # Block Matching
//!
//! Pure part of the block-scan: finding the transaction inside one block
//! whose commit action carries exactly the candidate entry.
//!
//! A row of the chain table only knows its predecessor's position. Two
//! entries committed in the same block may share `refBlock`/`refTrx`, so the
//! comparison covers all five wire fields jointly.

use shared_types::{Action, Block, ChainEntry, ChainRef};

/// Decode a commit action into the entry it carries, if it targets
/// `contract::action`.
pub fn decode_commit(action: &Action, contract: &str, commit_action: &str) -> Option<ChainEntry> {
    if action.account != contract || action.name != commit_action {
        return None;
    }
    serde_json::from_value(action.data.clone()).ok()
}

/// Id of the first transaction in `block` that committed `candidate`.
pub fn find_matching_transaction<'a>(
    block: &'a Block,
    candidate: &ChainEntry,
    contract: &str,
    commit_action: &str,
) -> Option<&'a str> {
    block
        .transactions
        .iter()
        .find(|trx| {
            trx.actions().iter().any(|action| {
                decode_commit(action, contract, commit_action)
                    .is_some_and(|entry| entry.same_record(candidate))
            })
        })
        .map(|trx| trx.id())
}

/// Position of `candidate` if `block` contains it.
pub fn match_in_block(
    block: &Block,
    candidate: &ChainEntry,
    contract: &str,
    commit_action: &str,
) -> Option<ChainRef> {
    find_matching_transaction(block, candidate, contract, commit_action)
        .map(|trx| ChainRef::new(block.block_num, trx))
}
