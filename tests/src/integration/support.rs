//! Helpers shared by the integration tests.

use std::time::Duration;

use dl_01_ledger_rpc::{InMemoryLedger, LedgerRpc};
use dl_02_chain_commit::algorithms::decode_commit;
use dl_02_chain_commit::ChainCommitService;
use shared_types::{ChainEntry, ChainRef};

/// Default contract of the in-process ledger.
pub const CONTRACT: &str = "datasafe";

/// Commit entries of `user` found on the ledger, in block order, each with
/// its own position.
pub async fn committed_chain(ledger: &InMemoryLedger, user: &str) -> Vec<ChainEntry> {
    let mut chain = Vec::new();
    for block_num in 1..=ledger.head() {
        let Ok(block) = ledger.get_block(block_num).await else {
            continue;
        };
        for trx in &block.transactions {
            for action in trx.actions() {
                if let Some(entry) = decode_commit(action, CONTRACT, "update") {
                    if entry.user == user {
                        chain.push(entry.committed_at(ChainRef::new(block_num, trx.id())));
                    }
                }
            }
        }
    }
    chain
}

/// Wait until the pipeline has nothing queued and no pass running.
pub async fn wait_idle(service: &ChainCommitService) -> bool {
    tokio::time::timeout(Duration::from_secs(10), async {
        while service.is_busy() || service.is_uploading() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .is_ok()
}

/// Wait until no pass is running, queue state aside.
pub async fn wait_stalled(service: &ChainCommitService) -> bool {
    tokio::time::timeout(Duration::from_secs(10), async {
        tokio::time::sleep(Duration::from_millis(5)).await;
        while service.is_uploading() {
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    })
    .await
    .is_ok()
}
