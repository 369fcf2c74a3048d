//! # Commit Submitter
//!
//! Builds the single-action commit transaction for one entry and reports
//! where it landed.

use std::sync::Arc;

use dl_01_ledger_rpc::LedgerRpc;
use shared_types::{Action, ChainEntry, ChainRef, PermissionLevel, TransactOptions, UpdateAction};
use tracing::{error, info};

use crate::config::ChainCommitConfig;
use crate::domain::ChainCommitError;

/// Submits commit actions.
pub struct CommitSubmitter {
    ledger: Arc<dyn LedgerRpc>,
    contract: String,
    commit_action: String,
    transact: TransactOptions,
    reject_unexecuted: bool,
}

impl CommitSubmitter {
    /// Create a submitter for the contract named in `config`.
    pub fn new(ledger: Arc<dyn LedgerRpc>, config: &ChainCommitConfig) -> Self {
        Self {
            ledger,
            contract: config.contract.clone(),
            commit_action: config.commit_action.clone(),
            transact: config.transact,
            reject_unexecuted: config.reject_unexecuted,
        }
    }

    /// The commit action for `entry` following `predecessor`.
    pub fn build_action(
        &self,
        entry: &ChainEntry,
        predecessor: Option<&ChainEntry>,
    ) -> Result<Action, ChainCommitError> {
        Ok(Action {
            account: self.contract.clone(),
            name: self.commit_action.clone(),
            authorization: vec![PermissionLevel::active(&entry.user)],
            data: serde_json::to_value(UpdateAction::for_entry(entry, predecessor))?,
        })
    }

    /// Submit `entry` and return it with its own position filled in.
    ///
    /// Transport and validation errors propagate unchanged. A receipt status
    /// other than `executed` is logged; with `reject_unexecuted` it also
    /// fails the commit.
    pub async fn submit(
        &self,
        entry: ChainEntry,
        predecessor: Option<&ChainEntry>,
    ) -> Result<ChainEntry, ChainCommitError> {
        let action = self.build_action(&entry, predecessor)?;
        let result = self
            .ledger
            .submit_transaction(vec![action], self.transact)
            .await?;

        if !result.is_executed() {
            error!(
                "[dl-02] Commit {} in block {} finished with status {}",
                result.transaction_id, result.block_num, result.status
            );
            if self.reject_unexecuted {
                return Err(ChainCommitError::TransactionNotExecuted {
                    trx_id: result.transaction_id,
                    status: result.status,
                });
            }
        } else {
            info!(
                "[dl-02] Committed trx {} in block {} ({})",
                result.transaction_id, result.block_num, result.status
            );
        }

        Ok(entry.committed_at(ChainRef::new(result.block_num, result.transaction_id)))
    }
}
