//! In-Memory Ledger
//!
//! Deterministic in-process ledger implementing `LedgerRpc`. Every submitted
//! transaction lands in its own new block. The commit action (`update`)
//! upserts the writer's row in the chain-entry table, mirroring what the
//! on-ledger contract does.
//!
//! Used for dry runs of the node and throughout the test suites. Supports
//! failure injection for submissions and reads.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use sha2::{Digest, Sha256};
use shared_types::{
    Action, Block, BlockTransaction, ChainInfo, PackedTrx, TableRows, TableRowsRequest,
    TransactOptions, TransactResult, TransactionBody, TrxRef, UpdateAction, STATUS_EXECUTED,
};
use tracing::debug;

use crate::errors::RpcError;
use crate::ports::LedgerRpc;

/// (code, scope, table)
type TableKey = (String, String, String);

#[derive(Default)]
struct LedgerState {
    blocks: Vec<Block>,
    tables: HashMap<TableKey, BTreeMap<String, serde_json::Value>>,
    submissions: Vec<Action>,
    submission_attempts: usize,
    failing_attempts: HashSet<usize>,
    receipt_status: Option<String>,
    fail_reads: bool,
    latency: Option<Duration>,
    block_reads: usize,
    table_reads: usize,
    trx_counter: u64,
}

/// In-process ledger.
pub struct InMemoryLedger {
    contract: String,
    commit_action: String,
    chain_table: String,
    state: Mutex<LedgerState>,
}

impl Default for InMemoryLedger {
    fn default() -> Self {
        Self::new("datasafe")
    }
}

impl InMemoryLedger {
    /// Create a ledger hosting `contract` with the default action and table names.
    pub fn new(contract: impl Into<String>) -> Self {
        Self::with_names(contract, "update", "datalogs")
    }

    /// Create a ledger with explicit commit action and chain table names.
    pub fn with_names(
        contract: impl Into<String>,
        commit_action: impl Into<String>,
        chain_table: impl Into<String>,
    ) -> Self {
        Self {
            contract: contract.into(),
            commit_action: commit_action.into(),
            chain_table: chain_table.into(),
            state: Mutex::new(LedgerState::default()),
        }
    }

    /// Current head block number (0 when empty).
    pub fn head(&self) -> u64 {
        self.state.lock().blocks.len() as u64
    }

    /// Append a block made of `transactions` and return its number.
    pub fn push_block(&self, transactions: Vec<BlockTransaction>) -> u64 {
        let mut state = self.state.lock();
        let block_num = state.blocks.len() as u64 + 1;
        state.blocks.push(Block {
            block_num,
            id: format!("{:016x}", block_num),
            transactions,
        });
        block_num
    }

    /// Append `count` empty blocks.
    pub fn push_empty_blocks(&self, count: u64) {
        for _ in 0..count {
            self.push_block(Vec::new());
        }
    }

    /// Insert or replace a table row.
    pub fn set_row(
        &self,
        code: &str,
        scope: &str,
        table: &str,
        primary_key: &str,
        row: serde_json::Value,
    ) {
        self.state
            .lock()
            .tables
            .entry((code.to_string(), scope.to_string(), table.to_string()))
            .or_default()
            .insert(primary_key.to_string(), row);
    }

    /// Make the `nth` submission attempt (0-based, counted over the ledger's
    /// lifetime) fail with a rejection.
    pub fn fail_submission_attempt(&self, nth: usize) {
        self.state.lock().failing_attempts.insert(nth);
    }

    /// Report `status` instead of `executed` on following receipts.
    /// The transaction is still included.
    pub fn set_receipt_status(&self, status: Option<&str>) {
        self.state.lock().receipt_status = status.map(str::to_string);
    }

    /// Make every read fail with a transport error.
    pub fn set_fail_reads(&self, fail: bool) {
        self.state.lock().fail_reads = fail;
    }

    /// Delay every call by `latency`, so concurrent callers interleave.
    pub fn set_latency(&self, latency: Option<Duration>) {
        self.state.lock().latency = latency;
    }

    /// Successfully included actions, in inclusion order.
    pub fn submitted_actions(&self) -> Vec<Action> {
        self.state.lock().submissions.clone()
    }

    /// Decoded commit action payloads, in inclusion order.
    pub fn submitted_updates(&self) -> Vec<UpdateAction> {
        self.submitted_actions()
            .into_iter()
            .filter(|a| a.account == self.contract && a.name == self.commit_action)
            .filter_map(|a| serde_json::from_value(a.data).ok())
            .collect()
    }

    /// Number of submission attempts, failed ones included.
    pub fn submission_attempts(&self) -> usize {
        self.state.lock().submission_attempts
    }

    /// Number of `get_block` calls served.
    pub fn block_reads(&self) -> usize {
        self.state.lock().block_reads
    }

    /// Number of `get_table_rows` calls served.
    pub fn table_reads(&self) -> usize {
        self.state.lock().table_reads
    }

    async fn simulate_latency(&self) {
        let latency = self.state.lock().latency;
        if let Some(latency) = latency {
            tokio::time::sleep(latency).await;
        }
    }

    fn next_trx_id(state: &mut LedgerState, actions: &[Action]) -> String {
        state.trx_counter += 1;
        let mut hasher = Sha256::new();
        hasher.update(state.trx_counter.to_be_bytes());
        for action in actions {
            hasher.update(action.account.as_bytes());
            hasher.update(action.name.as_bytes());
            hasher.update(action.data.to_string().as_bytes());
        }
        hex::encode(hasher.finalize())
    }

    fn apply_contract(&self, state: &mut LedgerState, action: &Action) {
        if action.account != self.contract || action.name != self.commit_action {
            return;
        }
        if let Ok(update) = serde_json::from_value::<UpdateAction>(action.data.clone()) {
            let row = serde_json::json!({
                "scope": update.scope,
                "user": update.user,
                "data": update.data,
                "refBlock": update.ref_block,
                "refTrx": update.ref_trx,
            });
            state
                .tables
                .entry((
                    self.contract.clone(),
                    update.scope.clone(),
                    self.chain_table.clone(),
                ))
                .or_default()
                .insert(update.user.clone(), row);
        }
    }
}

#[async_trait]
impl LedgerRpc for InMemoryLedger {
    async fn get_info(&self) -> Result<ChainInfo, RpcError> {
        self.simulate_latency().await;
        let state = self.state.lock();
        if state.fail_reads {
            return Err(RpcError::Transport("simulated read failure".to_string()));
        }
        let head = state.blocks.len() as u64;
        Ok(ChainInfo {
            chain_id: "in-memory".to_string(),
            head_block_num: head,
            last_irreversible_block_num: head,
        })
    }

    async fn get_table_rows(&self, request: &TableRowsRequest) -> Result<TableRows, RpcError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        if state.fail_reads {
            return Err(RpcError::Transport("simulated read failure".to_string()));
        }
        state.table_reads += 1;

        let key = (
            request.code.clone(),
            request.scope.clone(),
            request.table.clone(),
        );
        let Some(table) = state.tables.get(&key) else {
            return Ok(TableRows::default());
        };

        let in_range = |pk: &String| {
            request.lower_bound.as_ref().map_or(true, |lb| pk >= lb)
                && request.upper_bound.as_ref().map_or(true, |ub| pk <= ub)
        };
        let matching: Vec<_> = table
            .iter()
            .filter(|(pk, _)| in_range(pk))
            .map(|(_, row)| row.clone())
            .collect();

        let limit = request.limit as usize;
        Ok(TableRows {
            more: matching.len() > limit,
            rows: matching.into_iter().take(limit).collect(),
        })
    }

    async fn get_block(&self, block_num: u64) -> Result<Block, RpcError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        if state.fail_reads {
            return Err(RpcError::Transport("simulated read failure".to_string()));
        }
        state.block_reads += 1;

        if block_num == 0 {
            return Err(RpcError::BlockNotFound(0));
        }
        state
            .blocks
            .get((block_num - 1) as usize)
            .cloned()
            .ok_or(RpcError::BlockNotFound(block_num))
    }

    async fn submit_transaction(
        &self,
        actions: Vec<Action>,
        _options: TransactOptions,
    ) -> Result<TransactResult, RpcError> {
        self.simulate_latency().await;
        let mut state = self.state.lock();
        let attempt = state.submission_attempts;
        state.submission_attempts += 1;

        if state.failing_attempts.contains(&attempt) {
            debug!("[dl-01] Simulated rejection of submission #{}", attempt);
            return Err(RpcError::Rejected(format!(
                "simulated failure of submission #{}",
                attempt
            )));
        }

        let transaction_id = Self::next_trx_id(&mut state, &actions);
        for action in &actions {
            self.apply_contract(&mut state, action);
        }
        state.submissions.extend(actions.iter().cloned());

        let status = state
            .receipt_status
            .clone()
            .unwrap_or_else(|| STATUS_EXECUTED.to_string());
        let block_num = state.blocks.len() as u64 + 1;
        state.blocks.push(Block {
            block_num,
            id: format!("{:016x}", block_num),
            transactions: vec![BlockTransaction {
                status: status.clone(),
                trx: TrxRef::Full(PackedTrx {
                    id: transaction_id.clone(),
                    transaction: TransactionBody { actions },
                }),
            }],
        });

        Ok(TransactResult {
            block_num,
            transaction_id,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::PermissionLevel;

    fn update(user: &str, data: &str, ref_block: u64, ref_trx: &str) -> Action {
        Action {
            account: "datasafe".to_string(),
            name: "update".to_string(),
            authorization: vec![PermissionLevel::active(user)],
            data: serde_json::to_value(UpdateAction {
                scope: "ac.hospital1".to_string(),
                user: user.to_string(),
                data: data.to_string(),
                ref_block,
                ref_trx: ref_trx.to_string(),
                old_ref_block: 0,
                old_ref_trx: String::new(),
            })
            .unwrap(),
        }
    }

    #[tokio::test]
    async fn test_submission_creates_block_and_row() {
        let ledger = InMemoryLedger::default();
        ledger.push_empty_blocks(5);

        let result = ledger
            .submit_transaction(vec![update("op.room1", "A", 0, "")], TransactOptions::default())
            .await
            .unwrap();
        assert_eq!(result.block_num, 6);
        assert!(result.is_executed());

        let block = ledger.get_block(6).await.unwrap();
        assert_eq!(block.transactions[0].id(), result.transaction_id);

        let rows = ledger
            .get_table_rows(
                &TableRowsRequest::new("datasafe", "ac.hospital1", "datalogs", 1)
                    .keyed_by_name("op.room1"),
            )
            .await
            .unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0]["data"], "A");
    }

    #[tokio::test]
    async fn test_row_is_replaced_per_user() {
        let ledger = InMemoryLedger::default();
        let opts = TransactOptions::default();
        ledger.submit_transaction(vec![update("u1", "A", 0, "")], opts).await.unwrap();
        ledger.submit_transaction(vec![update("u1", "B", 1, "x")], opts).await.unwrap();
        ledger.submit_transaction(vec![update("u2", "C", 0, "")], opts).await.unwrap();

        let rows = ledger
            .get_table_rows(
                &TableRowsRequest::new("datasafe", "ac.hospital1", "datalogs", 10).keyed_by_name("u1"),
            )
            .await
            .unwrap();
        assert_eq!(rows.rows.len(), 1);
        assert_eq!(rows.rows[0]["data"], "B");
        assert_eq!(ledger.submitted_updates().len(), 3);
    }

    #[tokio::test]
    async fn test_injected_submission_failure() {
        let ledger = InMemoryLedger::default();
        ledger.fail_submission_attempt(1);
        let opts = TransactOptions::default();

        assert!(ledger.submit_transaction(vec![update("u", "A", 0, "")], opts).await.is_ok());
        assert!(matches!(
            ledger.submit_transaction(vec![update("u", "B", 1, "t")], opts).await,
            Err(RpcError::Rejected(_))
        ));
        assert!(ledger.submit_transaction(vec![update("u", "B", 1, "t")], opts).await.is_ok());
        assert_eq!(ledger.submission_attempts(), 3);
        assert_eq!(ledger.head(), 2);
    }

    #[tokio::test]
    async fn test_missing_block() {
        let ledger = InMemoryLedger::default();
        assert!(matches!(ledger.get_block(0).await, Err(RpcError::BlockNotFound(0))));
        assert!(matches!(ledger.get_block(3).await, Err(RpcError::BlockNotFound(3))));
    }

    #[tokio::test]
    async fn test_table_limit_sets_more() {
        let ledger = InMemoryLedger::default();
        for i in 0..5 {
            ledger.set_row("datasafe", "s", "permissions", &format!("k{}", i), serde_json::json!({ "rPubKey": i }));
        }
        let rows = ledger
            .get_table_rows(&TableRowsRequest::new("datasafe", "s", "permissions", 3))
            .await
            .unwrap();
        assert_eq!(rows.rows.len(), 3);
        assert!(rows.more);
    }

    #[tokio::test]
    async fn test_failing_reads() {
        let ledger = InMemoryLedger::default();
        ledger.set_fail_reads(true);
        assert!(ledger.get_info().await.is_err());
        assert!(ledger.get_block(1).await.is_err());
    }

    #[tokio::test]
    async fn test_receipt_status_override() {
        let ledger = InMemoryLedger::default();
        ledger.set_receipt_status(Some("hard_fail"));
        let result = ledger
            .submit_transaction(vec![update("u", "A", 0, "")], TransactOptions::default())
            .await
            .unwrap();
        assert!(!result.is_executed());
    }

    #[test]
    fn test_pushed_blocks_are_numbered_from_one() {
        let ledger = InMemoryLedger::default();
        ledger.push_empty_blocks(2);
        let third = ledger.push_block(Vec::new());
        assert_eq!(third, 3);

        let block = tokio_test::block_on(ledger.get_block(3)).unwrap();
        assert_eq!(block.block_num, 3);
        assert!(block.transactions.is_empty());
        assert_eq!(ledger.block_reads(), 1);
    }
}
