//! # Ledger Port
//!
//! Outbound capability trait. Signing is the implementor's concern: the
//! pipeline hands over unsigned actions and gets the finalized position back.

use async_trait::async_trait;
use shared_types::{Action, Block, ChainInfo, TableRows, TableRowsRequest, TransactOptions, TransactResult};

use crate::errors::RpcError;

/// Ledger RPC - outbound port.
#[async_trait]
pub trait LedgerRpc: Send + Sync {
    /// Current head of the ledger.
    async fn get_info(&self) -> Result<ChainInfo, RpcError>;

    /// Read rows of a contract table.
    async fn get_table_rows(&self, request: &TableRowsRequest) -> Result<TableRows, RpcError>;

    /// Read a block by number.
    async fn get_block(&self, block_num: u64) -> Result<Block, RpcError>;

    /// Sign and submit a transaction carrying `actions`.
    async fn submit_transaction(
        &self,
        actions: Vec<Action>,
        options: TransactOptions,
    ) -> Result<TransactResult, RpcError>;
}
