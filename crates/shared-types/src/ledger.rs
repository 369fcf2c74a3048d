//! # Ledger Wire Types
//!
//! Request and response shapes of the ledger RPC capability:
//! head lookup, table reads, block reads and transaction submission.

use serde::{Deserialize, Serialize};

use crate::entities::u64_from_number_or_string;

/// Receipt status of a successfully applied transaction.
pub const STATUS_EXECUTED: &str = "executed";

/// Result of `get_info`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainInfo {
    /// Chain identifier.
    #[serde(default)]
    pub chain_id: String,
    /// Current head block number.
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub head_block_num: u64,
    /// Last irreversible block number.
    #[serde(default, deserialize_with = "u64_from_number_or_string")]
    pub last_irreversible_block_num: u64,
}

/// Authorization attached to an action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionLevel {
    /// Acting account.
    pub actor: String,
    /// Permission name.
    pub permission: String,
}

impl PermissionLevel {
    /// `actor@active`.
    pub fn active(actor: impl Into<String>) -> Self {
        Self {
            actor: actor.into(),
            permission: "active".to_string(),
        }
    }
}

/// A single contract action inside a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Action {
    /// Target contract account.
    pub account: String,
    /// Action name.
    pub name: String,
    /// Authorizations.
    #[serde(default)]
    pub authorization: Vec<PermissionLevel>,
    /// Decoded action payload.
    #[serde(default)]
    pub data: serde_json::Value,
}

/// The transaction body as included in a block.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TransactionBody {
    /// Actions in execution order.
    #[serde(default)]
    pub actions: Vec<Action>,
}

/// A full transaction inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackedTrx {
    /// Transaction id.
    pub id: String,
    /// Transaction body.
    #[serde(default)]
    pub transaction: TransactionBody,
}

/// Block receipts either carry the full transaction or only its id
/// (deferred transactions).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrxRef {
    /// Full transaction with actions.
    Full(PackedTrx),
    /// Bare transaction id.
    Id(String),
}

/// A transaction receipt inside a block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockTransaction {
    /// Receipt status.
    #[serde(default)]
    pub status: String,
    /// Transaction or transaction id.
    pub trx: TrxRef,
}

impl BlockTransaction {
    /// Transaction id regardless of receipt shape.
    pub fn id(&self) -> &str {
        match &self.trx {
            TrxRef::Full(packed) => &packed.id,
            TrxRef::Id(id) => id,
        }
    }

    /// Actions, empty for id-only receipts.
    pub fn actions(&self) -> &[Action] {
        match &self.trx {
            TrxRef::Full(packed) => &packed.transaction.actions,
            TrxRef::Id(_) => &[],
        }
    }
}

/// Result of `get_block`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Block number.
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub block_num: u64,
    /// Block id.
    #[serde(default)]
    pub id: String,
    /// Transaction receipts.
    #[serde(default)]
    pub transactions: Vec<BlockTransaction>,
}

/// Parameters of `get_table_rows`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableRowsRequest {
    /// Always `true`: rows come back as decoded JSON.
    pub json: bool,
    /// Contract owning the table.
    pub code: String,
    /// Table scope.
    pub scope: String,
    /// Table name.
    pub table: String,
    /// Primary key type (`"name"` for account-keyed tables).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_type: Option<String>,
    /// Inclusive lower bound of the primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lower_bound: Option<String>,
    /// Inclusive upper bound of the primary key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upper_bound: Option<String>,
    /// Maximum number of rows.
    pub limit: u32,
}

impl TableRowsRequest {
    /// Read up to `limit` rows of `code/scope/table`.
    pub fn new(
        code: impl Into<String>,
        scope: impl Into<String>,
        table: impl Into<String>,
        limit: u32,
    ) -> Self {
        Self {
            json: true,
            code: code.into(),
            scope: scope.into(),
            table: table.into(),
            key_type: None,
            lower_bound: None,
            upper_bound: None,
            limit,
        }
    }

    /// Restrict to the row keyed by account `name`.
    pub fn keyed_by_name(mut self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.key_type = Some("name".to_string());
        self.lower_bound = Some(name.clone());
        self.upper_bound = Some(name);
        self
    }
}

/// Result of `get_table_rows`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TableRows {
    /// Decoded rows.
    #[serde(default)]
    pub rows: Vec<serde_json::Value>,
    /// More rows beyond `limit`.
    #[serde(default)]
    pub more: bool,
}

/// Submission options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactOptions {
    /// Reference block distance behind head for TaPoS.
    pub blocks_behind: u32,
    /// Expiration in seconds.
    pub expire_seconds: u32,
}

impl Default for TransactOptions {
    fn default() -> Self {
        Self {
            blocks_behind: 3,
            expire_seconds: 30,
        }
    }
}

/// Outcome of a submitted transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactResult {
    /// Block number the transaction was included in.
    pub block_num: u64,
    /// Transaction id.
    pub transaction_id: String,
    /// Receipt status.
    pub status: String,
}

impl TransactResult {
    /// Whether the receipt status is `executed`.
    pub fn is_executed(&self) -> bool {
        self.status == STATUS_EXECUTED
    }
}
