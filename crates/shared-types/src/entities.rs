//! # Core Domain Entities
//!
//! ## Clusters
//!
//! - **Chain**: `ChainEntry`, `ChainRef`
//! - **Ledger Actions**: `UpdateAction` (the commit action payload)
//! - **Permissions**: `PermissionRow`

use serde::{Deserialize, Deserializer, Serialize};

// =============================================================================
// CLUSTER A: THE CHAIN
// =============================================================================

/// Position of a committed entry on the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ChainRef {
    /// Block number the transaction was included in.
    pub block: u64,
    /// Transaction id.
    pub trx: String,
}

impl ChainRef {
    /// Create a new reference.
    pub fn new(block: u64, trx: impl Into<String>) -> Self {
        Self {
            block,
            trx: trx.into(),
        }
    }
}

/// One committed or about-to-be-committed log record.
///
/// `ref_block`/`ref_trx` point at the predecessor entry (`0`/`""` for the
/// first entry of a chain). `this_ref` is filled in once the entry itself is
/// committed and is never serialized: the ledger row has no way to carry its
/// own position.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChainEntry {
    /// Namespace identifier. Chain table rows may omit it.
    #[serde(default)]
    pub scope: String,
    /// Writer identity. Chain table rows may omit it.
    #[serde(default)]
    pub user: String,
    /// Payload: ciphertext or plaintext depending on mode.
    pub data: String,
    /// Block number of the predecessor entry.
    #[serde(deserialize_with = "u64_from_number_or_string")]
    pub ref_block: u64,
    /// Transaction id of the predecessor entry.
    #[serde(default)]
    pub ref_trx: String,
    /// Own commit position, known only after submission or resolution.
    #[serde(skip)]
    pub this_ref: Option<ChainRef>,
}

impl ChainEntry {
    /// Build an uncommitted entry linked to `predecessor` (or the chain start).
    pub fn new(
        scope: impl Into<String>,
        user: impl Into<String>,
        data: impl Into<String>,
        predecessor: Option<&ChainEntry>,
    ) -> Self {
        let (ref_block, ref_trx) = predecessor
            .and_then(|p| p.this_ref.as_ref())
            .map(|r| (r.block, r.trx.clone()))
            .unwrap_or_default();

        Self {
            scope: scope.into(),
            user: user.into(),
            data: data.into(),
            ref_block,
            ref_trx,
            this_ref: None,
        }
    }

    /// Whether this entry starts a chain (no predecessor).
    pub fn is_chain_start(&self) -> bool {
        self.ref_block == 0 && self.ref_trx.is_empty()
    }

    /// Whether the own commit position is known.
    pub fn is_committed(&self) -> bool {
        self.this_ref.is_some()
    }

    /// Mark this entry as committed at `position`.
    pub fn committed_at(mut self, position: ChainRef) -> Self {
        self.this_ref = Some(position);
        self
    }

    /// Compare the on-ledger identity of two entries.
    ///
    /// All five wire fields must match jointly; `this_ref` is ignored.
    pub fn same_record(&self, other: &ChainEntry) -> bool {
        self.scope == other.scope
            && self.user == other.user
            && self.ref_block == other.ref_block
            && self.ref_trx == other.ref_trx
            && self.data == other.data
    }

    /// Whether `self` is correctly linked to `predecessor`.
    pub fn links_to(&self, predecessor: Option<&ChainEntry>) -> bool {
        match predecessor.and_then(|p| p.this_ref.as_ref()) {
            Some(r) => self.ref_block == r.block && self.ref_trx == r.trx,
            None => self.is_chain_start(),
        }
    }
}

// =============================================================================
// CLUSTER B: LEDGER ACTIONS
// =============================================================================

/// Payload of the commit action.
///
/// Carries the new entry plus the predecessor's own position
/// (`oldRefBlock`/`oldRefTrx`) so the contract can check the link redundantly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAction {
    /// Namespace identifier.
    pub scope: String,
    /// Writer identity.
    pub user: String,
    /// Payload.
    pub data: String,
    /// Predecessor block number.
    pub ref_block: u64,
    /// Predecessor transaction id.
    pub ref_trx: String,
    /// Predecessor's own block number (`0` when none).
    pub old_ref_block: u64,
    /// Predecessor's own transaction id (`""` when none).
    pub old_ref_trx: String,
}

impl UpdateAction {
    /// Build the action payload for `entry` committed after `predecessor`.
    pub fn for_entry(entry: &ChainEntry, predecessor: Option<&ChainEntry>) -> Self {
        let old = predecessor
            .and_then(|p| p.this_ref.clone())
            .unwrap_or_default();

        Self {
            scope: entry.scope.clone(),
            user: entry.user.clone(),
            data: entry.data.clone(),
            ref_block: entry.ref_block,
            ref_trx: entry.ref_trx.clone(),
            old_ref_block: old.block,
            old_ref_trx: old.trx,
        }
    }
}

// =============================================================================
// CLUSTER C: PERMISSIONS
// =============================================================================

/// A row of the permission table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionRow {
    /// Armored recipient public key.
    #[serde(rename = "rPubKey")]
    pub r_pub_key: String,
}

/// Ledger JSON encodes 64-bit integers either as numbers or as strings.
pub fn u64_from_number_or_string<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumberOrString {
        Number(u64),
        String(String),
    }

    match NumberOrString::deserialize(deserializer)? {
        NumberOrString::Number(n) => Ok(n),
        NumberOrString::String(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
