//! # Chain Commit Configuration

use serde::{Deserialize, Serialize};
use shared_types::TransactOptions;

use crate::domain::{ChainCommitError, DEFAULT_MAX_SCAN_BLOCKS};

/// Chain commit configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ChainCommitConfig {
    /// Contract account hosting the chain and permission tables.
    pub contract: String,

    /// Namespace of the chain.
    pub scope: String,

    /// Writer identity; also the primary key of the chain row.
    pub user: String,

    /// Table holding the most recent entry per user.
    pub datalog_table: String,

    /// Table holding the recipient public keys.
    pub permission_table: String,

    /// Action name of a commit.
    pub commit_action: String,

    /// Maximum permission rows read per key refresh.
    pub permission_row_limit: u32,

    /// Encrypt payloads before committing.
    pub encrypt: bool,

    /// Maximum number of blocks one block-scan may examine.
    pub max_scan_blocks: u64,

    /// Submission options.
    pub transact: TransactOptions,

    /// Treat a receipt status other than `executed` as a failed commit.
    pub reject_unexecuted: bool,
}

impl Default for ChainCommitConfig {
    fn default() -> Self {
        Self {
            contract: "datasafe".to_string(),
            scope: "ac.hospital1".to_string(),
            user: "op.room1".to_string(),
            datalog_table: "datalogs".to_string(),
            permission_table: "permissions".to_string(),
            commit_action: "update".to_string(),
            permission_row_limit: 10,
            encrypt: true,
            max_scan_blocks: DEFAULT_MAX_SCAN_BLOCKS,
            transact: TransactOptions::default(),
            reject_unexecuted: true,
        }
    }
}

impl ChainCommitConfig {
    /// Create a config for testing (plaintext, small scan bound).
    pub fn for_testing() -> Self {
        Self {
            encrypt: false,
            max_scan_blocks: 1_000,
            ..Self::default()
        }
    }

    /// Reject configurations the pipeline can not run with.
    pub fn validate(&self) -> Result<(), ChainCommitError> {
        for (name, value) in [
            ("contract", &self.contract),
            ("scope", &self.scope),
            ("user", &self.user),
            ("datalog_table", &self.datalog_table),
            ("commit_action", &self.commit_action),
        ] {
            if value.is_empty() {
                return Err(ChainCommitError::InvalidConfig(format!("{} is empty", name)));
            }
        }
        if self.encrypt && self.permission_table.is_empty() {
            return Err(ChainCommitError::InvalidConfig(
                "permission_table is empty but encryption is enabled".to_string(),
            ));
        }
        if self.max_scan_blocks == 0 {
            return Err(ChainCommitError::InvalidConfig(
                "max_scan_blocks must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
