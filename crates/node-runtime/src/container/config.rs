//! # Node Configuration
//!
//! File layout (`config.json`):
//!
//! ```json
//! {
//!   "Blockchain": { "endpoint": "http://localhost:8888/", "contract": "datasafe", "scope": "ac.hospital1", "user": "op.room1" },
//!   "WorkStation": { "ip": "192.168.0.80", "port": 26501 },
//!   "LogOptions": { "shouldEncrypt": true, "networkDevice": "Ethernet", "maxRecordsPerTrx": 10, "maxTrxContentSize": 20000 }
//! }
//! ```
//!
//! Every section and field is optional; missing ones take their defaults.
//! Unknown fields are ignored.

use std::path::{Path, PathBuf};

use dl_01_ledger_rpc::RpcConfig;
use dl_02_chain_commit::{ChainCommitConfig, DEFAULT_MAX_SCAN_BLOCKS};
use dl_03_record_batcher::BatcherConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Endpoint prefix selecting the in-process ledger (dry run).
pub const MEMORY_ENDPOINT: &str = "memory://";

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("Can't read {path}: {source}")]
    Read {
        /// Config file
        path: PathBuf,
        /// Cause
        source: std::io::Error,
    },

    /// The file is not valid configuration.
    #[error("Can't parse {path}: {source}. Adjust or delete the file")]
    Parse {
        /// Config file
        path: PathBuf,
        /// Cause
        source: serde_json::Error,
    },

    /// The configuration could not be written.
    #[error("Can't write {path}: {source}")]
    Write {
        /// Config file
        path: PathBuf,
        /// Cause
        source: std::io::Error,
    },
}

/// Complete node configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    /// Ledger and chain identity.
    #[serde(rename = "Blockchain")]
    pub blockchain: BlockchainConfig,
    /// Workstation the records come from.
    #[serde(rename = "WorkStation")]
    pub workstation: WorkstationConfig,
    /// Encryption and batching.
    #[serde(rename = "LogOptions")]
    pub log_options: LogOptions,
}

/// Ledger and chain identity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlockchainConfig {
    /// Chain API endpoint, or `memory://` for a dry run.
    pub endpoint: String,
    /// Signing relay for submissions; empty means `<endpoint>/v1/transact`.
    pub transact_endpoint: String,
    /// Contract account.
    pub contract: String,
    /// Chain namespace.
    pub scope: String,
    /// Writer identity.
    pub user: String,
    /// Upper bound of one block-scan.
    pub max_scan_blocks: u64,
}

impl Default for BlockchainConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:8888/".to_string(),
            transact_endpoint: String::new(),
            contract: "datasafe".to_string(),
            scope: "ac.hospital1".to_string(),
            user: "op.room1".to_string(),
            max_scan_blocks: DEFAULT_MAX_SCAN_BLOCKS,
        }
    }
}

impl BlockchainConfig {
    /// Whether the in-process ledger is selected.
    pub fn is_memory(&self) -> bool {
        self.endpoint.starts_with(MEMORY_ENDPOINT)
    }
}

/// Workstation address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkstationConfig {
    /// Workstation IP, recorded as the source of ingested records.
    pub ip: String,
    /// Workstation port.
    pub port: u16,
}

impl Default for WorkstationConfig {
    fn default() -> Self {
        Self {
            ip: "192.168.0.80".to_string(),
            port: 26501,
        }
    }
}

/// Encryption and batching options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LogOptions {
    /// Encrypt payloads for the readers in the permission table.
    pub should_encrypt: bool,
    /// Capture device label, recorded for operators.
    pub network_device: String,
    /// Records per commit.
    pub max_records_per_trx: usize,
    /// Payload bytes per commit.
    pub max_trx_content_size: usize,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            should_encrypt: true,
            network_device: "Ethernet".to_string(),
            max_records_per_trx: 10,
            max_trx_content_size: 20_000,
        }
    }
}

impl NodeConfig {
    /// Load `path`. A missing file is not an error; an unreadable or
    /// unparsable one is.
    pub fn load(path: &Path) -> Result<Option<Self>, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        serde_json::from_str(&content)
            .map(Some)
            .map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })
    }

    /// Write the configuration to `path` as JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let write_error = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        std::fs::write(path, content).map_err(write_error)
    }

    /// Settings of the commit pipeline.
    pub fn chain_commit(&self) -> ChainCommitConfig {
        ChainCommitConfig {
            contract: self.blockchain.contract.clone(),
            scope: self.blockchain.scope.clone(),
            user: self.blockchain.user.clone(),
            encrypt: self.log_options.should_encrypt,
            max_scan_blocks: self.blockchain.max_scan_blocks,
            ..ChainCommitConfig::default()
        }
    }

    /// Settings of the record batcher.
    pub fn batcher(&self) -> BatcherConfig {
        BatcherConfig {
            max_records_per_trx: self.log_options.max_records_per_trx,
            max_trx_content_size: self.log_options.max_trx_content_size,
        }
    }

    /// Settings of the HTTP ledger adapter.
    pub fn rpc(&self) -> RpcConfig {
        RpcConfig {
            endpoint: self.blockchain.endpoint.clone(),
            transact_endpoint: self.blockchain.transact_endpoint.clone(),
            ..RpcConfig::default()
        }
    }
}
