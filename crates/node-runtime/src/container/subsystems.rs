//! # Subsystem Container
//!
//! Builds the ledger adapter, the commit pipeline and the batcher from one
//! `NodeConfig`, in dependency order.

use std::sync::Arc;

use anyhow::{Context, Result};
use dl_01_ledger_rpc::{HttpLedgerRpc, InMemoryLedger, LedgerRpc};
use dl_02_chain_commit::ChainCommitService;
use dl_03_record_batcher::RecordBatcher;
use tracing::{info, warn};

use super::config::NodeConfig;

/// Initialized subsystems.
pub struct SubsystemContainer {
    /// Configuration the container was built from.
    pub config: NodeConfig,
    /// Ledger adapter (dl-01).
    pub ledger: Arc<dyn LedgerRpc>,
    /// Commit pipeline (dl-02).
    pub chain_commit: ChainCommitService,
    /// Record batcher feeding the pipeline (dl-03).
    pub batcher: Arc<RecordBatcher<ChainCommitService>>,
}

impl SubsystemContainer {
    /// Build every subsystem.
    pub fn new(config: NodeConfig) -> Result<Self> {
        let ledger: Arc<dyn LedgerRpc> = if config.blockchain.is_memory() {
            warn!("[dl-01] Using the in-process ledger; nothing is persisted");
            Arc::new(InMemoryLedger::new(&config.blockchain.contract))
        } else {
            info!("[dl-01] Ledger endpoint {}", config.blockchain.endpoint);
            Arc::new(HttpLedgerRpc::new(config.rpc()).context("Failed to create ledger client")?)
        };
        Self::with_ledger(config, ledger)
    }

    /// Build the pipeline on top of an existing ledger adapter.
    pub fn with_ledger(config: NodeConfig, ledger: Arc<dyn LedgerRpc>) -> Result<Self> {
        let chain_commit = ChainCommitService::new(ledger.clone(), config.chain_commit())
            .context("Invalid chain configuration")?;
        let batcher = RecordBatcher::new(config.batcher(), Arc::new(chain_commit.clone()))
            .context("Invalid batching configuration")?;

        info!(
            "[dl-02] Chain {}/{} on contract {}, encryption {}",
            config.blockchain.scope,
            config.blockchain.user,
            config.blockchain.contract,
            if config.log_options.should_encrypt { "on" } else { "off" }
        );

        Ok(Self {
            config,
            ledger,
            chain_commit,
            batcher: Arc::new(batcher),
        })
    }
}
