//! # Chain State Tracker
//!
//! Holds the last committed entry of the configured scope/user.
//!
//! The chain table row of a user does not know its own position, only its
//! predecessor's. Loading it therefore always goes through the block-scan
//! resolver before the row becomes usable as a predecessor.
//!
//! A commit that lands while a load is in flight is newer than anything the
//! load can return, so every `advance` bumps an epoch and a load that saw
//! the epoch move is discarded.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

use dl_01_ledger_rpc::LedgerRpc;
use parking_lot::RwLock;
use shared_types::{ChainEntry, TableRowsRequest};
use tokio::sync::Mutex;
use tracing::{debug, error, info};

use crate::application::flight::FlagGuard;
use crate::application::resolver::BlockScanResolver;
use crate::config::ChainCommitConfig;
use crate::domain::{ChainCommitError, Predecessor};

/// Tracker of the chain head.
pub struct ChainStateTracker {
    ledger: Arc<dyn LedgerRpc>,
    resolver: BlockScanResolver,
    request: TableRowsRequest,
    scope: String,
    user: String,
    state: RwLock<Predecessor>,
    epoch: AtomicU64,
    refreshing: AtomicBool,
    flight: Mutex<()>,
}

impl ChainStateTracker {
    /// Create a tracker with nothing loaded.
    pub fn new(ledger: Arc<dyn LedgerRpc>, config: &ChainCommitConfig) -> Self {
        Self {
            resolver: BlockScanResolver::new(ledger.clone(), config),
            ledger,
            request: TableRowsRequest::new(&config.contract, &config.scope, &config.datalog_table, 1)
                .keyed_by_name(&config.user),
            scope: config.scope.clone(),
            user: config.user.clone(),
            state: RwLock::new(Predecessor::Unknown),
            epoch: AtomicU64::new(0),
            refreshing: AtomicBool::new(false),
            flight: Mutex::new(()),
        }
    }

    /// Cached predecessor; `Unknown` while a refresh is in flight.
    pub fn predecessor(&self) -> Predecessor {
        if self.refreshing.load(Ordering::SeqCst) {
            return Predecessor::Unknown;
        }
        self.state.read().clone()
    }

    /// Cached predecessor, loading it first if unknown.
    pub async fn ensure_loaded(&self) -> Result<Predecessor, ChainCommitError> {
        match self.predecessor() {
            Predecessor::Unknown => self.refresh().await,
            known => Ok(known),
        }
    }

    /// Reload the predecessor from the ledger, or join the refresh in flight.
    pub async fn refresh(&self) -> Result<Predecessor, ChainCommitError> {
        let _flight = match self.flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("[dl-02] Chain state refresh in flight, waiting for it");
                let _joined = self.flight.lock().await;
                return match self.state.read().clone() {
                    Predecessor::Unknown => Err(ChainCommitError::ChainStateUnavailable),
                    known => Ok(known),
                };
            }
        };
        let _refreshing = FlagGuard::raise(&self.refreshing);
        let started = {
            let mut state = self.state.write();
            *state = Predecessor::Unknown;
            self.epoch.load(Ordering::SeqCst)
        };

        info!("[dl-02] Loading last chain entry from ledger");
        let outcome = self.load().await;

        let mut state = self.state.write();
        if self.epoch.load(Ordering::SeqCst) != started {
            debug!("[dl-02] Entry committed during refresh, discarding loaded state");
            return Ok(state.clone());
        }
        match outcome {
            Ok(loaded) => {
                match &loaded {
                    Predecessor::Entry(entry) => {
                        if let Some(position) = &entry.this_ref {
                            info!("[dl-02] Last chain entry is in block {}", position.block);
                        }
                    }
                    _ => info!("[dl-02] Chain is empty, next entry starts it"),
                }
                *state = loaded.clone();
                Ok(loaded)
            }
            Err(e) => {
                error!("[dl-02] Chain state refresh failed: {}", e);
                Err(e)
            }
        }
    }

    /// Make `entry` the new predecessor. It must carry its own position.
    pub fn advance(&self, entry: ChainEntry) -> Result<(), ChainCommitError> {
        if !entry.is_committed() {
            return Err(ChainCommitError::Internal(
                "advancing to an uncommitted entry".to_string(),
            ));
        }
        let mut state = self.state.write();
        *state = Predecessor::Entry(entry);
        self.epoch.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn load(&self) -> Result<Predecessor, ChainCommitError> {
        let table = self.ledger.get_table_rows(&self.request).await?;
        let Some(row) = table.rows.into_iter().next() else {
            return Ok(Predecessor::ChainStart);
        };

        let mut candidate: ChainEntry = serde_json::from_value(row)?;
        // Rows are keyed by user within the scope; older rows omit both
        if candidate.scope.is_empty() {
            candidate.scope = self.scope.clone();
        }
        if candidate.user.is_empty() {
            candidate.user = self.user.clone();
        }
        let resolved = self.resolver.resolve(candidate).await?;
        Ok(Predecessor::Entry(resolved))
    }
}
