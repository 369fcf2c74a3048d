//! # Permission Key Cache
//!
//! Recipient public keys read from the permission table.
//!
//! Refreshes are single-flight: the first caller loads, later callers wait
//! for that load and read its result. The cached set is replaced as a whole;
//! a failed load keeps whatever was cached before.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use dl_01_ledger_rpc::LedgerRpc;
use parking_lot::RwLock;
use shared_crypto::RecipientPublicKey;
use shared_types::{PermissionRow, TableRowsRequest};
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::application::flight::FlagGuard;
use crate::config::ChainCommitConfig;
use crate::domain::{ChainCommitError, RecipientKeySet};

/// Cache of recipient keys.
pub struct PermissionKeyCache {
    ledger: Arc<dyn LedgerRpc>,
    request: TableRowsRequest,
    keys: RwLock<Option<RecipientKeySet>>,
    refreshing: AtomicBool,
    flight: Mutex<()>,
}

impl PermissionKeyCache {
    /// Create an empty cache reading the permission table named in `config`.
    pub fn new(ledger: Arc<dyn LedgerRpc>, config: &ChainCommitConfig) -> Self {
        Self {
            ledger,
            request: TableRowsRequest::new(
                &config.contract,
                &config.scope,
                &config.permission_table,
                config.permission_row_limit,
            ),
            keys: RwLock::new(None),
            refreshing: AtomicBool::new(false),
            flight: Mutex::new(()),
        }
    }

    /// Cached keys; `None` if never loaded or a refresh is in flight.
    pub fn current_keys(&self) -> Option<RecipientKeySet> {
        if self.refreshing.load(Ordering::SeqCst) {
            return None;
        }
        self.keys.read().clone()
    }

    /// Whether a refresh is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.refreshing.load(Ordering::SeqCst)
    }

    /// Wait for an in-flight refresh to finish, then return the cached keys.
    pub async fn keys_after_refresh(&self) -> Option<RecipientKeySet> {
        let _flight = self.flight.lock().await;
        self.keys.read().clone()
    }

    /// Reload the keys, or join the refresh already in flight.
    ///
    /// Returns the number of cached keys afterwards.
    pub async fn refresh(&self) -> Result<usize, ChainCommitError> {
        let _flight = match self.flight.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("[dl-02] Key refresh in flight, waiting for it");
                let _joined = self.flight.lock().await;
                return self
                    .keys
                    .read()
                    .as_ref()
                    .map(RecipientKeySet::len)
                    .ok_or(ChainCommitError::MissingRecipientKeys);
            }
        };
        let _refreshing = FlagGuard::raise(&self.refreshing);

        info!("[dl-02] Loading recipient public keys");
        match self.load().await {
            Ok(set) => {
                let count = set.len();
                *self.keys.write() = Some(set);
                info!("[dl-02] Got {} recipient public keys", count);
                Ok(count)
            }
            Err(e) => {
                error!("[dl-02] Recipient key refresh failed: {}", e);
                Err(e)
            }
        }
    }

    async fn load(&self) -> Result<RecipientKeySet, ChainCommitError> {
        let table = self.ledger.get_table_rows(&self.request).await?;
        if table.more {
            warn!(
                "[dl-02] Permission table has more than {} rows; extra readers ignored",
                self.request.limit
            );
        }

        let keys = table
            .rows
            .into_iter()
            .enumerate()
            .filter_map(|(index, row)| match decode_row(row) {
                Ok(key) => Some(key),
                Err(reason) => {
                    warn!("[dl-02] Skipping permission row {}: {}", index, reason);
                    None
                }
            })
            .collect();
        Ok(RecipientKeySet::new(keys))
    }
}

fn decode_row(row: serde_json::Value) -> Result<RecipientPublicKey, String> {
    let row: PermissionRow = serde_json::from_value(row).map_err(|e| e.to_string())?;
    RecipientPublicKey::from_armored(&row.r_pub_key).map_err(|e| e.to_string())
}
