//! # Chain Commit Service
//!
//! Owns the pending queue and drives the single-flight uploader.
//!
//! ## Drain contract
//!
//! - Entries are committed strictly in queue order, one at a time.
//! - The head payload leaves the queue only after its entry is committed and
//!   has become the tracker's predecessor.
//! - Any failure aborts the whole pass. The failed payload and everything
//!   behind it stay queued; nothing already committed is submitted again.
//! - There is no timed retry. The next `enqueue` (or `retrigger`) resumes
//!   from the same head.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use dl_01_ledger_rpc::LedgerRpc;
use shared_types::ChainEntry;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::application::encryption;
use crate::application::flight::FlagGuard;
use crate::application::key_cache::PermissionKeyCache;
use crate::application::submitter::CommitSubmitter;
use crate::application::tracker::ChainStateTracker;
use crate::config::ChainCommitConfig;
use crate::domain::{ChainCommitError, PendingQueue, Predecessor};
use crate::ports::ChainCommitApi;

struct Inner {
    config: ChainCommitConfig,
    queue: PendingQueue,
    keys: PermissionKeyCache,
    tracker: ChainStateTracker,
    submitter: CommitSubmitter,
    uploading: AtomicBool,
}

/// Chained commit pipeline. Cloning yields another handle to the same
/// pipeline.
#[derive(Clone)]
pub struct ChainCommitService {
    inner: Arc<Inner>,
}

impl ChainCommitService {
    /// Create a pipeline with its own empty queue.
    pub fn new(
        ledger: Arc<dyn LedgerRpc>,
        config: ChainCommitConfig,
    ) -> Result<Self, ChainCommitError> {
        Self::with_queue(ledger, config, PendingQueue::new())
    }

    /// Create a pipeline draining `queue`.
    pub fn with_queue(
        ledger: Arc<dyn LedgerRpc>,
        config: ChainCommitConfig,
        queue: PendingQueue,
    ) -> Result<Self, ChainCommitError> {
        config.validate()?;
        Ok(Self {
            inner: Arc::new(Inner {
                keys: PermissionKeyCache::new(ledger.clone(), &config),
                tracker: ChainStateTracker::new(ledger.clone(), &config),
                submitter: CommitSubmitter::new(ledger, &config),
                queue,
                config,
                uploading: AtomicBool::new(false),
            }),
        })
    }

    /// Configuration in use.
    pub fn config(&self) -> &ChainCommitConfig {
        &self.inner.config
    }

    /// Handle to the pending queue.
    pub fn queue(&self) -> PendingQueue {
        self.inner.queue.clone()
    }

    /// Append a payload and make sure an uploader is running. Never blocks.
    pub fn enqueue(&self, payload: impl Into<String>) {
        self.inner.queue.push(payload);
        self.trigger();
    }

    /// Whether uncommitted payloads remain.
    pub fn is_busy(&self) -> bool {
        !self.inner.queue.is_empty()
    }

    /// Number of uncommitted payloads.
    pub fn pending(&self) -> usize {
        self.inner.queue.len()
    }

    /// Whether a drain pass is running.
    pub fn is_uploading(&self) -> bool {
        self.inner.uploading.load(Ordering::SeqCst)
    }

    /// Last committed entry, if loaded.
    pub fn last_committed(&self) -> Option<ChainEntry> {
        match self.inner.tracker.predecessor() {
            Predecessor::Entry(entry) => Some(entry),
            _ => None,
        }
    }

    /// Resume draining after a stall.
    pub fn retrigger(&self) {
        self.trigger();
    }

    /// Reload the recipient keys.
    pub async fn refresh_keys(&self) -> Result<usize, ChainCommitError> {
        self.inner.keys.refresh().await
    }

    /// Reload the last committed entry.
    pub async fn refresh_chain_state(&self) -> Result<Predecessor, ChainCommitError> {
        self.inner.tracker.refresh().await
    }

    /// Load recipient keys (when encrypting), then the chain state.
    ///
    /// Both are attempted; the first failure is returned.
    pub async fn warm_up(&self) -> Result<(), ChainCommitError> {
        info!("[dl-02] Loading recipient keys and last chain entry");
        let keys = if self.inner.config.encrypt {
            self.refresh_keys().await.map(|_| ())
        } else {
            Ok(())
        };
        let chain = self.refresh_chain_state().await.map(|_| ());
        keys.and(chain)
    }

    /// Run `warm_up` in the background, then drain whatever queued up.
    pub fn spawn_warm_up(&self) -> JoinHandle<()> {
        let service = self.clone();
        tokio::spawn(async move {
            if let Err(e) = service.warm_up().await {
                warn!("[dl-02] Warm-up incomplete: {}", e);
            }
            if service.is_busy() {
                service.trigger();
            }
        })
    }

    /// Commit queued payloads until the queue is empty.
    ///
    /// Returns the number of entries committed in this pass, or `Busy` if
    /// another pass is running.
    pub async fn drain(&self) -> Result<usize, ChainCommitError> {
        let _uploading =
            FlagGuard::try_acquire(&self.inner.uploading).ok_or(ChainCommitError::Busy)?;

        let mut committed = 0;
        while let Some(payload) = self.inner.queue.front() {
            self.commit_head(payload).await?;
            self.inner.queue.pop_front();
            committed += 1;
        }

        if committed > 0 {
            info!("[dl-02] Drain pass committed {} entries", committed);
        }
        Ok(committed)
    }

    async fn commit_head(&self, payload: String) -> Result<(), ChainCommitError> {
        let inner = &self.inner;

        let data = if inner.config.encrypt {
            let keys = inner.keys.keys_after_refresh().await;
            encryption::encrypt(&payload, keys.as_ref()).await?
        } else {
            payload
        };

        let predecessor = inner.tracker.ensure_loaded().await?;
        let predecessor = predecessor
            .known()
            .ok_or(ChainCommitError::ChainStateUnavailable)?;

        let entry = ChainEntry::new(&inner.config.scope, &inner.config.user, data, predecessor);
        let committed = inner.submitter.submit(entry, predecessor).await?;
        inner.tracker.advance(committed)
    }

    fn trigger(&self) {
        if self.is_uploading() {
            return;
        }
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                let service = self.clone();
                handle.spawn(async move { service.run_drain().await });
            }
            Err(_) => warn!("[dl-02] No async runtime; payload stays queued until retrigger"),
        }
    }

    async fn run_drain(self) {
        loop {
            match self.drain().await {
                Ok(_) if self.inner.queue.is_empty() => return,
                // Payloads pushed while the guard was still held
                Ok(_) => continue,
                Err(ChainCommitError::Busy) => return,
                Err(e) => {
                    error!(
                        "[dl-02] Upload stalled with {} pending: {}",
                        self.pending(),
                        e
                    );
                    return;
                }
            }
        }
    }
}

#[async_trait]
impl ChainCommitApi for ChainCommitService {
    fn enqueue(&self, payload: String) {
        ChainCommitService::enqueue(self, payload);
    }

    fn is_busy(&self) -> bool {
        ChainCommitService::is_busy(self)
    }

    fn pending(&self) -> usize {
        ChainCommitService::pending(self)
    }

    async fn drain(&self) -> Result<usize, ChainCommitError> {
        ChainCommitService::drain(self).await
    }

    async fn warm_up(&self) -> Result<(), ChainCommitError> {
        debug!("[dl-02] Warm-up requested");
        ChainCommitService::warm_up(self).await
    }
}
