//! # Record Batcher
//!
//! Collects records and turns them into one commit payload once either
//! threshold is reached. The payload is a JSON array, newest record first.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, info};

use crate::config::BatcherConfig;
use crate::domain::{BatcherError, LogRecord};
use crate::ports::LogSink;

#[derive(Default)]
struct Batch {
    records: Vec<LogRecord>,
    content_size: usize,
}

/// Groups records into commit payloads.
pub struct RecordBatcher<S: LogSink> {
    config: BatcherConfig,
    sink: Arc<S>,
    batch: Mutex<Batch>,
}

impl<S: LogSink> RecordBatcher<S> {
    /// Create a batcher handing payloads to `sink`.
    pub fn new(config: BatcherConfig, sink: Arc<S>) -> Result<Self, BatcherError> {
        config.validate()?;
        Ok(Self {
            config,
            sink,
            batch: Mutex::new(Batch::default()),
        })
    }

    /// Add a record; flush if a threshold is reached.
    ///
    /// Returns the number of records flushed, if any.
    pub fn push(&self, record: LogRecord) -> Result<Option<usize>, BatcherError> {
        let mut batch = self.batch.lock();
        batch.content_size += record.payload_len();
        batch.records.push(record);
        debug!(
            "[dl-03] Batch holds {} records, {} bytes",
            batch.records.len(),
            batch.content_size
        );

        if batch.records.len() < self.config.max_records_per_trx
            && batch.content_size < self.config.max_trx_content_size
        {
            return Ok(None);
        }
        self.flush_locked(&mut batch).map(Some)
    }

    /// Flush whatever is collected, regardless of thresholds.
    pub fn flush(&self) -> Result<Option<usize>, BatcherError> {
        let mut batch = self.batch.lock();
        if batch.records.is_empty() {
            return Ok(None);
        }
        self.flush_locked(&mut batch).map(Some)
    }

    /// Records waiting for the next flush.
    pub fn len(&self) -> usize {
        self.batch.lock().records.len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.batch.lock().records.is_empty()
    }

    /// Payload bytes waiting for the next flush.
    pub fn content_size(&self) -> usize {
        self.batch.lock().content_size
    }

    fn flush_locked(&self, batch: &mut Batch) -> Result<usize, BatcherError> {
        let newest_first: Vec<&LogRecord> = batch.records.iter().rev().collect();
        let payload = serde_json::to_string(&newest_first)?;
        let count = batch.records.len();

        info!("[dl-03] Prepared {} records for commit", count);
        self.sink.enqueue(payload);

        batch.records.clear();
        batch.content_size = 0;
        Ok(count)
    }
}
