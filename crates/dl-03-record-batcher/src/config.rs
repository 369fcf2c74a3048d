//! # Batcher Configuration

use serde::{Deserialize, Serialize};

use crate::domain::BatcherError;

/// When a batch of records becomes one commit payload.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BatcherConfig {
    /// Flush once this many records are collected.
    pub max_records_per_trx: usize,

    /// Flush once the collected payloads reach this many bytes.
    pub max_trx_content_size: usize,
}

impl Default for BatcherConfig {
    fn default() -> Self {
        Self {
            max_records_per_trx: 10,
            max_trx_content_size: 20_000,
        }
    }
}

impl BatcherConfig {
    /// Create a config for testing (small batches).
    pub fn for_testing() -> Self {
        Self {
            max_records_per_trx: 3,
            max_trx_content_size: 64,
        }
    }

    /// Reject thresholds that would never or always flush.
    pub fn validate(&self) -> Result<(), BatcherError> {
        if self.max_records_per_trx == 0 {
            return Err(BatcherError::InvalidConfig(
                "max_records_per_trx must be at least 1".to_string(),
            ));
        }
        if self.max_trx_content_size == 0 {
            return Err(BatcherError::InvalidConfig(
                "max_trx_content_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Benchmark settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct BenchmarkConfig {
    /// Payload size of the first round, in bytes.
    pub start_bytes: usize,

    /// Bytes added to the payload after every round.
    pub step_bytes: usize,

    /// Payloads enqueued per round.
    pub trx_per_round: usize,

    /// Interval between busy checks, in milliseconds.
    pub tick_ms: u64,
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            start_bytes: 20_000,
            step_bytes: 1_000,
            trx_per_round: 20,
            tick_ms: 10,
        }
    }
}
