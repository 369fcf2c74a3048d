//! # Pending Queue
//!
//! Ordered plaintext payloads awaiting commit. Cloning yields another handle
//! to the same queue, so producers can hold one without touching the service.
//!
//! Only the uploader removes items, and only after the head has been
//! committed.

use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::Mutex;

/// FIFO queue of payloads not yet committed.
#[derive(Clone, Debug, Default)]
pub struct PendingQueue {
    items: Arc<Mutex<VecDeque<String>>>,
}

impl PendingQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a payload.
    pub fn push(&self, payload: impl Into<String>) {
        self.items.lock().push_back(payload.into());
    }

    /// Copy of the head payload, left in place.
    pub fn front(&self) -> Option<String> {
        self.items.lock().front().cloned()
    }

    /// Remove the head payload.
    pub(crate) fn pop_front(&self) -> Option<String> {
        self.items.lock().pop_front()
    }

    /// Number of payloads waiting.
    pub fn len(&self) -> usize {
        self.items.lock().len()
    }

    /// Whether nothing is waiting.
    pub fn is_empty(&self) -> bool {
        self.items.lock().is_empty()
    }

    /// Copy of all payloads in commit order.
    pub fn snapshot(&self) -> Vec<String> {
        self.items.lock().iter().cloned().collect()
    }
}
