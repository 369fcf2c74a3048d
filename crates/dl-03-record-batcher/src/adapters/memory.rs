//! # In-Memory Sink
//!
//! Records every payload. Payloads count as pending until `settle` is called,
//! which lets tests drive `is_busy`.

use parking_lot::Mutex;

use crate::ports::LogSink;

#[derive(Default)]
struct SinkState {
    received: Vec<String>,
    pending: usize,
}

/// In-process sink.
#[derive(Default)]
pub struct MemorySink {
    state: Mutex<SinkState>,
}

impl MemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every payload received, in order.
    pub fn payloads(&self) -> Vec<String> {
        self.state.lock().received.clone()
    }

    /// Number of payloads not settled yet.
    pub fn pending(&self) -> usize {
        self.state.lock().pending
    }

    /// Mark every received payload as committed.
    pub fn settle(&self) {
        self.state.lock().pending = 0;
    }
}

impl LogSink for MemorySink {
    fn enqueue(&self, payload: String) {
        let mut state = self.state.lock();
        state.received.push(payload);
        state.pending += 1;
    }

    fn is_busy(&self) -> bool {
        self.state.lock().pending > 0
    }
}
