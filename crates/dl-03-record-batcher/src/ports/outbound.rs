//! # Outbound Ports
//!
//! Where finished batches go.

/// Consumer of commit payloads - outbound port.
pub trait LogSink: Send + Sync {
    /// Hand over one payload. Must not block.
    fn enqueue(&self, payload: String);

    /// True while earlier payloads are still uncommitted.
    fn is_busy(&self) -> bool;
}
