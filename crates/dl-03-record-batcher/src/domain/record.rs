//! # Log Record
//!
//! One captured message, as serialized inside a commit payload:
//!
//! ```json
//! { "type": "WS", "ip": "192.168.0.80", "port": 26501, "timestamp": 1700000000000, "payload": "..." }
//! ```

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Source kind of a workstation message.
pub const KIND_WORKSTATION: &str = "WS";

/// Source kind of a line read from standard input.
pub const KIND_STDIN: &str = "STDIN";

/// A captured log record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogRecord {
    /// Source kind.
    #[serde(rename = "type")]
    pub kind: String,
    /// Source address.
    pub ip: String,
    /// Source port, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Transport protocol, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    /// Capture time in milliseconds since the Unix epoch.
    pub timestamp: u64,
    /// Message content.
    pub payload: String,
}

impl LogRecord {
    /// Record captured now.
    pub fn new(kind: impl Into<String>, ip: impl Into<String>, payload: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            ip: ip.into(),
            port: None,
            protocol: None,
            timestamp: now_millis(),
            payload: payload.into(),
        }
    }

    /// Record of a message received from a workstation.
    pub fn workstation(ip: impl Into<String>, port: u16, payload: impl Into<String>) -> Self {
        Self {
            port: Some(port),
            ..Self::new(KIND_WORKSTATION, ip, payload)
        }
    }

    /// Set the protocol.
    pub fn with_protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    /// Payload size counted against the batch content limit.
    pub fn payload_len(&self) -> usize {
        self.payload.len()
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default()
}
