//! # Container
//!
//! Configuration and dependency wiring of the node.

pub mod config;
pub mod subsystems;

pub use config::{ConfigError, NodeConfig, MEMORY_ENDPOINT};
pub use subsystems::SubsystemContainer;
