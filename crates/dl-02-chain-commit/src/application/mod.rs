//! # Application Module
//!
//! Components of the commit pipeline, leaves first, and the service
//! wiring them together.

pub mod encryption;
mod flight;
pub mod key_cache;
pub mod resolver;
pub mod service;
pub mod submitter;
pub mod tracker;

pub use key_cache::PermissionKeyCache;
pub use resolver::BlockScanResolver;
pub use service::ChainCommitService;
pub use submitter::CommitSubmitter;
pub use tracker::ChainStateTracker;
