//! # Shared Types Crate
//!
//! This crate contains the chain entry model and every ledger wire type that
//! crosses a subsystem boundary.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: `ChainEntry` is defined once and used by the
//!   commit pipeline, the resolver and the integration tests alike.
//! - **Wire Compatibility**: field names follow the on-ledger JSON encoding
//!   (`refBlock`, `refTrx`, `rPubKey`, `block_num`, ...).
//! - **Own Position Is Local**: the commit position of an entry
//!   (`this_ref`) never goes on the wire. The ledger row can not know it.

pub mod entities;
pub mod ledger;

pub use entities::*;
pub use ledger::*;
