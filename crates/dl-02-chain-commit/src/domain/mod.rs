//! # Domain Module
//!
//! Core domain types for the chained commit pipeline.

pub mod errors;
pub mod invariants;
pub mod queue;
pub mod value_objects;

pub use errors::*;
pub use invariants::*;
pub use queue::*;
pub use value_objects::*;
