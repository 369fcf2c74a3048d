//! # Domain Module

pub mod errors;
pub mod record;

pub use errors::*;
pub use record::*;
