//! # Integration Tests
//!
//! Cross-subsystem flows on the in-process ledger.

pub mod support;

mod flows;
mod properties;
mod recovery;
