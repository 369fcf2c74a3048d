//! # Application Module

pub mod batcher;
pub mod benchmark;

pub use batcher::RecordBatcher;
pub use benchmark::{BenchmarkDriver, RoundReport};
