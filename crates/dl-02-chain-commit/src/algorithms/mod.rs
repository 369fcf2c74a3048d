//! # Algorithms Module
//!
//! Pure chain algorithms, free of I/O.

pub mod block_scan;

pub use block_scan::{decode_commit, find_matching_transaction, match_in_block};
