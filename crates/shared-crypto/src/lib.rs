//! # Shared Crypto - OpenPGP Encryption
//!
//! ## Components
//!
//! | Module | Format | Use Case |
//! |--------|--------|----------|
//! | `keys` | OpenPGP transferable keys (ASCII armor) | Reader keys from the permission table |
//! | `envelope` | OpenPGP message, zlib compressed, SEIPD | One payload for every reader |
//!
//! ## Interoperability
//!
//! - Keys exported by GnuPG or OpenPGP.js are accepted as they are
//! - Sealed payloads open with `gpg --decrypt` on any reader's machine

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod envelope;
pub mod errors;
pub mod keys;

#[cfg(any(test, feature = "test-keys"))]
pub mod test_keys;

// Re-exports
pub use envelope::{open, seal, PAYLOAD_CIPHER};
pub use errors::CryptoError;
pub use keys::{RecipientKeyPair, RecipientPublicKey, RecipientSecretKey};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
