//! Crypto error types.

use thiserror::Error;

/// Cryptographic operation errors.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encryption failed
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    /// Decryption failed (wrong key or tampered message)
    #[error("Decryption failed: {0}")]
    DecryptionFailed(String),

    /// Recipient set is empty
    #[error("No recipient keys given")]
    NoRecipients,

    /// Public key does not parse or its self-signatures do not verify
    #[error("Invalid public key: {0}")]
    InvalidPublicKey(String),

    /// Public key has no subkey usable for encryption
    #[error("Public key has no encryption subkey")]
    NoEncryptionKey,

    /// Secret key does not parse or verify
    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),

    /// Key generation failed
    #[error("Key generation failed: {0}")]
    KeyGeneration(String),

    /// Armor or packet structure is broken
    #[error("Malformed message: {0}")]
    MalformedMessage(String),

    /// Compression or decompression failed
    #[error("Compression failed: {0}")]
    Compression(String),
}
