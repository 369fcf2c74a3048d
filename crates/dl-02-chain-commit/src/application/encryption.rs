//! # Encryption Stage
//!
//! Seals a plaintext payload for the current recipient set. The envelope
//! work (compression, ECDH per recipient) runs on the blocking pool.

use tracing::debug;

use crate::domain::{ChainCommitError, RecipientKeySet};

/// Encrypt `plaintext` for `recipients`.
///
/// Fails with `MissingRecipientKeys` when no recipient is known; the payload
/// is never committed in plaintext as a fallback.
pub async fn encrypt(
    plaintext: &str,
    recipients: Option<&RecipientKeySet>,
) -> Result<String, ChainCommitError> {
    let recipients = match recipients {
        Some(set) if !set.is_empty() => set.clone(),
        _ => return Err(ChainCommitError::MissingRecipientKeys),
    };

    let plaintext = plaintext.as_bytes().to_vec();
    let sealed = tokio::task::spawn_blocking(move || {
        shared_crypto::seal(&plaintext, recipients.as_slice())
    })
    .await
    .map_err(|e| ChainCommitError::Internal(format!("encryption task failed: {}", e)))??;

    debug!("[dl-02] Sealed payload ({} bytes armored)", sealed.len());
    Ok(sealed)
}
