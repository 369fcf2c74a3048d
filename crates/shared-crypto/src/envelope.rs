//! # Multi-Recipient Messages
//!
//! One payload, readable by every key in the recipient set.
//!
//! ## Construction
//!
//! 1. Wrap the plaintext in a literal data packet and compress it (zlib).
//! 2. Encrypt it once under a random session key (SEIPD, AES-256).
//! 3. Add one public-key encrypted session key packet per encryption
//!    subkey of every recipient.
//! 4. Emit the message in ASCII armor (`BEGIN PGP MESSAGE`).

use pgp::crypto::sym::SymmetricKeyAlgorithm;
use pgp::types::CompressionAlgorithm;
use pgp::{ArmorOptions, Deserializable, Message};

use crate::keys::{RecipientPublicKey, RecipientSecretKey};
use crate::CryptoError;

/// Cipher of the encrypted payload.
pub const PAYLOAD_CIPHER: SymmetricKeyAlgorithm = SymmetricKeyAlgorithm::AES256;

/// Encrypt `plaintext` so that every key in `recipients` can open it.
///
/// # Errors
///
/// `CryptoError::NoRecipients` if `recipients` is empty.
pub fn seal(plaintext: &[u8], recipients: &[RecipientPublicKey]) -> Result<String, CryptoError> {
    if recipients.is_empty() {
        return Err(CryptoError::NoRecipients);
    }
    let subkeys: Vec<_> = recipients
        .iter()
        .flat_map(|recipient| recipient.encryption_subkeys())
        .collect();

    let message = Message::new_literal_bytes("", plaintext)
        .compress(CompressionAlgorithm::ZLIB)
        .map_err(|e| CryptoError::Compression(e.to_string()))?;

    let mut rng = rand::thread_rng();
    let encrypted = message
        .encrypt_to_keys_seipdv1(&mut rng, PAYLOAD_CIPHER, subkeys.as_slice())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))?;

    encrypted
        .to_armored_string(ArmorOptions::default())
        .map_err(|e| CryptoError::EncryptionFailed(e.to_string()))
}

/// Decrypt an armored message with a reader's secret key.
///
/// # Errors
///
/// - `CryptoError::MalformedMessage` if the armor or packets are broken
/// - `CryptoError::DecryptionFailed` if the key is not a recipient or the
///   message was tampered with
pub fn open<K: AsRef<RecipientSecretKey>>(armored: &str, key: &K) -> Result<Vec<u8>, CryptoError> {
    let (message, _headers) = Message::from_string(armored.trim())
        .map_err(|e| CryptoError::MalformedMessage(e.to_string()))?;

    let (decrypted, _key_ids) = message
        .decrypt(String::new, &[key.as_ref().inner()])
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?;

    decrypted
        .decompress()
        .map_err(|e| CryptoError::Compression(e.to_string()))?
        .get_content()
        .map_err(|e| CryptoError::DecryptionFailed(e.to_string()))?
        .ok_or_else(|| CryptoError::MalformedMessage("no literal data".to_string()))
}
