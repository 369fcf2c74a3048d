//! # Recipient Keys (OpenPGP)
//!
//! Every authorized reader publishes an OpenPGP public key, ASCII armored,
//! in the permission table:
//!
//! ```text
//! -----BEGIN PGP PUBLIC KEY BLOCK-----
//! ...
//! -----END PGP PUBLIC KEY BLOCK-----
//! ```
//!
//! Payloads are encrypted to the key's encryption subkeys, so a key is only
//! accepted if its self-signatures verify and it has at least one.

use pgp::composed::{KeyType, SecretKeyParamsBuilder, SubkeyParamsBuilder};
use pgp::types::{PublicKeyTrait, SecretKeyTrait};
use pgp::{ArmorOptions, Deserializable, SignedPublicKey, SignedPublicSubKey, SignedSecretKey};

use crate::CryptoError;

/// RSA modulus size of keys made by [`RecipientKeyPair::generate`].
pub const GENERATED_KEY_BITS: u32 = 3072;

/// Public key of a reader.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecipientPublicKey(SignedPublicKey);

impl RecipientPublicKey {
    /// Parse an armored public key block.
    ///
    /// # Errors
    ///
    /// - `CryptoError::InvalidPublicKey` if it does not parse or verify
    /// - `CryptoError::NoEncryptionKey` if no subkey can encrypt
    pub fn from_armored(text: &str) -> Result<Self, CryptoError> {
        let (key, _headers) = SignedPublicKey::from_string(text.trim())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;
        key.verify()
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))?;

        let key = Self(key);
        if key.encryption_subkeys().is_empty() {
            return Err(CryptoError::NoEncryptionKey);
        }
        Ok(key)
    }

    /// Armored public key block, as stored in the permission table.
    pub fn to_armored(&self) -> Result<String, CryptoError> {
        self.0
            .to_armored_string(ArmorOptions::default())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    pub(crate) fn encryption_subkeys(&self) -> Vec<&SignedPublicSubKey> {
        self.0
            .public_subkeys
            .iter()
            .filter(|subkey| subkey.is_encryption_key())
            .collect()
    }
}

/// Secret key of a reader. Only needed to open payloads.
#[derive(Clone, Debug)]
pub struct RecipientSecretKey(SignedSecretKey);

impl RecipientSecretKey {
    /// Parse an armored, unprotected secret key block.
    pub fn from_armored(text: &str) -> Result<Self, CryptoError> {
        let (key, _headers) = SignedSecretKey::from_string(text.trim())
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        key.verify()
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))?;
        Ok(Self(key))
    }

    /// Armored secret key block.
    pub fn to_armored(&self) -> Result<String, CryptoError> {
        self.0
            .to_armored_string(ArmorOptions::default())
            .map_err(|e| CryptoError::InvalidSecretKey(e.to_string()))
    }

    pub(crate) fn inner(&self) -> &SignedSecretKey {
        &self.0
    }
}

impl AsRef<RecipientSecretKey> for RecipientSecretKey {
    fn as_ref(&self) -> &RecipientSecretKey {
        self
    }
}

/// Secret and public key of one reader.
#[derive(Clone, Debug)]
pub struct RecipientKeyPair {
    secret: RecipientSecretKey,
    public: RecipientPublicKey,
}

impl RecipientKeyPair {
    /// Generate an RSA key pair with an encryption subkey.
    pub fn generate(user_id: &str) -> Result<Self, CryptoError> {
        Self::generate_rsa(user_id, GENERATED_KEY_BITS)
    }

    pub(crate) fn generate_rsa(user_id: &str, bits: u32) -> Result<Self, CryptoError> {
        let mut rng = rand::thread_rng();

        let encryption_subkey = SubkeyParamsBuilder::default()
            .key_type(KeyType::Rsa(bits))
            .can_encrypt(true)
            .build()
            .map_err(keygen_error)?;
        let params = SecretKeyParamsBuilder::default()
            .key_type(KeyType::Rsa(bits))
            .can_certify(true)
            .can_sign(true)
            .primary_user_id(user_id.to_string())
            .subkey(encryption_subkey)
            .build()
            .map_err(keygen_error)?;

        let secret = params
            .generate(&mut rng)
            .map_err(keygen_error)?
            .sign(&mut rng, String::new)
            .map_err(keygen_error)?;
        let public = secret
            .public_key()
            .sign(&mut rng, &secret, String::new)
            .map_err(keygen_error)?;

        Ok(Self {
            secret: RecipientSecretKey(secret),
            public: RecipientPublicKey(public),
        })
    }

    /// Pair an armored secret key with its armored public key.
    pub fn from_armored(secret: &str, public: &str) -> Result<Self, CryptoError> {
        Ok(Self {
            secret: RecipientSecretKey::from_armored(secret)?,
            public: RecipientPublicKey::from_armored(public)?,
        })
    }

    /// Public half.
    pub fn public_key(&self) -> RecipientPublicKey {
        self.public.clone()
    }

    /// Secret half.
    pub fn secret_key(&self) -> &RecipientSecretKey {
        &self.secret
    }
}

impl AsRef<RecipientSecretKey> for RecipientKeyPair {
    fn as_ref(&self) -> &RecipientSecretKey {
        &self.secret
    }
}

fn keygen_error(e: impl std::fmt::Display) -> CryptoError {
    CryptoError::KeyGeneration(e.to_string())
}
