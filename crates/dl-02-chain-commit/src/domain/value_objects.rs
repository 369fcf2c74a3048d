//! # Value Objects

use shared_crypto::RecipientPublicKey;
use shared_types::ChainEntry;

/// Public keys of every authorized reader. Always replaced as a whole.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RecipientKeySet(Vec<RecipientPublicKey>);

impl RecipientKeySet {
    /// Wrap decoded keys.
    pub fn new(keys: Vec<RecipientPublicKey>) -> Self {
        Self(keys)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys as a slice.
    pub fn as_slice(&self) -> &[RecipientPublicKey] {
        &self.0
    }
}

/// What the tracker knows about the chain head.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Predecessor {
    /// Not loaded yet, or the last load failed.
    #[default]
    Unknown,
    /// Loaded: the chain has no entries.
    ChainStart,
    /// Loaded: the last committed entry, with its own position.
    Entry(ChainEntry),
}

impl Predecessor {
    /// Whether the state has been loaded.
    pub fn is_known(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// The entry to link to, if the state is loaded.
    pub fn known(&self) -> Option<Option<&ChainEntry>> {
        match self {
            Self::Unknown => None,
            Self::ChainStart => Some(None),
            Self::Entry(entry) => Some(Some(entry)),
        }
    }
}
