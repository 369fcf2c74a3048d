//! Reader key fixtures exported from GnuPG (ed25519 primary key with a
//! cv25519 encryption subkey, no passphrase).

use crate::keys::RecipientKeyPair;

/// Public key that can sign but has no encryption subkey.
pub const SIGN_ONLY_PUBLIC_KEY: &str = include_str!("../fixtures/sign-only.pub.asc");

fn pair(secret: &str, public: &str) -> RecipientKeyPair {
    RecipientKeyPair::from_armored(secret, public).expect("fixture key pair parses")
}

/// First reader.
pub fn alice() -> RecipientKeyPair {
    pair(
        include_str!("../fixtures/alice.sec.asc"),
        include_str!("../fixtures/alice.pub.asc"),
    )
}

/// Second reader.
pub fn bob() -> RecipientKeyPair {
    pair(
        include_str!("../fixtures/bob.sec.asc"),
        include_str!("../fixtures/bob.pub.asc"),
    )
}

/// Third reader.
pub fn carol() -> RecipientKeyPair {
    pair(
        include_str!("../fixtures/carol.sec.asc"),
        include_str!("../fixtures/carol.pub.asc"),
    )
}

/// A key holder that is never granted access in tests.
pub fn dave() -> RecipientKeyPair {
    pair(
        include_str!("../fixtures/dave.sec.asc"),
        include_str!("../fixtures/dave.pub.asc"),
    )
}

/// All fixture readers.
pub fn all() -> Vec<RecipientKeyPair> {
    vec![alice(), bob(), carol(), dave()]
}
