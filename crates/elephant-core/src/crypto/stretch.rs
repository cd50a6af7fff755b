//! Password stretching for native archives.
//!
//! `H0 = SHA-256(password || salt)`, then `H(n) = SHA-256(H(n-1))` repeated
//! `iterations` times. The iteration count travels in the archive header, so
//! older archives keep opening after the default changes.
//!
//! A verification hash, `SHA-256(stretched key)`, is stored next to the
//! wrapped keys. Comparing it first rejects a wrong password before any
//! ciphertext is touched.

use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Length of the stretched key in bytes (AES-256 key size).
pub const KEY_LENGTH: usize = 32;

/// Key material produced by [`stretch`].
#[derive(Clone, ZeroizeOnDrop)]
pub struct StretchedKey {
    key: [u8; KEY_LENGTH],
}

impl StretchedKey {
    pub(crate) fn from_bytes(bytes: [u8; KEY_LENGTH]) -> Self {
        Self { key: bytes }
    }

    /// Raw key bytes. Use only for immediate cipher construction.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }

    /// `SHA-256` of the key, stored in the archive as `passHash`.
    pub fn verification_hash(&self) -> [u8; 32] {
        Sha256::digest(self.key).into()
    }

    /// Compare against a stored verification hash in constant time.
    pub fn matches(&self, stored_hash: &[u8]) -> bool {
        let hash = self.verification_hash();
        hash.as_slice().ct_eq(stored_hash).into()
    }
}

impl std::fmt::Debug for StretchedKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StretchedKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Stretch `password` with `salt` through `iterations` extra SHA-256 rounds.
pub fn stretch(password: &str, salt: &[u8], iterations: u32) -> StretchedKey {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt);
    let mut hash: [u8; KEY_LENGTH] = hasher.finalize().into();

    for _ in 0..iterations {
        let next: [u8; KEY_LENGTH] = Sha256::digest(hash).into();
        hash.zeroize();
        hash = next;
    }

    StretchedKey::from_bytes(hash)
}
