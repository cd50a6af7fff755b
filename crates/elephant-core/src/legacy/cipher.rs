//! Blowfish as Password Safe 2.0 uses it.
//!
//! Password Safe ran Blowfish on little-endian words while the cipher is
//! specified big-endian, so every 4-byte group is reversed on the way into and
//! out of the block cipher. The CBC chain runs through the whole file, field
//! headers and field content alike, in the swapped domain.

use blowfish::Blowfish;
use cbc::cipher::consts::U8;
use cbc::cipher::generic_array::GenericArray;
#[cfg(test)]
use cbc::cipher::BlockEncryptMut;
use cbc::cipher::{BlockDecryptMut, BlockEncrypt, InnerIvInit, KeyInit};
use sha1::{Digest, Sha1};
use zeroize::Zeroizing;

use crate::crypto::Sha1State;
use crate::error::{ImportError, ImportResult};

/// Blowfish block size.
pub const BLOCK_LEN: usize = 8;

const VERIFIER_ROUNDS: usize = 1000;

/// Reverse each complete 4-byte group in place.
pub fn swap_groups(bytes: &mut [u8]) {
    for group in bytes.chunks_exact_mut(4) {
        group.reverse();
    }
}

fn engine(key: &[u8]) -> ImportResult<Blowfish> {
    Blowfish::new_from_slice(key)
        .map_err(|e| ImportError::System(format!("Blowfish key rejected: {}", e)))
}

/// Field stream key, `SHA-1(password ‖ salt)`.
fn stream_engine(password: &str, salt: &[u8]) -> ImportResult<Blowfish> {
    let key: Zeroizing<[u8; 20]> = Zeroizing::new(
        Sha1::new()
            .chain_update(password.as_bytes())
            .chain_update(salt)
            .finalize()
            .into(),
    );
    engine(key.as_slice())
}

/// The stored IV moved into the swapped domain the chain runs in.
fn chain_iv(stored_iv: &[u8; BLOCK_LEN]) -> GenericArray<u8, U8> {
    let mut iv = *stored_iv;
    swap_groups(&mut iv);
    GenericArray::clone_from_slice(&iv)
}

/// Stateful CBC decryptor for the field stream after the file header.
pub struct LegacyCipher {
    decryptor: cbc::Decryptor<Blowfish>,
}

impl LegacyCipher {
    /// Key the cipher from the password and salt, chaining from the header IV
    /// as stored on disk.
    pub fn new(password: &str, salt: &[u8], stored_iv: &[u8; BLOCK_LEN]) -> ImportResult<Self> {
        let decryptor =
            cbc::Decryptor::inner_iv_init(stream_engine(password, salt)?, &chain_iv(stored_iv));
        Ok(Self { decryptor })
    }

    /// Decrypt whole blocks in place, continuing the chain.
    pub fn decrypt(&mut self, data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_LEN, 0);
        for block in data.chunks_exact_mut(BLOCK_LEN) {
            swap_groups(block);
            self.decryptor
                .decrypt_block_mut(GenericArray::from_mut_slice(block));
            swap_groups(block);
        }
    }
}

/// Encrypting counterpart of [`LegacyCipher`], for building test files.
#[cfg(test)]
pub(crate) struct LegacyEncryptor {
    encryptor: cbc::Encryptor<Blowfish>,
}

#[cfg(test)]
impl LegacyEncryptor {
    pub fn new(password: &str, salt: &[u8], stored_iv: &[u8; BLOCK_LEN]) -> ImportResult<Self> {
        let encryptor =
            cbc::Encryptor::inner_iv_init(stream_engine(password, salt)?, &chain_iv(stored_iv));
        Ok(Self { encryptor })
    }

    pub fn encrypt(&mut self, data: &mut [u8]) {
        debug_assert_eq!(data.len() % BLOCK_LEN, 0);
        for block in data.chunks_exact_mut(BLOCK_LEN) {
            swap_groups(block);
            self.encryptor
                .encrypt_block_mut(GenericArray::from_mut_slice(block));
            swap_groups(block);
        }
    }
}

/// The password verifier stored at bytes `8..28` of the header.
///
/// `key = SHA-1(rnd ‖ 00 00 ‖ password)`; `rnd` is Blowfish-ECB encrypted
/// under that key a thousand times (with the group swap around the whole
/// run), and the result plus two zero bytes is hashed with the zero-state
/// SHA-1.
pub fn compute_verifier(rnd: &[u8; BLOCK_LEN], password: &str) -> ImportResult<[u8; 20]> {
    let key: Zeroizing<[u8; 20]> = Zeroizing::new(
        Sha1::new()
            .chain_update(rnd)
            .chain_update([0u8, 0u8])
            .chain_update(password.as_bytes())
            .finalize()
            .into(),
    );
    let engine = engine(key.as_slice())?;

    let mut block = *rnd;
    swap_groups(&mut block);
    for _ in 0..VERIFIER_ROUNDS {
        engine.encrypt_block(GenericArray::from_mut_slice(&mut block));
    }
    swap_groups(&mut block);

    let mut hasher = Sha1State::zeroed();
    hasher.update(&block);
    hasher.update(&[0, 0]);
    Ok(hasher.finalize())
}
