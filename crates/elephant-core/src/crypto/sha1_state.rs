//! SHA-1 with caller-supplied initial registers.
//!
//! Early Password Safe releases validated the password with a SHA-1 whose
//! initial H registers were all zero instead of the FIPS 180 constants. Every
//! later tool kept that variant to stay able to open old files, so the
//! importer needs a SHA-1 where the starting state is a parameter.
//!
//! Buffering and padding live here; the block compression is the `sha1`
//! crate's. The standard variant ([`Sha1State::standard`]) produces ordinary
//! SHA-1 digests.

use sha1::digest::generic_array::GenericArray;
use zeroize::Zeroize;

const BLOCK_LEN: usize = 64;

/// FIPS 180-4 initial hash value.
pub const STANDARD_INITIAL_STATE: [u32; 5] =
    [0x6745_2301, 0xEFCD_AB89, 0x98BA_DCFE, 0x1032_5476, 0xC3D2_E1F0];

/// Streaming SHA-1 over an arbitrary initial state.
#[derive(Clone)]
pub struct Sha1State {
    state: [u32; 5],
    buffer: [u8; BLOCK_LEN],
    buffered: usize,
    length: u64,
}

impl Sha1State {
    pub fn with_initial_state(state: [u32; 5]) -> Self {
        Self {
            state,
            buffer: [0u8; BLOCK_LEN],
            buffered: 0,
            length: 0,
        }
    }

    pub fn standard() -> Self {
        Self::with_initial_state(STANDARD_INITIAL_STATE)
    }

    /// The Password Safe variant: every register starts at zero.
    pub fn zeroed() -> Self {
        Self::with_initial_state([0; 5])
    }

    pub fn update(&mut self, mut data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);

        if self.buffered > 0 {
            let take = (BLOCK_LEN - self.buffered).min(data.len());
            self.buffer[self.buffered..self.buffered + take].copy_from_slice(&data[..take]);
            self.buffered += take;
            data = &data[take..];
            if self.buffered < BLOCK_LEN {
                return;
            }
            let block = self.buffer;
            compress(&mut self.state, &block);
            self.buffered = 0;
        }

        let mut blocks = data.chunks_exact(BLOCK_LEN);
        for block in &mut blocks {
            compress(&mut self.state, block);
        }
        let rest = blocks.remainder();
        self.buffer[..rest.len()].copy_from_slice(rest);
        self.buffered = rest.len();
    }

    pub fn finalize(mut self) -> [u8; 20] {
        let bit_length = self.length.wrapping_mul(8);

        let mut padding = [0u8; BLOCK_LEN + 8];
        padding[0] = 0x80;
        let pad_len = if self.buffered < 56 {
            56 - self.buffered
        } else {
            120 - self.buffered
        };
        // Padding must not count towards the message length.
        let length = self.length;
        self.update(&padding[..pad_len]);
        self.update(&bit_length.to_be_bytes());
        self.length = length;

        let mut digest = [0u8; 20];
        for (chunk, word) in digest.chunks_exact_mut(4).zip(self.state.iter()) {
            chunk.copy_from_slice(&word.to_be_bytes());
        }
        padding.zeroize();
        digest
    }

    /// One-shot digest of `data` from `initial_state`.
    pub fn digest(initial_state: [u32; 5], data: &[u8]) -> [u8; 20] {
        let mut hasher = Self::with_initial_state(initial_state);
        hasher.update(data);
        hasher.finalize()
    }
}

impl Drop for Sha1State {
    fn drop(&mut self) {
        self.state.zeroize();
        self.buffer.zeroize();
    }
}

/// Feed one 64-byte block to the `sha1` crate's compression function.
fn compress(state: &mut [u32; 5], block: &[u8]) {
    let mut blocks = [GenericArray::clone_from_slice(block)];
    sha1::compress(state, &blocks);
    blocks[0].as_mut_slice().zeroize();
}

#[cfg(test)]
mod tests {
    use super::*;
    use sha1::{Digest, Sha1};

    #[test]
    fn test_standard_state_matches_known_vectors() {
        assert_eq!(
            hex::encode(Sha1State::digest(STANDARD_INITIAL_STATE, b"abc")),
            "a9993e364706816aba3e25717850c26c9cd0d89d"
        );
        assert_eq!(
            hex::encode(Sha1State::digest(STANDARD_INITIAL_STATE, b"")),
            "da39a3ee5e6b4b0d3255bfef95601890afd80709"
        );
    }

    #[test]
    fn test_standard_state_matches_sha1_crate_at_block_boundaries() {
        for len in [0usize, 1, 55, 56, 57, 63, 64, 65, 119, 120, 128, 1000] {
            let data: Vec<u8> = (0..len).map(|i| (i * 31 % 251) as u8).collect();
            let expected: [u8; 20] = Sha1::digest(&data).into();
            assert_eq!(Sha1State::digest(STANDARD_INITIAL_STATE, &data), expected, "len {}", len);
        }
    }

    #[test]
    fn test_incremental_updates_match_one_shot() {
        let data: Vec<u8> = (0..300u32).map(|i| i as u8).collect();
        let mut hasher = Sha1State::zeroed();
        for piece in data.chunks(7) {
            hasher.update(piece);
        }
        assert_eq!(hasher.finalize(), Sha1State::digest([0; 5], &data));
    }

    #[test]
    fn test_zeroed_state_known_vectors() {
        assert_eq!(
            hex::encode(Sha1State::digest([0; 5], b"abc")),
            "3e8781f493c1c6d6888f8a670b50beec99b2c36b"
        );
    }

    #[test]
    fn test_zeroed_state_differs_from_standard() {
        let data = b"password safe";
        let zeroed = Sha1State::digest([0; 5], data);
        let expected: [u8; 20] = Sha1::digest(data).into();
        assert_ne!(zeroed, expected);
    }
}
