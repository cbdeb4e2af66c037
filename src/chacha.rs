//! The ChaCha stream cipher.
//!
//! 64-byte blocks over a 16-word state: four constants, eight key words, a
//! 64-bit little-endian block counter, and a 64-bit IV. Keys are 16 or 32
//! bytes (16-byte keys repeat into the upper words with the `expand 16-byte
//! k` constants); rounds are the even numbers from 8 to 30, default 20.
//!
//! Transform lengths need not be block-aligned, but the keystream advances
//! in whole blocks: the unused tail of a partial block is discarded, so
//! encrypt and decrypt must present the same call lengths.

use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::macros::{bytes_to_lanes, lanes_to_bytes};

const ORIGIN: &str = "ChaCha";

/// The keystream block size in bytes.
pub const BLOCK_SIZE: usize = 64;

/// The IV length in bytes.
pub const VECTOR_SIZE: usize = 8;

/// The valid round assignments.
pub const LEGAL_ROUNDS: [usize; 12] = [8, 10, 12, 14, 16, 18, 20, 22, 24, 26, 28, 30];

const ROUNDS20: usize = 20;
const MIN_ROUNDS: usize = 8;
const MAX_ROUNDS: usize = 30;

const SIGMA: &[u8; 16] = b"expand 32-byte k";
const TAU: &[u8; 16] = b"expand 16-byte k";

#[inline(always)]
fn quarter_round(state: &mut [u32; 16], a: usize, b: usize, c: usize, d: usize) {
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(16);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(12);
    state[a] = state[a].wrapping_add(state[b]);
    state[d] = (state[d] ^ state[a]).rotate_left(8);
    state[c] = state[c].wrapping_add(state[d]);
    state[b] = (state[b] ^ state[c]).rotate_left(7);
}

/// The ChaCha stream cipher.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct ChaCha {
    state: [u32; 16],
    counter: u64,
    rounds: usize,
    initialized: bool,
}

impl ChaCha {
    /// A cipher with the default 20 rounds.
    pub fn new() -> Self {
        ChaCha::with_rounds(ROUNDS20).expect("default rounds are legal")
    }

    /// A cipher with an explicit round count; even numbers in `[8, 30]`.
    pub fn with_rounds(rounds: usize) -> Result<Self> {
        if rounds < MIN_ROUNDS || rounds > MAX_ROUNDS || rounds % 2 != 0 {
            return Err(Error::InvalidRounds {
                origin: ORIGIN,
                rounds,
            });
        }
        Ok(ChaCha {
            state: [0u32; 16],
            counter: 0,
            rounds,
            initialized: false,
        })
    }

    /// The number of rounds.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// The current 64-bit block counter.
    pub fn counter(&self) -> u64 {
        self.counter
    }

    /// Key the cipher with a 16- or 32-byte key and an 8-byte IV, and reset
    /// the block counter.
    pub fn initialize(&mut self, key: &[u8], iv: &[u8]) -> Result<()> {
        if iv.len() != VECTOR_SIZE {
            return Err(Error::InvalidIv {
                origin: ORIGIN,
                length: iv.len(),
            });
        }

        let constants = match key.len() {
            32 => SIGMA,
            16 => TAU,
            len => {
                return Err(Error::InvalidKey {
                    origin: ORIGIN,
                    length: len,
                });
            }
        };

        self.state.zeroize();
        bytes_to_lanes!(u32, constants, self.state[0..4]);
        if key.len() == 32 {
            bytes_to_lanes!(u32, key, self.state[4..12]);
        } else {
            bytes_to_lanes!(u32, key, self.state[4..8]);
            bytes_to_lanes!(u32, key, self.state[8..12]);
        }
        // state[12..14] is the counter, spliced in per block.
        bytes_to_lanes!(u32, iv, self.state[14..16]);

        self.counter = 0;
        self.initialized = true;
        Ok(())
    }

    /// Return the block counter to zero, replaying the keystream.
    pub fn reset(&mut self) {
        self.counter = 0;
    }

    fn keystream_block(&mut self, block: &mut [u8; BLOCK_SIZE]) {
        self.state[12] = self.counter as u32;
        self.state[13] = (self.counter >> 32) as u32;

        let mut working = self.state;
        for _ in 0..self.rounds / 2 {
            quarter_round(&mut working, 0, 4, 8, 12);
            quarter_round(&mut working, 1, 5, 9, 13);
            quarter_round(&mut working, 2, 6, 10, 14);
            quarter_round(&mut working, 3, 7, 11, 15);
            quarter_round(&mut working, 0, 5, 10, 15);
            quarter_round(&mut working, 1, 6, 11, 12);
            quarter_round(&mut working, 2, 7, 8, 13);
            quarter_round(&mut working, 3, 4, 9, 14);
        }
        for (w, s) in working.iter_mut().zip(&self.state) {
            *w = w.wrapping_add(*s);
        }
        lanes_to_bytes!(u32, working, block);
        working.zeroize();

        self.counter = self.counter.wrapping_add(1);
    }

    /// XOR the keystream over `input` into `output`. Encryption and
    /// decryption are the same operation.
    pub fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        if !self.initialized {
            return Err(Error::NotInitialized { origin: ORIGIN });
        }
        if output.len() < input.len() {
            return Err(Error::BufferTooShort {
                origin: ORIGIN,
                detail: "the output buffer is shorter than the input",
            });
        }

        let mut block = [0u8; BLOCK_SIZE];
        for (in_chunk, out_chunk) in input
            .chunks(BLOCK_SIZE)
            .zip(output.chunks_mut(BLOCK_SIZE))
        {
            self.keystream_block(&mut block);
            for ((o, i), k) in out_chunk.iter_mut().zip(in_chunk).zip(&block) {
                *o = i ^ k;
            }
        }
        block.zeroize();
        Ok(())
    }
}

impl Default for ChaCha {
    fn default() -> Self {
        ChaCha::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn twenty_round_128_bit_vector() {
        // ECRYPT set 1 vector 0: key 80 00..00, zero IV, zero plaintext.
        let mut key = [0u8; 16];
        key[0] = 0x80;

        let mut cipher = ChaCha::new();
        cipher.initialize(&key, &[0u8; 8]).unwrap();

        let mut keystream = [0u8; 64];
        cipher.transform(&[0u8; 64], &mut keystream).unwrap();
        assert_eq!(
            hex::encode(keystream).to_uppercase(),
            "FBB87FBB8395E05DAA3B1D683C422046F913985C2AD9B23CFC06C1D8D04FF213\
             D44A7A7CDB84929F915420A8A3DC58BF0F7ECB4B1F167BB1A5E6153FDAF4493D"
        );
    }

    #[test]
    fn twenty_round_256_bit_vector() {
        let mut cipher = ChaCha::new();
        cipher.initialize(&[0u8; 32], &[0u8; 8]).unwrap();

        let mut keystream = [0u8; 64];
        cipher.transform(&[0u8; 64], &mut keystream).unwrap();
        assert_eq!(
            hex::encode(keystream),
            "76b8e0ada0f13d90405d6ae55386bd28bdd219b8a08ded1aa836efcc8b770dc7\
             da41597c5157488d7724e03fb8d84a376a43b8f41518a11cc387b669b2ee6586"
        );
    }

    #[test]
    fn transform_round_trips() {
        let key = [0x3cu8; 32];
        let iv = [0x11u8; 8];
        let plaintext: Vec<u8> = (0..512u16).map(|i| (i * 7) as u8).collect();

        let mut cipher = ChaCha::with_rounds(12).unwrap();
        cipher.initialize(&key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cipher.transform(&plaintext, &mut ciphertext).unwrap();
        assert_ne!(ciphertext, plaintext);

        cipher.initialize(&key, &iv).unwrap();
        let mut back = vec![0u8; plaintext.len()];
        cipher.transform(&ciphertext, &mut back).unwrap();
        assert_eq!(back, plaintext);
    }

    #[test]
    fn reset_replays_the_keystream() {
        let mut cipher = ChaCha::new();
        cipher.initialize(&[9u8; 32], &[2u8; 8]).unwrap();

        let mut first = [0u8; 128];
        cipher.transform(&[0u8; 128], &mut first).unwrap();
        assert_eq!(cipher.counter(), 2);

        cipher.reset();
        let mut second = [0u8; 128];
        cipher.transform(&[0u8; 128], &mut second).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn illegal_parameters_are_rejected() {
        for rounds in [0, 7, 9, 31, 32] {
            assert!(matches!(
                ChaCha::with_rounds(rounds),
                Err(Error::InvalidRounds { .. })
            ));
        }

        let mut cipher = ChaCha::new();
        assert!(matches!(
            cipher.initialize(&[0u8; 24], &[0u8; 8]),
            Err(Error::InvalidKey { length: 24, .. })
        ));
        assert!(matches!(
            cipher.initialize(&[0u8; 32], &[0u8; 12]),
            Err(Error::InvalidIv { length: 12, .. })
        ));

        let mut out = [0u8; 16];
        assert!(matches!(
            cipher.transform(&[0u8; 16], &mut out),
            Err(Error::NotInitialized { .. })
        ));
    }
}
