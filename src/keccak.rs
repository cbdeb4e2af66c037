//! Keccak-f\[1600\] and the Keccak-256 digest.
//!
//! The digest runs the permutation at `r=1088`/`c=512` with the pre-NIST
//! `0x01` domain byte, so sequential output matches the Keccak team's
//! original test vectors rather than FIPS-202 SHA3-256. Enabling the
//! `fips202` cargo feature switches the domain byte to `0x06` and produces
//! SHA3-256 instead.
//!
//! Besides the plain sequential sponge, the digest supports a fan-out tree:
//! an even number of leaf sponges, each domain-separated by a parameter
//! header carrying its node offset, absorb rate-sized blocks of the input
//! round-robin and in parallel. Each leaf finalizes to a 32-byte chaining
//! value and a root sponge compresses the concatenation. Tree output is
//! deterministic for a fixed (input, degree) pair but deliberately distinct
//! from the sequential digest.

use rayon::prelude::*;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Error, Result};
use crate::macros::lanes_to_bytes;
use crate::Digest;

/// The sponge rate in bytes.
pub const RATE: usize = 136;

/// The digest length in bytes.
pub const DIGEST_SIZE: usize = 32;

const ORIGIN: &str = "Keccak256";
const MAX_FAN_OUT: usize = 254;

#[cfg(not(feature = "fips202"))]
const DOMAIN_PAD: u8 = 0x01;
#[cfg(feature = "fips202")]
const DOMAIN_PAD: u8 = 0x06;

const ROUND_CONSTANTS: [u64; 24] = [
    0x0000000000000001,
    0x0000000000008082,
    0x800000000000808a,
    0x8000000080008000,
    0x000000000000808b,
    0x0000000080000001,
    0x8000000080008081,
    0x8000000000008009,
    0x000000000000008a,
    0x0000000000000088,
    0x0000000080008009,
    0x000000008000000a,
    0x000000008000808b,
    0x800000000000008b,
    0x8000000000008089,
    0x8000000000008003,
    0x8000000000008002,
    0x8000000000000080,
    0x000000000000800a,
    0x800000008000000a,
    0x8000000080008081,
    0x8000000000008080,
    0x0000000080000001,
    0x8000000080008008,
];

const RHO: [u32; 24] = [
    1, 3, 6, 10, 15, 21, 28, 36, 45, 55, 2, 14, 27, 41, 56, 8, 25, 43, 62, 18, 39, 61, 20, 44,
];

const PI: [usize; 24] = [
    10, 7, 11, 17, 18, 3, 5, 16, 8, 21, 24, 4, 15, 23, 19, 13, 12, 2, 20, 14, 22, 9, 6, 1,
];

/// The Keccak-f\[1600\] permutation: 24 rounds of theta, rho, pi, chi, and
/// iota over 25 lanes indexed `x + 5y`.
pub fn keccak_f1600(lanes: &mut [u64; 25]) {
    for &rc in &ROUND_CONSTANTS {
        let mut c = [0u64; 5];
        for x in 0..5 {
            c[x] = lanes[x] ^ lanes[x + 5] ^ lanes[x + 10] ^ lanes[x + 15] ^ lanes[x + 20];
        }
        for x in 0..5 {
            let d = c[(x + 4) % 5] ^ c[(x + 1) % 5].rotate_left(1);
            for y in 0..5 {
                lanes[x + 5 * y] ^= d;
            }
        }

        let mut last = lanes[1];
        for i in 0..24 {
            let t = lanes[PI[i]];
            lanes[PI[i]] = last.rotate_left(RHO[i]);
            last = t;
        }

        for y in 0..5 {
            let row = [
                lanes[5 * y],
                lanes[5 * y + 1],
                lanes[5 * y + 2],
                lanes[5 * y + 3],
                lanes[5 * y + 4],
            ];
            for x in 0..5 {
                lanes[5 * y + x] = row[x] ^ (!row[(x + 1) % 5] & row[(x + 2) % 5]);
            }
        }

        lanes[0] ^= rc;
    }
}

fn absorb_block(lanes: &mut [u64; 25], block: &[u8]) {
    debug_assert_eq!(block.len(), RATE);
    for (lane, chunk) in lanes.iter_mut().zip(block.chunks(8)) {
        *lane ^= u64::from_le_bytes(chunk.try_into().unwrap());
    }
    keccak_f1600(lanes);
}

/// Finalize one sponge over a residual of less than or exactly one rate
/// block, returning the 32-byte chaining value.
fn finalize_lanes(lanes: &mut [u64; 25], residual: &[u8]) -> [u8; DIGEST_SIZE] {
    debug_assert!(residual.len() <= RATE);
    let mut residual = residual;
    if residual.len() == RATE {
        absorb_block(lanes, residual);
        residual = &[];
    }

    let mut block = [0u8; RATE];
    block[..residual.len()].copy_from_slice(residual);
    block[residual.len()] = DOMAIN_PAD;
    block[RATE - 1] |= 0x80;
    absorb_block(lanes, &block);

    let mut out = [0u8; DIGEST_SIZE];
    lanes_to_bytes!(u64, lanes[..4], out);
    out
}

/// The tree-parameter record absorbed into each leaf before any input.
///
/// Serialized little-endian and zero-padded to one rate block; the node
/// offset field is the per-leaf domain separator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeParams {
    digest_len: u32,
    leaf_len: u32,
    fan_out: u32,
    node_offset: u32,
    version: u32,
}

impl TreeParams {
    /// Build the parameter record for one leaf of a tree of the given degree.
    pub fn new(fan_out: u32, node_offset: u32) -> Self {
        TreeParams {
            digest_len: DIGEST_SIZE as u32,
            leaf_len: RATE as u32,
            fan_out,
            node_offset,
            version: 1,
        }
    }

    /// Serialize to one rate block.
    pub fn to_bytes(self) -> [u8; RATE] {
        let mut out = [0u8; RATE];
        out[0..4].copy_from_slice(&self.digest_len.to_le_bytes());
        out[4..8].copy_from_slice(&self.leaf_len.to_le_bytes());
        out[8..12].copy_from_slice(&self.fan_out.to_le_bytes());
        out[12..16].copy_from_slice(&self.node_offset.to_le_bytes());
        out[16..20].copy_from_slice(&self.version.to_le_bytes());
        out
    }
}

/// The Keccak-256 digest, sequential or fan-out.
///
/// With a fan-out of 1 (the [`Keccak256::new`] default) this is a single
/// sponge. With an even fan-out `D >= 2`, input is striped across `D`
/// domain-separated leaves that absorb concurrently; see the module docs.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Keccak256 {
    leaves: Vec<[u64; 25]>,
    buffer: Vec<u8>,
    buffer_len: usize,
    fan_out: usize,
}

impl Default for Keccak256 {
    fn default() -> Self {
        Keccak256::new()
    }
}

impl Keccak256 {
    /// A sequential Keccak-256 digest.
    pub fn new() -> Self {
        let mut digest = Keccak256 {
            leaves: vec![[0u64; 25]],
            buffer: vec![0u8; RATE],
            buffer_len: 0,
            fan_out: 1,
        };
        digest.reset_state();
        digest
    }

    /// A fan-out tree digest of the given degree.
    ///
    /// The degree must be an even number in `[2, 254]`, otherwise
    /// [`Error::InvalidDegree`] is returned.
    pub fn with_fan_out(degree: usize) -> Result<Self> {
        if degree < 2 || degree > MAX_FAN_OUT || degree % 2 != 0 {
            return Err(Error::InvalidDegree {
                origin: ORIGIN,
                degree,
            });
        }
        let mut digest = Keccak256 {
            leaves: vec![[0u64; 25]; degree],
            buffer: vec![0u8; degree * RATE],
            buffer_len: 0,
            fan_out: degree,
        };
        digest.reset_state();
        Ok(digest)
    }

    /// The tree degree; 1 in sequential mode.
    pub fn fan_out(&self) -> usize {
        self.fan_out
    }

    fn reset_state(&mut self) {
        self.buffer.iter_mut().for_each(|b| *b = 0);
        self.buffer_len = 0;
        for (i, leaf) in self.leaves.iter_mut().enumerate() {
            *leaf = [0u64; 25];
            if self.fan_out > 1 {
                let header = TreeParams::new(self.fan_out as u32, i as u32).to_bytes();
                absorb_block(leaf, &header);
            }
        }
    }

    fn update_sequential(&mut self, mut input: &[u8]) {
        if self.buffer_len != 0 && self.buffer_len + input.len() >= RATE {
            let remainder = RATE - self.buffer_len;
            self.buffer[self.buffer_len..].copy_from_slice(&input[..remainder]);
            absorb_block(&mut self.leaves[0], &self.buffer);
            self.buffer_len = 0;
            input = &input[remainder..];
        }

        while input.len() >= RATE {
            absorb_block(&mut self.leaves[0], &input[..RATE]);
            input = &input[RATE..];
        }

        if !input.is_empty() {
            self.buffer[self.buffer_len..self.buffer_len + input.len()].copy_from_slice(input);
            self.buffer_len += input.len();
        }
    }

    fn update_tree(&mut self, mut input: &[u8]) {
        let stride = self.fan_out * RATE;

        if self.buffer_len != 0 && self.buffer_len + input.len() >= stride {
            let remainder = stride - self.buffer_len;
            self.buffer[self.buffer_len..].copy_from_slice(&input[..remainder]);
            let buffer = &self.buffer;
            self.leaves
                .par_iter_mut()
                .enumerate()
                .for_each(|(i, leaf)| absorb_block(leaf, &buffer[i * RATE..(i + 1) * RATE]));
            self.buffer_len = 0;
            input = &input[remainder..];
        }

        if input.len() >= stride {
            let bulk = input.len() - (input.len() % stride);
            let region = &input[..bulk];
            self.leaves.par_iter_mut().enumerate().for_each(|(i, leaf)| {
                let mut offset = i * RATE;
                while offset < bulk {
                    absorb_block(leaf, &region[offset..offset + RATE]);
                    offset += stride;
                }
            });
            input = &input[bulk..];
        }

        if !input.is_empty() {
            self.buffer[self.buffer_len..self.buffer_len + input.len()].copy_from_slice(input);
            self.buffer_len += input.len();
        }
    }

    fn finalize_tree(&mut self, output: &mut [u8]) {
        // Residual stripes: leaf i owns buffer bytes [i*RATE, (i+1)*RATE).
        let mut chaining = vec![0u8; self.fan_out * DIGEST_SIZE];
        for (i, leaf) in self.leaves.iter_mut().enumerate() {
            let start = (i * RATE).min(self.buffer_len);
            let end = ((i + 1) * RATE).min(self.buffer_len);
            let value = finalize_lanes(leaf, &self.buffer[start..end]);
            chaining[i * DIGEST_SIZE..(i + 1) * DIGEST_SIZE].copy_from_slice(&value);
        }

        let mut root = [0u64; 25];
        let mut rest: &[u8] = &chaining;
        while rest.len() >= RATE {
            absorb_block(&mut root, &rest[..RATE]);
            rest = &rest[RATE..];
        }
        let digest = finalize_lanes(&mut root, rest);
        output[..DIGEST_SIZE].copy_from_slice(&digest);
        chaining.zeroize();
        root.zeroize();
    }
}

impl Digest for Keccak256 {
    fn block_size(&self) -> usize {
        RATE
    }

    fn digest_size(&self) -> usize {
        DIGEST_SIZE
    }

    fn update(&mut self, input: &[u8]) {
        if input.is_empty() {
            return;
        }
        if self.fan_out == 1 {
            self.update_sequential(input);
        } else {
            self.update_tree(input);
        }
    }

    fn finalize(&mut self, output: &mut [u8]) -> Result<usize> {
        if output.len() < DIGEST_SIZE {
            return Err(Error::BufferTooShort {
                origin: ORIGIN,
                detail: "the output buffer is shorter than the digest",
            });
        }

        if self.fan_out == 1 {
            let residual_len = self.buffer_len;
            let digest = {
                let (leaf, buffer) = (&mut self.leaves[0], &self.buffer[..residual_len]);
                finalize_lanes(leaf, buffer)
            };
            output[..DIGEST_SIZE].copy_from_slice(&digest);
        } else {
            self.finalize_tree(output);
        }

        self.reset_state();
        Ok(DIGEST_SIZE)
    }

    fn reset(&mut self) {
        self.reset_state();
    }
}
