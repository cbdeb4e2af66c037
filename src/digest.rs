//! SHA-2 adapters and the selectable digest set.
//!
//! The SHA-2 family comes from the `sha2` crate and is adapted to the crate's
//! [`Digest`] trait so it can drive the HMAC, HKDF, and PBKDF2 generators
//! alongside the in-crate [`crate::Keccak256`].

use crate::error::{Error, Result};
use crate::Digest;

/// The digests selectable as an HKDF key-schedule engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Digests {
    Sha256,
    Sha512,
    Keccak256,
}

impl Digests {
    /// The digest output length in bytes.
    pub fn digest_size(self) -> usize {
        match self {
            Digests::Sha256 => 32,
            Digests::Sha512 => 64,
            Digests::Keccak256 => 32,
        }
    }

    /// The digest internal block (or rate) size in bytes.
    pub fn block_size(self) -> usize {
        match self {
            Digests::Sha256 => 64,
            Digests::Sha512 => 128,
            Digests::Keccak256 => 136,
        }
    }
}

/// SHA-2 256.
#[derive(Clone, Default)]
pub struct Sha256 {
    inner: sha2::Sha256,
}

/// SHA-2 512.
#[derive(Clone, Default)]
pub struct Sha512 {
    inner: sha2::Sha512,
}

macro_rules! sha2_digest {
    ($name:ident, $block:expr, $size:expr) => {
        impl Digest for $name {
            fn block_size(&self) -> usize {
                $block
            }

            fn digest_size(&self) -> usize {
                $size
            }

            fn update(&mut self, input: &[u8]) {
                sha2::Digest::update(&mut self.inner, input);
            }

            fn finalize(&mut self, output: &mut [u8]) -> Result<usize> {
                if output.len() < $size {
                    return Err(Error::BufferTooShort {
                        origin: stringify!($name),
                        detail: "the output buffer is shorter than the digest",
                    });
                }
                let digest = sha2::Digest::finalize(std::mem::take(&mut self.inner));
                output[..$size].copy_from_slice(&digest);
                Ok($size)
            }

            fn reset(&mut self) {
                self.inner = Default::default();
            }
        }
    };
}

sha2_digest!(Sha256, 64, 32);
sha2_digest!(Sha512, 128, 64);
