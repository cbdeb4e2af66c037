//! HMAC (RFC 2104) over any of the crate's digests.

use subtle::ConstantTimeEq;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::Digest;

const IPAD: u8 = 0x36;
const OPAD: u8 = 0x5c;

/// A hash-based message authentication code, generic over the digest.
///
/// After construction the instance is primed for input; [`Hmac::finalize`]
/// emits the tag and re-primes it for the next message under the same key.
pub struct Hmac<D: Digest + Default> {
    digest: D,
    inner_pad: Vec<u8>,
    outer_pad: Vec<u8>,
}

impl<D: Digest + Default> Drop for Hmac<D> {
    fn drop(&mut self) {
        self.digest.reset();
        self.inner_pad.zeroize();
        self.outer_pad.zeroize();
    }
}

impl<D: Digest + Default> Hmac<D> {
    /// Key the MAC. Keys longer than the digest block are hashed first, per
    /// RFC 2104; the key may be zeroized by the caller afterwards.
    pub fn new(key: &[u8]) -> Self {
        let mut digest = D::default();
        let block = digest.block_size();
        let hash = digest.digest_size();

        let mut padded = vec![0u8; block];
        if key.len() > block {
            digest.update(key);
            digest
                .finalize(&mut padded[..hash])
                .expect("digest output fits its own hash size");
        } else {
            padded[..key.len()].copy_from_slice(key);
        }

        let inner_pad: Vec<u8> = padded.iter().map(|b| b ^ IPAD).collect();
        let outer_pad: Vec<u8> = padded.iter().map(|b| b ^ OPAD).collect();
        padded.zeroize();

        digest.update(&inner_pad);
        Hmac {
            digest,
            inner_pad,
            outer_pad,
        }
    }

    /// The tag length in bytes, equal to the digest size.
    pub fn mac_size(&self) -> usize {
        self.digest.digest_size()
    }

    /// The digest block size in bytes.
    pub fn block_size(&self) -> usize {
        self.digest.block_size()
    }

    /// Absorb message bytes.
    pub fn update(&mut self, input: &[u8]) {
        self.digest.update(input);
    }

    /// Write the tag into the front of `output`, then re-prime for the next
    /// message. Returns the number of bytes written.
    pub fn finalize(&mut self, output: &mut [u8]) -> Result<usize> {
        let hash = self.digest.digest_size();
        if output.len() < hash {
            return Err(Error::BufferTooShort {
                origin: "HMAC",
                detail: "the output buffer is shorter than the mac",
            });
        }

        let mut inner = vec![0u8; hash];
        self.digest.finalize(&mut inner)?;
        self.digest.update(&self.outer_pad);
        self.digest.update(&inner);
        self.digest.finalize(&mut output[..hash])?;
        inner.zeroize();

        self.digest.update(&self.inner_pad);
        Ok(hash)
    }

    /// Discard any absorbed message bytes and re-prime under the same key.
    pub fn reset(&mut self) {
        self.digest.reset();
        self.digest.update(&self.inner_pad);
    }

    /// Finalize and compare against an expected tag in constant time.
    pub fn verify(&mut self, expected: &[u8]) -> Result<bool> {
        let mut tag = vec![0u8; self.mac_size()];
        self.finalize(&mut tag)?;
        let equal = expected.len() == tag.len() && bool::from(tag.ct_eq(expected));
        tag.zeroize();
        Ok(equal)
    }

    /// One-shot tag computation.
    pub fn compute(key: &[u8], input: &[u8], output: &mut [u8]) -> Result<usize> {
        let mut mac = Hmac::<D>::new(key);
        mac.update(input);
        mac.finalize(output)
    }
}
