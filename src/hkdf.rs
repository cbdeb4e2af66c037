//! The keyed byte generator behind the extended RHX key schedule.
//!
//! The generator is an HMAC counter expander: block `i` of output is
//! `HMAC(ikm, salt || info || i)` for `i = 1, 2, ...`, truncated to the
//! requested length. The single-byte counter caps a request at 255 digest
//! blocks, far above the largest round-key schedule.

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::hmac::Hmac;
use crate::Digest;

/// An HMAC-based expand-only key derivation generator.
pub struct HkdfExpander<D: Digest + Default> {
    mac: Hmac<D>,
    salt: Vec<u8>,
    info: Vec<u8>,
}

impl<D: Digest + Default> Drop for HkdfExpander<D> {
    fn drop(&mut self) {
        self.salt.zeroize();
        self.info.zeroize();
    }
}

impl<D: Digest + Default> HkdfExpander<D> {
    /// Key the generator with input keying material, a salt, and a fixed
    /// distribution (info) string.
    pub fn new(ikm: &[u8], salt: &[u8], info: &[u8]) -> Self {
        HkdfExpander {
            mac: Hmac::new(ikm),
            salt: salt.to_vec(),
            info: info.to_vec(),
        }
    }

    /// Fill `output` with generated bytes. The stream restarts at counter 1
    /// on every call, so equal requests produce equal bytes.
    pub fn generate(&mut self, output: &mut [u8]) -> Result<usize> {
        let hash = self.mac.mac_size();
        let blocks = output.len().div_ceil(hash);
        if blocks > 255 {
            return Err(Error::InternalState {
                origin: "HKDF",
                detail: "requested output exceeds 255 generator blocks",
            });
        }

        let mut block = vec![0u8; hash];
        for (i, chunk) in output.chunks_mut(hash).enumerate() {
            self.mac.update(&self.salt);
            self.mac.update(&self.info);
            self.mac.update(&[(i + 1) as u8]);
            self.mac.finalize(&mut block)?;
            chunk.copy_from_slice(&block[..chunk.len()]);
        }
        block.zeroize();
        Ok(output.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::Sha512;

    #[test]
    fn generation_is_deterministic() {
        let ikm = [0x0bu8; 64];
        let salt = [0xa5u8; 128];

        let mut gen = HkdfExpander::<Sha512>::new(&ikm, &salt, b"info");
        let mut a = [0u8; 368];
        gen.generate(&mut a).unwrap();

        let mut gen = HkdfExpander::<Sha512>::new(&ikm, &salt, b"info");
        let mut b = [0u8; 368];
        gen.generate(&mut b).unwrap();

        assert_eq!(a[..], b[..]);
    }

    #[test]
    fn info_separates_streams() {
        let ikm = [0x0bu8; 64];
        let salt = [0xa5u8; 128];

        let mut a = [0u8; 64];
        HkdfExpander::<Sha512>::new(&ikm, &salt, b"one")
            .generate(&mut a)
            .unwrap();
        let mut b = [0u8; 64];
        HkdfExpander::<Sha512>::new(&ikm, &salt, b"two")
            .generate(&mut b)
            .unwrap();

        assert_ne!(a, b);
    }

    #[test]
    fn successive_blocks_differ() {
        let mut gen = HkdfExpander::<Sha512>::new(&[7u8; 64], &[9u8; 128], b"info");
        let mut out = [0u8; 128];
        gen.generate(&mut out).unwrap();
        assert_ne!(out[..64], out[64..]);
    }

    #[test]
    fn oversized_requests_are_rejected() {
        let mut gen = HkdfExpander::<Sha512>::new(&[1u8; 64], &[2u8; 128], b"info");
        let mut out = vec![0u8; 255 * 64 + 1];
        assert!(matches!(
            gen.generate(&mut out),
            Err(Error::InternalState { .. })
        ));
    }
}
