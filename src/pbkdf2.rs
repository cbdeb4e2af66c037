//! PBKDF2 (RFC 2898) pseudo-random byte generator.

use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::hmac::Hmac;
use crate::Digest;

const ORIGIN: &str = "PBKDF2";

/// Default iteration count.
pub const PKCS_ITERATIONS: usize = 1000;

/// An RFC 2898 counter-mode generator over an HMAC.
///
/// Initialize with a salt and a passphrase (the HMAC key), then draw output
/// with [`Pbkdf2::generate`]. Output block `i` is
/// `F(i) = U_1 xor U_2 xor ... xor U_c` with `U_1 = HMAC(P, S || INT(i))`.
pub struct Pbkdf2<D: Digest + Default> {
    mac: Option<Hmac<D>>,
    salt: Vec<u8>,
    iterations: usize,
}

impl<D: Digest + Default> Drop for Pbkdf2<D> {
    fn drop(&mut self) {
        self.salt.zeroize();
    }
}

impl<D: Digest + Default> Pbkdf2<D> {
    /// Create a generator performing `iterations` rounds per output block.
    /// A zero count is rejected with [`Error::InvalidRounds`].
    pub fn new(iterations: usize) -> Result<Self> {
        if iterations == 0 {
            return Err(Error::InvalidRounds {
                origin: ORIGIN,
                rounds: iterations,
            });
        }
        Ok(Pbkdf2 {
            mac: None,
            salt: Vec::new(),
            iterations,
        })
    }

    /// True once the generator has been keyed.
    pub fn is_initialized(&self) -> bool {
        self.mac.is_some()
    }

    /// Key the generator with a salt and a passphrase.
    pub fn initialize(&mut self, salt: &[u8], passphrase: &[u8]) {
        self.mac = Some(Hmac::new(passphrase));
        self.salt.zeroize();
        self.salt = salt.to_vec();
    }

    /// Key the generator with a salt, a passphrase, and a nonce appended to
    /// the salt.
    pub fn initialize_with_nonce(&mut self, salt: &[u8], passphrase: &[u8], nonce: &[u8]) {
        let mut combined = Vec::with_capacity(salt.len() + nonce.len());
        combined.extend_from_slice(salt);
        combined.extend_from_slice(nonce);
        self.mac = Some(Hmac::new(passphrase));
        self.salt.zeroize();
        self.salt = combined;
    }

    /// Fill `output` with derived bytes, restarting at block counter 1.
    pub fn generate(&mut self, output: &mut [u8]) -> Result<usize> {
        let mac = self.mac.as_mut().ok_or(Error::NotInitialized { origin: ORIGIN })?;

        let hash = mac.mac_size();
        let mut u = vec![0u8; hash];
        let mut f = vec![0u8; hash];

        for (index, chunk) in output.chunks_mut(hash).enumerate() {
            let counter = (index + 1) as u32;
            mac.update(&self.salt);
            mac.update(&counter.to_be_bytes());
            mac.finalize(&mut u)?;
            f.copy_from_slice(&u);

            for _ in 1..self.iterations {
                mac.update(&u);
                mac.finalize(&mut u)?;
                for (acc, byte) in f.iter_mut().zip(&u) {
                    *acc ^= byte;
                }
            }

            chunk.copy_from_slice(&f[..chunk.len()]);
        }

        u.zeroize();
        f.zeroize();
        Ok(output.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::{Sha256, Sha512};

    #[test]
    fn sha512_single_iteration() {
        let mut kdf = Pbkdf2::<Sha512>::new(1).unwrap();
        kdf.initialize(b"salt", b"password");
        let mut out = [0u8; 64];
        kdf.generate(&mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "867f70cf1ade02cff3752599a3a53dc4af34c7a669815ae5d513554e1c8cf252\
             c02d470a285a0501bad999bfe943c08f050235d7d68b1da55e63f73b60a57fce"
        );
    }

    #[test]
    fn sha512_default_iterations() {
        let mut kdf = Pbkdf2::<Sha512>::new(PKCS_ITERATIONS).unwrap();
        kdf.initialize(b"salt", b"password");
        let mut out = [0u8; 64];
        kdf.generate(&mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "afe6c5530785b6cc6b1c6453384731bd5ee432ee549fd42fb6695779ad8a1c5b\
             f59de69c48f774efc4007d5298f9033c0241d5ab69305e7b64eceeb8d834cfec"
        );
    }

    #[test]
    fn sha256_default_iterations() {
        let mut kdf = Pbkdf2::<Sha256>::new(PKCS_ITERATIONS).unwrap();
        kdf.initialize(b"salt", b"password");
        let mut out = [0u8; 32];
        kdf.generate(&mut out).unwrap();
        assert_eq!(
            hex::encode(out),
            "632c2812e46d4604102ba7618e9d6d7d2f8128f6266b4a03264d2a0460b7dcb3"
        );
    }

    #[test]
    fn zero_iterations_is_rejected() {
        assert!(matches!(
            Pbkdf2::<Sha512>::new(0),
            Err(Error::InvalidRounds { rounds: 0, .. })
        ));
    }

    #[test]
    fn generate_requires_initialize() {
        let mut kdf = Pbkdf2::<Sha512>::new(1).unwrap();
        let mut out = [0u8; 16];
        assert!(matches!(
            kdf.generate(&mut out),
            Err(Error::NotInitialized { .. })
        ));
    }

    #[test]
    fn nonce_extends_the_salt() {
        let mut plain = Pbkdf2::<Sha256>::new(10).unwrap();
        plain.initialize(b"saltnonce", b"password");
        let mut a = [0u8; 32];
        plain.generate(&mut a).unwrap();

        let mut nonced = Pbkdf2::<Sha256>::new(10).unwrap();
        nonced.initialize_with_nonce(b"salt", b"password", b"nonce");
        let mut b = [0u8; 32];
        nonced.generate(&mut b).unwrap();

        assert_eq!(a, b);
    }
}
