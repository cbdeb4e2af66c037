//! Cipher Feedback mode (SP800-38A), full-block variant.
//!
//! Encryption is strictly serial: each ciphertext block feeds the register
//! that produces the next keystream block. Decryption has no such chain --
//! the register needed for block `j` is just ciphertext block `j - 1` -- so
//! large inputs are split into contiguous segments seeded directly from the
//! ciphertext and decrypted on the rayon pool. Parallel output is
//! byte-identical to the serial path.
//!
//! Both directions drive the block cipher's *encrypt* permutation, so the
//! underlying cipher is always keyed for encryption.

use rayon::prelude::*;
use zeroize::Zeroize;

use crate::error::{Error, Result};
use crate::parallel::ParallelProfile;
use crate::rhx::Rhx;
use crate::{BlockCipher, BlockCiphers, Direction};

const ORIGIN: &str = "CFB";

/// The CFB cipher mode over a block cipher `C`.
pub struct Cfb<C: BlockCipher> {
    cipher: C,
    register: Vec<u8>,
    encryption: bool,
    initialized: bool,
    profile: ParallelProfile,
}

impl<C: BlockCipher> Drop for Cfb<C> {
    fn drop(&mut self) {
        self.register.zeroize();
    }
}

impl Cfb<Rhx> {
    /// Construct the mode from a cipher-type name, owning the cipher it
    /// builds. Fails with [`Error::UnknownCipher`] for the `None` sentinel.
    pub fn from_kind(kind: BlockCiphers) -> Result<Self> {
        match kind {
            BlockCiphers::Rhx => Ok(Cfb::new(Rhx::new(crate::rhx::BLOCK16)?)),
            BlockCiphers::None => Err(Error::UnknownCipher { origin: ORIGIN }),
        }
    }
}

impl<C: BlockCipher> Cfb<C> {
    /// Wrap a caller-built cipher instance. The cipher must not be
    /// initialized; the mode keys it during [`Cfb::initialize`].
    pub fn new(cipher: C) -> Self {
        let block_size = cipher.block_size();
        Cfb {
            cipher,
            register: vec![0u8; block_size],
            encryption: false,
            initialized: false,
            profile: ParallelProfile::new(ORIGIN, block_size),
        }
    }

    /// The underlying cipher block size in bytes.
    pub fn block_size(&self) -> usize {
        self.cipher.block_size()
    }

    /// The legal key lengths of the underlying cipher.
    pub fn legal_key_sizes(&self) -> &[usize] {
        self.cipher.legal_key_sizes()
    }

    /// True once `initialize` has succeeded.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// True if initialized for encryption.
    pub fn is_encryption(&self) -> bool {
        self.encryption
    }

    /// The parallel configuration for this instance.
    pub fn parallel_profile(&self) -> &ParallelProfile {
        &self.profile
    }

    /// Mutable access to the parallel configuration.
    pub fn parallel_profile_mut(&mut self) -> &mut ParallelProfile {
        &mut self.profile
    }

    /// Key the mode for the given direction and reset the register to `iv`.
    /// Re-initialization is permitted at any point.
    pub fn initialize(&mut self, direction: Direction, key: &[u8], iv: &[u8]) -> Result<()> {
        if iv.len() != self.block_size() {
            return Err(Error::InvalidIv {
                origin: ORIGIN,
                length: iv.len(),
            });
        }

        // CFB applies E_K on both paths.
        self.cipher.initialize(Direction::Encrypt, key)?;
        self.register.copy_from_slice(iv);
        self.encryption = direction.is_encrypt();
        self.initialized = true;
        Ok(())
    }

    /// Transform `input` into `output`. The length must be a multiple of the
    /// block size; a zero-length input is a no-op and does not advance the
    /// register.
    pub fn transform(&mut self, input: &[u8], output: &mut [u8]) -> Result<()> {
        if !self.initialized {
            return Err(Error::NotInitialized { origin: ORIGIN });
        }
        if input.is_empty() {
            return Ok(());
        }
        if input.len() % self.block_size() != 0 {
            return Err(Error::BufferTooShort {
                origin: ORIGIN,
                detail: "the input length is not a multiple of the block size",
            });
        }
        if output.len() < input.len() {
            return Err(Error::BufferTooShort {
                origin: ORIGIN,
                detail: "the output buffer is shorter than the input",
            });
        }
        let output = &mut output[..input.len()];

        if self.encryption {
            self.encrypt_serial(input, output);
        } else if self.profile.is_parallel() && input.len() >= self.profile.parallel_block_size() {
            self.decrypt_parallel(input, output);
        } else {
            self.decrypt_serial(input, output);
        }
        Ok(())
    }

    fn encrypt_serial(&mut self, input: &[u8], output: &mut [u8]) {
        let bs = self.block_size();
        for (in_block, out_block) in input.chunks(bs).zip(output.chunks_mut(bs)) {
            self.cipher.encrypt_block(&self.register, out_block);
            for (o, i) in out_block.iter_mut().zip(in_block) {
                *o ^= i;
            }
            self.register.copy_from_slice(out_block);
        }
    }

    fn decrypt_serial(&mut self, input: &[u8], output: &mut [u8]) {
        let bs = self.block_size();
        for (in_block, out_block) in input.chunks(bs).zip(output.chunks_mut(bs)) {
            self.cipher.encrypt_block(&self.register, out_block);
            for (o, i) in out_block.iter_mut().zip(in_block) {
                *o ^= i;
            }
            self.register.copy_from_slice(in_block);
        }
    }

    fn decrypt_parallel(&mut self, input: &[u8], output: &mut [u8]) {
        let bs = self.block_size();
        let chunk = self.profile.parallel_block_size();
        let degree = self.profile.degree();
        let segment = chunk / degree;
        let mut offset = 0;

        while input.len() - offset >= chunk {
            let chunk_in = &input[offset..offset + chunk];
            let chunk_out = &mut output[offset..offset + chunk];

            // Each segment's register seed is the ciphertext block preceding
            // it, read straight from the input; segment 0 continues from the
            // current register.
            let seeds: Vec<Vec<u8>> = (0..degree)
                .map(|t| {
                    if t == 0 {
                        self.register.clone()
                    } else {
                        chunk_in[t * segment - bs..t * segment].to_vec()
                    }
                })
                .collect();

            let cipher = &self.cipher;
            chunk_out
                .par_chunks_mut(segment)
                .zip(chunk_in.par_chunks(segment))
                .zip(seeds.into_par_iter())
                .for_each(|((out_seg, in_seg), mut register)| {
                    for (in_block, out_block) in in_seg.chunks(bs).zip(out_seg.chunks_mut(bs)) {
                        cipher.encrypt_block(&register, out_block);
                        for (o, i) in out_block.iter_mut().zip(in_block) {
                            *o ^= i;
                        }
                        register.copy_from_slice(in_block);
                    }
                    register.zeroize();
                });

            self.register.copy_from_slice(&chunk_in[chunk - bs..]);
            offset += chunk;
        }

        if offset < input.len() {
            self.decrypt_serial(&input[offset..], &mut output[offset..]);
        }
    }
}
