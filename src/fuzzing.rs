#![cfg(test)]

use proptest::collection::vec;
use proptest::prelude::*;

use crate::digest::{Sha256, Sha512};
use crate::rhx::{Rhx, BLOCK16, BLOCK32};
use crate::{
    BlockCipher, Cbc, Cfb, ChaCha, Digest, Direction, Hmac, Keccak256, ParallelProfile, Pbkdf2,
};

/// Key lengths legal for the SHA2-512 HKDF engine, standard and extended.
const KEY_SIZES: [usize; 6] = [16, 24, 32, 64, 192, 320];

fn arb_key() -> impl Strategy<Value = Vec<u8>> {
    (0usize..KEY_SIZES.len()).prop_flat_map(|i| vec(any::<u8>(), KEY_SIZES[i]))
}

fn arb_blocks(block_size: usize) -> impl Strategy<Value = Vec<u8>> {
    (1usize..=16).prop_flat_map(move |n| vec(any::<u8>(), n * block_size))
}

/// An input operation for the hash.
#[derive(Clone, Debug, PartialEq)]
enum HashOp {
    Update(Vec<u8>),
}

fn arb_hash_transcript() -> impl Strategy<Value = Vec<HashOp>> {
    vec(vec(any::<u8>(), 0..300).prop_map(HashOp::Update), 0..8)
}

fn pbkdf2_sha512_reference(password: &[u8], salt: &[u8], iterations: usize, out: &mut [u8]) {
    use hmac::Mac;
    type H = hmac::Hmac<sha2::Sha512>;

    for (index, chunk) in out.chunks_mut(64).enumerate() {
        let mut mac = <H as Mac>::new_from_slice(password).unwrap();
        mac.update(salt);
        mac.update(&((index + 1) as u32).to_be_bytes());
        let mut u = mac.finalize().into_bytes();

        let mut f = u.clone();
        for _ in 1..iterations {
            let mut mac = <H as Mac>::new_from_slice(password).unwrap();
            mac.update(&u);
            u = mac.finalize().into_bytes();
            for (acc, byte) in f.iter_mut().zip(&u) {
                *acc ^= byte;
            }
        }
        chunk.copy_from_slice(&f[..chunk.len()]);
    }
}

proptest! {
    #[test]
    fn rhx_decrypt_inverts_encrypt(
        key in arb_key(),
        plaintext in vec(any::<u8>(), 32),
        wide in any::<bool>(),
    ) {
        let block = if wide { BLOCK32 } else { BLOCK16 };
        let mut cipher = Rhx::new(block).unwrap();

        cipher.initialize(Direction::Encrypt, &key).unwrap();
        let mut ciphertext = vec![0u8; block];
        cipher.encrypt_block(&plaintext[..block], &mut ciphertext);

        cipher.initialize(Direction::Decrypt, &key).unwrap();
        let mut back = vec![0u8; block];
        cipher.decrypt_block(&ciphertext, &mut back);
        prop_assert_eq!(&back[..], &plaintext[..block]);
    }

    #[test]
    fn cfb_decrypt_inverts_encrypt(
        key in arb_key(),
        iv in vec(any::<u8>(), 16),
        plaintext in arb_blocks(16),
    ) {
        let mut cfb = Cfb::new(Rhx::new(BLOCK16).unwrap());
        cfb.initialize(Direction::Encrypt, &key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cfb.transform(&plaintext, &mut ciphertext).unwrap();

        cfb.initialize(Direction::Decrypt, &key, &iv).unwrap();
        let mut back = vec![0u8; plaintext.len()];
        cfb.transform(&ciphertext, &mut back).unwrap();
        prop_assert_eq!(back, plaintext);
    }

    #[test]
    fn cbc_decrypt_inverts_encrypt(
        key in arb_key(),
        iv in vec(any::<u8>(), 32),
        plaintext in arb_blocks(32),
    ) {
        let mut cbc = Cbc::new(Rhx::new(BLOCK32).unwrap());
        cbc.initialize(Direction::Encrypt, &key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cbc.transform(&plaintext, &mut ciphertext).unwrap();

        cbc.initialize(Direction::Decrypt, &key, &iv).unwrap();
        let mut back = vec![0u8; plaintext.len()];
        cbc.transform(&ciphertext, &mut back).unwrap();
        prop_assert_eq!(back, plaintext);
    }

    #[test]
    fn cfb_parallel_decrypt_is_byte_identical(
        key in vec(any::<u8>(), 32),
        iv in vec(any::<u8>(), 16),
        plaintext in arb_blocks(16),
    ) {
        if ParallelProfile::processor_count() < 2 {
            return Ok(());
        }

        let mut cfb = Cfb::new(Rhx::new(BLOCK16).unwrap());
        cfb.initialize(Direction::Encrypt, &key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cfb.transform(&plaintext, &mut ciphertext).unwrap();

        let mut serial = Cfb::new(Rhx::new(BLOCK16).unwrap());
        serial.initialize(Direction::Decrypt, &key, &iv).unwrap();
        serial.parallel_profile_mut().set_max_degree(1).unwrap();
        let mut serial_out = vec![0u8; plaintext.len()];
        serial.transform(&ciphertext, &mut serial_out).unwrap();

        let mut parallel = Cfb::new(Rhx::new(BLOCK16).unwrap());
        parallel.initialize(Direction::Decrypt, &key, &iv).unwrap();
        parallel.parallel_profile_mut().set_max_degree(2).unwrap();
        parallel.parallel_profile_mut().set_parallel_block_size(64);
        let mut parallel_out = vec![0u8; plaintext.len()];
        parallel.transform(&ciphertext, &mut parallel_out).unwrap();

        prop_assert_eq!(&serial_out, &parallel_out);
        prop_assert_eq!(parallel_out, plaintext);
    }

    #[test]
    fn cbc_parallel_decrypt_is_byte_identical(
        key in vec(any::<u8>(), 32),
        iv in vec(any::<u8>(), 16),
        plaintext in arb_blocks(16),
    ) {
        if ParallelProfile::processor_count() < 2 {
            return Ok(());
        }

        let mut cbc = Cbc::new(Rhx::new(BLOCK16).unwrap());
        cbc.initialize(Direction::Encrypt, &key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cbc.transform(&plaintext, &mut ciphertext).unwrap();

        let mut serial = Cbc::new(Rhx::new(BLOCK16).unwrap());
        serial.initialize(Direction::Decrypt, &key, &iv).unwrap();
        serial.parallel_profile_mut().set_max_degree(1).unwrap();
        let mut serial_out = vec![0u8; plaintext.len()];
        serial.transform(&ciphertext, &mut serial_out).unwrap();

        let mut parallel = Cbc::new(Rhx::new(BLOCK16).unwrap());
        parallel.initialize(Direction::Decrypt, &key, &iv).unwrap();
        parallel.parallel_profile_mut().set_max_degree(2).unwrap();
        parallel.parallel_profile_mut().set_parallel_block_size(64);
        let mut parallel_out = vec![0u8; plaintext.len()];
        parallel.transform(&ciphertext, &mut parallel_out).unwrap();

        prop_assert_eq!(&serial_out, &parallel_out);
        prop_assert_eq!(parallel_out, plaintext);
    }

    #[test]
    fn keccak_transcript_equals_one_shot(transcript in arb_hash_transcript()) {
        let mut streamed = Keccak256::new();
        let mut joined = Vec::new();
        for HashOp::Update(data) in &transcript {
            streamed.update(data);
            joined.extend_from_slice(data);
        }
        let mut a = [0u8; 32];
        streamed.finalize(&mut a).unwrap();

        let mut b = [0u8; 32];
        Keccak256::new().compute(&joined, &mut b).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn keccak_tree_transcript_equals_one_shot(
        transcript in arb_hash_transcript(),
        wide in any::<bool>(),
    ) {
        let degree = if wide { 4 } else { 2 };

        let mut streamed = Keccak256::with_fan_out(degree).unwrap();
        let mut joined = Vec::new();
        for HashOp::Update(data) in &transcript {
            streamed.update(data);
            joined.extend_from_slice(data);
        }
        let mut a = [0u8; 32];
        streamed.finalize(&mut a).unwrap();

        let mut b = [0u8; 32];
        Keccak256::with_fan_out(degree).unwrap().compute(&joined, &mut b).unwrap();
        prop_assert_eq!(a, b);
    }

    #[test]
    fn keccak_tree_is_domain_separated(data in vec(any::<u8>(), 0..500)) {
        let mut seq = [0u8; 32];
        Keccak256::new().compute(&data, &mut seq).unwrap();
        let mut tree = [0u8; 32];
        Keccak256::with_fan_out(2).unwrap().compute(&data, &mut tree).unwrap();
        prop_assert_ne!(seq, tree);
    }

    #[test]
    fn hmac_matches_the_reference_implementation(
        key in vec(any::<u8>(), 0..128),
        data in vec(any::<u8>(), 0..256),
    ) {
        use hmac::Mac;

        let mut ours = [0u8; 32];
        Hmac::<Sha256>::compute(&key, &data, &mut ours).unwrap();
        let mut mac = <hmac::Hmac<sha2::Sha256> as Mac>::new_from_slice(&key).unwrap();
        mac.update(&data);
        prop_assert_eq!(&ours[..], &mac.finalize().into_bytes()[..]);

        let mut ours = [0u8; 64];
        Hmac::<Sha512>::compute(&key, &data, &mut ours).unwrap();
        let mut mac = <hmac::Hmac<sha2::Sha512> as Mac>::new_from_slice(&key).unwrap();
        mac.update(&data);
        prop_assert_eq!(&ours[..], &mac.finalize().into_bytes()[..]);
    }

    #[test]
    fn pbkdf2_matches_the_reference_implementation(
        password in vec(any::<u8>(), 1..64),
        salt in vec(any::<u8>(), 0..64),
        iterations in 1usize..4,
        length in 1usize..150,
    ) {
        let mut kdf = Pbkdf2::<Sha512>::new(iterations).unwrap();
        kdf.initialize(&salt, &password);
        let mut ours = vec![0u8; length];
        kdf.generate(&mut ours).unwrap();

        let mut expected = vec![0u8; length];
        pbkdf2_sha512_reference(&password, &salt, iterations, &mut expected);
        prop_assert_eq!(ours, expected);
    }

    #[test]
    fn chacha_decrypt_inverts_encrypt(
        key in vec(any::<u8>(), 32),
        iv in vec(any::<u8>(), 8),
        plaintext in vec(any::<u8>(), 0..300),
    ) {
        let mut cipher = ChaCha::new();
        cipher.initialize(&key, &iv).unwrap();
        let mut ciphertext = vec![0u8; plaintext.len()];
        cipher.transform(&plaintext, &mut ciphertext).unwrap();

        cipher.initialize(&key, &iv).unwrap();
        let mut back = vec![0u8; plaintext.len()];
        cipher.transform(&ciphertext, &mut back).unwrap();
        prop_assert_eq!(back, plaintext);
    }
}
