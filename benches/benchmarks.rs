use criterion::{criterion_group, criterion_main, Criterion, Throughput};

use rhx::rhx::{BLOCK16, BLOCK32};
use rhx::{BlockCipher, Cbc, Cfb, ChaCha, Digest, Direction, Keccak256, Rhx};

const MB: usize = 1024 * 1024;

fn block_benchmarks(c: &mut Criterion) {
    let mut blocks = c.benchmark_group("block");
    blocks.throughput(Throughput::Bytes(MB as u64));
    blocks.bench_with_input("rhx-16", &[0u8; MB], |b, data| {
        let mut cipher = Rhx::new(BLOCK16).unwrap();
        cipher.initialize(Direction::Encrypt, &[7u8; 32]).unwrap();
        let mut out = [0u8; BLOCK16];
        b.iter(|| {
            for block in data.chunks(BLOCK16) {
                cipher.encrypt_block(block, &mut out);
            }
        })
    });
    blocks.bench_with_input("rhx-32", &[0u8; MB], |b, data| {
        let mut cipher = Rhx::new(BLOCK32).unwrap();
        cipher.initialize(Direction::Encrypt, &[7u8; 32]).unwrap();
        let mut out = [0u8; BLOCK32];
        b.iter(|| {
            for block in data.chunks(BLOCK32) {
                cipher.encrypt_block(block, &mut out);
            }
        })
    });
    blocks.finish();
}

fn mode_benchmarks(c: &mut Criterion) {
    let mut modes = c.benchmark_group("mode");
    modes.throughput(Throughput::Bytes(MB as u64));

    let key = [7u8; 32];
    let iv = [8u8; 16];

    modes.bench_with_input("cfb-encrypt", &vec![0u8; MB], |b, data| {
        let mut cfb = Cfb::new(Rhx::new(BLOCK16).unwrap());
        cfb.initialize(Direction::Encrypt, &key, &iv).unwrap();
        let mut out = vec![0u8; MB];
        b.iter(|| cfb.transform(data, &mut out).unwrap())
    });
    modes.bench_with_input("cfb-decrypt-serial", &vec![0u8; MB], |b, data| {
        let mut cfb = Cfb::new(Rhx::new(BLOCK16).unwrap());
        cfb.initialize(Direction::Decrypt, &key, &iv).unwrap();
        cfb.parallel_profile_mut().set_max_degree(1).unwrap();
        let mut out = vec![0u8; MB];
        b.iter(|| cfb.transform(data, &mut out).unwrap())
    });
    modes.bench_with_input("cfb-decrypt-parallel", &vec![0u8; MB], |b, data| {
        let mut cfb = Cfb::new(Rhx::new(BLOCK16).unwrap());
        cfb.initialize(Direction::Decrypt, &key, &iv).unwrap();
        let mut out = vec![0u8; MB];
        b.iter(|| cfb.transform(data, &mut out).unwrap())
    });
    modes.bench_with_input("cbc-decrypt-parallel", &vec![0u8; MB], |b, data| {
        let mut cbc = Cbc::new(Rhx::new(BLOCK16).unwrap());
        cbc.initialize(Direction::Decrypt, &key, &iv).unwrap();
        let mut out = vec![0u8; MB];
        b.iter(|| cbc.transform(data, &mut out).unwrap())
    });
    modes.bench_with_input("chacha", &vec![0u8; MB], |b, data| {
        let mut cipher = ChaCha::new();
        cipher.initialize(&key, &[0u8; 8]).unwrap();
        let mut out = vec![0u8; MB];
        b.iter(|| cipher.transform(data, &mut out).unwrap())
    });
    modes.finish();
}

fn hash_benchmarks(c: &mut Criterion) {
    let mut hashing = c.benchmark_group("hash");
    hashing.throughput(Throughput::Bytes(MB as u64));
    hashing.bench_with_input("keccak256", &vec![0u8; MB], |b, data| {
        let mut out = [0u8; 32];
        b.iter(|| {
            let mut digest = Keccak256::new();
            digest.update(data);
            digest.finalize(&mut out).unwrap()
        })
    });
    hashing.bench_with_input("keccak256-tree-4", &vec![0u8; MB], |b, data| {
        let mut out = [0u8; 32];
        b.iter(|| {
            let mut digest = Keccak256::with_fan_out(4).unwrap();
            digest.update(data);
            digest.finalize(&mut out).unwrap()
        })
    });
    hashing.bench_with_input("keccak256-tree-8", &vec![0u8; MB], |b, data| {
        let mut out = [0u8; 32];
        b.iter(|| {
            let mut digest = Keccak256::with_fan_out(8).unwrap();
            digest.update(data);
            digest.finalize(&mut out).unwrap()
        })
    });
    hashing.bench_with_input("sha256", &vec![0u8; MB], |b, data| {
        b.iter(|| {
            let mut digest = sha2::Sha256::default();
            sha2::Digest::update(&mut digest, data);
            sha2::Digest::finalize(digest)
        })
    });
    hashing.finish();
}

criterion_group!(benches, block_benchmarks, mode_benchmarks, hash_benchmarks);
criterion_main!(benches);
