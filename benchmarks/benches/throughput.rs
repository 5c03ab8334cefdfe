//! Record Protection Throughput Benchmarks
//!
//! This benchmark suite measures:
//! - Record encryption throughput per bulk cipher
//! - Record decryption throughput per bulk cipher
//! - Small-record overhead (CBC padding, GCM nonce)

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use vtls_benchmarks::protector_pair;
use vtls_core::{CipherSuite, ContentType};
use vtls_crypto::CryptoProvider;
use vtls_crypto_rustcrypto::RustCryptoProvider;

const SUITES: [CipherSuite; 4] = [
    CipherSuite::EcdheRsaWithAes128GcmSha256,
    CipherSuite::EcdheRsaWithAes256GcmSha384,
    CipherSuite::EcdheRsaWithAes128CbcSha,
    CipherSuite::EcdheRsaWithAes128CbcSha256,
];

const SIZES: [usize; 3] = [64, 1024, 16384];

/// Benchmark encrypting one record
fn benchmark_encrypt(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let mut group = c.benchmark_group("record_encrypt");

    for suite in SUITES {
        for size in SIZES {
            let plaintext = vec![0xA5u8; size];
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(suite.name(), size), &plaintext, |b, data| {
                let (mut writer, _) = protector_pair(&provider, suite).unwrap();
                b.iter(|| {
                    writer
                        .encrypt(&provider, ContentType::ApplicationData, black_box(data))
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

/// Benchmark encrypting and decrypting one record
fn benchmark_round_trip(c: &mut Criterion) {
    let provider = RustCryptoProvider::new();
    let mut group = c.benchmark_group("record_round_trip");

    for suite in SUITES {
        for size in SIZES {
            let plaintext = vec![0x5Au8; size];
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(suite.name(), size), &plaintext, |b, data| {
                let (mut writer, mut reader) = protector_pair(&provider, suite).unwrap();
                b.iter(|| {
                    let fragment = writer
                        .encrypt(&provider, ContentType::ApplicationData, black_box(data))
                        .unwrap();
                    reader
                        .decrypt(&provider, ContentType::ApplicationData, &fragment)
                        .unwrap()
                });
            });
        }
    }

    group.finish();
}

criterion_group!(benches, benchmark_encrypt, benchmark_round_trip);
criterion_main!(benches);
