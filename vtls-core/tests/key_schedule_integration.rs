//! TLS 1.2 Key Schedule Integration Tests
//!
//! Drives two key schedules (client and server view) through the same
//! handshake and checks they agree, plus fixed known answers for the key
//! block and sampled avalanche behaviour of the PRF.

use rand::{Rng, RngCore};
use vtls_core::{
    tls12::{prf, KeyBlock},
    CipherSuite, Config, ContentType, Error, KeySchedule, Side,
};
use vtls_crypto::{CryptoProvider, HashAlgorithm};
use vtls_crypto_rustcrypto::RustCryptoProvider;

const CLIENT_HELLO: &[u8] = b"\x01\x00\x00\x04abcd";
const SERVER_HELLO: &[u8] = b"\x02\x00\x00\x02xy";
const CLIENT_KEY_EXCHANGE: &[u8] = b"\x10\x00\x00\x03pms";

fn client_random() -> [u8; 32] {
    core::array::from_fn(|i| i as u8)
}

fn server_random() -> [u8; 32] {
    core::array::from_fn(|i| 32 + i as u8)
}

fn pre_master_secret() -> Vec<u8> {
    let mut pms = vec![0x11u8; 48];
    pms[..2].copy_from_slice(&[0x03, 0x03]);
    pms
}

fn schedule_for(suite: CipherSuite, extended: bool) -> KeySchedule {
    let mut schedule = KeySchedule::new();
    schedule.set_cipher_suite(suite).unwrap();
    schedule.set_client_random(client_random()).unwrap();
    schedule.set_server_random(server_random()).unwrap();
    schedule.set_pre_master_secret(pre_master_secret()).unwrap();
    schedule.set_extended_master_secret(extended).unwrap();
    schedule
}

fn concat(key_block: &KeyBlock) -> Vec<u8> {
    [
        key_block.client.mac_key(),
        key_block.server.mac_key(),
        key_block.client.cipher_key(),
        key_block.server.cipher_key(),
        key_block.client.implicit_iv(),
        key_block.server.implicit_iv(),
    ]
    .concat()
}

#[test]
fn test_key_block_aes128_gcm_is_40_bytes() {
    let provider = RustCryptoProvider::new();
    let mut schedule = schedule_for(CipherSuite::EcdheRsaWithAes128GcmSha256, false);
    let key_block = schedule.derive_key_block(&provider).unwrap();

    let bytes = concat(&key_block);
    assert_eq!(bytes.len(), 40);
    assert_eq!(
        hex::encode(bytes),
        "f7d251aceaa37e0aaae756905c3cdd1260ab104844509d6474a07c4ba2b053cb\
         045ad8c8fbf94473"
    );
}

#[test]
fn test_key_block_aes256_cbc_sha256_is_128_bytes() {
    let provider = RustCryptoProvider::new();
    let mut schedule = schedule_for(CipherSuite::RsaWithAes256CbcSha256, false);
    let key_block = schedule.derive_key_block(&provider).unwrap();

    assert_eq!(key_block.client.mac_key().len(), 32);
    assert_eq!(key_block.server.cipher_key().len(), 32);
    let bytes = concat(&key_block);
    assert_eq!(bytes.len(), 128);
    assert_eq!(
        hex::encode(bytes),
        "f7d251aceaa37e0aaae756905c3cdd1260ab104844509d6474a07c4ba2b053cb\
         045ad8c8fbf9447304b9fd58365bbebbb3044a4b1e1487a553b6cd1e2610b2d3\
         0e8d81793921b3f6870b5eed6a0a94ef8b5f5fd2a132a5e6dee0ffe664c74914\
         7ff5d276c640869a45b46daed4564da2764fe013cd659e0c2849ef7c20af0679"
    );
}

#[test]
fn test_client_and_server_views_agree() {
    let provider = RustCryptoProvider::new();

    for suite in CipherSuite::ALL {
        for extended in [false, true] {
            let mut client = schedule_for(suite, extended);
            let mut server = schedule_for(suite, extended);
            for message in [CLIENT_HELLO, SERVER_HELLO, CLIENT_KEY_EXCHANGE] {
                client.add_handshake_message(message);
                server.add_handshake_message(message);
            }

            assert_eq!(
                client.derive_master_secret(&provider).unwrap(),
                server.derive_master_secret(&provider).unwrap()
            );

            // Client Finished
            let verify_data = client.finished_verify_data(&provider, Side::Client).unwrap();
            server
                .verify_finished(&provider, Side::Client, &verify_data)
                .unwrap();
            let finished = [&[0x14u8, 0x00, 0x00, 0x0C][..], &verify_data[..]].concat();
            client.add_handshake_message(&finished);
            server.add_handshake_message(&finished);

            // Server Finished covers the client's Finished
            let verify_data = server.finished_verify_data(&provider, Side::Server).unwrap();
            client
                .verify_finished(&provider, Side::Server, &verify_data)
                .unwrap();

            // Application data flows both ways
            let (mut client_write, mut client_read) =
                client.derive_key_block(&provider).unwrap().into_protectors().unwrap();
            let (mut server_read, mut server_write) =
                server.derive_key_block(&provider).unwrap().into_protectors().unwrap();

            let fragment = client_write
                .encrypt(&provider, ContentType::ApplicationData, b"GET / HTTP/1.1")
                .unwrap();
            assert_eq!(
                server_read
                    .decrypt(&provider, ContentType::ApplicationData, &fragment)
                    .unwrap(),
                b"GET / HTTP/1.1"
            );
            let fragment = server_write
                .encrypt(&provider, ContentType::ApplicationData, b"HTTP/1.1 200 OK")
                .unwrap();
            assert_eq!(
                client_read
                    .decrypt(&provider, ContentType::ApplicationData, &fragment)
                    .unwrap(),
                b"HTTP/1.1 200 OK"
            );
        }
    }
}

#[test]
fn test_extended_master_secret_binds_transcript() {
    let provider = RustCryptoProvider::new();
    let suite = CipherSuite::EcdheEcdsaWithAes128GcmSha256;

    let mut classic = schedule_for(suite, false);
    let mut extended = schedule_for(suite, true);
    let mut other_transcript = schedule_for(suite, true);
    for message in [CLIENT_HELLO, SERVER_HELLO] {
        classic.add_handshake_message(message);
        extended.add_handshake_message(message);
    }
    other_transcript.add_handshake_message(CLIENT_HELLO);

    let classic = *classic.derive_master_secret(&provider).unwrap();
    let extended_ms = *extended.derive_master_secret(&provider).unwrap();
    let other = *other_transcript.derive_master_secret(&provider).unwrap();
    assert_ne!(classic, extended_ms);
    assert_ne!(extended_ms, other);

    // Later transcript updates do not change the cached value
    extended.add_handshake_message(CLIENT_KEY_EXCHANGE);
    assert_eq!(*extended.derive_master_secret(&provider).unwrap(), extended_ms);
}

#[test]
fn test_pre_master_secret_not_retained() {
    let provider = RustCryptoProvider::new();
    let mut schedule = schedule_for(CipherSuite::RsaWithAes128CbcSha, false);
    schedule.derive_key_block(&provider).unwrap();

    assert!(!schedule.has_pre_master_secret());
    let debug = format!("{:?}", schedule);
    assert!(debug.contains("has_pre_master_secret: false"));
    assert!(!debug.contains("17, 17"));
}

#[test]
fn test_tampered_finished_rejected() {
    let provider = RustCryptoProvider::new();
    let mut schedule = schedule_for(CipherSuite::EcdheRsaWithAes256GcmSha384, false);
    schedule.add_handshake_message(CLIENT_HELLO);

    let mut verify_data = schedule.finished_verify_data(&provider, Side::Server).unwrap();
    verify_data[11] ^= 0x01;
    let err = schedule
        .verify_finished(&provider, Side::Server, &verify_data)
        .unwrap_err();
    assert!(matches!(err, Error::HandshakeFailure(_)));
    assert_eq!(err.alert().to_u8(), 51);
}

#[test]
fn test_config_restricts_suites() {
    let config = Config::builder()
        .with_cipher_suites(&[CipherSuite::EcdheEcdsaWithAes256GcmSha384])
        .with_max_fragment_length(2048)
        .build()
        .unwrap();
    let provider = RustCryptoProvider::new();

    let mut schedule = KeySchedule::with_config(&config);
    assert!(schedule.set_cipher_suite(CipherSuite::RsaWithAes128CbcSha).is_err());
    schedule
        .set_cipher_suite(CipherSuite::EcdheEcdsaWithAes256GcmSha384)
        .unwrap();
    schedule.set_client_random(client_random()).unwrap();
    schedule.set_server_random(server_random()).unwrap();
    schedule.set_pre_master_secret(pre_master_secret()).unwrap();

    let (mut client_write, _) = schedule
        .derive_key_block(&provider)
        .unwrap()
        .into_protectors()
        .unwrap();
    assert_eq!(client_write.max_fragment_length(), 2048);
    assert_eq!(
        client_write.encrypt(&provider, ContentType::ApplicationData, &[0u8; 2049]),
        Err(Error::RecordOverflow)
    );
}

fn bit_difference(a: &[u8], b: &[u8]) -> u32 {
    a.iter().zip(b).map(|(x, y)| (x ^ y).count_ones()).sum()
}

#[test]
fn test_prf_avalanche_sampled() {
    let provider = RustCryptoProvider::new();
    let mut rng = rand::thread_rng();

    for hash in [HashAlgorithm::Sha256, HashAlgorithm::Sha384] {
        for _ in 0..32 {
            let mut secret = vec![0u8; 48];
            rng.fill_bytes(&mut secret);
            let mut seed = vec![0u8; 64];
            rng.fill_bytes(&mut seed);

            let base = prf(&provider, hash, &secret, b"key expansion", &seed, 64).unwrap();

            let mut flipped_secret = secret.clone();
            let bit = rng.gen_range(0..flipped_secret.len() * 8);
            flipped_secret[bit / 8] ^= 1 << (bit % 8);
            let changed = prf(&provider, hash, &flipped_secret, b"key expansion", &seed, 64).unwrap();

            // 512 output bits; a single-bit change should flip about half
            let diff = bit_difference(&base, &changed);
            assert!((160..=352).contains(&diff), "{:?}: {} bits", hash, diff);

            let mut flipped_seed = seed.clone();
            let bit = rng.gen_range(0..flipped_seed.len() * 8);
            flipped_seed[bit / 8] ^= 1 << (bit % 8);
            let changed = prf(&provider, hash, &secret, b"key expansion", &flipped_seed, 64).unwrap();
            let diff = bit_difference(&base, &changed);
            assert!((160..=352).contains(&diff), "{:?}: {} bits", hash, diff);
        }
    }
}

#[test]
fn test_transcript_hash_matches_digest() {
    let provider = RustCryptoProvider::new();
    let mut schedule = KeySchedule::new();
    schedule.add_handshake_message(CLIENT_HELLO);
    schedule.add_handshake_message(SERVER_HELLO);

    let expected = provider
        .digest(HashAlgorithm::Sha256, &[CLIENT_HELLO, SERVER_HELLO].concat())
        .unwrap();
    assert_eq!(
        schedule
            .transcript()
            .hash(&provider, HashAlgorithm::Sha256)
            .unwrap(),
        expected
    );
    assert_eq!(schedule.transcript().message_count(), 2);
}
