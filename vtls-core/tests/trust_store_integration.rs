//! Trust Anchor Store Integration Tests
//!
//! Uses the DER fixtures in `tests/data/`:
//! - `ec_root.der` / `ec_root_other_key.der`: same CN, different P-256 keys
//! - `rsa_root.der` / `rsa_root_other_key.der`: same CN, different RSA keys
//! - `ec_under_rsa_name.der`: EC key under the RSA root's CN
//! - `ec384_root.der`: P-384 key, CN not present in the test anchors
//! - `ed25519_root.der`, `no_common_name.der`: not decodable as anchors
//! - `isrg_root_x1.der` / `isrg_root_x2.der`: real roots in the built-in bundle

use vtls_core::{
    trust_store::{decode_bundle, encode_bundle},
    Certificate, Config, Error, KeyType, NamedCurve, PublicKey, TrustAnchorSource,
    TrustAnchorStore,
};

const EC_ROOT: &[u8] = include_bytes!("data/ec_root.der");
const EC_ROOT_OTHER_KEY: &[u8] = include_bytes!("data/ec_root_other_key.der");
const EC384_ROOT: &[u8] = include_bytes!("data/ec384_root.der");
const RSA_ROOT: &[u8] = include_bytes!("data/rsa_root.der");
const RSA_ROOT_OTHER_KEY: &[u8] = include_bytes!("data/rsa_root_other_key.der");
const EC_UNDER_RSA_NAME: &[u8] = include_bytes!("data/ec_under_rsa_name.der");
const ED25519_ROOT: &[u8] = include_bytes!("data/ed25519_root.der");
const NO_COMMON_NAME: &[u8] = include_bytes!("data/no_common_name.der");
const ISRG_ROOT_X1: &[u8] = include_bytes!("data/isrg_root_x1.der");
const ISRG_ROOT_X2: &[u8] = include_bytes!("data/isrg_root_x2.der");
const TEST_BUNDLE: &[u8] = include_bytes!("data/test_bundle.deflate");
const SUPPLEMENTARY: &str = include_str!("data/supplementary.txt");

fn cert(der: &[u8]) -> Certificate {
    Certificate::from_der(der).unwrap()
}

fn test_store() -> TrustAnchorStore {
    let mut store = TrustAnchorStore::new();
    store.add_der(EC_ROOT).unwrap();
    store.add_der(RSA_ROOT).unwrap();
    store
}

#[test]
fn test_certificate_decoding() {
    let ec = cert(EC_ROOT);
    assert_eq!(ec.subject_cn(), "Vtls Test EC Root");
    match ec.public_key() {
        PublicKey::Ec { curve, x, y } => {
            assert_eq!(*curve, NamedCurve::P256);
            assert_eq!(x.len(), 32);
            assert_eq!(y.len(), 32);
        },
        other => panic!("unexpected key {:?}", other),
    }

    let p384 = cert(EC384_ROOT);
    assert_eq!(p384.subject_cn(), "Vtls Test P-384 Root");
    assert!(matches!(
        p384.public_key(),
        PublicKey::Ec { curve: NamedCurve::P384, .. }
    ));

    let rsa = cert(RSA_ROOT);
    assert_eq!(rsa.subject_cn(), "Vtls Test RSA Root");
    match rsa.public_key() {
        PublicKey::Rsa { modulus, exponent } => {
            assert_eq!(modulus.len(), 256);
            assert_eq!(exponent.as_slice(), &[0x01, 0x00, 0x01]);
        },
        other => panic!("unexpected key {:?}", other),
    }
    assert_eq!(rsa.der(), RSA_ROOT);
}

#[test]
fn test_undecodable_certificates() {
    assert!(matches!(
        Certificate::from_der(ED25519_ROOT),
        Err(Error::CertificateParse(_))
    ));
    assert!(matches!(
        Certificate::from_der(NO_COMMON_NAME),
        Err(Error::CertificateParse(_))
    ));
    assert!(Certificate::from_der(&EC_ROOT[..EC_ROOT.len() - 1]).is_err());
}

#[test]
fn test_contains_same_key() {
    let store = test_store();
    assert!(store.contains(&cert(EC_ROOT)));
    assert!(store.contains(&cert(RSA_ROOT)));
    assert!(store.contains_exact(&cert(EC_ROOT)));
    assert!(store.contains_exact(&cert(RSA_ROOT)));
}

#[test]
fn test_contains_unknown_name() {
    let store = test_store();
    assert!(!store.contains(&cert(EC384_ROOT)));
    assert!(!store.contains(&cert(ISRG_ROOT_X2)));
    assert!(!TrustAnchorStore::new().contains(&cert(EC_ROOT)));
}

#[test]
fn test_contains_key_mismatch() {
    let store = test_store();

    // Same name, different EC point
    assert!(!store.contains(&cert(EC_ROOT_OTHER_KEY)));
    // Same name, different key type
    assert!(!store.contains(&cert(EC_UNDER_RSA_NAME)));
    assert_eq!(cert(EC_UNDER_RSA_NAME).public_key().key_type(), KeyType::Ec);

    // RSA anchors match on key type alone; the exact check tells them apart
    assert!(store.contains(&cert(RSA_ROOT_OTHER_KEY)));
    assert!(!store.contains_exact(&cert(RSA_ROOT_OTHER_KEY)));
}

#[test]
fn test_last_write_wins() {
    let mut store = test_store();
    store.add_der(EC_ROOT_OTHER_KEY).unwrap();

    assert_eq!(store.len(), 2);
    assert!(store.contains(&cert(EC_ROOT_OTHER_KEY)));
    assert!(!store.contains(&cert(EC_ROOT)));
}

#[test]
fn test_from_bundle_skips_bad_entries() {
    let store = TrustAnchorStore::from_bundle(TEST_BUNDLE).unwrap();
    assert_eq!(store.len(), 2);
    assert!(store.get("Vtls Test EC Root").is_some());
    assert!(store.get("Vtls Test RSA Root").is_some());

    let entries = decode_bundle(TEST_BUNDLE).unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0], EC_ROOT);
    assert_eq!(entries[1], [0x30, 0x03, 0x02, 0x01, 0x00]);
}

#[test]
fn test_bundle_rebuild() {
    let ders = vec![EC384_ROOT.to_vec(), ED25519_ROOT.to_vec(), RSA_ROOT.to_vec()];
    let compressed = encode_bundle(&ders).unwrap();
    let store = TrustAnchorStore::from_bundle(&compressed).unwrap();

    let mut names: Vec<_> = store.common_names().collect();
    names.sort_unstable();
    assert_eq!(names, ["Vtls Test P-384 Root", "Vtls Test RSA Root"]);
}

#[test]
fn test_load_supplementary() {
    let mut store = TrustAnchorStore::new();
    assert_eq!(store.load_supplementary(SUPPLEMENTARY), 2);
    assert_eq!(store.len(), 2);
    assert!(store.contains(&cert(EC_ROOT)));
    assert!(store.contains_exact(&cert(RSA_ROOT)));
    assert!(store.get("Broken Entry").is_none());
    assert!(store.get("Garbage Der").is_none());
}

#[test]
fn test_default_store() {
    let store = TrustAnchorStore::default_store();
    assert_eq!(store.len(), 132);
    assert!(store.contains(&cert(ISRG_ROOT_X1)));
    assert!(store.contains(&cert(ISRG_ROOT_X2)));
    assert!(store.contains_exact(&cert(ISRG_ROOT_X2)));
    assert!(!store.contains(&cert(EC_ROOT)));

    let anchor = store.get("ISRG Root X1").unwrap();
    assert_eq!(anchor.public_key().key_type(), KeyType::Rsa);
    assert_eq!(anchor.der(), ISRG_ROOT_X1);
}

#[test]
fn test_default_store_is_not_mutated_by_extensions() {
    let mut extended = TrustAnchorStore::build_default().unwrap();
    assert_eq!(extended.load_supplementary(SUPPLEMENTARY), 2);
    assert_eq!(extended.len(), 134);
    assert!(extended.contains(&cert(RSA_ROOT)));

    assert!(!TrustAnchorStore::default_store().contains(&cert(RSA_ROOT)));
}

#[test]
fn test_config_trust_sources() {
    let config = Config::builder()
        .with_trust_anchors(TrustAnchorSource::DefaultWithSupplementary(
            SUPPLEMENTARY.to_string(),
        ))
        .build()
        .unwrap();
    let store = config.build_trust_store().unwrap();
    assert_eq!(store.len(), 134);

    let config = Config::builder()
        .with_trust_anchors(TrustAnchorSource::Supplementary(SUPPLEMENTARY.to_string()))
        .build()
        .unwrap();
    assert_eq!(config.build_trust_store().unwrap().len(), 2);

    assert_eq!(Config::default().build_trust_store().unwrap().len(), 132);
}
