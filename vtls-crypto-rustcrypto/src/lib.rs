//! # RustCrypto-based Cryptography Provider for VTLS
//!
//! This crate provides the default [`CryptoProvider`] for VTLS, built on the
//! RustCrypto project's pure-Rust implementations.
//!
//! ## Supported Algorithms
//!
//! - **AEAD**: AES-128-GCM, AES-256-GCM (`aes-gcm`)
//! - **CBC**: AES-128-CBC, AES-256-CBC without padding (`cbc`, `aes`)
//! - **Hash**: SHA-1, SHA-256, SHA-384 (`sha1`, `sha2`)
//! - **HMAC**: with the hashes above (`hmac`)
//! - **RNG**: operating system entropy (`rand::rngs::OsRng`)
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use vtls_crypto::CryptoProvider;
//! use vtls_crypto_rustcrypto::RustCryptoProvider;
//!
//! let provider = RustCryptoProvider::new();
//! let digest = provider.digest(vtls_crypto::HashAlgorithm::Sha256, b"abc").unwrap();
//! assert_eq!(digest.len(), 32);
//! ```

#![deny(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

use vtls_crypto::{
    Aead, AeadAlgorithm, CbcAlgorithm, CbcCipher, CryptoProvider, Hash, HashAlgorithm, Hmac,
    Random, Result,
};

pub mod aead;
pub mod cbc;
pub mod hash;
pub mod hmac;
pub mod random;

use random::OsRandom;

/// Cryptography provider using RustCrypto implementations.
///
/// # Thread Safety
///
/// This provider is `Send + Sync` and can be safely shared across threads.
///
/// # Example
///
/// ```rust,no_run
/// use vtls_crypto::CryptoProvider;
/// use vtls_crypto_rustcrypto::RustCryptoProvider;
///
/// let provider = RustCryptoProvider::new();
/// ```
#[derive(Debug)]
pub struct RustCryptoProvider {
    random: OsRandom,
}

impl Default for RustCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl CryptoProvider for RustCryptoProvider {
    fn new() -> Self {
        Self { random: OsRandom }
    }

    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
        aead::create_aead(algorithm)
    }

    fn cbc(&self, algorithm: CbcAlgorithm) -> Result<Box<dyn CbcCipher>> {
        cbc::create_cbc(algorithm)
    }

    fn hash(&self, algorithm: HashAlgorithm) -> Result<Box<dyn Hash>> {
        hash::create_hash(algorithm)
    }

    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8]) -> Result<Box<dyn Hmac>> {
        hmac::create_hmac(algorithm, key)
    }

    fn random(&self) -> &dyn Random {
        &self.random
    }
}
