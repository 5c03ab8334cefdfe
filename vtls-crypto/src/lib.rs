//! # VTLS Cryptographic Provider Interface
//!
//! This crate defines the cryptographic abstraction layer used by the VTLS
//! TLS 1.2 record layer and key schedule. It provides trait-based interfaces
//! that allow pluggable cryptographic backends.
//!
//! ## Architecture
//!
//! ```text
//! CryptoProvider (main trait)
//! ├── Aead      (AES-GCM)
//! ├── CbcCipher (AES-CBC, no padding)
//! ├── Hash      (SHA-1, SHA-256, SHA-384)
//! ├── Hmac      (HMAC with the hashes above)
//! └── Random    (CSPRNG)
//! ```
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use vtls_crypto::{CryptoProvider, AeadAlgorithm, Error};
//!
//! fn example(provider: &dyn CryptoProvider) -> Result<(), Error> {
//!     let aead = provider.aead(AeadAlgorithm::Aes128Gcm)?;
//!     let ciphertext = aead.seal(key, nonce, aad, plaintext)?;
//!     let plaintext = aead.open(key, nonce, aad, &ciphertext)?;
//!     Ok(())
//! }
//! ```

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    unused_qualifications,
    missing_debug_implementations
)]

pub mod aead;
pub mod cbc;
pub mod error;
pub mod hash;
pub mod hmac;
pub mod random;

pub use aead::{Aead, AeadAlgorithm};
pub use cbc::{CbcAlgorithm, CbcCipher, AES_BLOCK_SIZE};
pub use error::{Error, Result};
pub use hash::{Hash, HashAlgorithm};
pub use hmac::Hmac;
pub use random::Random;

/// The main cryptographic provider trait.
///
/// Implementations of this trait provide all cryptographic operations
/// needed by the TLS 1.2 record layer and key schedule. The trait is
/// object-safe, so core code takes `&dyn CryptoProvider`.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use in multi-threaded
/// environments.
pub trait CryptoProvider: Send + Sync + 'static {
    /// Create a new instance of the crypto provider.
    fn new() -> Self
    where
        Self: Sized;

    /// Get an AEAD cipher instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The AEAD algorithm to use
    ///
    /// # Returns
    ///
    /// An AEAD cipher instance, or an error if the algorithm is not supported.
    fn aead(&self, algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>>;

    /// Get a CBC cipher instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The CBC algorithm to use
    ///
    /// # Returns
    ///
    /// A CBC cipher instance, or an error if the algorithm is not supported.
    fn cbc(&self, algorithm: CbcAlgorithm) -> Result<Box<dyn CbcCipher>>;

    /// Get a hash function instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The hash algorithm to use
    ///
    /// # Returns
    ///
    /// A hash function instance, or an error if the algorithm is not supported.
    fn hash(&self, algorithm: HashAlgorithm) -> Result<Box<dyn Hash>>;

    /// Get an HMAC instance.
    ///
    /// # Arguments
    ///
    /// * `algorithm` - The hash algorithm to use for HMAC
    /// * `key` - The HMAC key
    ///
    /// # Returns
    ///
    /// An HMAC instance, or an error if the algorithm is not supported.
    fn hmac(&self, algorithm: HashAlgorithm, key: &[u8]) -> Result<Box<dyn Hmac>>;

    /// Get the random number generator.
    fn random(&self) -> &dyn Random;

    /// Check if the provider supports a specific AEAD algorithm.
    fn supports_aead(&self, algorithm: AeadAlgorithm) -> bool {
        self.aead(algorithm).is_ok()
    }

    /// Check if the provider supports a specific CBC algorithm.
    fn supports_cbc(&self, algorithm: CbcAlgorithm) -> bool {
        self.cbc(algorithm).is_ok()
    }

    /// Compute a digest in one call.
    fn digest(&self, algorithm: HashAlgorithm, data: &[u8]) -> Result<Vec<u8>> {
        let mut hash = self.hash(algorithm)?;
        hash.update(data);
        Ok(hash.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_sizes() {
        assert_eq!(AeadAlgorithm::Aes128Gcm.key_size(), 16);
        assert_eq!(AeadAlgorithm::Aes256Gcm.key_size(), 32);
        assert_eq!(AeadAlgorithm::Aes256Gcm.nonce_size(), 12);
        assert_eq!(AeadAlgorithm::Aes128Gcm.tag_size(), 16);

        assert_eq!(CbcAlgorithm::Aes128Cbc.key_size(), 16);
        assert_eq!(CbcAlgorithm::Aes256Cbc.key_size(), 32);
        assert_eq!(CbcAlgorithm::Aes256Cbc.block_size(), AES_BLOCK_SIZE);

        assert_eq!(HashAlgorithm::Sha1.output_size(), 20);
        assert_eq!(HashAlgorithm::Sha256.output_size(), 32);
        assert_eq!(HashAlgorithm::Sha384.output_size(), 48);
    }

    #[test]
    fn test_error_display() {
        let err = Error::InvalidKeySize {
            expected: 16,
            actual: 15,
        };
        assert_eq!(err.to_string(), "Invalid key size: expected 16 bytes, got 15");
        assert!(Error::AuthenticationFailed.to_string().contains("verification failed"));
    }
}
