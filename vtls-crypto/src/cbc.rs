//! AES-CBC block cipher interface for the TLS 1.2 MAC-then-encrypt suites.
//!
//! The TLS record layer applies its own padding (RFC 5246 Section 6.2.3.2),
//! so implementations operate on block-aligned buffers in place and never
//! add or strip padding themselves.

use crate::Result;

/// AES block size in bytes.
pub const AES_BLOCK_SIZE: usize = 16;

/// CBC cipher algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CbcAlgorithm {
    /// AES-128 in CBC mode
    Aes128Cbc,
    /// AES-256 in CBC mode
    Aes256Cbc,
}

impl CbcAlgorithm {
    /// Get the key size in bytes for this algorithm.
    pub const fn key_size(self) -> usize {
        match self {
            CbcAlgorithm::Aes128Cbc => 16,
            CbcAlgorithm::Aes256Cbc => 32,
        }
    }

    /// Get the block (and IV) size in bytes.
    pub const fn block_size(self) -> usize {
        AES_BLOCK_SIZE
    }

    /// Get the name of this algorithm as used in TLS.
    pub const fn name(self) -> &'static str {
        match self {
            CbcAlgorithm::Aes128Cbc => "AES_128_CBC",
            CbcAlgorithm::Aes256Cbc => "AES_256_CBC",
        }
    }
}

/// CBC cipher trait.
///
/// Both directions transform `data` in place. `data.len()` must be a
/// multiple of [`AES_BLOCK_SIZE`], otherwise `Error::InvalidLength` is returned.
pub trait CbcCipher: Send + Sync {
    /// Encrypt block-aligned data in place.
    ///
    /// # Arguments
    ///
    /// * `key` - Cipher key (size must match algorithm)
    /// * `iv` - Initialization vector (one block)
    /// * `data` - Plaintext, replaced by ciphertext
    fn encrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>;

    /// Decrypt block-aligned data in place.
    ///
    /// # Arguments
    ///
    /// * `key` - Cipher key (size must match algorithm)
    /// * `iv` - Initialization vector (one block)
    /// * `data` - Ciphertext, replaced by plaintext
    fn decrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>;

    /// Get the algorithm this cipher implements.
    fn algorithm(&self) -> CbcAlgorithm;
}
