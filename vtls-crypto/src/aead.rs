//! AEAD (Authenticated Encryption with Associated Data) cipher interface.

use crate::Result;

/// AEAD cipher algorithms used by the TLS 1.2 GCM cipher suites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AeadAlgorithm {
    /// AES-128-GCM (RFC 5288)
    Aes128Gcm,
    /// AES-256-GCM (RFC 5288)
    Aes256Gcm,
}

impl AeadAlgorithm {
    /// Get the key size in bytes for this algorithm.
    pub const fn key_size(self) -> usize {
        match self {
            AeadAlgorithm::Aes128Gcm => 16,
            AeadAlgorithm::Aes256Gcm => 32,
        }
    }

    /// Get the nonce size in bytes for this algorithm.
    pub const fn nonce_size(self) -> usize {
        12
    }

    /// Get the authentication tag size in bytes for this algorithm.
    pub const fn tag_size(self) -> usize {
        16
    }

    /// Get the name of this algorithm as used in TLS.
    pub const fn name(self) -> &'static str {
        match self {
            AeadAlgorithm::Aes128Gcm => "AES_128_GCM",
            AeadAlgorithm::Aes256Gcm => "AES_256_GCM",
        }
    }
}

/// AEAD cipher trait.
///
/// # Security Requirements
///
/// - Tag verification MUST be constant-time
/// - Nonces MUST NOT be reused with the same key
///
/// # Example
///
/// ```rust,no_run
/// use vtls_crypto::Aead;
///
/// fn encrypt_example(aead: &dyn Aead) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
///     let key = &[0u8; 16];
///     let nonce = &[0u8; 12];
///     let ciphertext = aead.seal(key, nonce, b"additional data", b"secret message")?;
///     Ok(ciphertext)
/// }
/// ```
pub trait Aead: Send + Sync {
    /// Encrypt and authenticate plaintext.
    ///
    /// # Arguments
    ///
    /// * `key` - Encryption key (size must match algorithm)
    /// * `nonce` - Nonce (size must match algorithm, MUST be unique per encryption)
    /// * `aad` - Additional authenticated data (can be empty)
    /// * `plaintext` - Data to encrypt
    ///
    /// # Returns
    ///
    /// Ciphertext with the authentication tag appended.
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` if key size doesn't match
    /// - `InvalidNonceSize` if nonce size doesn't match
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>;

    /// Decrypt and verify ciphertext.
    ///
    /// # Arguments
    ///
    /// * `key` - Decryption key (size must match algorithm)
    /// * `nonce` - Nonce (size must match algorithm)
    /// * `aad` - Additional authenticated data (must match what was used in encryption)
    /// * `ciphertext` - Ciphertext with the authentication tag appended
    ///
    /// # Returns
    ///
    /// Plaintext if authentication succeeds.
    ///
    /// # Errors
    ///
    /// - `InvalidKeySize` / `InvalidNonceSize` on size mismatch
    /// - `AuthenticationFailed` if tag verification fails (MUST be constant-time)
    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>;

    /// Get the algorithm this cipher implements.
    fn algorithm(&self) -> AeadAlgorithm;
}
