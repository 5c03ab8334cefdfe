//! AES-GCM implementations using the RustCrypto `aes-gcm` crate.

use aes_gcm::aead::{Aead as _, KeyInit, Nonce, Payload};
use aes_gcm::{Aes128Gcm, Aes256Gcm};
use vtls_crypto::{Aead, AeadAlgorithm, Error, Result};

/// Create an AEAD cipher instance for the specified algorithm.
pub fn create_aead(algorithm: AeadAlgorithm) -> Result<Box<dyn Aead>> {
    Ok(Box::new(AesGcmImpl { algorithm }))
}

/// AES-GCM AEAD cipher.
///
/// - Key size: 16 bytes (AES-128) or 32 bytes (AES-256)
/// - Nonce size: 12 bytes
/// - Authentication tag: 16 bytes, appended to the ciphertext
#[derive(Debug)]
struct AesGcmImpl {
    algorithm: AeadAlgorithm,
}

impl AesGcmImpl {
    fn check_sizes(&self, key: &[u8], nonce: &[u8]) -> Result<()> {
        if key.len() != self.algorithm.key_size() {
            return Err(Error::InvalidKeySize {
                expected: self.algorithm.key_size(),
                actual: key.len(),
            });
        }

        if nonce.len() != self.algorithm.nonce_size() {
            return Err(Error::InvalidNonceSize {
                expected: self.algorithm.nonce_size(),
                actual: nonce.len(),
            });
        }

        Ok(())
    }
}

fn seal_with<C>(key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + aes_gcm::aead::Aead,
{
    let cipher = C::new_from_slice(key).map_err(|e| Error::CryptoError(e.to_string()))?;
    cipher
        .encrypt(Nonce::<C>::from_slice(nonce), Payload { msg: plaintext, aad })
        .map_err(|_| Error::CryptoError("AES-GCM encryption failed".into()))
}

fn open_with<C>(key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: KeyInit + aes_gcm::aead::Aead,
{
    let cipher = C::new_from_slice(key).map_err(|e| Error::CryptoError(e.to_string()))?;
    cipher
        .decrypt(Nonce::<C>::from_slice(nonce), Payload { msg: ciphertext, aad })
        .map_err(|_| Error::AuthenticationFailed)
}

impl Aead for AesGcmImpl {
    fn seal(&self, key: &[u8], nonce: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;
        match self.algorithm {
            AeadAlgorithm::Aes128Gcm => seal_with::<Aes128Gcm>(key, nonce, aad, plaintext),
            AeadAlgorithm::Aes256Gcm => seal_with::<Aes256Gcm>(key, nonce, aad, plaintext),
        }
    }

    fn open(&self, key: &[u8], nonce: &[u8], aad: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
        self.check_sizes(key, nonce)?;
        if ciphertext.len() < self.algorithm.tag_size() {
            return Err(Error::AuthenticationFailed);
        }
        match self.algorithm {
            AeadAlgorithm::Aes128Gcm => open_with::<Aes128Gcm>(key, nonce, aad, ciphertext),
            AeadAlgorithm::Aes256Gcm => open_with::<Aes256Gcm>(key, nonce, aad, ciphertext),
        }
    }

    fn algorithm(&self) -> AeadAlgorithm {
        self.algorithm
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aes128_gcm_roundtrip() {
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();
        let key = [0x42u8; 16];
        let nonce = [0x24u8; 12];

        let ciphertext = aead.seal(&key, &nonce, b"aad", b"hello, world").unwrap();
        assert_eq!(ciphertext.len(), 12 + 16);

        let plaintext = aead.open(&key, &nonce, b"aad", &ciphertext).unwrap();
        assert_eq!(plaintext, b"hello, world");
    }

    #[test]
    fn test_aes128_gcm_known_answer() {
        // NIST GCM test case 2: zero key, zero nonce, one zero block
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();
        let ciphertext = aead.seal(&[0u8; 16], &[0u8; 12], &[], &[0u8; 16]).unwrap();
        assert_eq!(
            hex::encode(ciphertext),
            "0388dace60b6a392f328c2b971b2fe78ab6e47d42cec13bdf53a67b21257bddf"
        );
    }

    #[test]
    fn test_aes256_gcm_tamper_detected() {
        let aead = create_aead(AeadAlgorithm::Aes256Gcm).unwrap();
        let key = [7u8; 32];
        let nonce = [9u8; 12];

        let mut ciphertext = aead.seal(&key, &nonce, b"header", b"payload").unwrap();
        ciphertext[0] ^= 0x01;

        assert_eq!(
            aead.open(&key, &nonce, b"header", &ciphertext),
            Err(Error::AuthenticationFailed)
        );
    }

    #[test]
    fn test_wrong_aad_rejected() {
        let aead = create_aead(AeadAlgorithm::Aes128Gcm).unwrap();
        let key = [1u8; 16];
        let nonce = [2u8; 12];

        let ciphertext = aead.seal(&key, &nonce, b"aad-1", b"payload").unwrap();
        assert!(aead.open(&key, &nonce, b"aad-2", &ciphertext).is_err());
    }

    #[test]
    fn test_invalid_sizes() {
        let aead = create_aead(AeadAlgorithm::Aes256Gcm).unwrap();
        assert_eq!(
            aead.seal(&[0u8; 16], &[0u8; 12], &[], b"x"),
            Err(Error::InvalidKeySize {
                expected: 32,
                actual: 16
            })
        );
        assert_eq!(
            aead.seal(&[0u8; 32], &[0u8; 8], &[], b"x"),
            Err(Error::InvalidNonceSize {
                expected: 12,
                actual: 8
            })
        );
        assert_eq!(
            aead.open(&[0u8; 32], &[0u8; 12], &[], &[0u8; 4]),
            Err(Error::AuthenticationFailed)
        );
    }
}
