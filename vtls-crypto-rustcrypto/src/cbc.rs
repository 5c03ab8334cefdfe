//! AES-CBC implementations using the RustCrypto `cbc` and `aes` crates.
//!
//! Padding is owned by the TLS record layer, so both directions run with
//! `NoPadding` over block-aligned buffers.

use aes::{Aes128, Aes256};
use ::cbc::cipher::block_padding::NoPadding;
use ::cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use vtls_crypto::{CbcAlgorithm, CbcCipher, Error, Result, AES_BLOCK_SIZE};

/// Create a CBC cipher instance for the specified algorithm.
pub fn create_cbc(algorithm: CbcAlgorithm) -> Result<Box<dyn CbcCipher>> {
    Ok(Box::new(AesCbcImpl { algorithm }))
}

/// AES-CBC cipher without padding.
#[derive(Debug)]
struct AesCbcImpl {
    algorithm: CbcAlgorithm,
}

impl AesCbcImpl {
    fn check_sizes(&self, key: &[u8], iv: &[u8], data: &[u8]) -> Result<()> {
        if key.len() != self.algorithm.key_size() {
            return Err(Error::InvalidKeySize {
                expected: self.algorithm.key_size(),
                actual: key.len(),
            });
        }

        if iv.len() != AES_BLOCK_SIZE {
            return Err(Error::InvalidNonceSize {
                expected: AES_BLOCK_SIZE,
                actual: iv.len(),
            });
        }

        if data.len() % AES_BLOCK_SIZE != 0 {
            return Err(Error::InvalidLength);
        }

        Ok(())
    }
}

fn encrypt_with<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: KeyIvInit + BlockEncryptMut,
{
    let len = data.len();
    C::new_from_slices(key, iv)
        .map_err(|e| Error::CryptoError(e.to_string()))?
        .encrypt_padded_mut::<NoPadding>(data, len)
        .map_err(|_| Error::InvalidLength)?;
    Ok(())
}

fn decrypt_with<C>(key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()>
where
    C: KeyIvInit + BlockDecryptMut,
{
    C::new_from_slices(key, iv)
        .map_err(|e| Error::CryptoError(e.to_string()))?
        .decrypt_padded_mut::<NoPadding>(data)
        .map_err(|_| Error::InvalidLength)?;
    Ok(())
}

impl CbcCipher for AesCbcImpl {
    fn encrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
        self.check_sizes(key, iv, data)?;
        match self.algorithm {
            CbcAlgorithm::Aes128Cbc => encrypt_with::<::cbc::Encryptor<Aes128>>(key, iv, data),
            CbcAlgorithm::Aes256Cbc => encrypt_with::<::cbc::Encryptor<Aes256>>(key, iv, data),
        }
    }

    fn decrypt(&self, key: &[u8], iv: &[u8], data: &mut [u8]) -> Result<()> {
        self.check_sizes(key, iv, data)?;
        match self.algorithm {
            CbcAlgorithm::Aes128Cbc => decrypt_with::<::cbc::Decryptor<Aes128>>(key, iv, data),
            CbcAlgorithm::Aes256Cbc => decrypt_with::<::cbc::Decryptor<Aes256>>(key, iv, data),
        }
    }

    fn algorithm(&self) -> CbcAlgorithm {
        self.algorithm
    }
}
