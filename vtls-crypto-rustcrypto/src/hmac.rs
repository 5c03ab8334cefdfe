//! HMAC implementations using the RustCrypto `hmac` crate.

use ::hmac::{Hmac as HmacCore, Mac};
use sha1::Sha1;
use sha2::{Sha256, Sha384};
use vtls_crypto::{Error, HashAlgorithm, Hmac, Result};

/// Create an HMAC instance for the specified hash algorithm.
pub fn create_hmac(algorithm: HashAlgorithm, key: &[u8]) -> Result<Box<dyn Hmac>> {
    match algorithm {
        HashAlgorithm::Sha1 => Ok(Box::new(MacImpl::<HmacCore<Sha1>>::new(algorithm, key)?)),
        HashAlgorithm::Sha256 => Ok(Box::new(MacImpl::<HmacCore<Sha256>>::new(algorithm, key)?)),
        HashAlgorithm::Sha384 => Ok(Box::new(MacImpl::<HmacCore<Sha384>>::new(algorithm, key)?)),
    }
}

/// Incremental HMAC over any RustCrypto [`Mac`].
///
/// HMAC accepts keys of any length; longer-than-block keys are hashed first
/// (RFC 2104).
struct MacImpl<M> {
    mac: M,
    algorithm: HashAlgorithm,
}

impl<M: Mac + ::hmac::digest::KeyInit> MacImpl<M> {
    fn new(algorithm: HashAlgorithm, key: &[u8]) -> Result<Self> {
        let mac = <M as Mac>::new_from_slice(key)
            .map_err(|e| Error::CryptoError(format!("HMAC key rejected: {}", e)))?;
        Ok(Self { mac, algorithm })
    }
}

impl<M: Mac + Send> Hmac for MacImpl<M> {
    fn update(&mut self, data: &[u8]) {
        Mac::update(&mut self.mac, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.mac.finalize().into_bytes().to_vec()
    }

    fn verify(self: Box<Self>, tag: &[u8]) -> bool {
        self.mac.verify_slice(tag).is_ok()
    }

    fn output_size(&self) -> usize {
        self.algorithm.output_size()
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}
