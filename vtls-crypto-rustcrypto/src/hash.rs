//! Hash function implementations using the RustCrypto `sha1` and `sha2` crates.

use sha1::Sha1;
use sha2::{Digest, Sha256, Sha384};
use vtls_crypto::{Hash, HashAlgorithm, Result};

/// Create a hash function instance for the specified algorithm.
pub fn create_hash(algorithm: HashAlgorithm) -> Result<Box<dyn Hash>> {
    match algorithm {
        HashAlgorithm::Sha1 => Ok(Box::new(DigestImpl::<Sha1>::new(algorithm))),
        HashAlgorithm::Sha256 => Ok(Box::new(DigestImpl::<Sha256>::new(algorithm))),
        HashAlgorithm::Sha384 => Ok(Box::new(DigestImpl::<Sha384>::new(algorithm))),
    }
}

/// Incremental hash over any RustCrypto [`Digest`].
struct DigestImpl<D> {
    hasher: D,
    algorithm: HashAlgorithm,
}

impl<D: Digest> DigestImpl<D> {
    fn new(algorithm: HashAlgorithm) -> Self {
        Self {
            hasher: D::new(),
            algorithm,
        }
    }
}

impl<D: Digest + Send> Hash for DigestImpl<D> {
    fn update(&mut self, data: &[u8]) {
        Digest::update(&mut self.hasher, data);
    }

    fn finalize(self: Box<Self>) -> Vec<u8> {
        self.hasher.finalize().to_vec()
    }

    fn output_size(&self) -> usize {
        self.algorithm.output_size()
    }

    fn algorithm(&self) -> HashAlgorithm {
        self.algorithm
    }
}
