//! TLS 1.2 PRF (Pseudorandom Function) - RFC 5246 Section 5
//!
//! PRF(secret, label, seed) = P_<hash>(secret, label + seed)
//!
//! Where P_hash is defined as:
//! P_hash(secret, seed) = HMAC_hash(secret, A(1) + seed) +
//!                         HMAC_hash(secret, A(2) + seed) +
//!                         HMAC_hash(secret, A(3) + seed) + ...
//!
//! A(0) = seed
//! A(i) = HMAC_hash(secret, A(i-1))

use vtls_crypto::{CryptoProvider, HashAlgorithm};
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// Label for the classic master secret derivation.
pub const MASTER_SECRET_LABEL: &[u8] = b"master secret";

/// Label for the extended master secret derivation (RFC 7627).
pub const EXTENDED_MASTER_SECRET_LABEL: &[u8] = b"extended master secret";

/// Label for the key block expansion.
pub const KEY_EXPANSION_LABEL: &[u8] = b"key expansion";

/// Label for the client's Finished verify data.
pub const CLIENT_FINISHED_LABEL: &[u8] = b"client finished";

/// Label for the server's Finished verify data.
pub const SERVER_FINISHED_LABEL: &[u8] = b"server finished";

/// TLS 1.2 PRF implementation
#[derive(Clone, Copy)]
pub struct Tls12Prf<'a> {
    provider: &'a dyn CryptoProvider,
    hash_algorithm: HashAlgorithm,
}

impl std::fmt::Debug for Tls12Prf<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tls12Prf")
            .field("hash_algorithm", &self.hash_algorithm)
            .finish()
    }
}

impl<'a> Tls12Prf<'a> {
    /// Create a new TLS 1.2 PRF with the specified hash algorithm.
    ///
    /// # Arguments
    /// * `provider` - Crypto provider for HMAC operations
    /// * `hash_algorithm` - Hash algorithm (SHA-256 or SHA-384)
    pub fn new(provider: &'a dyn CryptoProvider, hash_algorithm: HashAlgorithm) -> Self {
        Self {
            provider,
            hash_algorithm,
        }
    }

    /// Get the hash algorithm this PRF runs on.
    pub fn hash_algorithm(&self) -> HashAlgorithm {
        self.hash_algorithm
    }

    /// Compute the TLS 1.2 PRF.
    ///
    /// # Arguments
    /// * `secret` - The secret key material
    /// * `label` - ASCII string label (e.g., "master secret", "key expansion")
    /// * `seed` - Random seed data
    /// * `output_len` - Desired output length in bytes
    ///
    /// # Returns
    /// Output bytes of specified length, cleared on drop
    pub fn compute(
        &self,
        secret: &[u8],
        label: &[u8],
        seed: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        if self.hash_algorithm == HashAlgorithm::Sha1 {
            return Err(Error::UnsupportedFeature(
                "TLS 1.2 PRF is not defined over SHA-1".into(),
            ));
        }

        let mut label_seed = Vec::with_capacity(label.len() + seed.len());
        label_seed.extend_from_slice(label);
        label_seed.extend_from_slice(seed);

        self.p_hash(secret, &label_seed, output_len)
    }

    /// P_hash(secret, seed), truncated to `output_len` bytes.
    fn p_hash(
        &self,
        secret: &[u8],
        seed: &[u8],
        output_len: usize,
    ) -> Result<Zeroizing<Vec<u8>>> {
        let mut output = Zeroizing::new(Vec::with_capacity(output_len));

        // A(0) = seed
        let mut a = Zeroizing::new(seed.to_vec());

        while output.len() < output_len {
            // A(i) = HMAC_hash(secret, A(i-1))
            a = self.hmac(secret, &[a.as_slice()])?;

            // HMAC_hash(secret, A(i) + seed)
            let block = self.hmac(secret, &[a.as_slice(), seed])?;

            let take = (output_len - output.len()).min(block.len());
            output.extend_from_slice(&block[..take]);
        }

        Ok(output)
    }

    /// HMAC over the concatenation of `parts`.
    fn hmac(&self, key: &[u8], parts: &[&[u8]]) -> Result<Zeroizing<Vec<u8>>> {
        let mut hmac = self
            .provider
            .hmac(self.hash_algorithm, key)
            .map_err(|e| Error::CryptoError(format!("Failed to create HMAC: {}", e)))?;

        for part in parts {
            hmac.update(part);
        }
        Ok(Zeroizing::new(hmac.finalize()))
    }
}

/// One-shot PRF: `PRF(secret, label, seed)[0..output_len]` over `hash`.
pub fn prf(
    provider: &dyn CryptoProvider,
    hash: HashAlgorithm,
    secret: &[u8],
    label: &[u8],
    seed: &[u8],
    output_len: usize,
) -> Result<Zeroizing<Vec<u8>>> {
    Tls12Prf::new(provider, hash).compute(secret, label, seed, output_len)
}
