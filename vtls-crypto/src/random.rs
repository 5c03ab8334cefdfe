//! Cryptographically Secure Random Number Generator (CSPRNG) interface.

use crate::Result;

/// Random number generator trait.
///
/// The record layer draws CBC explicit IVs and GCM explicit nonces from it.
///
/// # Security Requirements
///
/// - MUST be cryptographically secure
/// - MUST be properly seeded from OS entropy source
///
/// # Example
///
/// ```rust,no_run
/// use vtls_crypto::Random;
///
/// fn generate_nonce(rng: &dyn Random) -> vtls_crypto::Result<Vec<u8>> {
///     rng.generate(8)
/// }
/// ```
pub trait Random: Send + Sync {
    /// Fill a buffer with random bytes.
    ///
    /// # Errors
    ///
    /// Returns error if random generation fails (e.g., OS RNG unavailable).
    fn fill(&self, dest: &mut [u8]) -> Result<()>;

    /// Generate a random byte vector of specified length.
    fn generate(&self, len: usize) -> Result<Vec<u8>> {
        let mut buf = vec![0u8; len];
        self.fill(&mut buf)?;
        Ok(buf)
    }
}
