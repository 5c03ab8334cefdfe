//! Handshake transcript for TLS 1.2.
//!
//! The transcript is every handshake message (4-byte header plus body),
//! in both directions, in transmission order. It feeds:
//! - the extended master secret seed (RFC 7627)
//! - the Finished verify data (RFC 5246 Section 7.4.9)
//!
//! The PRF hash is only known once the server has picked a cipher suite,
//! so the raw bytes are kept and hashed on demand with whichever
//! algorithm the suite designates.

use crate::error::Result;
use vtls_crypto::{CryptoProvider, HashAlgorithm};

/// Append-only buffer of handshake message bytes.
///
/// # Example
///
/// ```rust,ignore
/// use vtls_core::transcript::Transcript;
/// use vtls_crypto::HashAlgorithm;
///
/// let mut transcript = Transcript::new();
/// transcript.update(&client_hello);
/// transcript.update(&server_hello);
/// let hash = transcript.hash(&provider, HashAlgorithm::Sha256)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct Transcript {
    /// Concatenated message bytes
    buffer: Vec<u8>,
    /// Number of messages appended so far
    message_count: usize,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one encoded handshake message (including its 4-byte header).
    pub fn update(&mut self, message: &[u8]) {
        self.buffer.extend_from_slice(message);
        self.message_count += 1;
    }

    /// Hash every message appended so far.
    ///
    /// The transcript itself is not consumed; later messages can still be
    /// appended and hashed again.
    pub fn hash(&self, provider: &dyn CryptoProvider, algorithm: HashAlgorithm) -> Result<Vec<u8>> {
        Ok(provider.digest(algorithm, &self.buffer)?)
    }

    /// Raw bytes of every message appended so far.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the number of messages in the transcript.
    pub fn message_count(&self) -> usize {
        self.message_count
    }

    /// Get the total size of all messages in bytes.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vtls_crypto_rustcrypto::RustCryptoProvider;

    #[test]
    fn test_transcript_accumulates() {
        let mut transcript = Transcript::new();
        assert!(transcript.is_empty());

        transcript.update(&[1, 0, 0, 1, 0xAA]);
        transcript.update(&[2, 0, 0, 0]);

        assert_eq!(transcript.message_count(), 2);
        assert_eq!(transcript.len(), 9);
        assert_eq!(transcript.as_bytes(), &[1, 0, 0, 1, 0xAA, 2, 0, 0, 0]);
    }

    #[test]
    fn test_hash_matches_concatenation() {
        let provider = RustCryptoProvider::new();
        let mut transcript = Transcript::new();
        transcript.update(b"\x01\x00\x00\x04abcd");
        transcript.update(b"\x02\x00\x00\x02xy");

        let hash = transcript.hash(&provider, HashAlgorithm::Sha256).unwrap();
        let expected = provider
            .digest(HashAlgorithm::Sha256, b"\x01\x00\x00\x04abcd\x02\x00\x00\x02xy")
            .unwrap();
        assert_eq!(hash, expected);

        let hash384 = transcript.hash(&provider, HashAlgorithm::Sha384).unwrap();
        assert_eq!(hash384.len(), 48);
    }

    #[test]
    fn test_hash_changes_with_new_message() {
        let provider = RustCryptoProvider::new();
        let mut transcript = Transcript::new();
        transcript.update(b"first");
        let before = transcript.hash(&provider, HashAlgorithm::Sha256).unwrap();

        transcript.update(b"second");
        let after = transcript.hash(&provider, HashAlgorithm::Sha256).unwrap();
        assert_ne!(before, after);
    }
}
