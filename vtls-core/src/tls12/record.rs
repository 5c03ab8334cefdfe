//! TLS 1.2 Record Protection
//!
//! Encrypts and decrypts record fragments for one direction of a
//! connection. Two constructions are supported:
//!
//! # GenericBlockCipher (RFC 5246 Section 6.2.3.2)
//!
//! ```text
//! mac      = HMAC(mac_key, metadata || plaintext)
//! data     = plaintext || mac || padding (each byte = padding_length)
//! fragment = IV(16) || AES-CBC(cipher_key, IV, data)
//! ```
//!
//! # GenericAEADCipher (RFC 5288)
//!
//! ```text
//! nonce    = implicit_iv(4) || explicit_nonce(8)
//! fragment = explicit_nonce(8) || AES-GCM(cipher_key, nonce, metadata, plaintext)
//! ```
//!
//! # Metadata
//!
//! ```text
//! seq_num (8, big-endian) || type (1) || version (2) || length (2)
//! ```
//!
//! used as the MAC prefix for CBC suites and as additional data for GCM.

use bytes::BufMut;
use subtle::{Choice, ConstantTimeEq, ConstantTimeGreater};
use vtls_crypto::{AeadAlgorithm, CbcAlgorithm, CryptoProvider, HashAlgorithm, AES_BLOCK_SIZE};
use zeroize::Zeroizing;

use crate::error::{Error, Result};
use crate::protocol::{ContentType, ProtocolVersion, MAX_CIPHERTEXT_LEN, MAX_PLAINTEXT_LEN};
use crate::tls12::cipher_suites::{BulkCipher, CipherSuite, MacAlgorithm};
use crate::tls12::key_schedule::ConnectionKeys;

/// Length of the record metadata (MAC prefix / AEAD additional data).
pub const METADATA_LEN: usize = 13;

/// Length of the explicit nonce carried in GCM records.
pub const EXPLICIT_NONCE_LEN: usize = 8;

/// Length of the GCM authentication tag.
pub const GCM_TAG_LEN: usize = 16;

/// Smallest maximum fragment length accepted (RFC 6066 lower bound).
pub const MIN_FRAGMENT_LEN: usize = 512;

/// Longest CBC padding run that can appear in a record.
const MAX_PADDING_RUN: usize = 256;

/// Record protection for one direction of a TLS 1.2 connection.
///
/// Keys are fixed at construction; the sequence number advances by one for
/// every call to [`encrypt`](Self::encrypt) or [`decrypt`](Self::decrypt),
/// including calls that fail.
pub struct RecordProtector {
    cipher_suite: CipherSuite,
    keys: ConnectionKeys,
    sequence_number: u64,
    max_fragment_length: usize,
}

impl std::fmt::Debug for RecordProtector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordProtector")
            .field("cipher_suite", &self.cipher_suite)
            .field("sequence_number", &self.sequence_number)
            .field("max_fragment_length", &self.max_fragment_length)
            .finish()
    }
}

impl RecordProtector {
    /// Create a protector for `cipher_suite` keyed with `keys`.
    ///
    /// Fails with `InvalidState` if any key length differs from the
    /// suite's parameters.
    pub fn new(cipher_suite: CipherSuite, keys: ConnectionKeys) -> Result<Self> {
        if !keys.matches(&cipher_suite.params()) {
            return Err(Error::InvalidState(format!(
                "Key lengths do not match {} ({:?})",
                cipher_suite.name(),
                keys
            )));
        }

        Ok(Self {
            cipher_suite,
            keys,
            sequence_number: 0,
            max_fragment_length: MAX_PLAINTEXT_LEN,
        })
    }

    /// Lower the maximum plaintext fragment length (512..=16384).
    pub fn with_max_fragment_length(mut self, max_fragment_length: usize) -> Result<Self> {
        if !(MIN_FRAGMENT_LEN..=MAX_PLAINTEXT_LEN).contains(&max_fragment_length) {
            return Err(Error::InvalidConfig(format!(
                "Maximum fragment length {} outside {}..={}",
                max_fragment_length, MIN_FRAGMENT_LEN, MAX_PLAINTEXT_LEN
            )));
        }
        self.max_fragment_length = max_fragment_length;
        Ok(self)
    }

    /// The cipher suite protecting this direction.
    pub fn cipher_suite(&self) -> CipherSuite {
        self.cipher_suite
    }

    /// Sequence number the next record will use.
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Maximum plaintext fragment length.
    pub fn max_fragment_length(&self) -> usize {
        self.max_fragment_length
    }

    /// Encrypt one plaintext fragment.
    pub fn encrypt(
        &mut self,
        provider: &dyn CryptoProvider,
        content_type: ContentType,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let seq = self.reserve_sequence_number()?;
        tracing::trace!("Encrypting {:?} record, seq={}", content_type, seq);

        if plaintext.len() > self.max_fragment_length {
            return Err(Error::RecordOverflow);
        }

        match self.cipher_suite.bulk_cipher() {
            BulkCipher::Cbc(algorithm) => {
                self.encrypt_cbc(provider, algorithm, seq, content_type, plaintext)
            },
            BulkCipher::Aead(algorithm) => {
                self.encrypt_aead(provider, algorithm, seq, content_type, plaintext)
            },
        }
    }

    /// Decrypt and authenticate one record fragment.
    ///
    /// Every padding, MAC, tag or length failure is reported as
    /// [`Error::RecordAuthenticationFailed`].
    ///
    /// For CBC suites the padding check and MAC comparison are constant
    /// time, but the HMAC still runs over a length that depends on the
    /// padding, leaving the small Lucky13-style timing difference.
    pub fn decrypt(
        &mut self,
        provider: &dyn CryptoProvider,
        content_type: ContentType,
        fragment: &[u8],
    ) -> Result<Vec<u8>> {
        let seq = self.reserve_sequence_number()?;
        tracing::trace!("Decrypting {:?} record, seq={}", content_type, seq);

        if fragment.len() > MAX_CIPHERTEXT_LEN {
            return Err(Error::RecordOverflow);
        }

        let plaintext = match self.cipher_suite.bulk_cipher() {
            BulkCipher::Cbc(algorithm) => {
                self.decrypt_cbc(provider, algorithm, seq, content_type, fragment)
            },
            BulkCipher::Aead(algorithm) => {
                self.decrypt_aead(provider, algorithm, seq, content_type, fragment)
            },
        }
        .map_err(|e| {
            if e == Error::RecordAuthenticationFailed {
                tracing::debug!("Record authentication failed, seq={}", seq);
            }
            e
        })?;

        if plaintext.len() > self.max_fragment_length {
            return Err(Error::RecordOverflow);
        }

        Ok(plaintext)
    }

    /// Take the current sequence number and advance it.
    fn reserve_sequence_number(&mut self) -> Result<u64> {
        let seq = self.sequence_number;
        self.sequence_number = seq
            .checked_add(1)
            .ok_or_else(|| Error::InvalidState("Record sequence number exhausted".into()))?;
        Ok(seq)
    }

    fn encrypt_cbc(
        &self,
        provider: &dyn CryptoProvider,
        algorithm: CbcAlgorithm,
        seq: u64,
        content_type: ContentType,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let mac_hash = self.mac_hash()?;
        let metadata = metadata(seq, content_type, plaintext.len());
        let mac = self.compute_mac(provider, mac_hash, &metadata, plaintext)?;

        // padding_length + 1 bytes, each equal to padding_length
        let unpadded = plaintext.len() + mac.len() + 1;
        let padding_length = (AES_BLOCK_SIZE - unpadded % AES_BLOCK_SIZE) % AES_BLOCK_SIZE;

        let mut data = Zeroizing::new(Vec::with_capacity(unpadded + padding_length));
        data.extend_from_slice(plaintext);
        data.extend_from_slice(&mac);
        data.put_bytes(padding_length as u8, padding_length + 1);

        let mut iv = [0u8; AES_BLOCK_SIZE];
        provider
            .random()
            .fill(&mut iv)
            .map_err(|e| Error::CryptoError(format!("Failed to generate IV: {}", e)))?;

        provider
            .cbc(algorithm)?
            .encrypt(self.keys.cipher_key(), &iv, &mut data)?;

        let mut fragment = Vec::with_capacity(AES_BLOCK_SIZE + data.len());
        fragment.put_slice(&iv);
        fragment.put_slice(&data);
        Ok(fragment)
    }

    fn decrypt_cbc(
        &self,
        provider: &dyn CryptoProvider,
        algorithm: CbcAlgorithm,
        seq: u64,
        content_type: ContentType,
        fragment: &[u8],
    ) -> Result<Vec<u8>> {
        let mac_hash = self.mac_hash()?;
        let mac_len = mac_hash.output_size();

        // IV plus enough whole blocks for the MAC and the padding length byte
        let min_len = AES_BLOCK_SIZE + (mac_len + AES_BLOCK_SIZE) / AES_BLOCK_SIZE * AES_BLOCK_SIZE;
        if fragment.len() < min_len || fragment.len() % AES_BLOCK_SIZE != 0 {
            return Err(Error::RecordAuthenticationFailed);
        }

        let (iv, ciphertext) = fragment.split_at(AES_BLOCK_SIZE);
        let mut data = Zeroizing::new(ciphertext.to_vec());
        provider
            .cbc(algorithm)?
            .decrypt(self.keys.cipher_key(), iv, &mut data)
            .map_err(|_| Error::RecordAuthenticationFailed)?;

        let padding_length = data[data.len() - 1];
        let pad = padding_length as usize;
        let good_length = pad + 1 + mac_len <= data.len();

        // Scan a fixed window so the work done does not depend on the
        // padding length.
        let mut pad_ok = Choice::from(good_length as u8);
        let window = data.len().min(MAX_PADDING_RUN);
        for i in 0..window {
            let in_padding = !(i as u32).ct_gt(&(pad as u32));
            let byte_ok = data[data.len() - 1 - i].ct_eq(&padding_length);
            pad_ok &= !in_padding | byte_ok;
        }

        // On bad padding, still run the MAC over a plausible length
        let content_len = if good_length {
            data.len() - pad - 1 - mac_len
        } else {
            data.len() - 1 - mac_len
        };

        let metadata = metadata(seq, content_type, content_len);
        let expected = self.compute_mac(provider, mac_hash, &metadata, &data[..content_len])?;
        let received = &data[content_len..content_len + mac_len];
        let mac_ok = received.ct_eq(&expected);

        if !bool::from(pad_ok & mac_ok) {
            return Err(Error::RecordAuthenticationFailed);
        }

        Ok(data[..content_len].to_vec())
    }

    fn encrypt_aead(
        &self,
        provider: &dyn CryptoProvider,
        algorithm: AeadAlgorithm,
        seq: u64,
        content_type: ContentType,
        plaintext: &[u8],
    ) -> Result<Vec<u8>> {
        let mut explicit_nonce = [0u8; EXPLICIT_NONCE_LEN];
        provider
            .random()
            .fill(&mut explicit_nonce)
            .map_err(|e| Error::CryptoError(format!("Failed to generate nonce: {}", e)))?;

        let nonce = self.aead_nonce(&explicit_nonce);
        let additional_data = metadata(seq, content_type, plaintext.len());

        let ciphertext = provider.aead(algorithm)?.seal(
            self.keys.cipher_key(),
            &nonce,
            &additional_data,
            plaintext,
        )?;

        let mut fragment = Vec::with_capacity(EXPLICIT_NONCE_LEN + ciphertext.len());
        fragment.put_slice(&explicit_nonce);
        fragment.put_slice(&ciphertext);
        Ok(fragment)
    }

    fn decrypt_aead(
        &self,
        provider: &dyn CryptoProvider,
        algorithm: AeadAlgorithm,
        seq: u64,
        content_type: ContentType,
        fragment: &[u8],
    ) -> Result<Vec<u8>> {
        if fragment.len() < EXPLICIT_NONCE_LEN + GCM_TAG_LEN {
            return Err(Error::RecordAuthenticationFailed);
        }

        let (explicit_nonce, ciphertext) = fragment.split_at(EXPLICIT_NONCE_LEN);
        let nonce = self.aead_nonce(explicit_nonce);
        let plaintext_len = ciphertext.len() - GCM_TAG_LEN;
        let additional_data = metadata(seq, content_type, plaintext_len);

        provider
            .aead(algorithm)?
            .open(self.keys.cipher_key(), &nonce, &additional_data, ciphertext)
            .map_err(|_| Error::RecordAuthenticationFailed)
    }

    /// implicit_iv(4) || explicit_nonce(8)
    fn aead_nonce(&self, explicit_nonce: &[u8]) -> [u8; 12] {
        let mut nonce = [0u8; 12];
        let implicit = self.keys.implicit_iv();
        nonce[..implicit.len()].copy_from_slice(implicit);
        nonce[implicit.len()..].copy_from_slice(explicit_nonce);
        nonce
    }

    fn mac_hash(&self) -> Result<HashAlgorithm> {
        match self.cipher_suite.mac_algorithm() {
            MacAlgorithm::HmacSha1 => Ok(HashAlgorithm::Sha1),
            MacAlgorithm::HmacSha256 => Ok(HashAlgorithm::Sha256),
            MacAlgorithm::Aead => Err(Error::InvalidState(format!(
                "{} has no record MAC",
                self.cipher_suite.name()
            ))),
        }
    }

    fn compute_mac(
        &self,
        provider: &dyn CryptoProvider,
        hash: HashAlgorithm,
        metadata: &[u8; METADATA_LEN],
        content: &[u8],
    ) -> Result<Vec<u8>> {
        let mut hmac = provider.hmac(hash, self.keys.mac_key())?;
        hmac.update(metadata);
        hmac.update(content);
        Ok(hmac.finalize())
    }
}

/// Build the 13-byte record metadata.
fn metadata(seq: u64, content_type: ContentType, length: usize) -> [u8; METADATA_LEN] {
    let mut out = [0u8; METADATA_LEN];
    let mut buf = &mut out[..];
    buf.put_u64(seq);
    buf.put_u8(content_type.to_u8());
    buf.put_u16(ProtocolVersion::Tls12.to_u16());
    buf.put_u16(length as u16);
    out
}
