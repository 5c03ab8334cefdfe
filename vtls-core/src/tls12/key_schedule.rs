//! TLS 1.2 Key Schedule
//!
//! ```text
//!   pre_master_secret
//!          |
//!          v
//!   PRF(pms, "master secret", client_random + server_random)       (classic)
//!   PRF(pms, "extended master secret", Hash(transcript))            (RFC 7627)
//!          |
//!          v
//!   master_secret (48 bytes)
//!          |
//!          +--> PRF(ms, "key expansion", server_random + client_random)
//!          |        = client_MAC | server_MAC | client_key | server_key
//!          |          | client_IV | server_IV
//!          |
//!          +--> PRF(ms, "client finished" | "server finished",
//!                   Hash(transcript))[0..12]
//! ```
//!
//! The pre-master secret is wiped as soon as the master secret exists.

use subtle::ConstantTimeEq;
use vtls_crypto::CryptoProvider;
use zeroize::{Zeroize, Zeroizing};

use crate::error::{Error, Result};
use crate::protocol::{HandshakeType, MAX_PLAINTEXT_LEN};
use crate::tls12::cipher_suites::{CipherSuite, SuiteParams};
use crate::tls12::prf::{
    prf, CLIENT_FINISHED_LABEL, EXTENDED_MASTER_SECRET_LABEL, KEY_EXPANSION_LABEL,
    MASTER_SECRET_LABEL, SERVER_FINISHED_LABEL,
};
use crate::tls12::record::RecordProtector;
use crate::transcript::Transcript;
use crate::Config;

/// Length of ClientHello.random / ServerHello.random.
pub const RANDOM_LEN: usize = 32;

/// Length of the master secret.
pub const MASTER_SECRET_LEN: usize = 48;

/// Length of Finished verify data.
pub const VERIFY_DATA_LEN: usize = 12;

/// Which end of the connection a Finished message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// The client
    Client,
    /// The server
    Server,
}

impl Side {
    /// PRF label for this side's Finished verify data.
    pub const fn finished_label(self) -> &'static [u8] {
        match self {
            Side::Client => CLIENT_FINISHED_LABEL,
            Side::Server => SERVER_FINISHED_LABEL,
        }
    }
}

/// Key material for one direction of a connection.
///
/// Every buffer is cleared on drop.
#[derive(Clone)]
pub struct ConnectionKeys {
    mac_key: Zeroizing<Vec<u8>>,
    cipher_key: Zeroizing<Vec<u8>>,
    implicit_iv: Zeroizing<Vec<u8>>,
}

impl ConnectionKeys {
    /// Bundle directional key material.
    ///
    /// Lengths are checked against a cipher suite when the keys are handed
    /// to [`RecordProtector::new`].
    pub fn new(mac_key: Vec<u8>, cipher_key: Vec<u8>, implicit_iv: Vec<u8>) -> Self {
        Self {
            mac_key: Zeroizing::new(mac_key),
            cipher_key: Zeroizing::new(cipher_key),
            implicit_iv: Zeroizing::new(implicit_iv),
        }
    }

    /// MAC key (empty for AEAD suites).
    pub fn mac_key(&self) -> &[u8] {
        &self.mac_key
    }

    /// Bulk cipher key.
    pub fn cipher_key(&self) -> &[u8] {
        &self.cipher_key
    }

    /// Implicit IV (4 bytes for GCM, empty for CBC).
    pub fn implicit_iv(&self) -> &[u8] {
        &self.implicit_iv
    }

    /// Check every buffer length against a suite's parameters.
    pub(crate) fn matches(&self, params: &SuiteParams) -> bool {
        self.mac_key.len() == params.mac_key_len
            && self.cipher_key.len() == params.enc_key_len
            && self.implicit_iv.len() == params.fixed_iv_len
    }
}

impl std::fmt::Debug for ConnectionKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionKeys")
            .field("mac_key_len", &self.mac_key.len())
            .field("cipher_key_len", &self.cipher_key.len())
            .field("implicit_iv_len", &self.implicit_iv.len())
            .finish()
    }
}

/// Offsets of each slice inside a key block.
///
/// Computed once from the suite parameters; the block length is checked
/// once in [`KeyBlockLayout::split`] and every slice is in bounds after that.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBlockLayout {
    mac_key_len: usize,
    enc_key_len: usize,
    fixed_iv_len: usize,
}

impl KeyBlockLayout {
    /// Layout for a cipher suite.
    pub const fn for_suite(suite: CipherSuite) -> Self {
        let params = suite.params();
        Self {
            mac_key_len: params.mac_key_len,
            enc_key_len: params.enc_key_len,
            fixed_iv_len: params.fixed_iv_len,
        }
    }

    /// Total key block length.
    pub const fn len(&self) -> usize {
        2 * (self.mac_key_len + self.enc_key_len + self.fixed_iv_len)
    }

    /// Whether the layout needs no key material at all.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Slice a key block into client-write and server-write keys.
    ///
    /// Order: client MAC, server MAC, client key, server key,
    /// client IV, server IV.
    pub fn split(&self, block: &[u8]) -> Result<(ConnectionKeys, ConnectionKeys)> {
        if block.len() != self.len() {
            return Err(Error::InvalidState(format!(
                "Key block must be {} bytes, got {}",
                self.len(),
                block.len()
            )));
        }

        let (client_mac, rest) = block.split_at(self.mac_key_len);
        let (server_mac, rest) = rest.split_at(self.mac_key_len);
        let (client_key, rest) = rest.split_at(self.enc_key_len);
        let (server_key, rest) = rest.split_at(self.enc_key_len);
        let (client_iv, server_iv) = rest.split_at(self.fixed_iv_len);

        Ok((
            ConnectionKeys::new(client_mac.to_vec(), client_key.to_vec(), client_iv.to_vec()),
            ConnectionKeys::new(server_mac.to_vec(), server_key.to_vec(), server_iv.to_vec()),
        ))
    }
}

/// Expanded key block split per direction.
#[derive(Debug)]
pub struct KeyBlock {
    /// Cipher suite the keys were derived for
    pub cipher_suite: CipherSuite,
    /// Client-write keys
    pub client: ConnectionKeys,
    /// Server-write keys
    pub server: ConnectionKeys,
    max_fragment_length: usize,
}

impl KeyBlock {
    /// Build the `(client_write, server_write)` record protectors.
    ///
    /// A client encrypts with the first and decrypts with the second; a
    /// server does the opposite.
    pub fn into_protectors(self) -> Result<(RecordProtector, RecordProtector)> {
        let client = RecordProtector::new(self.cipher_suite, self.client)?
            .with_max_fragment_length(self.max_fragment_length)?;
        let server = RecordProtector::new(self.cipher_suite, self.server)?
            .with_max_fragment_length(self.max_fragment_length)?;
        Ok((client, server))
    }
}

/// TLS 1.2 key schedule for one connection.
///
/// # Example
///
/// ```rust,ignore
/// let mut schedule = KeySchedule::new();
/// schedule.set_cipher_suite(CipherSuite::EcdheRsaWithAes128GcmSha256)?;
/// schedule.set_client_random(client_random)?;
/// schedule.set_server_random(server_random)?;
/// schedule.set_pre_master_secret(pms)?;
///
/// schedule.derive_master_secret(&provider)?;
/// let (client_write, server_write) = schedule.derive_key_block(&provider)?.into_protectors()?;
/// let verify_data = schedule.finished_verify_data(&provider, Side::Client)?;
/// ```
pub struct KeySchedule {
    cipher_suite: Option<CipherSuite>,
    client_random: Option<[u8; RANDOM_LEN]>,
    server_random: Option<[u8; RANDOM_LEN]>,
    pre_master_secret: Option<Zeroizing<Vec<u8>>>,
    master_secret: Option<Zeroizing<[u8; MASTER_SECRET_LEN]>>,
    extended_master_secret: bool,
    transcript: Transcript,
    enabled_suites: Option<Vec<CipherSuite>>,
    require_extended_master_secret: bool,
    max_fragment_length: usize,
}

impl Default for KeySchedule {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for KeySchedule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeySchedule")
            .field("cipher_suite", &self.cipher_suite)
            .field("extended_master_secret", &self.extended_master_secret)
            .field("has_pre_master_secret", &self.pre_master_secret.is_some())
            .field("has_master_secret", &self.master_secret.is_some())
            .field("transcript_messages", &self.transcript.message_count())
            .finish()
    }
}

impl KeySchedule {
    /// Create an empty key schedule accepting every supported suite.
    pub fn new() -> Self {
        Self {
            cipher_suite: None,
            client_random: None,
            server_random: None,
            pre_master_secret: None,
            master_secret: None,
            extended_master_secret: false,
            transcript: Transcript::new(),
            enabled_suites: None,
            require_extended_master_secret: false,
            max_fragment_length: MAX_PLAINTEXT_LEN,
        }
    }

    /// Create a key schedule governed by `config`.
    ///
    /// Only the configured suites are accepted, the extended master secret
    /// can be made mandatory, and protectors built from the key block use
    /// the configured maximum fragment length.
    pub fn with_config(config: &Config) -> Self {
        Self {
            enabled_suites: Some(config.cipher_suites.clone()),
            require_extended_master_secret: config.require_extended_master_secret,
            max_fragment_length: config.max_fragment_length as usize,
            ..Self::new()
        }
    }

    fn ensure_not_derived(&self, what: &str) -> Result<()> {
        if self.master_secret.is_some() {
            return Err(Error::InvalidState(format!(
                "Cannot change {} after the master secret is derived",
                what
            )));
        }
        Ok(())
    }

    /// Set the negotiated cipher suite.
    pub fn set_cipher_suite(&mut self, suite: CipherSuite) -> Result<()> {
        self.ensure_not_derived("the cipher suite")?;
        if let Some(enabled) = &self.enabled_suites {
            if !enabled.contains(&suite) {
                return Err(Error::InvalidConfig(format!(
                    "Cipher suite {} is not enabled",
                    suite.name()
                )));
            }
        }
        tracing::debug!("TLS 1.2 cipher suite: {}", suite.name());
        self.cipher_suite = Some(suite);
        Ok(())
    }

    /// Set ClientHello.random.
    pub fn set_client_random(&mut self, random: [u8; RANDOM_LEN]) -> Result<()> {
        self.ensure_not_derived("the client random")?;
        self.client_random = Some(random);
        Ok(())
    }

    /// Set ServerHello.random.
    pub fn set_server_random(&mut self, random: [u8; RANDOM_LEN]) -> Result<()> {
        self.ensure_not_derived("the server random")?;
        self.server_random = Some(random);
        Ok(())
    }

    /// Hand over the pre-master secret produced by the key exchange.
    ///
    /// The schedule owns it from here on and wipes it once the master
    /// secret has been derived.
    pub fn set_pre_master_secret(&mut self, pre_master_secret: Vec<u8>) -> Result<()> {
        self.ensure_not_derived("the pre-master secret")?;
        let pre_master_secret = Zeroizing::new(pre_master_secret);
        if pre_master_secret.is_empty() {
            return Err(Error::InvalidState("Pre-master secret is empty".into()));
        }
        self.pre_master_secret = Some(pre_master_secret);
        Ok(())
    }

    /// Select the extended master secret derivation (RFC 7627).
    pub fn set_extended_master_secret(&mut self, enabled: bool) -> Result<()> {
        self.ensure_not_derived("the master secret mode")?;
        self.extended_master_secret = enabled;
        Ok(())
    }

    /// Append one handshake message (header + body) to the transcript.
    pub fn add_handshake_message(&mut self, message: &[u8]) {
        if let Some(msg_type) = message.first().copied().and_then(HandshakeType::from_u8) {
            tracing::trace!("Transcript += {:?} ({} bytes)", msg_type, message.len());
        }
        self.transcript.update(message);
    }

    /// The negotiated cipher suite, if set.
    pub fn cipher_suite(&self) -> Option<CipherSuite> {
        self.cipher_suite
    }

    /// The handshake transcript so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Whether the extended master secret derivation is selected.
    pub fn uses_extended_master_secret(&self) -> bool {
        self.extended_master_secret
    }

    /// Whether a pre-master secret is still held.
    ///
    /// Always `false` once the master secret has been derived.
    pub fn has_pre_master_secret(&self) -> bool {
        self.pre_master_secret.is_some()
    }

    /// The cached master secret, if derived.
    pub fn master_secret(&self) -> Option<&[u8; MASTER_SECRET_LEN]> {
        self.master_secret.as_deref()
    }

    fn require_suite(&self) -> Result<CipherSuite> {
        self.cipher_suite
            .ok_or_else(|| Error::InvalidState("Cipher suite not set".into()))
    }

    fn require_randoms(&self) -> Result<(&[u8; RANDOM_LEN], &[u8; RANDOM_LEN])> {
        let client = self
            .client_random
            .as_ref()
            .ok_or_else(|| Error::InvalidState("Client random not set".into()))?;
        let server = self
            .server_random
            .as_ref()
            .ok_or_else(|| Error::InvalidState("Server random not set".into()))?;
        Ok((client, server))
    }

    /// Derive (once) and return the master secret.
    ///
    /// With the extended master secret the seed is the PRF hash of the
    /// transcript so far, so the caller derives right after the
    /// ClientKeyExchange message has been added. Later calls return the
    /// cached value without touching the transcript.
    pub fn derive_master_secret(
        &mut self,
        provider: &dyn CryptoProvider,
    ) -> Result<&[u8; MASTER_SECRET_LEN]> {
        if self.master_secret.is_none() {
            let master_secret = self.compute_master_secret(provider)?;
            self.master_secret = Some(master_secret);

            if let Some(mut pre_master_secret) = self.pre_master_secret.take() {
                pre_master_secret.zeroize();
            }
        }

        self.master_secret
            .as_deref()
            .ok_or_else(|| Error::InvalidState("Master secret unavailable".into()))
    }

    fn compute_master_secret(
        &self,
        provider: &dyn CryptoProvider,
    ) -> Result<Zeroizing<[u8; MASTER_SECRET_LEN]>> {
        let suite = self.require_suite()?;
        let (client_random, server_random) = self.require_randoms()?;
        let pre_master_secret = self
            .pre_master_secret
            .as_ref()
            .ok_or_else(|| Error::InvalidState("Pre-master secret not set".into()))?;

        if self.require_extended_master_secret && !self.extended_master_secret {
            return Err(Error::InvalidConfig(
                "Extended master secret is required but was not negotiated".into(),
            ));
        }

        let (label, seed) = if self.extended_master_secret {
            let session_hash = self.transcript.hash(provider, suite.prf_hash())?;
            (EXTENDED_MASTER_SECRET_LABEL, session_hash)
        } else {
            let mut seed = Vec::with_capacity(2 * RANDOM_LEN);
            seed.extend_from_slice(client_random);
            seed.extend_from_slice(server_random);
            (MASTER_SECRET_LABEL, seed)
        };

        let output = prf(
            provider,
            suite.prf_hash(),
            pre_master_secret,
            label,
            &seed,
            MASTER_SECRET_LEN,
        )?;

        let mut master_secret = Zeroizing::new([0u8; MASTER_SECRET_LEN]);
        master_secret.copy_from_slice(&output);

        tracing::debug!(
            "Derived master secret ({}, PRF {})",
            if self.extended_master_secret { "extended" } else { "classic" },
            suite.prf_hash().name()
        );

        Ok(master_secret)
    }

    /// Expand the key block and split it per direction.
    ///
    /// Derives the master secret first if that has not happened yet.
    pub fn derive_key_block(&mut self, provider: &dyn CryptoProvider) -> Result<KeyBlock> {
        let suite = self.require_suite()?;
        let (client_random, server_random) = self.require_randoms()?;

        let mut seed = Vec::with_capacity(2 * RANDOM_LEN);
        seed.extend_from_slice(server_random);
        seed.extend_from_slice(client_random);

        let layout = KeyBlockLayout::for_suite(suite);
        let master_secret = self.derive_master_secret(provider)?;

        let block = prf(
            provider,
            suite.prf_hash(),
            master_secret,
            KEY_EXPANSION_LABEL,
            &seed,
            layout.len(),
        )?;
        let (client, server) = layout.split(&block)?;

        tracing::debug!("Expanded {}-byte key block for {}", layout.len(), suite.name());

        Ok(KeyBlock {
            cipher_suite: suite,
            client,
            server,
            max_fragment_length: self.max_fragment_length,
        })
    }

    /// Compute Finished verify data over the transcript so far.
    ///
    /// Call this before the Finished message being produced or checked is
    /// added to the transcript.
    pub fn finished_verify_data(
        &mut self,
        provider: &dyn CryptoProvider,
        side: Side,
    ) -> Result<[u8; VERIFY_DATA_LEN]> {
        let suite = self.require_suite()?;
        let handshake_hash = self.transcript.hash(provider, suite.prf_hash())?;
        let master_secret = self.derive_master_secret(provider)?;

        let output = prf(
            provider,
            suite.prf_hash(),
            master_secret,
            side.finished_label(),
            &handshake_hash,
            VERIFY_DATA_LEN,
        )?;

        let mut verify_data = [0u8; VERIFY_DATA_LEN];
        verify_data.copy_from_slice(&output);
        Ok(verify_data)
    }

    /// Check a peer's Finished verify data in constant time.
    pub fn verify_finished(
        &mut self,
        provider: &dyn CryptoProvider,
        side: Side,
        received: &[u8],
    ) -> Result<()> {
        let expected = self.finished_verify_data(provider, side)?;
        if bool::from(expected.as_slice().ct_eq(received)) {
            Ok(())
        } else {
            tracing::debug!("{:?} Finished verify data mismatch", side);
            Err(Error::HandshakeFailure(
                "Finished verify data mismatch".into(),
            ))
        }
    }
}
