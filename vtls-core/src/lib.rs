//! # VTLS Core
//!
//! Cryptographic core of a TLS 1.2 client.
//!
//! This crate provides the pieces a connection driver needs once the
//! handshake messages themselves are parsed:
//! - Record protection (AES-CBC + HMAC, AES-GCM)
//! - The TLS 1.2 key schedule (PRF, master secret, key block, Finished)
//! - A trust anchor store for pinned root keys
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │      connection driver (caller)         │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │         vtls-core (this crate)          │
//! │  ┌──────────────────────────────────┐   │
//! │  │   KeySchedule / Transcript       │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   RecordProtector                │   │
//! │  ├──────────────────────────────────┤   │
//! │  │   TrustAnchorStore               │   │
//! │  └──────────────────────────────────┘   │
//! └─────────────────┬───────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────┐
//! │      vtls-crypto (trait interface)      │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use vtls_core::{Config, ContentType, KeySchedule, Side};
//!
//! let config = Config::builder().build()?;
//! let mut schedule = KeySchedule::with_config(&config);
//! // ... feed suite, randoms, pre-master secret and handshake messages ...
//! let (mut client_write, mut server_write) =
//!     schedule.derive_key_block(&provider)?.into_protectors()?;
//! let fragment = client_write.encrypt(&provider, ContentType::ApplicationData, b"GET /")?;
//! ```

#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub,
    unused_qualifications
)]
#![forbid(unsafe_code)]

// Re-export crypto interface
pub use vtls_crypto;

pub mod alert;
pub mod der;
pub mod error;
pub mod protocol;
pub mod tls12;
pub mod transcript;
pub mod trust_store;
pub mod x509_simple;

// Re-exports
pub use alert::{Alert, AlertLevel};
pub use error::{AlertDescription, Error, Result};
pub use protocol::{ContentType, ProtocolVersion, RecordHeader};
pub use tls12::{
    default_cipher_suites, CipherSuite, ConnectionKeys, KeyBlock, KeySchedule, RecordProtector,
    Side,
};
pub use transcript::Transcript;
pub use trust_store::{TrustAnchor, TrustAnchorStore};
pub use x509_simple::{Certificate, KeyType, NamedCurve, PublicKey};

use protocol::MAX_PLAINTEXT_LEN;
use tls12::record::MIN_FRAGMENT_LEN;

/// Where a [`TrustAnchorStore`] built from a [`Config`] gets its anchors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TrustAnchorSource {
    /// The built-in bundle
    #[default]
    Default,
    /// No anchors
    Empty,
    /// The built-in bundle plus anchors in the supplementary text format
    DefaultWithSupplementary(String),
    /// Only anchors in the supplementary text format
    Supplementary(String),
}

/// Connection configuration.
///
/// # Example
///
/// ```rust
/// use vtls_core::{CipherSuite, Config};
///
/// let config = Config::builder()
///     .with_cipher_suites(&[CipherSuite::EcdheRsaWithAes128GcmSha256])
///     .with_extended_master_secret_required(true)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Cipher suites the key schedule accepts, in preference order
    pub cipher_suites: Vec<CipherSuite>,

    /// Maximum plaintext fragment length (default: 16384)
    pub max_fragment_length: u16,

    /// Refuse to derive a classic (non-extended) master secret
    pub require_extended_master_secret: bool,

    /// Trust anchors for [`Config::build_trust_store`]
    pub trust_anchors: TrustAnchorSource,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cipher_suites: default_cipher_suites(),
            max_fragment_length: MAX_PLAINTEXT_LEN as u16,
            require_extended_master_secret: false,
            trust_anchors: TrustAnchorSource::Default,
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Build the trust anchor store this configuration describes.
    pub fn build_trust_store(&self) -> Result<TrustAnchorStore> {
        match &self.trust_anchors {
            TrustAnchorSource::Default => TrustAnchorStore::build_default(),
            TrustAnchorSource::Empty => Ok(TrustAnchorStore::new()),
            TrustAnchorSource::DefaultWithSupplementary(text) => {
                let mut store = TrustAnchorStore::build_default()?;
                store.load_supplementary(text);
                Ok(store)
            },
            TrustAnchorSource::Supplementary(text) => {
                let mut store = TrustAnchorStore::new();
                store.load_supplementary(text);
                Ok(store)
            },
        }
    }
}

/// Configuration builder.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the accepted cipher suites.
    pub fn with_cipher_suites(mut self, suites: &[CipherSuite]) -> Self {
        self.config.cipher_suites = suites.to_vec();
        self
    }

    /// Set maximum fragment length.
    pub fn with_max_fragment_length(mut self, length: u16) -> Self {
        self.config.max_fragment_length = length;
        self
    }

    /// Require the extended master secret (RFC 7627).
    pub fn with_extended_master_secret_required(mut self, required: bool) -> Self {
        self.config.require_extended_master_secret = required;
        self
    }

    /// Set where trust anchors come from.
    pub fn with_trust_anchors(mut self, source: TrustAnchorSource) -> Self {
        self.config.trust_anchors = source;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> Result<Config> {
        if self.config.cipher_suites.is_empty() {
            return Err(Error::InvalidConfig("No cipher suites specified".into()));
        }

        let length = self.config.max_fragment_length as usize;
        if !(MIN_FRAGMENT_LEN..=MAX_PLAINTEXT_LEN).contains(&length) {
            return Err(Error::InvalidConfig(format!(
                "Max fragment length {} outside {}..={}",
                length, MIN_FRAGMENT_LEN, MAX_PLAINTEXT_LEN
            )));
        }

        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cipher_suites.len(), 15);
        assert_eq!(config.max_fragment_length, 16384);
        assert!(!config.require_extended_master_secret);
        assert_eq!(config.trust_anchors, TrustAnchorSource::Default);
    }

    #[test]
    fn test_config_builder() {
        let config = Config::builder()
            .with_cipher_suites(&[
                CipherSuite::EcdheEcdsaWithAes256GcmSha384,
                CipherSuite::EcdheRsaWithAes128CbcSha,
            ])
            .with_max_fragment_length(4096)
            .with_extended_master_secret_required(true)
            .with_trust_anchors(TrustAnchorSource::Empty)
            .build()
            .unwrap();

        assert_eq!(config.cipher_suites.len(), 2);
        assert_eq!(config.max_fragment_length, 4096);
        assert!(config.require_extended_master_secret);
        assert!(config.build_trust_store().unwrap().is_empty());
    }

    #[test]
    fn test_config_validation() {
        let result = Config::builder().with_cipher_suites(&[]).build();
        assert!(matches!(result, Err(Error::InvalidConfig(_))));

        let result = Config::builder().with_max_fragment_length(20000).build();
        assert!(result.is_err());

        let result = Config::builder().with_max_fragment_length(511).build();
        assert!(result.is_err());

        assert!(Config::builder().with_max_fragment_length(512).build().is_ok());
    }

    #[test]
    fn test_supplementary_only_store() {
        let config = Config::builder()
            .with_trust_anchors(TrustAnchorSource::Supplementary(
                "# nothing usable\nLabel\nnot-base64!\n".into(),
            ))
            .build()
            .unwrap();
        assert!(config.build_trust_store().unwrap().is_empty());
    }
}
