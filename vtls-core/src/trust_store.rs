//! Trust anchor store.
//!
//! Anchors are keyed by subject common name. The built-in set ships as a
//! raw-DEFLATE bundle:
//!
//! ```text
//! u16le count
//! count × { u16le length, DER certificate }
//! ```
//!
//! Extra anchors can be loaded from a line-oriented text format:
//!
//! ```text
//! # comment
//! Common Name Label
//! MIIB...base64 DER...
//! ...more base64...
//!
//! Next Label
//! ...
//! ```
//!
//! Blank lines and lines beginning with `#` end an entry; the first line
//! of an entry is the label the anchor is stored under. Other lines are
//! trimmed, so an indented `#` is part of the entry.
//!
//! # Matching
//!
//! [`TrustAnchorStore::contains`] is a pinned-key check, not chain
//! validation: it looks the certificate's subject common name up and
//! compares key type (and, for EC keys, the curve and point). RSA anchors
//! match on key type alone; [`TrustAnchorStore::contains_exact`] also
//! requires the RSA modulus and exponent to be identical.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::sync::OnceLock;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bytes::{Buf, BufMut};
use flate2::read::DeflateDecoder;
use flate2::write::DeflateEncoder;
use flate2::Compression;

use crate::error::{Error, Result};
use crate::x509_simple::{Certificate, PublicKey};

/// Built-in CA bundle.
const DEFAULT_BUNDLE: &[u8] = include_bytes!("../data/ca_bundle.deflate");

static DEFAULT_STORE: OnceLock<TrustAnchorStore> = OnceLock::new();

/// A trusted root: its subject name and public key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustAnchor {
    subject_cn: String,
    public_key: PublicKey,
    der: Vec<u8>,
}

impl TrustAnchor {
    /// Subject common name of the anchor certificate.
    pub fn subject_cn(&self) -> &str {
        &self.subject_cn
    }

    /// Anchor public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The anchor certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

impl From<Certificate> for TrustAnchor {
    fn from(cert: Certificate) -> Self {
        Self {
            subject_cn: cert.subject_cn().to_string(),
            public_key: cert.public_key().clone(),
            der: cert.der().to_vec(),
        }
    }
}

/// Set of trust anchors keyed by common name.
///
/// Last write wins when two anchors share a name.
#[derive(Debug, Clone, Default)]
pub struct TrustAnchorStore {
    anchors: HashMap<String, TrustAnchor>,
}

impl TrustAnchorStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a compressed bundle.
    ///
    /// Certificates that cannot be decoded are skipped; a bundle that cannot
    /// be inflated or is truncated is an error.
    pub fn from_bundle(compressed: &[u8]) -> Result<Self> {
        let entries = decode_bundle(compressed)?;
        let mut store = Self::new();
        let mut skipped = 0usize;

        for der in &entries {
            match Certificate::from_der(der) {
                Ok(cert) => store.add_anchor(cert),
                Err(e) => {
                    skipped += 1;
                    tracing::debug!("Skipping bundle entry: {}", e);
                },
            }
        }

        if skipped > 0 {
            tracing::warn!("Skipped {} undecodable bundle entries", skipped);
        }
        tracing::info!(
            "Loaded {} trust anchors from {} bundle entries",
            store.len(),
            entries.len()
        );
        Ok(store)
    }

    /// Build a fresh store from the built-in bundle.
    pub fn build_default() -> Result<Self> {
        Self::from_bundle(DEFAULT_BUNDLE)
    }

    /// The process-wide built-in store, built on first use.
    ///
    /// If the built-in bundle cannot be read the shared store is empty and
    /// the failure is logged; use [`build_default`](Self::build_default)
    /// to observe the error.
    pub fn default_store() -> &'static TrustAnchorStore {
        DEFAULT_STORE.get_or_init(|| {
            Self::build_default().unwrap_or_else(|e| {
                tracing::error!("Failed to load built-in trust anchors: {}", e);
                Self::new()
            })
        })
    }

    /// Insert an anchor under its subject common name.
    pub fn add_anchor(&mut self, cert: Certificate) {
        let name = cert.subject_cn().to_string();
        self.insert(name, TrustAnchor::from(cert));
    }

    /// Decode and insert a DER certificate.
    pub fn add_der(&mut self, der: &[u8]) -> Result<()> {
        self.add_anchor(Certificate::from_der(der)?);
        Ok(())
    }

    fn insert(&mut self, name: String, anchor: TrustAnchor) {
        if self.anchors.insert(name, anchor).is_some() {
            tracing::trace!("Replaced trust anchor with the same name");
        }
    }

    /// Load anchors from the supplementary text format.
    ///
    /// Returns how many anchors were added. Entries with an undecodable
    /// body are skipped.
    pub fn load_supplementary(&mut self, text: &str) -> usize {
        let mut added = 0;
        let mut label: Option<&str> = None;
        let mut body = String::new();

        for line in text.lines() {
            let is_comment = line.starts_with('#');
            let line = line.trim();
            if line.is_empty() || is_comment {
                added += self.finish_entry(label.take(), &mut body);
            } else if label.is_none() {
                label = Some(line);
            } else {
                body.push_str(line);
            }
        }
        added += self.finish_entry(label.take(), &mut body);

        tracing::info!("Loaded {} supplementary trust anchors", added);
        added
    }

    fn finish_entry(&mut self, label: Option<&str>, body: &mut String) -> usize {
        let body = std::mem::take(body);
        let Some(label) = label else {
            return 0;
        };
        if body.is_empty() {
            tracing::debug!("Supplementary entry {:?} has no body", label);
            return 0;
        }

        let der = match STANDARD.decode(body.as_bytes()) {
            Ok(der) => der,
            Err(e) => {
                tracing::debug!("Supplementary entry {:?} is not base64: {}", label, e);
                return 0;
            },
        };

        match Certificate::from_der(&der) {
            Ok(cert) => {
                self.insert(label.to_string(), TrustAnchor::from(cert));
                1
            },
            Err(e) => {
                tracing::debug!("Supplementary entry {:?} skipped: {}", label, e);
                0
            },
        }
    }

    /// Whether an anchor with the certificate's common name and a matching
    /// key exists.
    ///
    /// EC keys must share curve and point; RSA keys only need to be RSA.
    pub fn contains(&self, cert: &Certificate) -> bool {
        let Some(anchor) = self.anchors.get(cert.subject_cn()) else {
            return false;
        };

        match (&anchor.public_key, cert.public_key()) {
            (PublicKey::Rsa { .. }, PublicKey::Rsa { .. }) => true,
            (anchor_key @ PublicKey::Ec { .. }, cert_key @ PublicKey::Ec { .. }) => {
                anchor_key == cert_key
            },
            _ => false,
        }
    }

    /// Like [`contains`](Self::contains) but also requires identical RSA
    /// keys.
    pub fn contains_exact(&self, cert: &Certificate) -> bool {
        self.anchors
            .get(cert.subject_cn())
            .is_some_and(|anchor| &anchor.public_key == cert.public_key())
    }

    /// Look an anchor up by name.
    pub fn get(&self, name: &str) -> Option<&TrustAnchor> {
        self.anchors.get(name)
    }

    /// Number of anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Whether the store holds no anchors.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Names of every anchor, in no particular order.
    pub fn common_names(&self) -> impl Iterator<Item = &str> {
        self.anchors.keys().map(String::as_str)
    }
}

/// Inflate a bundle and split it into DER certificates.
pub fn decode_bundle(compressed: &[u8]) -> Result<Vec<Vec<u8>>> {
    let mut raw = Vec::new();
    DeflateDecoder::new(compressed)
        .read_to_end(&mut raw)
        .map_err(|e| Error::InvalidBundle(format!("Failed to inflate bundle: {}", e)))?;

    let mut buf = raw.as_slice();
    if buf.remaining() < 2 {
        return Err(Error::InvalidBundle("Missing certificate count".into()));
    }

    let count = buf.get_u16_le() as usize;
    let mut entries = Vec::with_capacity(count);
    for index in 0..count {
        if buf.remaining() < 2 {
            return Err(Error::InvalidBundle(format!(
                "Truncated length of entry {}",
                index
            )));
        }
        let len = buf.get_u16_le() as usize;
        if buf.remaining() < len {
            return Err(Error::InvalidBundle(format!("Truncated entry {}", index)));
        }
        entries.push(buf[..len].to_vec());
        buf.advance(len);
    }

    if buf.has_remaining() {
        tracing::warn!("Ignoring {} trailing bytes after bundle", buf.remaining());
    }

    Ok(entries)
}

/// Serialize and deflate DER certificates into a bundle.
pub fn encode_bundle(ders: &[Vec<u8>]) -> Result<Vec<u8>> {
    let count = u16::try_from(ders.len())
        .map_err(|_| Error::InvalidBundle("Too many certificates for a bundle".into()))?;

    let mut raw = Vec::new();
    raw.put_u16_le(count);
    for der in ders {
        let len = u16::try_from(der.len())
            .map_err(|_| Error::InvalidBundle("Certificate too large for a bundle".into()))?;
        raw.put_u16_le(len);
        raw.put_slice(der);
    }

    let mut encoder = DeflateEncoder::new(Vec::new(), Compression::best());
    encoder
        .write_all(&raw)
        .and_then(|_| encoder.finish())
        .map_err(|e| Error::InvalidBundle(format!("Failed to deflate bundle: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_codec() {
        let ders = vec![vec![0x30, 0x00], vec![0xAB; 300], vec![]];
        let compressed = encode_bundle(&ders).unwrap();
        assert_eq!(decode_bundle(&compressed).unwrap(), ders);
    }

    #[test]
    fn test_truncated_bundle() {
        let mut raw = Vec::new();
        raw.put_u16_le(2);
        raw.put_u16_le(3);
        raw.put_slice(&[1, 2, 3]);
        raw.put_u16_le(10);
        raw.put_slice(&[4, 5]);

        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&raw).unwrap();
        let compressed = encoder.finish().unwrap();

        assert!(matches!(
            decode_bundle(&compressed),
            Err(Error::InvalidBundle(_))
        ));
        assert!(TrustAnchorStore::from_bundle(&compressed).is_err());
    }

    #[test]
    fn test_not_deflate() {
        assert!(matches!(
            decode_bundle(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(Error::InvalidBundle(_))
        ));
    }

    #[test]
    fn test_supplementary_skips_bad_entries() {
        let mut store = TrustAnchorStore::new();
        let text = "# only comments\n\nLabel Without Body\n\nBad\n@@@@\n";
        assert_eq!(store.load_supplementary(text), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_supplementary_comment_must_start_the_line() {
        let body = STANDARD.encode(include_bytes!("../tests/data/ec_root.der"));

        let mut store = TrustAnchorStore::new();
        let text = format!("EC Root\n{}\n# trailing note\n", body);
        assert_eq!(store.load_supplementary(&text), 1);
        assert!(store.get("EC Root").is_some());

        // Indented, so it is folded into the body and spoils the base64
        let mut store = TrustAnchorStore::new();
        let text = format!("EC Root\n{}\n  # trailing note\n", body);
        assert_eq!(store.load_supplementary(&text), 0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_default_store_is_shared() {
        let a = TrustAnchorStore::default_store();
        let b = TrustAnchorStore::default_store();
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_empty());
    }
}
