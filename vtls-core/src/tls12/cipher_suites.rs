//! TLS 1.2 Cipher Suite Definitions
//!
//! Each supported suite maps to a fixed parameter row:
//!
//! | parameter      | values                                   |
//! |----------------|------------------------------------------|
//! | `mac_key_len`  | 0 (AEAD), 20 (HMAC-SHA1), 32 (HMAC-SHA256) |
//! | `enc_key_len`  | 16 (AES-128), 32 (AES-256)               |
//! | `fixed_iv_len` | 0 (CBC), 4 (GCM implicit IV)             |
//! | `prf_hash`     | SHA-256, SHA-384 for AES-256-GCM only    |
//!
//! Format: TLS_{KeyExchange}_{Authentication}_WITH_{Encryption}_{Hash}

use crate::error::{Error, Result};
use vtls_crypto::{AeadAlgorithm, CbcAlgorithm, HashAlgorithm};

/// TLS 1.2 Cipher Suite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum CipherSuite {
    // Static RSA key transport
    /// TLS_RSA_WITH_AES_128_CBC_SHA (0x002F) - RFC 5246
    RsaWithAes128CbcSha = 0x002F,

    /// TLS_RSA_WITH_AES_256_CBC_SHA (0x0035) - RFC 5246
    RsaWithAes256CbcSha = 0x0035,

    /// TLS_RSA_WITH_AES_128_CBC_SHA256 (0x003C) - RFC 5246
    RsaWithAes128CbcSha256 = 0x003C,

    /// TLS_RSA_WITH_AES_256_CBC_SHA256 (0x003D) - RFC 5246
    RsaWithAes256CbcSha256 = 0x003D,

    /// TLS_RSA_WITH_AES_128_GCM_SHA256 (0x009C) - RFC 5288
    RsaWithAes128GcmSha256 = 0x009C,

    // ECDHE-ECDSA
    /// TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA (0xC009) - RFC 4492
    EcdheEcdsaWithAes128CbcSha = 0xC009,

    /// TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA (0xC00A) - RFC 4492
    EcdheEcdsaWithAes256CbcSha = 0xC00A,

    /// TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256 (0xC023) - RFC 5289
    EcdheEcdsaWithAes128CbcSha256 = 0xC023,

    /// TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256 (0xC02B) - RFC 5289
    EcdheEcdsaWithAes128GcmSha256 = 0xC02B,

    /// TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384 (0xC02C) - RFC 5289
    EcdheEcdsaWithAes256GcmSha384 = 0xC02C,

    // ECDHE-RSA
    /// TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA (0xC013) - RFC 4492
    EcdheRsaWithAes128CbcSha = 0xC013,

    /// TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA (0xC014) - RFC 4492
    EcdheRsaWithAes256CbcSha = 0xC014,

    /// TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256 (0xC027) - RFC 5289
    EcdheRsaWithAes128CbcSha256 = 0xC027,

    /// TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256 (0xC02F) - RFC 5289
    EcdheRsaWithAes128GcmSha256 = 0xC02F,

    /// TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384 (0xC030) - RFC 5289
    EcdheRsaWithAes256GcmSha384 = 0xC030,
}

/// Key exchange family of a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyExchange {
    /// RSA key transport of the pre-master secret
    Rsa,
    /// Ephemeral ECDH signed with RSA
    EcdheRsa,
    /// Ephemeral ECDH signed with ECDSA
    EcdheEcdsa,
}

/// Bulk encryption of a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BulkCipher {
    /// Block cipher with MAC-then-encrypt
    Cbc(CbcAlgorithm),
    /// AEAD cipher with a 4-byte implicit and 8-byte explicit nonce
    Aead(AeadAlgorithm),
}

/// Record MAC algorithm of a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MacAlgorithm {
    /// Integrity comes from the AEAD tag; no MAC key
    Aead,
    /// HMAC-SHA1, 20-byte key and tag
    HmacSha1,
    /// HMAC-SHA256, 32-byte key and tag
    HmacSha256,
}

impl MacAlgorithm {
    /// MAC key (and tag) length in bytes.
    pub const fn key_len(self) -> usize {
        match self {
            MacAlgorithm::Aead => 0,
            MacAlgorithm::HmacSha1 => 20,
            MacAlgorithm::HmacSha256 => 32,
        }
    }

    /// The HMAC hash, or `None` for AEAD suites.
    pub const fn hash_algorithm(self) -> Option<HashAlgorithm> {
        match self {
            MacAlgorithm::Aead => None,
            MacAlgorithm::HmacSha1 => Some(HashAlgorithm::Sha1),
            MacAlgorithm::HmacSha256 => Some(HashAlgorithm::Sha256),
        }
    }

    /// Select the MAC from a key length.
    ///
    /// Only the lengths of the supported MACs are accepted; anything else is
    /// rejected rather than mapped to a default hash.
    pub fn from_key_len(len: usize) -> Result<Self> {
        match len {
            0 => Ok(MacAlgorithm::Aead),
            20 => Ok(MacAlgorithm::HmacSha1),
            32 => Ok(MacAlgorithm::HmacSha256),
            other => Err(Error::UnsupportedFeature(format!(
                "No record MAC with a {}-byte key",
                other
            ))),
        }
    }
}

/// Fixed key-material parameters of a cipher suite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuiteParams {
    /// MAC key length (0 for AEAD)
    pub mac_key_len: usize,
    /// Bulk cipher key length
    pub enc_key_len: usize,
    /// Implicit IV length (0 for CBC, 4 for GCM)
    pub fixed_iv_len: usize,
    /// PRF hash
    pub prf_hash: HashAlgorithm,
}

impl SuiteParams {
    /// Key block length: 2 * (mac_key_len + enc_key_len + fixed_iv_len).
    pub const fn key_block_len(&self) -> usize {
        2 * (self.mac_key_len + self.enc_key_len + self.fixed_iv_len)
    }
}

impl CipherSuite {
    /// Every supported suite, in default preference order.
    pub const ALL: [CipherSuite; 15] = [
        CipherSuite::EcdheEcdsaWithAes128GcmSha256,
        CipherSuite::EcdheRsaWithAes128GcmSha256,
        CipherSuite::EcdheEcdsaWithAes256GcmSha384,
        CipherSuite::EcdheRsaWithAes256GcmSha384,
        CipherSuite::EcdheEcdsaWithAes128CbcSha256,
        CipherSuite::EcdheRsaWithAes128CbcSha256,
        CipherSuite::EcdheEcdsaWithAes128CbcSha,
        CipherSuite::EcdheRsaWithAes128CbcSha,
        CipherSuite::EcdheEcdsaWithAes256CbcSha,
        CipherSuite::EcdheRsaWithAes256CbcSha,
        CipherSuite::RsaWithAes128GcmSha256,
        CipherSuite::RsaWithAes128CbcSha256,
        CipherSuite::RsaWithAes256CbcSha256,
        CipherSuite::RsaWithAes128CbcSha,
        CipherSuite::RsaWithAes256CbcSha,
    ];

    /// Create from wire format (u16 big-endian).
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x002F => Some(CipherSuite::RsaWithAes128CbcSha),
            0x0035 => Some(CipherSuite::RsaWithAes256CbcSha),
            0x003C => Some(CipherSuite::RsaWithAes128CbcSha256),
            0x003D => Some(CipherSuite::RsaWithAes256CbcSha256),
            0x009C => Some(CipherSuite::RsaWithAes128GcmSha256),
            0xC009 => Some(CipherSuite::EcdheEcdsaWithAes128CbcSha),
            0xC00A => Some(CipherSuite::EcdheEcdsaWithAes256CbcSha),
            0xC013 => Some(CipherSuite::EcdheRsaWithAes128CbcSha),
            0xC014 => Some(CipherSuite::EcdheRsaWithAes256CbcSha),
            0xC023 => Some(CipherSuite::EcdheEcdsaWithAes128CbcSha256),
            0xC027 => Some(CipherSuite::EcdheRsaWithAes128CbcSha256),
            0xC02B => Some(CipherSuite::EcdheEcdsaWithAes128GcmSha256),
            0xC02C => Some(CipherSuite::EcdheEcdsaWithAes256GcmSha384),
            0xC02F => Some(CipherSuite::EcdheRsaWithAes128GcmSha256),
            0xC030 => Some(CipherSuite::EcdheRsaWithAes256GcmSha384),
            _ => None,
        }
    }

    /// Create from wire format, failing on unknown codes.
    pub fn try_from_u16(value: u16) -> Result<Self> {
        Self::from_u16(value).ok_or_else(|| {
            Error::UnsupportedFeature(format!("Unknown cipher suite 0x{:04X}", value))
        })
    }

    /// Convert to wire format (u16 big-endian).
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Get the key exchange family for this cipher suite.
    pub const fn key_exchange(self) -> KeyExchange {
        match self {
            CipherSuite::RsaWithAes128CbcSha
            | CipherSuite::RsaWithAes256CbcSha
            | CipherSuite::RsaWithAes128CbcSha256
            | CipherSuite::RsaWithAes256CbcSha256
            | CipherSuite::RsaWithAes128GcmSha256 => KeyExchange::Rsa,
            CipherSuite::EcdheEcdsaWithAes128CbcSha
            | CipherSuite::EcdheEcdsaWithAes256CbcSha
            | CipherSuite::EcdheEcdsaWithAes128CbcSha256
            | CipherSuite::EcdheEcdsaWithAes128GcmSha256
            | CipherSuite::EcdheEcdsaWithAes256GcmSha384 => KeyExchange::EcdheEcdsa,
            CipherSuite::EcdheRsaWithAes128CbcSha
            | CipherSuite::EcdheRsaWithAes256CbcSha
            | CipherSuite::EcdheRsaWithAes128CbcSha256
            | CipherSuite::EcdheRsaWithAes128GcmSha256
            | CipherSuite::EcdheRsaWithAes256GcmSha384 => KeyExchange::EcdheRsa,
        }
    }

    /// Get the bulk cipher for this cipher suite.
    pub const fn bulk_cipher(self) -> BulkCipher {
        match self {
            CipherSuite::RsaWithAes128CbcSha
            | CipherSuite::RsaWithAes128CbcSha256
            | CipherSuite::EcdheEcdsaWithAes128CbcSha
            | CipherSuite::EcdheEcdsaWithAes128CbcSha256
            | CipherSuite::EcdheRsaWithAes128CbcSha
            | CipherSuite::EcdheRsaWithAes128CbcSha256 => BulkCipher::Cbc(CbcAlgorithm::Aes128Cbc),
            CipherSuite::RsaWithAes256CbcSha
            | CipherSuite::RsaWithAes256CbcSha256
            | CipherSuite::EcdheEcdsaWithAes256CbcSha
            | CipherSuite::EcdheRsaWithAes256CbcSha => BulkCipher::Cbc(CbcAlgorithm::Aes256Cbc),
            CipherSuite::RsaWithAes128GcmSha256
            | CipherSuite::EcdheEcdsaWithAes128GcmSha256
            | CipherSuite::EcdheRsaWithAes128GcmSha256 => BulkCipher::Aead(AeadAlgorithm::Aes128Gcm),
            CipherSuite::EcdheEcdsaWithAes256GcmSha384
            | CipherSuite::EcdheRsaWithAes256GcmSha384 => BulkCipher::Aead(AeadAlgorithm::Aes256Gcm),
        }
    }

    /// Get the record MAC algorithm for this cipher suite.
    pub const fn mac_algorithm(self) -> MacAlgorithm {
        match self {
            CipherSuite::RsaWithAes128CbcSha
            | CipherSuite::RsaWithAes256CbcSha
            | CipherSuite::EcdheEcdsaWithAes128CbcSha
            | CipherSuite::EcdheEcdsaWithAes256CbcSha
            | CipherSuite::EcdheRsaWithAes128CbcSha
            | CipherSuite::EcdheRsaWithAes256CbcSha => MacAlgorithm::HmacSha1,
            CipherSuite::RsaWithAes128CbcSha256
            | CipherSuite::RsaWithAes256CbcSha256
            | CipherSuite::EcdheEcdsaWithAes128CbcSha256
            | CipherSuite::EcdheRsaWithAes128CbcSha256 => MacAlgorithm::HmacSha256,
            CipherSuite::RsaWithAes128GcmSha256
            | CipherSuite::EcdheEcdsaWithAes128GcmSha256
            | CipherSuite::EcdheEcdsaWithAes256GcmSha384
            | CipherSuite::EcdheRsaWithAes128GcmSha256
            | CipherSuite::EcdheRsaWithAes256GcmSha384 => MacAlgorithm::Aead,
        }
    }

    /// Get the hash/PRF algorithm for this cipher suite.
    ///
    /// SHA-384 for the two AES-256-GCM suites, SHA-256 for everything else
    /// (RFC 5246 Section 5 default).
    pub const fn prf_hash(self) -> HashAlgorithm {
        match self {
            CipherSuite::EcdheEcdsaWithAes256GcmSha384
            | CipherSuite::EcdheRsaWithAes256GcmSha384 => HashAlgorithm::Sha384,
            _ => HashAlgorithm::Sha256,
        }
    }

    /// Check whether records are protected with an AEAD cipher.
    pub const fn is_aead(self) -> bool {
        matches!(self.bulk_cipher(), BulkCipher::Aead(_))
    }

    /// Get the fixed key-material parameters.
    pub const fn params(self) -> SuiteParams {
        let (enc_key_len, fixed_iv_len) = match self.bulk_cipher() {
            BulkCipher::Cbc(alg) => (alg.key_size(), 0),
            BulkCipher::Aead(alg) => (alg.key_size(), 4),
        };
        SuiteParams {
            mac_key_len: self.mac_algorithm().key_len(),
            enc_key_len,
            fixed_iv_len,
            prf_hash: self.prf_hash(),
        }
    }

    /// Get the key block length required for this cipher suite.
    pub const fn key_block_len(self) -> usize {
        self.params().key_block_len()
    }

    /// Get cipher suite name as a string.
    pub const fn name(self) -> &'static str {
        match self {
            CipherSuite::RsaWithAes128CbcSha => "TLS_RSA_WITH_AES_128_CBC_SHA",
            CipherSuite::RsaWithAes256CbcSha => "TLS_RSA_WITH_AES_256_CBC_SHA",
            CipherSuite::RsaWithAes128CbcSha256 => "TLS_RSA_WITH_AES_128_CBC_SHA256",
            CipherSuite::RsaWithAes256CbcSha256 => "TLS_RSA_WITH_AES_256_CBC_SHA256",
            CipherSuite::RsaWithAes128GcmSha256 => "TLS_RSA_WITH_AES_128_GCM_SHA256",
            CipherSuite::EcdheEcdsaWithAes128CbcSha => "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA",
            CipherSuite::EcdheEcdsaWithAes256CbcSha => "TLS_ECDHE_ECDSA_WITH_AES_256_CBC_SHA",
            CipherSuite::EcdheEcdsaWithAes128CbcSha256 => {
                "TLS_ECDHE_ECDSA_WITH_AES_128_CBC_SHA256"
            },
            CipherSuite::EcdheEcdsaWithAes128GcmSha256 => {
                "TLS_ECDHE_ECDSA_WITH_AES_128_GCM_SHA256"
            },
            CipherSuite::EcdheEcdsaWithAes256GcmSha384 => {
                "TLS_ECDHE_ECDSA_WITH_AES_256_GCM_SHA384"
            },
            CipherSuite::EcdheRsaWithAes128CbcSha => "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA",
            CipherSuite::EcdheRsaWithAes256CbcSha => "TLS_ECDHE_RSA_WITH_AES_256_CBC_SHA",
            CipherSuite::EcdheRsaWithAes128CbcSha256 => "TLS_ECDHE_RSA_WITH_AES_128_CBC_SHA256",
            CipherSuite::EcdheRsaWithAes128GcmSha256 => "TLS_ECDHE_RSA_WITH_AES_128_GCM_SHA256",
            CipherSuite::EcdheRsaWithAes256GcmSha384 => "TLS_ECDHE_RSA_WITH_AES_256_GCM_SHA384",
        }
    }
}

/// Default cipher suite preference list: forward-secret AEAD first,
/// static RSA last.
pub fn default_cipher_suites() -> Vec<CipherSuite> {
    CipherSuite::ALL.to_vec()
}
