//! Error types for VTLS core.

use core::fmt;

/// Result type for VTLS operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Errors that can occur in the record layer, key schedule and trust store.
///
/// None of these are retried by this crate. A connection that sees any of
/// them is torn down by its owner with the alert returned by [`Error::alert`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An operation was called before its required state was set up
    /// (cipher suite, randoms, pre-master secret, keys), or a sequence
    /// number space was exhausted.
    InvalidState(String),

    /// Record MAC, AEAD tag, CBC padding or ciphertext length check failed.
    ///
    /// Deliberately carries no detail about which check failed.
    RecordAuthenticationFailed,

    /// Record or plaintext exceeds the permitted size.
    RecordOverflow,

    /// Handshake failure (e.g. Finished verify data mismatch)
    HandshakeFailure(String),

    /// Certificate DER could not be decoded
    CertificateParse(String),

    /// Trust anchor bundle could not be inflated or is truncated
    InvalidBundle(String),

    /// Invalid configuration
    InvalidConfig(String),

    /// Invalid message format
    InvalidMessage(String),

    /// Cryptographic backend error
    CryptoError(String),

    /// Unsupported feature
    UnsupportedFeature(String),
}

impl Error {
    /// The alert a connection should send when it fails with this error.
    pub const fn alert(&self) -> AlertDescription {
        match self {
            Error::RecordAuthenticationFailed => AlertDescription::BadRecordMac,
            Error::RecordOverflow => AlertDescription::RecordOverflow,
            Error::HandshakeFailure(_) => AlertDescription::DecryptError,
            Error::CertificateParse(_) => AlertDescription::BadCertificate,
            Error::InvalidMessage(_) => AlertDescription::DecodeError,
            Error::InvalidConfig(_) | Error::UnsupportedFeature(_) => {
                AlertDescription::HandshakeFailure
            },
            Error::InvalidState(_) | Error::InvalidBundle(_) | Error::CryptoError(_) => {
                AlertDescription::InternalError
            },
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            Error::RecordAuthenticationFailed => write!(f, "Record authentication failed"),
            Error::RecordOverflow => write!(f, "Record overflow"),
            Error::HandshakeFailure(msg) => write!(f, "Handshake failure: {}", msg),
            Error::CertificateParse(msg) => write!(f, "Certificate parse error: {}", msg),
            Error::InvalidBundle(msg) => write!(f, "Invalid trust anchor bundle: {}", msg),
            Error::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::InvalidMessage(msg) => write!(f, "Invalid message: {}", msg),
            Error::CryptoError(msg) => write!(f, "Cryptographic error: {}", msg),
            Error::UnsupportedFeature(msg) => write!(f, "Unsupported feature: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

impl From<vtls_crypto::Error> for Error {
    fn from(e: vtls_crypto::Error) -> Self {
        Error::CryptoError(e.to_string())
    }
}

/// TLS alert descriptions (RFC 5246 Section 7.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AlertDescription {
    /// Close notify
    CloseNotify = 0,

    /// Unexpected message
    UnexpectedMessage = 10,

    /// Bad record MAC
    BadRecordMac = 20,

    /// Record overflow
    RecordOverflow = 22,

    /// Handshake failure
    HandshakeFailure = 40,

    /// Bad certificate
    BadCertificate = 42,

    /// Unsupported certificate
    UnsupportedCertificate = 43,

    /// Unknown CA
    UnknownCa = 48,

    /// Decode error
    DecodeError = 50,

    /// Decrypt error
    DecryptError = 51,

    /// Internal error
    InternalError = 80,

    /// User canceled
    UserCanceled = 90,
}

impl AlertDescription {
    /// Convert from wire format (u8).
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(AlertDescription::CloseNotify),
            10 => Some(AlertDescription::UnexpectedMessage),
            20 => Some(AlertDescription::BadRecordMac),
            22 => Some(AlertDescription::RecordOverflow),
            40 => Some(AlertDescription::HandshakeFailure),
            42 => Some(AlertDescription::BadCertificate),
            43 => Some(AlertDescription::UnsupportedCertificate),
            48 => Some(AlertDescription::UnknownCa),
            50 => Some(AlertDescription::DecodeError),
            51 => Some(AlertDescription::DecryptError),
            80 => Some(AlertDescription::InternalError),
            90 => Some(AlertDescription::UserCanceled),
            _ => None,
        }
    }

    /// Convert to wire format (u8).
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Check if this alert is fatal.
    pub const fn is_fatal(self) -> bool {
        !matches!(
            self,
            AlertDescription::CloseNotify | AlertDescription::UserCanceled
        )
    }
}
