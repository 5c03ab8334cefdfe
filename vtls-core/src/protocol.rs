//! TLS 1.2 protocol constants, types and the record header codec.

use bytes::{Buf, BufMut};

use crate::error::{Error, Result};

/// Length of a TLS record header in bytes.
pub const RECORD_HEADER_LEN: usize = 5;

/// Maximum TLSPlaintext fragment length (2^14).
pub const MAX_PLAINTEXT_LEN: usize = 16384;

/// Maximum TLSCiphertext fragment length (2^14 + 2048).
pub const MAX_CIPHERTEXT_LEN: usize = MAX_PLAINTEXT_LEN + 2048;

/// TLS protocol version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum ProtocolVersion {
    /// TLS 1.0 (RFC 2246), only seen as a legacy record-layer version
    Tls10 = 0x0301,

    /// TLS 1.1 (RFC 4346), only seen as a legacy record-layer version
    Tls11 = 0x0302,

    /// TLS 1.2 (RFC 5246)
    Tls12 = 0x0303,
}

impl ProtocolVersion {
    /// Create from wire format (u16 big-endian).
    pub const fn from_u16(value: u16) -> Option<Self> {
        match value {
            0x0301 => Some(ProtocolVersion::Tls10),
            0x0302 => Some(ProtocolVersion::Tls11),
            0x0303 => Some(ProtocolVersion::Tls12),
            _ => None,
        }
    }

    /// Convert to wire format (u16 big-endian).
    pub const fn to_u16(self) -> u16 {
        self as u16
    }

    /// Get the protocol name.
    pub const fn name(self) -> &'static str {
        match self {
            ProtocolVersion::Tls10 => "TLS 1.0",
            ProtocolVersion::Tls11 => "TLS 1.1",
            ProtocolVersion::Tls12 => "TLS 1.2",
        }
    }
}

/// TLS content type (RFC 5246 Section 6.2.1).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ContentType {
    /// Change cipher spec (20)
    ChangeCipherSpec = 20,

    /// Alert (21)
    Alert = 21,

    /// Handshake (22)
    Handshake = 22,

    /// Application data (23)
    ApplicationData = 23,

    /// Heartbeat (24) - RFC 6520
    Heartbeat = 24,
}

impl ContentType {
    /// Create from wire format (u8).
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            20 => Some(ContentType::ChangeCipherSpec),
            21 => Some(ContentType::Alert),
            22 => Some(ContentType::Handshake),
            23 => Some(ContentType::ApplicationData),
            24 => Some(ContentType::Heartbeat),
            _ => None,
        }
    }

    /// Convert to wire format (u8).
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// TLS 1.2 handshake message type (RFC 5246 Section 7.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum HandshakeType {
    /// HelloRequest (0)
    HelloRequest = 0,

    /// ClientHello (1)
    ClientHello = 1,

    /// ServerHello (2)
    ServerHello = 2,

    /// Certificate (11)
    Certificate = 11,

    /// ServerKeyExchange (12)
    ServerKeyExchange = 12,

    /// CertificateRequest (13)
    CertificateRequest = 13,

    /// ServerHelloDone (14)
    ServerHelloDone = 14,

    /// CertificateVerify (15)
    CertificateVerify = 15,

    /// ClientKeyExchange (16)
    ClientKeyExchange = 16,

    /// Finished (20)
    Finished = 20,
}

impl HandshakeType {
    /// Create from wire format (u8).
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(HandshakeType::HelloRequest),
            1 => Some(HandshakeType::ClientHello),
            2 => Some(HandshakeType::ServerHello),
            11 => Some(HandshakeType::Certificate),
            12 => Some(HandshakeType::ServerKeyExchange),
            13 => Some(HandshakeType::CertificateRequest),
            14 => Some(HandshakeType::ServerHelloDone),
            15 => Some(HandshakeType::CertificateVerify),
            16 => Some(HandshakeType::ClientKeyExchange),
            20 => Some(HandshakeType::Finished),
            _ => None,
        }
    }

    /// Convert to wire format (u8).
    pub const fn to_u8(self) -> u8 {
        self as u8
    }
}

/// TLS record header.
///
/// ```text
/// struct {
///     ContentType type;
///     ProtocolVersion version;
///     uint16 length;
/// } RecordHeader;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// Content type of the fragment
    pub content_type: ContentType,
    /// Record-layer protocol version
    pub version: ProtocolVersion,
    /// Fragment length in bytes
    pub length: u16,
}

impl RecordHeader {
    /// Create a TLS 1.2 header for a fragment of `length` bytes.
    pub fn new(content_type: ContentType, length: usize) -> Result<Self> {
        if length > MAX_CIPHERTEXT_LEN {
            return Err(Error::RecordOverflow);
        }
        Ok(Self {
            content_type,
            version: ProtocolVersion::Tls12,
            length: length as u16,
        })
    }

    /// Append the 5-byte encoding to `buf`.
    pub fn encode<B: BufMut>(&self, buf: &mut B) {
        buf.put_u8(self.content_type.to_u8());
        buf.put_u16(self.version.to_u16());
        buf.put_u16(self.length);
    }

    /// Decode a header from the front of `data`.
    ///
    /// Fails with `RecordOverflow` when the advertised length exceeds
    /// 2^14 + 2048, before any of the fragment is read.
    pub fn decode(mut data: &[u8]) -> Result<Self> {
        if data.len() < RECORD_HEADER_LEN {
            return Err(Error::InvalidMessage("Record header too short".into()));
        }

        let content_type = ContentType::from_u8(data.get_u8())
            .ok_or_else(|| Error::InvalidMessage("Unknown record content type".into()))?;
        let version = ProtocolVersion::from_u16(data.get_u16())
            .ok_or_else(|| Error::InvalidMessage("Unknown record version".into()))?;
        let length = data.get_u16();

        if length as usize > MAX_CIPHERTEXT_LEN {
            return Err(Error::RecordOverflow);
        }

        Ok(Self {
            content_type,
            version,
            length,
        })
    }
}
