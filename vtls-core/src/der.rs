//! Minimal DER (Distinguished Encoding Rules) reader.
//!
//! Just enough ASN.1 to walk an X.509 certificate down to its subject name
//! and SubjectPublicKeyInfo (RFC 5280). Every decoding failure is reported
//! as [`Error::CertificateParse`].

use crate::error::{Error, Result};

/// ASN.1 tag values
pub mod tag {
    /// INTEGER
    pub const INTEGER: u8 = 0x02;
    /// BIT STRING
    pub const BIT_STRING: u8 = 0x03;
    /// OCTET STRING
    pub const OCTET_STRING: u8 = 0x04;
    /// NULL
    pub const NULL: u8 = 0x05;
    /// OBJECT IDENTIFIER
    pub const OID: u8 = 0x06;
    /// UTF8String
    pub const UTF8_STRING: u8 = 0x0C;
    /// PrintableString
    pub const PRINTABLE_STRING: u8 = 0x13;
    /// TeletexString (T61String)
    pub const TELETEX_STRING: u8 = 0x14;
    /// IA5String
    pub const IA5_STRING: u8 = 0x16;
    /// BMPString
    pub const BMP_STRING: u8 = 0x1E;
    /// SEQUENCE (constructed)
    pub const SEQUENCE: u8 = 0x30;
    /// SET (constructed)
    pub const SET: u8 = 0x31;

    /// Context-specific constructed tag `[n]`
    pub const fn context(n: u8) -> u8 {
        0xA0 | n
    }
}

fn parse_error(msg: impl Into<String>) -> Error {
    Error::CertificateParse(msg.into())
}

/// DER decoder with position tracking
#[derive(Debug, Clone)]
pub struct DerDecoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DerDecoder<'a> {
    /// Create a new DER decoder
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Check if we've consumed all data
    pub fn is_empty(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Tag of the next element, if any
    pub fn peek_tag(&self) -> Option<u8> {
        self.data.get(self.pos).copied()
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = self
            .peek_tag()
            .ok_or_else(|| parse_error("Unexpected end of DER data"))?;
        self.pos += 1;
        Ok(byte)
    }

    fn read_bytes(&mut self, n: usize) -> Result<&'a [u8]> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.data.len())
            .ok_or_else(|| parse_error("Unexpected end of DER data"))?;
        let bytes = &self.data[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read a DER length field (definite form, at most 4 length bytes).
    fn read_length(&mut self) -> Result<usize> {
        let first_byte = self.read_byte()?;

        if first_byte < 0x80 {
            return Ok(first_byte as usize);
        }

        let num_length_bytes = (first_byte & 0x7f) as usize;
        if num_length_bytes == 0 || num_length_bytes > 4 {
            return Err(parse_error("Invalid DER length encoding"));
        }

        let mut length = 0usize;
        for &byte in self.read_bytes(num_length_bytes)? {
            length = (length << 8) | byte as usize;
        }

        // Shortest form only
        if length < 0x80 {
            return Err(parse_error("Non-minimal DER length"));
        }

        Ok(length)
    }

    /// Read any element, returning its tag and contents
    pub fn read_any(&mut self) -> Result<(u8, &'a [u8])> {
        let tag = self.read_byte()?;
        let length = self.read_length()?;
        Ok((tag, self.read_bytes(length)?))
    }

    /// Read and verify a tag, then return the contents
    pub fn read_tagged(&mut self, expected_tag: u8) -> Result<&'a [u8]> {
        let (tag, contents) = self.read_any()?;
        if tag != expected_tag {
            return Err(parse_error(format!(
                "Invalid DER tag: expected 0x{:02x}, got 0x{:02x}",
                expected_tag, tag
            )));
        }
        Ok(contents)
    }

    /// Read a SEQUENCE and return a decoder for its contents
    pub fn read_sequence(&mut self) -> Result<DerDecoder<'a>> {
        Ok(DerDecoder::new(self.read_tagged(tag::SEQUENCE)?))
    }

    /// Read a SET and return a decoder for its contents
    pub fn read_set(&mut self) -> Result<DerDecoder<'a>> {
        Ok(DerDecoder::new(self.read_tagged(tag::SET)?))
    }

    /// Read an element and discard it
    pub fn skip(&mut self) -> Result<()> {
        self.read_any().map(|_| ())
    }

    /// Read an explicitly tagged `[n]` element if it is next
    pub fn read_optional_explicit(&mut self, n: u8) -> Result<Option<DerDecoder<'a>>> {
        if self.peek_tag() != Some(tag::context(n)) {
            return Ok(None);
        }
        Ok(Some(DerDecoder::new(self.read_tagged(tag::context(n))?)))
    }

    /// Read an INTEGER as unsigned big-endian bytes without the sign octet
    pub fn read_unsigned_integer(&mut self) -> Result<&'a [u8]> {
        let bytes = self.read_tagged(tag::INTEGER)?;
        match bytes {
            [] => Err(parse_error("Empty INTEGER")),
            [0, rest @ ..] if !rest.is_empty() => Ok(rest),
            _ => Ok(bytes),
        }
    }

    /// Read an OBJECT IDENTIFIER, returning its encoded contents
    pub fn read_oid(&mut self) -> Result<&'a [u8]> {
        let bytes = self.read_tagged(tag::OID)?;
        if bytes.is_empty() {
            return Err(parse_error("Empty OID"));
        }
        Ok(bytes)
    }

    /// Read a BIT STRING with no unused bits
    pub fn read_bit_string(&mut self) -> Result<&'a [u8]> {
        match self.read_tagged(tag::BIT_STRING)? {
            [0, rest @ ..] => Ok(rest),
            [] => Err(parse_error("Empty BIT STRING")),
            _ => Err(parse_error("BIT STRING with unused bits not supported")),
        }
    }
}
