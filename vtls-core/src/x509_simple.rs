//! Simplified X.509 certificate decoding.
//!
//! Extracts the two things the trust store keys on: the subject common
//! name and the subject public key. Nothing else in the certificate
//! (validity, extensions, signature) is interpreted.
//!
//! **Note**: This is NOT a complete X.509 parser and does no path
//! validation.
//!
//! ```text
//! Certificate ::= SEQUENCE {
//!     tbsCertificate  SEQUENCE {
//!         version         [0] EXPLICIT INTEGER OPTIONAL,
//!         serialNumber    INTEGER,
//!         signature       AlgorithmIdentifier,
//!         issuer          Name,
//!         validity        Validity,
//!         subject         Name,                  <- common name
//!         subjectPublicKeyInfo SEQUENCE { ... }, <- key
//!         ...
//!     },
//!     ...
//! }
//! ```

use crate::der::{tag, DerDecoder};
use crate::error::{Error, Result};

/// id-at-commonName (2.5.4.3)
const OID_COMMON_NAME: &[u8] = &[0x55, 0x04, 0x03];

/// rsaEncryption (1.2.840.113549.1.1.1)
const OID_RSA_ENCRYPTION: &[u8] = &[0x2A, 0x86, 0x48, 0x86, 0xF7, 0x0D, 0x01, 0x01, 0x01];

/// id-ecPublicKey (1.2.840.10045.2.1)
const OID_EC_PUBLIC_KEY: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x02, 0x01];

/// secp256r1 (1.2.840.10045.3.1.7)
const OID_P256: &[u8] = &[0x2A, 0x86, 0x48, 0xCE, 0x3D, 0x03, 0x01, 0x07];

/// secp384r1 (1.3.132.0.34)
const OID_P384: &[u8] = &[0x2B, 0x81, 0x04, 0x00, 0x22];

/// secp521r1 (1.3.132.0.35)
const OID_P521: &[u8] = &[0x2B, 0x81, 0x04, 0x00, 0x23];

/// Named elliptic curves accepted in anchor keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NamedCurve {
    /// NIST P-256 (secp256r1)
    P256,
    /// NIST P-384 (secp384r1)
    P384,
    /// NIST P-521 (secp521r1)
    P521,
}

impl NamedCurve {
    fn from_oid(oid: &[u8]) -> Option<Self> {
        match oid {
            OID_P256 => Some(NamedCurve::P256),
            OID_P384 => Some(NamedCurve::P384),
            OID_P521 => Some(NamedCurve::P521),
            _ => None,
        }
    }

    /// Length of one affine coordinate in bytes.
    pub const fn coordinate_len(self) -> usize {
        match self {
            NamedCurve::P256 => 32,
            NamedCurve::P384 => 48,
            NamedCurve::P521 => 66,
        }
    }
}

/// Key family, the coarse level `TrustAnchorStore::contains` compares at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyType {
    /// RSA
    Rsa,
    /// Elliptic curve
    Ec,
}

/// Subject public key of a certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublicKey {
    /// RSA key, big-endian without sign octets
    Rsa {
        /// Modulus n
        modulus: Vec<u8>,
        /// Public exponent e
        exponent: Vec<u8>,
    },
    /// EC key from an uncompressed point
    Ec {
        /// Named curve
        curve: NamedCurve,
        /// Affine X coordinate
        x: Vec<u8>,
        /// Affine Y coordinate
        y: Vec<u8>,
    },
}

impl PublicKey {
    /// The key family.
    pub fn key_type(&self) -> KeyType {
        match self {
            PublicKey::Rsa { .. } => KeyType::Rsa,
            PublicKey::Ec { .. } => KeyType::Ec,
        }
    }

    /// Decode a SubjectPublicKeyInfo.
    fn from_spki(mut spki: DerDecoder<'_>) -> Result<Self> {
        let mut algorithm = spki.read_sequence()?;
        let algorithm_oid = algorithm.read_oid()?;
        let key_bits = spki.read_bit_string()?;

        match algorithm_oid {
            OID_RSA_ENCRYPTION => {
                let mut rsa = DerDecoder::new(key_bits).read_sequence()?;
                let modulus = rsa.read_unsigned_integer()?.to_vec();
                let exponent = rsa.read_unsigned_integer()?.to_vec();
                Ok(PublicKey::Rsa { modulus, exponent })
            },
            OID_EC_PUBLIC_KEY => {
                let curve_oid = algorithm.read_oid()?;
                let curve = NamedCurve::from_oid(curve_oid).ok_or_else(|| {
                    Error::CertificateParse("Unsupported elliptic curve".into())
                })?;

                let coordinate_len = curve.coordinate_len();
                match key_bits {
                    [0x04, point @ ..] if point.len() == 2 * coordinate_len => {
                        let (x, y) = point.split_at(coordinate_len);
                        Ok(PublicKey::Ec {
                            curve,
                            x: x.to_vec(),
                            y: y.to_vec(),
                        })
                    },
                    _ => Err(Error::CertificateParse(
                        "EC public key is not an uncompressed point".into(),
                    )),
                }
            },
            _ => Err(Error::CertificateParse(
                "Unsupported public key algorithm in certificate".into(),
            )),
        }
    }
}

/// The parts of a certificate the trust store needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Certificate {
    der: Vec<u8>,
    subject_cn: String,
    public_key: PublicKey,
}

impl Certificate {
    /// Decode a DER certificate.
    pub fn from_der(der: &[u8]) -> Result<Self> {
        let mut outer = DerDecoder::new(der);
        let mut certificate = outer.read_sequence()?;
        if !outer.is_empty() {
            return Err(Error::CertificateParse(
                "Trailing data after certificate".into(),
            ));
        }

        let mut tbs = certificate.read_sequence()?;
        tbs.read_optional_explicit(0)?;
        tbs.read_unsigned_integer()?; // serialNumber
        tbs.skip()?; // signature
        tbs.skip()?; // issuer
        tbs.skip()?; // validity
        let subject = tbs.read_sequence()?;
        let spki = tbs.read_sequence()?;

        let subject_cn = common_name(subject)?.ok_or_else(|| {
            Error::CertificateParse("Certificate subject has no common name".into())
        })?;
        let public_key = PublicKey::from_spki(spki)?;

        Ok(Self {
            der: der.to_vec(),
            subject_cn,
            public_key,
        })
    }

    /// Subject common name.
    pub fn subject_cn(&self) -> &str {
        &self.subject_cn
    }

    /// Subject public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// The encoded certificate.
    pub fn der(&self) -> &[u8] {
        &self.der
    }
}

/// First common name in a Name (SEQUENCE OF RelativeDistinguishedName).
fn common_name(mut name: DerDecoder<'_>) -> Result<Option<String>> {
    while !name.is_empty() {
        let mut rdn = name.read_set()?;
        while !rdn.is_empty() {
            let mut attribute = rdn.read_sequence()?;
            if attribute.read_oid()? == OID_COMMON_NAME {
                let (string_tag, value) = attribute.read_any()?;
                return decode_string(string_tag, value).map(Some);
            }
        }
    }
    Ok(None)
}

fn decode_string(string_tag: u8, value: &[u8]) -> Result<String> {
    match string_tag {
        tag::UTF8_STRING | tag::PRINTABLE_STRING | tag::IA5_STRING => {
            String::from_utf8(value.to_vec())
                .map_err(|_| Error::CertificateParse("Common name is not valid text".into()))
        },
        // Treated as Latin-1, which is what issuers put there in practice
        tag::TELETEX_STRING => Ok(value.iter().map(|&b| b as char).collect()),
        tag::BMP_STRING => {
            if value.len() % 2 != 0 {
                return Err(Error::CertificateParse("Odd-length BMPString".into()));
            }
            let units = value
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]));
            char::decode_utf16(units)
                .collect::<std::result::Result<String, _>>()
                .map_err(|_| Error::CertificateParse("Common name is not valid UTF-16".into()))
        },
        other => Err(Error::CertificateParse(format!(
            "Unsupported string type 0x{:02x} in common name",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_strings() {
        assert_eq!(decode_string(tag::PRINTABLE_STRING, b"Root CA").unwrap(), "Root CA");
        assert_eq!(
            decode_string(tag::UTF8_STRING, "Certum Główny".as_bytes()).unwrap(),
            "Certum Główny"
        );
        assert_eq!(decode_string(tag::TELETEX_STRING, &[0x41, 0xE9]).unwrap(), "Aé");
        assert_eq!(
            decode_string(tag::BMP_STRING, &[0x00, 0x41, 0x00, 0x42]).unwrap(),
            "AB"
        );
        assert!(decode_string(tag::BMP_STRING, &[0x00]).is_err());
        assert!(decode_string(tag::INTEGER, b"1").is_err());
    }

    #[test]
    fn test_common_name_picks_cn_attribute() {
        // SEQUENCE { SET { SEQUENCE { O = "Org" } }, SET { SEQUENCE { CN = "Name" } } }
        let name = [
            0x31, 0x0C, 0x30, 0x0A, 0x06, 0x03, 0x55, 0x04, 0x0A, 0x13, 0x03, b'O', b'r', b'g',
            0x31, 0x0D, 0x30, 0x0B, 0x06, 0x03, 0x55, 0x04, 0x03, 0x0C, 0x04, b'N', b'a', b'm',
            b'e',
        ];
        assert_eq!(
            common_name(DerDecoder::new(&name)).unwrap(),
            Some("Name".to_string())
        );
        assert_eq!(common_name(DerDecoder::new(&name[..14])).unwrap(), None);
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(Certificate::from_der(&[]).is_err());
        assert!(Certificate::from_der(&[0x30, 0x03, 0x02, 0x01, 0x00]).is_err());
        assert!(Certificate::from_der(b"hello world").is_err());
    }

    #[test]
    fn test_curve_lookup() {
        assert_eq!(NamedCurve::from_oid(OID_P384), Some(NamedCurve::P384));
        assert_eq!(NamedCurve::from_oid(OID_RSA_ENCRYPTION), None);
        assert_eq!(NamedCurve::P521.coordinate_len(), 66);
    }
}
