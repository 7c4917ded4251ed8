//! Key types exchanged with the messaging layer.
//!
//! - `PublicKeyFormat`: how a public key travels on the wire
//! - `PeerPublicKey`: a remote party's validated EC public key
//! - `SymmetricKey`: derived AES-256 key material handed back to the caller

use crate::domain::{self, CurveDomain};
use crate::{Error, Result};
use core::fmt;
use der::oid::ObjectIdentifier;
use der::Decode;
use p521::elliptic_curve::subtle::ConstantTimeEq;
use p521::pkcs8::spki::SubjectPublicKeyInfoRef;
use p521::PublicKey;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

/// OID of `id-ecPublicKey` (`1.2.840.10045.2.1`, RFC 5480).
pub const ID_EC_PUBLIC_KEY: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.2.840.10045.2.1");

/// Length of a derived AES-256 key in bytes.
pub const SYMMETRIC_KEY_LEN: usize = 32;

/// Wire encodings for EC public keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PublicKeyFormat {
    /// DER X.509 `SubjectPublicKeyInfo`: named-curve OID plus uncompressed point.
    #[default]
    #[serde(rename = "X.509")]
    X509,
    /// Bare SEC1 uncompressed point (`0x04 || x || y`).
    #[serde(rename = "SEC1-uncompressed")]
    Sec1Uncompressed,
}

impl PublicKeyFormat {
    /// Name of the format as reported to peers.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::X509 => "X.509",
            Self::Sec1Uncompressed => "SEC1-uncompressed",
        }
    }
}

impl fmt::Display for PublicKeyFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum PeerPoint {
    /// SEC1 point at infinity (`0x00`).
    Identity,
    Affine(PublicKey),
}

/// A remote party's EC public key together with its resolved curve domain.
///
/// Construction checks shape, curve and point validity. The identity point is
/// representable so that agreement can reject it explicitly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerPublicKey {
    point: PeerPoint,
    domain: CurveDomain,
}

impl PeerPublicKey {
    /// Parse a bare SEC1 point on secp521r1.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeerKey` if the encoding has the wrong length, is
    /// compressed, or is not a point on the curve.
    pub fn from_sec1_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_point_bytes(bytes, domain::secp521r1())
    }

    /// Parse a DER X.509 `SubjectPublicKeyInfo`.
    ///
    /// The algorithm must be `id-ecPublicKey` and its parameters a named-curve
    /// OID known to the domain provider. Domain parameters are always taken
    /// from the provider, never from the encoding.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPeerKey` for malformed DER, non-EC keys, unknown
    /// or explicit curve parameters, and invalid points.
    pub fn from_der(bytes: &[u8]) -> Result<Self> {
        let spki = SubjectPublicKeyInfoRef::from_der(bytes)
            .map_err(|e| Error::InvalidPeerKey(format!("malformed SubjectPublicKeyInfo: {e}")))?;

        if spki.algorithm.oid != ID_EC_PUBLIC_KEY {
            return Err(Error::InvalidPeerKey(format!(
                "expected an EC public key, got algorithm {}",
                spki.algorithm.oid
            )));
        }

        let curve_oid = spki
            .algorithm
            .parameters_oid()
            .map_err(|_| Error::InvalidPeerKey("missing named-curve parameters".into()))?;
        let domain = domain::resolve_oid(&curve_oid)
            .map_err(|_| Error::InvalidPeerKey(format!("unsupported curve {curve_oid}")))?;

        let point = spki
            .subject_public_key
            .as_bytes()
            .ok_or_else(|| Error::InvalidPeerKey("public key bit string is not octet aligned".into()))?;

        Self::from_point_bytes(point, domain)
    }

    /// Parse a public key in the given wire format.
    pub fn from_encoded(bytes: &[u8], format: PublicKeyFormat) -> Result<Self> {
        match format {
            PublicKeyFormat::X509 => Self::from_der(bytes),
            PublicKeyFormat::Sec1Uncompressed => Self::from_sec1_bytes(bytes),
        }
    }

    fn from_point_bytes(bytes: &[u8], domain: CurveDomain) -> Result<Self> {
        if bytes == [0x00] {
            return Ok(Self {
                point: PeerPoint::Identity,
                domain,
            });
        }

        if bytes.len() != domain.uncompressed_point_len() {
            return Err(Error::InvalidPeerKey(format!(
                "{} public key must be {} bytes (uncompressed), got {}",
                domain.name(),
                domain.uncompressed_point_len(),
                bytes.len()
            )));
        }

        if bytes[0] != 0x04 {
            return Err(Error::InvalidPeerKey(
                "public key must use uncompressed format (0x04 prefix)".into(),
            ));
        }

        let public_key = PublicKey::from_sec1_bytes(bytes)
            .map_err(|_| Error::InvalidPeerKey(format!("point is not on {}", domain.name())))?;

        Ok(Self {
            point: PeerPoint::Affine(public_key),
            domain,
        })
    }

    /// Curve domain the key was resolved against.
    pub fn domain(&self) -> &CurveDomain {
        &self.domain
    }

    /// Whether the key is the point at infinity.
    pub fn is_identity(&self) -> bool {
        matches!(self.point, PeerPoint::Identity)
    }

    /// The validated affine point, or `None` for the identity.
    pub fn public_key(&self) -> Option<&PublicKey> {
        match &self.point {
            PeerPoint::Identity => None,
            PeerPoint::Affine(public_key) => Some(public_key),
        }
    }
}

impl From<PublicKey> for PeerPublicKey {
    fn from(public_key: PublicKey) -> Self {
        Self {
            point: PeerPoint::Affine(public_key),
            domain: domain::secp521r1(),
        }
    }
}

/// Derived symmetric key, tagged with the cipher it was derived for.
///
/// The bytes are zeroed on drop. Not `Clone`.
pub struct SymmetricKey {
    bytes: Zeroizing<[u8; SYMMETRIC_KEY_LEN]>,
    algorithm: &'static str,
}

impl SymmetricKey {
    /// Wrap existing key bytes.
    pub fn from_bytes(bytes: &[u8; SYMMETRIC_KEY_LEN], algorithm: &'static str) -> Self {
        Self {
            bytes: Zeroizing::new(*bytes),
            algorithm,
        }
    }

    pub(crate) fn from_zeroizing(
        bytes: Zeroizing<[u8; SYMMETRIC_KEY_LEN]>,
        algorithm: &'static str,
    ) -> Self {
        Self { bytes, algorithm }
    }

    /// Raw key bytes.
    pub fn as_bytes(&self) -> &[u8; SYMMETRIC_KEY_LEN] {
        &self.bytes
    }

    /// Cipher algorithm name (e.g. `"AES"`).
    pub fn algorithm(&self) -> &'static str {
        self.algorithm
    }
}

impl PartialEq for SymmetricKey {
    fn eq(&self, other: &Self) -> bool {
        bool::from(self.bytes[..].ct_eq(&other.bytes[..])) && self.algorithm == other.algorithm
    }
}

impl Eq for SymmetricKey {}

impl fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymmetricKey")
            .field("algorithm", &self.algorithm)
            .field("bytes", &"<redacted>")
            .finish()
    }
}
