//! Curve domain provider.
//!
//! Resolves named curves into explicit domain parameters (field prime,
//! coefficients, generator, order, cofactor, seed). Resolution is a pure
//! lookup over a static registry, so peers and the local key pair are always
//! checked against the same parameter set rather than whatever a peer claims.
//!
//! Parameters follow SEC 2 v2 §2.6.1 (secp521r1).

use crate::{Error, Result};
use der::oid::ObjectIdentifier;

/// Canonical name of the NIST P-521 curve.
pub const SECP521R1: &str = "secp521r1";

/// OID of secp521r1 (`1.3.132.0.35`).
pub const SECP521R1_OID: ObjectIdentifier = ObjectIdentifier::new_unwrap("1.3.132.0.35");

/// Size of a secp521r1 field element or scalar in bytes.
pub const SECP521R1_FIELD_BYTES: usize = 66;

/// Size of an uncompressed secp521r1 point (`0x04 || x || y`).
pub const SECP521R1_POINT_BYTES: usize = 1 + 2 * SECP521R1_FIELD_BYTES;

const SECP521R1_P: [u8; SECP521R1_FIELD_BYTES] = [
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
];

const SECP521R1_A: [u8; SECP521R1_FIELD_BYTES] = [
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xfc,
];

const SECP521R1_B: [u8; SECP521R1_FIELD_BYTES] = [
    0x00, 0x51, 0x95, 0x3e, 0xb9, 0x61, 0x8e, 0x1c, 0x9a, 0x1f, 0x92, 0x9a,
    0x21, 0xa0, 0xb6, 0x85, 0x40, 0xee, 0xa2, 0xda, 0x72, 0x5b, 0x99, 0xb3,
    0x15, 0xf3, 0xb8, 0xb4, 0x89, 0x91, 0x8e, 0xf1, 0x09, 0xe1, 0x56, 0x19,
    0x39, 0x51, 0xec, 0x7e, 0x93, 0x7b, 0x16, 0x52, 0xc0, 0xbd, 0x3b, 0xb1,
    0xbf, 0x07, 0x35, 0x73, 0xdf, 0x88, 0x3d, 0x2c, 0x34, 0xf1, 0xef, 0x45,
    0x1f, 0xd4, 0x6b, 0x50, 0x3f, 0x00,
];

const SECP521R1_G: [u8; SECP521R1_POINT_BYTES] = [
    0x04, 0x00, 0xc6, 0x85, 0x8e, 0x06, 0xb7, 0x04, 0x04, 0xe9, 0xcd, 0x9e,
    0x3e, 0xcb, 0x66, 0x23, 0x95, 0xb4, 0x42, 0x9c, 0x64, 0x81, 0x39, 0x05,
    0x3f, 0xb5, 0x21, 0xf8, 0x28, 0xaf, 0x60, 0x6b, 0x4d, 0x3d, 0xba, 0xa1,
    0x4b, 0x5e, 0x77, 0xef, 0xe7, 0x59, 0x28, 0xfe, 0x1d, 0xc1, 0x27, 0xa2,
    0xff, 0xa8, 0xde, 0x33, 0x48, 0xb3, 0xc1, 0x85, 0x6a, 0x42, 0x9b, 0xf9,
    0x7e, 0x7e, 0x31, 0xc2, 0xe5, 0xbd, 0x66, 0x01, 0x18, 0x39, 0x29, 0x6a,
    0x78, 0x9a, 0x3b, 0xc0, 0x04, 0x5c, 0x8a, 0x5f, 0xb4, 0x2c, 0x7d, 0x1b,
    0xd9, 0x98, 0xf5, 0x44, 0x49, 0x57, 0x9b, 0x44, 0x68, 0x17, 0xaf, 0xbd,
    0x17, 0x27, 0x3e, 0x66, 0x2c, 0x97, 0xee, 0x72, 0x99, 0x5e, 0xf4, 0x26,
    0x40, 0xc5, 0x50, 0xb9, 0x01, 0x3f, 0xad, 0x07, 0x61, 0x35, 0x3c, 0x70,
    0x86, 0xa2, 0x72, 0xc2, 0x40, 0x88, 0xbe, 0x94, 0x76, 0x9f, 0xd1, 0x66,
    0x50,
];

const SECP521R1_N: [u8; SECP521R1_FIELD_BYTES] = [
    0x01, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff,
    0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xfa, 0x51, 0x86,
    0x87, 0x83, 0xbf, 0x2f, 0x96, 0x6b, 0x7f, 0xcc, 0x01, 0x48, 0xf7, 0x09,
    0xa5, 0xd0, 0x3b, 0xb5, 0xc9, 0xb8, 0x89, 0x9c, 0x47, 0xae, 0xbb, 0x6f,
    0xb7, 0x1e, 0x91, 0x38, 0x64, 0x09,
];

const SECP521R1_SEED: [u8; 20] = [
    0xd0, 0x9e, 0x88, 0x00, 0x29, 0x1c, 0xb8, 0x53, 0x96, 0xcc, 0x67, 0x17,
    0x39, 0x32, 0x84, 0xaa, 0xa0, 0xda, 0x64, 0xba,
];

/// Explicit elliptic-curve domain parameters for a named curve.
///
/// All big integers are big-endian, left-padded to the field size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurveDomain {
    name: &'static str,
    oid: ObjectIdentifier,
    field_prime: &'static [u8],
    a: &'static [u8],
    b: &'static [u8],
    generator: &'static [u8],
    order: &'static [u8],
    cofactor: u32,
    seed: Option<&'static [u8]>,
}

impl CurveDomain {
    const SECP521R1: Self = Self {
        name: SECP521R1,
        oid: SECP521R1_OID,
        field_prime: &SECP521R1_P,
        a: &SECP521R1_A,
        b: &SECP521R1_B,
        generator: &SECP521R1_G,
        order: &SECP521R1_N,
        cofactor: 1,
        seed: Some(&SECP521R1_SEED),
    };

    /// Canonical curve name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Named-curve object identifier.
    pub fn oid(&self) -> ObjectIdentifier {
        self.oid
    }

    /// Field prime `p`.
    pub fn field_prime(&self) -> &'static [u8] {
        self.field_prime
    }

    /// Curve coefficient `a`.
    pub fn a(&self) -> &'static [u8] {
        self.a
    }

    /// Curve coefficient `b`.
    pub fn b(&self) -> &'static [u8] {
        self.b
    }

    /// Generator point in uncompressed SEC1 form.
    pub fn generator(&self) -> &'static [u8] {
        self.generator
    }

    /// Group order `n`.
    pub fn order(&self) -> &'static [u8] {
        self.order
    }

    /// Cofactor `h`.
    pub fn cofactor(&self) -> u32 {
        self.cofactor
    }

    /// Seed used to generate the curve, if published.
    pub fn seed(&self) -> Option<&'static [u8]> {
        self.seed
    }

    /// Field element size in bytes.
    pub fn field_size(&self) -> usize {
        self.field_prime.len()
    }

    /// Length of an uncompressed SEC1 point on this curve.
    pub fn uncompressed_point_len(&self) -> usize {
        1 + 2 * self.field_size()
    }
}

/// Domain parameters of secp521r1.
pub const fn secp521r1() -> CurveDomain {
    CurveDomain::SECP521R1
}

/// Resolve a curve name into its domain parameters.
///
/// Accepts the SEC name and its NIST aliases, case-insensitively.
///
/// # Errors
///
/// Returns `Error::UnknownCurve` for any name that is not registered.
///
/// # Example
///
/// ```
/// use fractus_crypto::domain::{resolve, SECP521R1};
///
/// let domain = resolve("P-521").unwrap();
/// assert_eq!(domain.name(), SECP521R1);
/// assert_eq!(domain.cofactor(), 1);
/// ```
pub fn resolve(name: &str) -> Result<CurveDomain> {
    match name.to_ascii_lowercase().as_str() {
        "secp521r1" | "p-521" | "nistp521" => Ok(secp521r1()),
        _ => Err(Error::UnknownCurve(name.to_string())),
    }
}

/// Resolve a named-curve OID into its domain parameters.
///
/// # Errors
///
/// Returns `Error::UnknownCurve` for any OID that is not registered.
pub fn resolve_oid(oid: &ObjectIdentifier) -> Result<CurveDomain> {
    if *oid == SECP521R1_OID {
        Ok(secp521r1())
    } else {
        Err(Error::UnknownCurve(oid.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use p521::elliptic_curve::sec1::ToEncodedPoint;

    #[test]
    fn test_resolve_aliases() {
        for name in ["secp521r1", "SECP521R1", "P-521", "nistp521"] {
            let domain = resolve(name).unwrap();
            assert_eq!(domain.name(), SECP521R1);
            assert_eq!(domain.oid(), SECP521R1_OID);
        }
    }

    #[test]
    fn test_resolve_unknown() {
        let err = resolve("secp256k1").unwrap_err();
        assert_eq!(err, Error::UnknownCurve("secp256k1".into()));
        assert!(resolve("").is_err());
    }

    #[test]
    fn test_resolve_oid() {
        assert_eq!(resolve_oid(&SECP521R1_OID).unwrap(), resolve(SECP521R1).unwrap());

        // secp256r1 is not registered
        let p256_oid = ObjectIdentifier::new_unwrap("1.2.840.10045.3.1.7");
        assert!(matches!(resolve_oid(&p256_oid), Err(Error::UnknownCurve(_))));
    }

    #[test]
    fn test_parameter_sizes() {
        let domain = resolve(SECP521R1).unwrap();
        assert_eq!(domain.field_size(), 66);
        assert_eq!(domain.a().len(), 66);
        assert_eq!(domain.b().len(), 66);
        assert_eq!(domain.order().len(), 66);
        assert_eq!(domain.generator().len(), 133);
        assert_eq!(domain.uncompressed_point_len(), 133);
        assert_eq!(domain.seed().map(<[u8]>::len), Some(20));
    }

    /// p = 2^521 - 1 and a = p - 3
    #[test]
    fn test_field_prime_shape() {
        let domain = resolve(SECP521R1).unwrap();
        assert_eq!(domain.field_prime()[0], 0x01);
        assert!(domain.field_prime()[1..].iter().all(|&b| b == 0xff));
        assert_eq!(&domain.a()[..65], &domain.field_prime()[..65]);
        assert_eq!(domain.a()[65], 0xfc);
    }

    /// The published generator must match the curve arithmetic's 1 * G.
    #[test]
    fn test_generator_matches_arithmetic() {
        let mut one = [0u8; SECP521R1_FIELD_BYTES];
        one[SECP521R1_FIELD_BYTES - 1] = 1;
        let secret = p521::SecretKey::from_slice(&one).unwrap();
        let point = secret.public_key().to_encoded_point(false);

        let domain = resolve(SECP521R1).unwrap();
        assert_eq!(point.as_bytes(), domain.generator());
    }

    /// n - 1 is the largest valid scalar, n itself is rejected.
    #[test]
    fn test_order_bounds_scalars() {
        let domain = resolve(SECP521R1).unwrap();
        assert!(p521::SecretKey::from_slice(domain.order()).is_err());

        let mut n_minus_one = domain.order().to_vec();
        n_minus_one[SECP521R1_FIELD_BYTES - 1] -= 1;
        assert!(p521::SecretKey::from_slice(&n_minus_one).is_ok());
    }
}
