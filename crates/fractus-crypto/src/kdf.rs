//! Key derivation (KDF2 with SHA-256).
//!
//! Implements the ECDH key-encryption-key generator:
//! - KDF2 per ISO 18033-2 / ANSI X9.63: `SHA256(Z || counter || OtherInfo)`,
//!   counter starting at 1, big-endian, output truncated to the requested length
//! - OtherInfo is the DER `KeySpecificInfo` naming the target cipher and its key
//!   size, so a derived key is bound to the algorithm it was derived for
//!
//! The shared secret integer is encoded as a minimal big-endian two's-complement
//! octet string before hashing, which is how existing fractus peers encode it.

use crate::{Error, Result};
use der::asn1::{AnyRef, OctetStringRef};
use der::oid::ObjectIdentifier;
use der::{Encode, Sequence};
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// OID of AES-256 in GCM mode (`2.16.840.1.101.3.4.1.46`, NIST).
pub const ID_AES256_GCM: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.16.840.1.101.3.4.1.46");

/// Output size of one SHA-256 block.
const BLOCK_LEN: usize = 32;

/// `AlgorithmIdentifier` with explicit NULL parameters.
#[derive(Sequence)]
struct AlgorithmIdentifier<'a> {
    algorithm: ObjectIdentifier,
    parameters: AnyRef<'a>,
}

/// `KeySpecificInfo ::= SEQUENCE { algorithm, [2] EXPLICIT suppPubInfo }`.
#[derive(Sequence)]
struct KeySpecificInfo<'a> {
    algorithm: AlgorithmIdentifier<'a>,
    #[asn1(context_specific = "2", tag_mode = "EXPLICIT")]
    supp_pub_info: OctetStringRef<'a>,
}

/// KDF2 with SHA-256, filling `out` completely.
///
/// # Arguments
/// * `shared` - Shared secret octets `Z`
/// * `other_info` - Context bound into every block (may be empty)
/// * `out` - Output buffer, its length is the derived key length
///
/// # Errors
/// Returns `Error::KeyDerivation` if `out` is empty or would need more than
/// 2^32 - 1 hash blocks.
///
/// # Example
/// ```
/// use fractus_crypto::kdf::kdf2_sha256;
///
/// let mut okm = [0u8; 48];
/// kdf2_sha256(b"shared secret", b"context", &mut okm).unwrap();
/// assert_ne!(okm, [0u8; 48]);
/// ```
pub fn kdf2_sha256(shared: &[u8], other_info: &[u8], out: &mut [u8]) -> Result<()> {
    if out.is_empty() {
        return Err(Error::KeyDerivation("output length must be non-zero".into()));
    }

    for (index, chunk) in out.chunks_mut(BLOCK_LEN).enumerate() {
        let counter = u32::try_from(index + 1)
            .map_err(|_| Error::KeyDerivation("KDF2 counter overflow".into()))?;

        let mut hasher = Sha256::new();
        hasher.update(shared);
        hasher.update(counter.to_be_bytes());
        hasher.update(other_info);
        let block: Zeroizing<[u8; BLOCK_LEN]> = Zeroizing::new(hasher.finalize().into());

        chunk.copy_from_slice(&block[..chunk.len()]);
    }

    Ok(())
}

/// DER-encode the `KeySpecificInfo` for `algorithm` with a `key_bits` key.
///
/// The key size is carried as a 4-byte big-endian octet string in `[2]`.
pub fn key_specific_info(algorithm: ObjectIdentifier, key_bits: u32) -> Result<Vec<u8>> {
    let key_size = key_bits.to_be_bytes();
    let info = KeySpecificInfo {
        algorithm: AlgorithmIdentifier {
            algorithm,
            parameters: AnyRef::NULL,
        },
        supp_pub_info: OctetStringRef::new(&key_size)
            .map_err(|e| Error::KeyDerivation(format!("key size encoding: {e}")))?,
    };

    info.to_der()
        .map_err(|e| Error::KeyDerivation(format!("KeySpecificInfo encoding: {e}")))
}

/// Derive a key-encryption key for `algorithm` from a shared secret.
///
/// Uses KDF2-SHA256 with the DER `KeySpecificInfo` as context and produces
/// `key_bits / 8` bytes.
///
/// # Errors
/// Returns `Error::KeyDerivation` if `key_bits` is zero or not a multiple of 8.
pub fn derive_kek(
    shared: &[u8],
    algorithm: ObjectIdentifier,
    key_bits: u32,
) -> Result<Zeroizing<Vec<u8>>> {
    if key_bits == 0 || key_bits % 8 != 0 {
        return Err(Error::KeyDerivation(format!(
            "key size must be a non-zero multiple of 8 bits, got {key_bits}"
        )));
    }

    let other_info = key_specific_info(algorithm, key_bits)?;
    let mut okm = Zeroizing::new(vec![0u8; (key_bits / 8) as usize]);
    kdf2_sha256(shared, &other_info, &mut okm)?;

    Ok(okm)
}

/// Encode a big-endian unsigned integer as minimal two's-complement octets.
///
/// Leading zero bytes are stripped and a single `0x00` is prepended when the
/// top bit of the first remaining byte is set. Zero encodes as `[0x00]`.
///
/// # Example
/// ```
/// use fractus_crypto::kdf::integer_octets;
///
/// assert_eq!(&*integer_octets(&[0x00, 0x00, 0x7f]), &[0x7f]);
/// assert_eq!(&*integer_octets(&[0x00, 0x80, 0x01]), &[0x00, 0x80, 0x01]);
/// ```
pub fn integer_octets(magnitude: &[u8]) -> Zeroizing<Vec<u8>> {
    let start = magnitude
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(magnitude.len());
    let digits = &magnitude[start..];

    let mut octets = Zeroizing::new(Vec::with_capacity(digits.len() + 1));
    match digits.first() {
        None => octets.push(0),
        Some(&first) if first & 0x80 != 0 => {
            octets.push(0);
            octets.extend_from_slice(digits);
        }
        Some(_) => octets.extend_from_slice(digits),
    }

    octets
}
