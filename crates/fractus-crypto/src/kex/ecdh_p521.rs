//! ECDH-P521 key agreement.
//!
//! Implements ECDH using the NIST P-521 (secp521r1) elliptic curve as specified
//! in NIST SP 800-56A. P-521 is the only curve fractus negotiates.
//!
//! # Security
//!
//! - The secret key zeroizes itself on drop, and the raw shared secret is
//!   returned in `Zeroizing<>` storage.
//! - Uses the `p521` crate from RustCrypto, which validates that public keys are
//!   on the curve and not the identity.
//! - `exchange` takes `&self` and keeps no intermediate state, so one key pair can
//!   serve concurrent agreements.
//!
//! # Example
//!
//! ```
//! use fractus_crypto::kex::EcdhP521KeyPair;
//!
//! # fn example() -> Result<(), fractus_crypto::Error> {
//! let alice = EcdhP521KeyPair::generate()?;
//! let bob = EcdhP521KeyPair::generate()?;
//!
//! let alice_shared = alice.exchange(bob.public_key())?;
//! let bob_shared = bob.exchange(alice.public_key())?;
//!
//! assert_eq!(*alice_shared, *bob_shared);
//! # Ok(())
//! # }
//! ```

use crate::domain::{SECP521R1_FIELD_BYTES, SECP521R1_POINT_BYTES};
use crate::{Error, Result};
use p521::ecdh::diffie_hellman;
use p521::elliptic_curve::sec1::ToEncodedPoint;
use p521::elliptic_curve::subtle::ConstantTimeEq;
use p521::pkcs8::EncodePublicKey;
use p521::{PublicKey, SecretKey};
use rand::{CryptoRng, RngCore};
use zeroize::Zeroizing;

/// Candidates drawn before giving up on the entropy source.
///
/// A uniformly random 521-bit candidate is out of range with probability
/// below 2^-260, so hitting this limit means the source is broken.
const MAX_GENERATION_ATTEMPTS: usize = 32;

/// ECDH-P521 key pair.
///
/// Public keys are encoded in uncompressed form: 0x04 || x || y (133 bytes).
pub struct EcdhP521KeyPair {
    /// Secret scalar, zeroed on drop.
    secret_key: SecretKey,
    public_key: PublicKey,
    /// Uncompressed SEC1 encoding of `public_key`, cached.
    public_key_bytes: Vec<u8>,
}

impl std::fmt::Debug for EcdhP521KeyPair {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EcdhP521KeyPair")
            .field("public_key", &hex::encode(&self.public_key_bytes))
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl EcdhP521KeyPair {
    /// Generate a new random P-521 key pair from the operating system RNG.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyGenerationFailed` if the entropy source fails.
    pub fn generate() -> Result<Self> {
        Self::generate_with_rng(&mut rand::rngs::OsRng)
    }

    /// Generate a new P-521 key pair from the given cryptographic RNG.
    ///
    /// Draws 66-byte candidates, masks them to 521 bits and rejects zero and
    /// values not below the group order.
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyGenerationFailed` if the RNG reports an error or keeps
    /// producing out-of-range candidates.
    pub fn generate_with_rng<R>(rng: &mut R) -> Result<Self>
    where
        R: RngCore + CryptoRng + ?Sized,
    {
        let mut candidate = Zeroizing::new([0u8; SECP521R1_FIELD_BYTES]);

        for _ in 0..MAX_GENERATION_ATTEMPTS {
            rng.try_fill_bytes(&mut candidate[..]).map_err(|e| {
                Error::KeyGenerationFailed(format!("entropy source failed: {e}"))
            })?;
            candidate[0] &= 0x01;

            if let Ok(secret_key) = SecretKey::from_slice(&candidate[..]) {
                return Ok(Self::from_secret(secret_key));
            }
        }

        Err(Error::KeyGenerationFailed(format!(
            "no valid P-521 scalar after {MAX_GENERATION_ATTEMPTS} attempts"
        )))
    }

    /// Create a key pair from an existing 66-byte big-endian private scalar.
    ///
    /// This is useful for testing with known vectors.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidPrivateKey` if the scalar has the wrong length,
    /// is zero, or is not below the group order.
    pub fn from_private(private_key: &[u8]) -> Result<Self> {
        if private_key.len() != SECP521R1_FIELD_BYTES {
            return Err(Error::InvalidPrivateKey(format!(
                "P-521 private key must be {SECP521R1_FIELD_BYTES} bytes, got {}",
                private_key.len()
            )));
        }

        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|_| Error::InvalidPrivateKey("scalar is zero or not below the group order".into()))?;

        Ok(Self::from_secret(secret_key))
    }

    fn from_secret(secret_key: SecretKey) -> Self {
        let public_key = secret_key.public_key();
        let public_key_bytes = public_key.to_encoded_point(false).as_bytes().to_vec();

        Self {
            secret_key,
            public_key,
            public_key_bytes,
        }
    }

    /// Get the public key.
    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Get the public key in uncompressed SEC1 form (133 bytes: 0x04 || x || y).
    pub fn public_key_sec1(&self) -> &[u8] {
        debug_assert_eq!(self.public_key_bytes.len(), SECP521R1_POINT_BYTES);
        &self.public_key_bytes
    }

    /// Get the public key as a DER X.509 `SubjectPublicKeyInfo`.
    ///
    /// The algorithm is id-ecPublicKey with the secp521r1 named-curve OID as
    /// parameters, and the key is the uncompressed point.
    pub fn public_key_der(&self) -> Result<Vec<u8>> {
        self.public_key
            .to_public_key_der()
            .map(|document| document.into_vec())
            .map_err(|e| Error::KeyGenerationFailed(format!("public key encoding: {e}")))
    }

    /// Perform P-521 ECDH with a peer's public key.
    ///
    /// Returns the x-coordinate of the shared point as 66 big-endian bytes,
    /// wrapped in `Zeroizing`.
    ///
    /// # Errors
    ///
    /// Returns `Error::DegenerateSharedSecret` if the agreement yields an
    /// all-zero secret.
    pub fn exchange(&self, peer_public: &PublicKey) -> Result<Zeroizing<[u8; SECP521R1_FIELD_BYTES]>> {
        let shared_secret = diffie_hellman(self.secret_key.to_nonzero_scalar(), peer_public.as_affine());

        let mut result = Zeroizing::new([0u8; SECP521R1_FIELD_BYTES]);
        result.copy_from_slice(shared_secret.raw_secret_bytes().as_slice());

        let zero = [0u8; SECP521R1_FIELD_BYTES];
        if bool::from(result[..].ct_eq(&zero[..])) {
            return Err(Error::DegenerateSharedSecret);
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    /// Private scalar 0x00 || 0x42 * 65.
    fn alice_private() -> Vec<u8> {
        let mut private_key = vec![0x42u8; SECP521R1_FIELD_BYTES];
        private_key[0] = 0x00;
        private_key
    }

    /// RNG whose `try_fill_bytes` always fails.
    struct FailingRng;

    impl RngCore for FailingRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, _dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
            Err(rand::Error::new("entropy source unavailable"))
        }
    }

    impl CryptoRng for FailingRng {}

    /// RNG that succeeds but only ever yields zeros.
    struct ZeroRng;

    impl RngCore for ZeroRng {
        fn next_u32(&mut self) -> u32 {
            0
        }

        fn next_u64(&mut self) -> u64 {
            0
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            dest.fill(0);
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> core::result::Result<(), rand::Error> {
            dest.fill(0);
            Ok(())
        }
    }

    impl CryptoRng for ZeroRng {}

    #[test]
    fn test_key_exchange_commutativity() {
        let alice = EcdhP521KeyPair::generate().unwrap();
        let bob = EcdhP521KeyPair::generate().unwrap();

        let alice_shared = alice.exchange(bob.public_key()).unwrap();
        let bob_shared = bob.exchange(alice.public_key()).unwrap();

        assert_eq!(&*alice_shared, &*bob_shared);
    }

    #[test]
    fn test_generate() {
        let keypair = EcdhP521KeyPair::generate().unwrap();

        assert_eq!(keypair.public_key_sec1().len(), 133);
        assert_eq!(keypair.public_key_sec1()[0], 0x04);
    }

    #[test]
    fn test_deterministic_from_private() {
        let keypair1 = EcdhP521KeyPair::from_private(&alice_private()).unwrap();
        let keypair2 = EcdhP521KeyPair::from_private(&alice_private()).unwrap();

        assert_eq!(keypair1.public_key_sec1(), keypair2.public_key_sec1());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = EcdhP521KeyPair::generate_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
        let b = EcdhP521KeyPair::generate_with_rng(&mut StdRng::seed_from_u64(7)).unwrap();
        let c = EcdhP521KeyPair::generate_with_rng(&mut StdRng::seed_from_u64(8)).unwrap();

        assert_eq!(a.public_key_sec1(), b.public_key_sec1());
        assert_ne!(a.public_key_sec1(), c.public_key_sec1());
    }

    /// Fixed vector computed independently with affine arithmetic over secp521r1.
    #[test]
    fn test_known_answer() {
        let alice = EcdhP521KeyPair::from_private(&alice_private()).unwrap();
        assert_eq!(
            hex::encode(alice.public_key_sec1()),
            "0400e4239550cf4cbd976f2b529a8bfd566c116ce53dc36a680309909943275ccbac1c513d51166347fa9a7873718786cdd115a66d05ce785a95219a68cdd5c2f40d9d003f63406832216bfea439484403ccad8dd7e4a3111e42e9478528687058e1d6740ea01a3a2f6f2421d3689d6d0baf824c36ddb1c10a5ce2fa2538967843d05bf92c"
        );

        let bob_public = hex::decode(
            "0401e60555d5e28c6c90826f2eb0364cdf5c533e6446a317181f9d963798e5cb923e8d027edcb0c3c479a0b756ab40c4dc75b901f3c8f6784374238fe5e024ec59697e003b479a3f5ac0a7d6c087a9250c444f18bf8e68f1650649aed5a035bdc0c44f1a6d07c2e943ea7953de487ab09a2edbb88f19267730c3bdc413521a954bee7df24b",
        )
        .unwrap();
        let bob_public = PublicKey::from_sec1_bytes(&bob_public).unwrap();

        let shared = alice.exchange(&bob_public).unwrap();
        assert_eq!(
            hex::encode(&shared[..]),
            "0044dac759594e81c8ba50af502ca2ead0181eb1bbf00e46926f6fc49da6f256ba9cc3fc8d5436291c8a346e3ccb7898c3a7e359cdbb44476cf3ecae9f80a753e54e"
        );
    }

    #[test]
    fn test_public_key_der_carries_point() {
        let keypair = EcdhP521KeyPair::generate().unwrap();
        let der = keypair.public_key_der().unwrap();

        assert_eq!(der[0], 0x30);
        assert!(der.ends_with(keypair.public_key_sec1()));
    }

    #[test]
    fn test_reject_invalid_private_key_length() {
        let result = EcdhP521KeyPair::from_private(&[0x42; 32]);
        assert!(matches!(result, Err(Error::InvalidPrivateKey(_))));
    }

    #[test]
    fn test_reject_zero_private_key() {
        let err = EcdhP521KeyPair::from_private(&[0u8; SECP521R1_FIELD_BYTES]).err().unwrap();
        assert!(matches!(err, Error::InvalidPrivateKey(_)));
        assert!(!err.is_fatal());
    }

    #[test]
    fn test_failing_entropy_source() {
        let result = EcdhP521KeyPair::generate_with_rng(&mut FailingRng);
        assert!(matches!(result, Err(Error::KeyGenerationFailed(_))));
    }

    #[test]
    fn test_stuck_entropy_source() {
        let result = EcdhP521KeyPair::generate_with_rng(&mut ZeroRng);
        assert!(matches!(result, Err(Error::KeyGenerationFailed(_))));
    }

    #[test]
    fn test_unique_keypairs() {
        let keypair1 = EcdhP521KeyPair::generate().unwrap();
        let keypair2 = EcdhP521KeyPair::generate().unwrap();

        assert_ne!(keypair1.public_key_sec1(), keypair2.public_key_sec1());
    }

    #[test]
    fn test_unique_shared_secrets() {
        let alice = EcdhP521KeyPair::generate().unwrap();
        let bob = EcdhP521KeyPair::generate().unwrap();
        let carol = EcdhP521KeyPair::generate().unwrap();

        let with_bob = alice.exchange(bob.public_key()).unwrap();
        let with_carol = alice.exchange(carol.public_key()).unwrap();

        assert_ne!(&*with_bob, &*with_carol);
    }
}
