//! Error types for key exchange and key derivation.

use thiserror::Error;

/// Result type alias for fractus cryptographic operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Cryptographic operation errors.
///
/// `UnknownCurve` and `KeyGenerationFailed` mean the process cannot do crypto
/// at all. The remaining variants are local to one peer or one call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Curve name or OID is not a registered named curve.
    #[error("Unknown curve: {0}")]
    UnknownCurve(String),

    /// Entropy or curve arithmetic failed while generating the local key pair.
    #[error("Key generation failed: {0}")]
    KeyGenerationFailed(String),

    /// Caller-supplied private scalar is malformed or out of range.
    #[error("Invalid private key: {0}")]
    InvalidPrivateKey(String),

    /// Peer public key is malformed, of the wrong type, or not on the curve.
    #[error("Invalid peer key: {0}")]
    InvalidPeerKey(String),

    /// Agreement produced the identity point or an all-zero secret.
    #[error("Degenerate shared secret")]
    DegenerateSharedSecret,

    /// Key derivation parameters were rejected.
    #[error("Key derivation failed: {0}")]
    KeyDerivation(String),

    /// AEAD encryption failed.
    #[error("AEAD encryption failed: {0}")]
    Encryption(String),

    /// AEAD decryption failed.
    #[error("AEAD decryption failed: {0}")]
    Decryption(String),
}

impl Error {
    /// Returns true when the error prevents the process from doing any crypto.
    ///
    /// Per-peer failures (a bad key, a degenerate agreement) return false and
    /// should only abort that peer's handshake.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::UnknownCurve(_) | Self::KeyGenerationFailed(_))
    }
}
