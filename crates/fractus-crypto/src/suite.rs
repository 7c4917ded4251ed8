//! Cipher capability descriptor advertised during a handshake.
//!
//! Field names and values are part of the wire format shared with other
//! fractus clients and must round-trip unchanged.

use serde::{Deserialize, Serialize};

/// Cipher algorithm of the only supported suite.
pub const CIPHER_ALGORITHM: &str = "AES";
/// Cipher mode of the only supported suite.
pub const CIPHER_MODE: &str = "GCM";
/// Cipher key size in bits.
pub const CIPHER_KEY_SIZE: u32 = 256;
/// Key derivation function identifier.
pub const KEY_DERIVATION_FUNCTION: &str = "KDF2";
/// Public key type.
pub const PUBLIC_KEY_TYPE: &str = "EC";
/// Secret establishment algorithm.
pub const SECRET_ESTABLISHMENT_ALGORITHM: &str = "ECDH";

/// One supported combination of cipher, KDF and key agreement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CipherSuite {
    /// Symmetric cipher, e.g. `"AES"`.
    pub cipher_algorithm: String,
    /// Cipher mode, e.g. `"GCM"`.
    pub cipher_mode: String,
    /// Symmetric key size in bits.
    pub cipher_key_size: u32,
    /// Key derivation function, e.g. `"KDF2"`.
    pub key_derivation_function: String,
    /// Public key type, e.g. `"EC"`.
    pub public_key_type: String,
    /// Key agreement algorithm, e.g. `"ECDH"`.
    pub secret_establishment_algorithm: String,
}

impl CipherSuite {
    /// AES-256-GCM keyed through KDF2 over an EC Diffie-Hellman secret.
    pub fn aes256_gcm_kdf2_ecdh() -> Self {
        Self {
            cipher_algorithm: CIPHER_ALGORITHM.into(),
            cipher_mode: CIPHER_MODE.into(),
            cipher_key_size: CIPHER_KEY_SIZE,
            key_derivation_function: KEY_DERIVATION_FUNCTION.into(),
            public_key_type: PUBLIC_KEY_TYPE.into(),
            secret_establishment_algorithm: SECRET_ESTABLISHMENT_ALGORITHM.into(),
        }
    }
}

/// The list of cipher suites a party supports, in preference order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CipherCapabilities {
    /// Supported suites, most preferred first.
    pub cipher_suites: Vec<CipherSuite>,
}

impl CipherCapabilities {
    /// Capabilities of this implementation: exactly one suite.
    pub fn supported() -> Self {
        Self {
            cipher_suites: vec![CipherSuite::aes256_gcm_kdf2_ecdh()],
        }
    }

    /// Whether `suite` is listed.
    pub fn supports(&self, suite: &CipherSuite) -> bool {
        self.cipher_suites.contains(suite)
    }

    /// First local suite that the remote party also lists.
    pub fn negotiate(&self, remote: &CipherCapabilities) -> Option<&CipherSuite> {
        self.cipher_suites
            .iter()
            .find(|suite| remote.supports(suite))
    }
}
