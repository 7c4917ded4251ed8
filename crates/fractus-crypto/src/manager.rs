//! Key exchange manager.
//!
//! The manager owns the client's long-lived ECDH key pair. It is built once at
//! startup and shared as `Arc<KeyExchangeManager>`; every method takes `&self`
//! and `derive_key` keeps no state between calls, so concurrent handshakes with
//! different peers never observe each other's intermediate values.
//!
//! Lifecycle has two states. Before `initialize` succeeds there is no manager
//! (or an empty `ManagerCell`); afterwards it is Ready until dropped, at which
//! point the private scalar is zeroized.

use crate::domain::{self, CurveDomain, SECP521R1};
use crate::kdf::{self, ID_AES256_GCM};
use crate::kex::EcdhP521KeyPair;
use crate::key::{PeerPublicKey, PublicKeyFormat, SymmetricKey, SYMMETRIC_KEY_LEN};
use crate::suite::{CipherCapabilities, CIPHER_ALGORITHM, CIPHER_KEY_SIZE};
use crate::{Error, Result};
use p521::PublicKey;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::{Arc, OnceLock};
use zeroize::Zeroizing;

/// Manager settings supplied by the host application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Named curve for the local key pair.
    pub curve: String,
    /// Encoding used for `encoded_public_key` and for parsing peer keys in
    /// `derive_key_from_encoded`.
    pub public_key_format: PublicKeyFormat,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            curve: SECP521R1.to_string(),
            public_key_format: PublicKeyFormat::X509,
        }
    }
}

/// Owns the local key pair and derives per-peer symmetric keys.
#[derive(Debug)]
pub struct KeyExchangeManager {
    domain: CurveDomain,
    key_pair: EcdhP521KeyPair,
    encoded_public_key: Vec<u8>,
    encoding_format: PublicKeyFormat,
    capabilities: CipherCapabilities,
}

impl KeyExchangeManager {
    /// Initialize with the default configuration (secp521r1, X.509 encoding).
    ///
    /// # Errors
    ///
    /// Returns `Error::KeyGenerationFailed` if the key pair cannot be generated.
    /// This is fatal: there is no degraded mode without a key pair.
    pub fn initialize() -> Result<Self> {
        Self::initialize_with(&ManagerConfig::default())
    }

    /// Initialize with an explicit configuration and a fresh OS-random key pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCurve` for an unregistered curve name and
    /// `Error::KeyGenerationFailed` if key generation fails.
    pub fn initialize_with(config: &ManagerConfig) -> Result<Self> {
        let domain = domain::resolve(&config.curve)?;

        tracing::info!(curve = domain.name(), "Generating ECDH key pair");
        let key_pair = EcdhP521KeyPair::generate()?;

        Self::with_key_pair(config, key_pair)
    }

    /// Build a manager around an existing key pair.
    ///
    /// # Errors
    ///
    /// Returns `Error::UnknownCurve` for an unregistered curve name or one that
    /// is not the key pair's curve, and `Error::KeyGenerationFailed` if the
    /// public key cannot be encoded.
    pub fn with_key_pair(config: &ManagerConfig, key_pair: EcdhP521KeyPair) -> Result<Self> {
        let domain = domain::resolve(&config.curve)?;
        if domain != domain::secp521r1() {
            return Err(Error::UnknownCurve(format!(
                "{} does not match the P-521 key pair",
                domain.name()
            )));
        }

        let encoded_public_key = match config.public_key_format {
            PublicKeyFormat::X509 => key_pair.public_key_der()?,
            PublicKeyFormat::Sec1Uncompressed => key_pair.public_key_sec1().to_vec(),
        };

        let fingerprint = Sha256::digest(&encoded_public_key);
        tracing::info!(
            curve = domain.name(),
            format = %config.public_key_format,
            fingerprint = %hex::encode(&fingerprint[..8]),
            "Key exchange manager ready"
        );

        Ok(Self {
            domain,
            key_pair,
            encoded_public_key,
            encoding_format: config.public_key_format,
            capabilities: CipherCapabilities::supported(),
        })
    }

    /// Curve domain of the local key pair.
    pub fn domain(&self) -> &CurveDomain {
        &self.domain
    }

    /// Local public key.
    pub fn public_key(&self) -> &PublicKey {
        self.key_pair.public_key()
    }

    /// Local public key in the configured wire encoding.
    pub fn encoded_public_key(&self) -> &[u8] {
        &self.encoded_public_key
    }

    /// Wire encoding of `encoded_public_key`.
    pub fn encoding_format(&self) -> PublicKeyFormat {
        self.encoding_format
    }

    /// Derive the AES-256-GCM key shared with `peer`.
    ///
    /// Runs static-static ECDH with the local private scalar, then KDF2-SHA256
    /// over the shared secret with the id-aes256-GCM / 256-bit context.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidPeerKey` if the peer key is on a different domain
    /// - `Error::DegenerateSharedSecret` for the identity point or a zero secret
    pub fn derive_key(&self, peer: &PeerPublicKey) -> Result<SymmetricKey> {
        if peer.domain() != &self.domain {
            tracing::debug!(peer_curve = peer.domain().name(), "Rejected peer key on foreign curve");
            return Err(Error::InvalidPeerKey(format!(
                "peer key is on {}, expected {}",
                peer.domain().name(),
                self.domain.name()
            )));
        }

        let Some(peer_point) = peer.public_key() else {
            tracing::debug!("Rejected identity peer key");
            return Err(Error::DegenerateSharedSecret);
        };

        let shared_secret = self.key_pair.exchange(peer_point).map_err(|e| {
            tracing::debug!(error = %e, "ECDH agreement rejected");
            e
        })?;

        let z = kdf::integer_octets(&shared_secret[..]);
        let okm = kdf::derive_kek(&z, ID_AES256_GCM, CIPHER_KEY_SIZE)?;

        let key = Zeroizing::new(<[u8; SYMMETRIC_KEY_LEN]>::try_from(&okm[..]).map_err(|_| {
            Error::KeyDerivation(format!(
                "expected {SYMMETRIC_KEY_LEN} bytes of key material, got {}",
                okm.len()
            ))
        })?);

        tracing::debug!("Derived key with KDF for AES/GCM/256");
        Ok(SymmetricKey::from_zeroizing(key, CIPHER_ALGORITHM))
    }

    /// Parse a peer key received in the configured encoding and derive from it.
    ///
    /// # Errors
    ///
    /// Same as `derive_key`, plus `Error::InvalidPeerKey` for unparseable input.
    pub fn derive_key_from_encoded(&self, encoded: &[u8]) -> Result<SymmetricKey> {
        let peer = PeerPublicKey::from_encoded(encoded, self.encoding_format).map_err(|e| {
            tracing::debug!(error = %e, "Rejected encoded peer key");
            e
        })?;

        self.derive_key(&peer)
    }

    /// Cipher suites this manager can key.
    pub fn cipher_capabilities(&self) -> &CipherCapabilities {
        &self.capabilities
    }
}

/// One-time holder for the process-wide manager.
///
/// Concurrent `get_or_init` calls generate exactly one key pair. A failed
/// initialization is kept and returned to every later caller.
#[derive(Debug, Default)]
pub struct ManagerCell {
    inner: OnceLock<Result<Arc<KeyExchangeManager>>>,
}

impl ManagerCell {
    /// Create an empty cell.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Return the manager, initializing it with `config` on first use.
    pub fn get_or_init(&self, config: &ManagerConfig) -> Result<Arc<KeyExchangeManager>> {
        self.inner
            .get_or_init(|| KeyExchangeManager::initialize_with(config).map(Arc::new))
            .clone()
    }

    /// Return the manager if it has been initialized successfully.
    pub fn get(&self) -> Option<Arc<KeyExchangeManager>> {
        self.inner.get().and_then(|result| result.as_ref().ok()).cloned()
    }
}
