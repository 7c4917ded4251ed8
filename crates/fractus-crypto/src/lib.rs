//! Key agreement and key derivation for the fractus end-to-end encrypted messenger.
//!
//! This crate owns the cryptographic core of a fractus client:
//! - Curve domain resolution for named curves (secp521r1)
//! - A process-long ECDH key pair and static-static agreement with peers
//! - KDF2 (SHA-256) key derivation bound to the AES-256-GCM algorithm identifier
//! - The cipher capability descriptor advertised during a handshake
//! - AES-256-GCM sealing with derived keys
//!
//! Security rules followed throughout:
//! - Private scalars, shared secrets and derived keys live in `Zeroizing` storage
//! - Derived keys are compared in constant time
//! - No logging of key material
//!
//! # Example
//!
//! ```
//! use fractus_crypto::{KeyExchangeManager, PeerPublicKey};
//!
//! # fn example() -> fractus_crypto::Result<()> {
//! let alice = KeyExchangeManager::initialize()?;
//! let bob = KeyExchangeManager::initialize()?;
//!
//! let bob_key = PeerPublicKey::from_der(bob.encoded_public_key())?;
//! let alice_key = PeerPublicKey::from_der(alice.encoded_public_key())?;
//!
//! assert_eq!(alice.derive_key(&bob_key)?, bob.derive_key(&alice_key)?);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod aead;
pub mod domain;
pub mod error;
pub mod kdf;
pub mod kex;
pub mod key;
pub mod manager;
pub mod suite;

pub use domain::CurveDomain;
pub use error::{Error, Result};
pub use key::{PeerPublicKey, PublicKeyFormat, SymmetricKey};
pub use manager::{KeyExchangeManager, ManagerCell, ManagerConfig};
pub use suite::{CipherCapabilities, CipherSuite};
