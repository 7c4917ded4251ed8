//! Key exchange implementations.
//!
//! Implements:
//! - ECDH over secp521r1 (NIST SP 800-56A static-static agreement)

pub mod ecdh_p521;

pub use self::ecdh_p521::EcdhP521KeyPair;
