//! AES-256-GCM with derived keys.
//!
//! Sealed messages are `ciphertext || tag` (16-byte tag). Nonces are 12 bytes
//! and must never repeat under the same key.

use crate::key::SymmetricKey;
use crate::{Error, Result};
use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes256Gcm, Nonce};
use rand::RngCore;
use zeroize::Zeroizing;

/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;

/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;

/// Draw a fresh random nonce from the operating system RNG.
pub fn random_nonce() -> [u8; NONCE_LEN] {
    let mut nonce = [0u8; NONCE_LEN];
    rand::rngs::OsRng.fill_bytes(&mut nonce);
    nonce
}

/// Encrypt with AES-256-GCM per NIST SP 800-38D.
///
/// # Arguments
/// * `key` - Derived AES key
/// * `nonce` - 12-byte nonce (must be unique per key)
/// * `plaintext` - Data to encrypt
/// * `aad` - Additional authenticated data (not encrypted, but authenticated)
///
/// # Errors
/// Returns `Error::Encryption` if the key is not tagged for AES or encryption fails.
///
/// # Example
/// ```
/// use fractus_crypto::aead::{open, seal};
/// use fractus_crypto::SymmetricKey;
///
/// let key = SymmetricKey::from_bytes(&[0x42; 32], "AES");
/// let nonce = [0x01; 12];
///
/// let sealed = seal(&key, &nonce, b"hello", b"header").unwrap();
/// assert_eq!(&*open(&key, &nonce, &sealed, b"header").unwrap(), b"hello");
/// ```
pub fn seal(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    plaintext: &[u8],
    aad: &[u8],
) -> Result<Vec<u8>> {
    let cipher = cipher_for(key).map_err(Error::Encryption)?;

    let payload = Payload {
        msg: plaintext,
        aad,
    };

    cipher
        .encrypt(Nonce::from_slice(nonce), payload)
        .map_err(|_| Error::Encryption("AES-256-GCM encryption failed".into()))
}

/// Decrypt with AES-256-GCM per NIST SP 800-38D.
///
/// # Errors
/// Returns `Error::Decryption` if tag verification fails or the key is not
/// tagged for AES.
pub fn open(
    key: &SymmetricKey,
    nonce: &[u8; NONCE_LEN],
    ciphertext_and_tag: &[u8],
    aad: &[u8],
) -> Result<Zeroizing<Vec<u8>>> {
    let cipher = cipher_for(key).map_err(Error::Decryption)?;

    let payload = Payload {
        msg: ciphertext_and_tag,
        aad,
    };

    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), payload)
        .map_err(|_| Error::Decryption("AES-256-GCM authentication failed".into()))?;

    Ok(Zeroizing::new(plaintext))
}

fn cipher_for(key: &SymmetricKey) -> core::result::Result<Aes256Gcm, String> {
    if key.algorithm() != "AES" {
        return Err(format!("key derived for {}, not AES", key.algorithm()));
    }

    Aes256Gcm::new_from_slice(key.as_bytes()).map_err(|_| "Invalid AES-256-GCM key length".into())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// NIST GCM test case 16 (AES-256, 60-byte plaintext, 20-byte AAD).
    #[test]
    fn test_aes256gcm_nist_vector() {
        let key: [u8; 32] = hex::decode(
            "feffe9928665731c6d6a8f9467308308feffe9928665731c6d6a8f9467308308",
        )
        .unwrap()
        .try_into()
        .unwrap();
        let key = SymmetricKey::from_bytes(&key, "AES");
        let nonce: [u8; 12] = hex::decode("cafebabefacedbaddecaf888")
            .unwrap()
            .try_into()
            .unwrap();
        let plaintext = hex::decode(
            "d9313225f88406e5a55909c5aff5269a86a7a9531534f7da2e4c303d8a318a721c3c0c95956809532fcf0e2449a6b525b16aedf5aa0de657ba637b39",
        )
        .unwrap();
        let aad = hex::decode("feedfacedeadbeeffeedfacedeadbeefabaddad2").unwrap();

        let sealed = seal(&key, &nonce, &plaintext, &aad).unwrap();

        let expected = hex::decode(
            "522dc1f099567d07f47f37a32a84427d643a8cdcbfe5c0c97598a2bd2555d1aa8cb08e48590dbb3da7b08b1056828838c5f61e6393ba7a0abcc9f662\
             76fc6ece0f4e1768cddf8853bb2d551b",
        )
        .unwrap();
        assert_eq!(sealed, expected);

        let opened = open(&key, &nonce, &sealed, &aad).unwrap();
        assert_eq!(&*opened, &plaintext[..]);
    }

    #[test]
    fn test_tampered_ciphertext_rejected() {
        let key = SymmetricKey::from_bytes(&[0x42; 32], "AES");
        let nonce = random_nonce();

        let mut sealed = seal(&key, &nonce, b"attack at dawn", b"").unwrap();
        assert_eq!(sealed.len(), 14 + TAG_LEN);
        sealed[0] ^= 0x01;

        assert!(matches!(
            open(&key, &nonce, &sealed, b""),
            Err(Error::Decryption(_))
        ));
    }

    #[test]
    fn test_wrong_aad_rejected() {
        let key = SymmetricKey::from_bytes(&[0x42; 32], "AES");
        let nonce = [0x07; NONCE_LEN];

        let sealed = seal(&key, &nonce, b"payload", b"to: bob").unwrap();
        assert!(open(&key, &nonce, &sealed, b"to: eve").is_err());
    }

    #[test]
    fn test_non_aes_key_rejected() {
        let key = SymmetricKey::from_bytes(&[0x42; 32], "ChaCha20");
        let nonce = [0x00; NONCE_LEN];

        assert!(matches!(
            seal(&key, &nonce, b"payload", b""),
            Err(Error::Encryption(_))
        ));
    }

    #[test]
    fn test_random_nonces_differ() {
        assert_ne!(random_nonce(), random_nonce());
    }
}
