// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Password-based authenticated encryption shared by metadata and stego.
//!
//! A sealed blob is laid out as:
//!
//! ```text
//! [16 bytes] PBKDF2 salt
//! [12 bytes] AES-256-GCM nonce
//! [N bytes ] ciphertext (plaintext_len + 16 bytes for the auth tag)
//! ```
//!
//! The key is PBKDF2-HMAC-SHA-256 over the UTF-8 password with 100,000
//! iterations. Associated data is empty.
//!
//! Built without the `crypto` feature, every entry point returns
//! [`CryptoError::Unavailable`] so callers can degrade instead of failing
//! to link.

pub mod error;

pub use error::CryptoError;

use error::Result;
use zeroize::Zeroizing;

/// PBKDF2 iteration count.
pub const PBKDF2_ITERATIONS: u32 = 100_000;
/// Derived key length (AES-256).
pub const KEY_LEN: usize = 32;
/// PBKDF2 salt length in bytes.
pub const SALT_LEN: usize = 16;
/// AES-GCM nonce length in bytes.
pub const NONCE_LEN: usize = 12;
/// AES-GCM authentication tag length in bytes.
pub const TAG_LEN: usize = 16;
/// Shortest blob [`open`] will attempt (salt + nonce).
pub const MIN_SEALED_LEN: usize = SALT_LEN + NONCE_LEN;
/// Bytes added by [`seal`] on top of the plaintext.
pub const SEAL_OVERHEAD: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// Length of the blob [`seal`] produces for a plaintext of `plaintext_len` bytes.
pub const fn sealed_len(plaintext_len: usize) -> usize {
    plaintext_len + SEAL_OVERHEAD
}

/// Whether the crate was built with the AES-GCM/PBKDF2 stack.
pub const fn is_available() -> bool {
    cfg!(feature = "crypto")
}

/// An empty password counts as no password.
pub fn non_empty(password: Option<&str>) -> Option<&str> {
    password.filter(|pw| !pw.is_empty())
}

/// A 32-byte key derived from a password. Wiped on drop.
pub type DerivedKey = Zeroizing<[u8; KEY_LEN]>;

#[cfg(feature = "crypto")]
mod engine {
    use aes_gcm::aead::{Aead, KeyInit};
    use aes_gcm::{Aes256Gcm, Nonce};
    use hmac::Hmac;
    use rand::RngCore;
    use sha2::Sha256;
    use zeroize::Zeroizing;

    use super::error::{CryptoError, Result};
    use super::{DerivedKey, KEY_LEN, MIN_SEALED_LEN, NONCE_LEN, PBKDF2_ITERATIONS, SALT_LEN};

    pub fn derive_key(password: &str, salt: &[u8]) -> Result<DerivedKey> {
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        pbkdf2::pbkdf2::<Hmac<Sha256>>(password.as_bytes(), salt, PBKDF2_ITERATIONS, &mut *key)
            .map_err(|_| CryptoError::KeyDerivation)?;
        Ok(key)
    }

    pub fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
        let mut rng = rand::thread_rng();

        let mut salt = [0u8; SALT_LEN];
        rng.fill_bytes(&mut salt);

        let mut nonce = [0u8; NONCE_LEN];
        rng.fill_bytes(&mut nonce);

        seal_with(plaintext, password, &salt, &nonce)
    }

    pub fn seal_with(
        plaintext: &[u8],
        password: &str,
        salt: &[u8; SALT_LEN],
        nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        let key = derive_key(password, salt)?;
        let cipher = Aes256Gcm::new_from_slice(&*key)
            .map_err(|_| CryptoError::EncryptionFailed)?;
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(nonce), plaintext)
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(salt);
        blob.extend_from_slice(nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    pub fn open(blob: &[u8], password: &str) -> Result<Vec<u8>> {
        if blob.len() < MIN_SEALED_LEN {
            return Err(CryptoError::InvalidCiphertext);
        }
        let (salt, rest) = blob.split_at(SALT_LEN);
        let (nonce, ciphertext) = rest.split_at(NONCE_LEN);

        let key = derive_key(password, salt)?;
        let cipher = Aes256Gcm::new_from_slice(&*key)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        // One error for every failure so callers cannot tell a bad password
        // from a flipped bit.
        cipher
            .decrypt(Nonce::from_slice(nonce), ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)
    }
}

#[cfg(not(feature = "crypto"))]
mod engine {
    use super::error::{CryptoError, Result};
    use super::{DerivedKey, NONCE_LEN, SALT_LEN};

    pub fn derive_key(_password: &str, _salt: &[u8]) -> Result<DerivedKey> {
        Err(CryptoError::Unavailable)
    }

    pub fn seal(_plaintext: &[u8], _password: &str) -> Result<Vec<u8>> {
        Err(CryptoError::Unavailable)
    }

    pub fn seal_with(
        _plaintext: &[u8],
        _password: &str,
        _salt: &[u8; SALT_LEN],
        _nonce: &[u8; NONCE_LEN],
    ) -> Result<Vec<u8>> {
        Err(CryptoError::Unavailable)
    }

    pub fn open(_blob: &[u8], _password: &str) -> Result<Vec<u8>> {
        Err(CryptoError::Unavailable)
    }
}

/// Derive the AES-256 key from a password and salt (PBKDF2-HMAC-SHA-256).
pub fn derive_key(password: &str, salt: &[u8]) -> Result<DerivedKey> {
    engine::derive_key(password, salt)
}

/// Encrypt `plaintext` under `password` with a fresh random salt and nonce.
///
/// Returns `salt ‖ nonce ‖ ciphertext‖tag`, [`sealed_len`] bytes long.
pub fn seal(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    engine::seal(plaintext, password)
}

/// Same as [`seal`] with caller-provided salt and nonce.
///
/// Never reuse a nonce with the same salt and password.
pub fn seal_with(
    plaintext: &[u8],
    password: &str,
    salt: &[u8; SALT_LEN],
    nonce: &[u8; NONCE_LEN],
) -> Result<Vec<u8>> {
    engine::seal_with(plaintext, password, salt, nonce)
}

/// Decrypt a blob produced by [`seal`].
///
/// # Errors
/// - [`CryptoError::InvalidCiphertext`] if `blob` is shorter than 28 bytes.
/// - [`CryptoError::DecryptionFailed`] on any authentication failure.
pub fn open(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    engine::open(blob, password)
}

#[cfg(all(test, feature = "crypto"))]
mod tests {
    use super::*;

    #[test]
    fn seal_open_roundtrip() {
        let msg = b"Hello, steganography!";
        let blob = seal(msg, "secret123").unwrap();
        assert_eq!(blob.len(), sealed_len(msg.len()));
        assert_eq!(open(&blob, "secret123").unwrap(), msg);
    }

    #[test]
    fn wrong_password_fails() {
        let blob = seal(b"secret message", "correct").unwrap();
        assert_eq!(open(&blob, "wrong"), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn empty_plaintext_works() {
        let blob = seal(b"", "pass").unwrap();
        assert_eq!(blob.len(), SEAL_OVERHEAD);
        assert!(open(&blob, "pass").unwrap().is_empty());
    }

    #[test]
    fn short_blob_is_invalid_ciphertext() {
        assert_eq!(open(&[0u8; 27], "pass"), Err(CryptoError::InvalidCiphertext));
        assert_eq!(open(&[], "pass"), Err(CryptoError::InvalidCiphertext));
    }

    #[test]
    fn blob_without_tag_fails_authentication() {
        // 28..44 bytes passes the length gate but cannot hold a tag.
        assert_eq!(open(&[0u8; 30], "pass"), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn flipped_ciphertext_bit_fails() {
        let mut blob = seal(b"payload bytes", "pw").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert_eq!(open(&blob, "pw"), Err(CryptoError::DecryptionFailed));
    }

    #[test]
    fn seal_with_is_deterministic() {
        let salt = [7u8; SALT_LEN];
        let nonce = [9u8; NONCE_LEN];
        let a = seal_with(b"abc", "pw", &salt, &nonce).unwrap();
        let b = seal_with(b"abc", "pw", &salt, &nonce).unwrap();
        assert_eq!(a, b);
        assert_eq!(&a[..SALT_LEN], &salt);
        assert_eq!(&a[SALT_LEN..MIN_SEALED_LEN], &nonce);
    }

    #[test]
    fn key_differs_by_salt() {
        let k1 = derive_key("pass", &[0u8; 16]).unwrap();
        let k2 = derive_key("pass", &[1u8; 16]).unwrap();
        assert_ne!(*k1, *k2);
    }

    #[test]
    fn derived_key_wipes_in_place() {
        let mut key: Zeroizing<[u8; KEY_LEN]> = derive_key("pass", &[5u8; 16]).unwrap();
        assert!(key.iter().any(|&b| b != 0));
        zeroize::Zeroize::zeroize(&mut key);
        assert_eq!(*key, [0u8; KEY_LEN]);
    }

    #[test]
    fn key_deterministic() {
        let k1 = derive_key("pass", &[3u8; 16]).unwrap();
        let k2 = derive_key("pass", &[3u8; 16]).unwrap();
        assert_eq!(*k1, *k2);
    }

    #[test]
    fn ciphertext_differs_per_seal() {
        let a = seal(b"same message", "pass").unwrap();
        let b = seal(b"same message", "pass").unwrap();
        assert_ne!(a, b, "repeated seals should use fresh salt and nonce");
    }
}

#[cfg(all(test, not(feature = "crypto")))]
mod unavailable_tests {
    use super::*;

    #[test]
    fn everything_reports_unavailable() {
        assert!(!is_available());
        assert_eq!(seal(b"x", "pw"), Err(CryptoError::Unavailable));
        assert_eq!(open(&[0u8; 64], "pw"), Err(CryptoError::Unavailable));
    }
}
