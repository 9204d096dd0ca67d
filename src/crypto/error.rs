// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for password-based sealing.

use core::fmt;

/// Errors that can occur while sealing or opening a blob.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The crate was built without the `crypto` feature.
    Unavailable,
    /// The sealed blob is shorter than salt + nonce (28 bytes).
    InvalidCiphertext,
    /// AES-GCM authentication failed (wrong password or corrupted data).
    DecryptionFailed,
    /// PBKDF2 rejected the requested output length.
    KeyDerivation,
    /// AES-GCM refused to encrypt (plaintext beyond the GCM limit).
    EncryptionFailed,
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unavailable => write!(f, "encryption support is not compiled in"),
            Self::InvalidCiphertext => write!(f, "sealed data too short (need at least 28 bytes)"),
            Self::DecryptionFailed => write!(f, "decryption failed (wrong password or corrupted data)"),
            Self::KeyDerivation => write!(f, "key derivation failed"),
            Self::EncryptionFailed => write!(f, "encryption failed"),
        }
    }
}

impl std::error::Error for CryptoError {}

pub type Result<T> = std::result::Result<T, CryptoError>;
