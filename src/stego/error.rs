// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for LSB embedding and extraction.
//!
//! [`StegoError`] covers carrier validation, capacity, stream recovery, and
//! payload decryption.

use core::fmt;

use crate::crypto::CryptoError;

/// Errors that can occur during LSB hiding or extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// The carrier is not an uncompressed 24- or 32-bit BMP.
    UnsupportedFormat { bit_count: u16, compression: String },
    /// `bit_depth` outside 1–8 or `channels` of 0.
    InvalidParameters { bit_depth: u8, channels: u8 },
    /// The payload (after sealing, if any) does not fit the carrier.
    CapacityExceeded { needed: usize, capacity: i64 },
    /// The embedded length prefix is impossible for this carrier.
    CorruptData,
    /// The extracted payload failed authentication.
    WrongPasswordOrCorrupt,
    /// The extracted payload is not valid UTF-8.
    InvalidUtf8,
    /// Sealing failed for a reason other than authentication.
    Crypto(CryptoError),
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedFormat { bit_count, compression } => write!(
                f,
                "LSB steganography needs an uncompressed 24- or 32-bit BMP (got {bit_count}-bit, {compression})"
            ),
            Self::InvalidParameters { bit_depth, channels } => write!(
                f,
                "invalid LSB parameters: bit depth {bit_depth} (1-8), channels {channels} (>= 1)"
            ),
            Self::CapacityExceeded { needed, capacity } => {
                write!(f, "payload too large: {needed} bytes > {capacity} bytes capacity")
            }
            Self::CorruptData => write!(f, "no valid hidden payload found (corrupt length prefix)"),
            Self::WrongPasswordOrCorrupt => write!(f, "decryption failed (wrong password or corrupted data)"),
            Self::InvalidUtf8 => write!(f, "extracted data is not valid UTF-8"),
            Self::Crypto(e) => write!(f, "payload encryption: {e}"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Crypto(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CryptoError> for StegoError {
    fn from(e: CryptoError) -> Self {
        match e {
            CryptoError::DecryptionFailed | CryptoError::InvalidCiphertext => Self::WrongPasswordOrCorrupt,
            other => Self::Crypto(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, StegoError>;
