// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for metadata entries and trailing blocks.

use std::fmt;

use super::MetadataStorage;
use crate::crypto::CryptoError;

/// Errors that can occur while editing, encoding, or decoding metadata.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataError {
    /// No entry with this key.
    KeyNotFound(String),
    /// The trailing block or entry payload is structurally invalid.
    MalformedBlock(&'static str),
    /// Only [`MetadataStorage::EofAppend`] is implemented.
    NotSupported(MetadataStorage),
    /// More entries than the u16 entry count can describe.
    TooManyEntries(usize),
    /// Key longer than 65,535 bytes or value longer than `u32::MAX` bytes.
    EntryTooLarge { key: String },
    /// A decoded key is not valid UTF-8.
    InvalidKey,
    /// The stored entries are encrypted and no password was supplied.
    Sealed,
    /// Sealing or opening the entry payload failed.
    Crypto(CryptoError),
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeyNotFound(key) => write!(f, "metadata key not found: {key}"),
            Self::MalformedBlock(msg) => write!(f, "malformed metadata: {msg}"),
            Self::NotSupported(method) => write!(f, "metadata storage method not supported: {method:?}"),
            Self::TooManyEntries(n) => write!(f, "too many metadata entries: {n} (max 65535)"),
            Self::EntryTooLarge { key } => write!(f, "metadata entry too large: {key}"),
            Self::InvalidKey => write!(f, "metadata key is not valid UTF-8"),
            Self::Sealed => write!(f, "metadata is encrypted; a password is required"),
            Self::Crypto(e) => write!(f, "metadata encryption: {e}"),
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Crypto(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CryptoError> for MetadataError {
    fn from(e: CryptoError) -> Self {
        Self::Crypto(e)
    }
}

pub type Result<T> = std::result::Result<T, MetadataError>;
