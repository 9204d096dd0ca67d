// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Application metadata appended after BMP pixel data.
//!
//! A [`Metadata`] set is an ordered key → [`MetadataValue`] map. It is
//! encoded as an entry table ([`entries`]), optionally sealed with
//! [`crate::crypto`], and wrapped in a CRC-protected trailing block
//! ([`block`]). Readers that do not know the block see a normal BMP because
//! it lives past the declared file size.

pub mod block;
pub mod entries;
pub mod error;
pub mod value;

pub use error::MetadataError;
pub use value::MetadataValue;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};

use crate::crypto;
use error::Result;

/// Where a metadata set is stored inside the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataStorage {
    /// Inside a widened DIB header. Not implemented.
    HeaderExtension,
    /// In a dedicated application block. Not implemented.
    ApplicationBlock,
    /// As a trailing block after the declared end of the image.
    EofAppend,
}

impl MetadataStorage {
    /// Fail unless this method is implemented.
    pub fn ensure_supported(self) -> Result<()> {
        match self {
            Self::EofAppend => Ok(()),
            other => Err(MetadataError::NotSupported(other)),
        }
    }
}

/// Ordered metadata entries plus a creation timestamp.
#[derive(Debug, Clone)]
pub struct Metadata {
    entries: Vec<(String, MetadataValue)>,
    created: DateTime<Utc>,
}

impl Default for Metadata {
    fn default() -> Self {
        Self::new()
    }
}

impl Metadata {
    pub fn new() -> Self {
        Self { entries: Vec::new(), created: Utc::now() }
    }

    /// Insert or replace an entry. A replaced entry keeps its position.
    pub fn add(&mut self, key: impl Into<String>, value: impl Into<MetadataValue>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, slot)) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Result<&MetadataValue> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
            .ok_or_else(|| MetadataError::KeyNotFound(key.to_string()))
    }

    /// Remove an entry and return its value.
    pub fn remove(&mut self, key: &str) -> Result<MetadataValue> {
        let pos = self
            .entries
            .iter()
            .position(|(k, _)| k == key)
            .ok_or_else(|| MetadataError::KeyNotFound(key.to_string()))?;
        Ok(self.entries.remove(pos).1)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetadataValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// When this set was created (or decoded). Not stored on the wire.
    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    /// Report form: `{"creation_date": ..., "entries": {...}}`.
    pub fn to_json(&self) -> Value {
        let mut entries = Map::new();
        for (key, value) in self.iter() {
            entries.insert(key.to_string(), value.to_json());
        }
        let mut root = Map::new();
        root.insert("creation_date".into(), Value::String(self.created.to_rfc3339()));
        root.insert("entries".into(), Value::Object(entries));
        Value::Object(root)
    }

    /// Encode as a complete trailing block, sealing the entries when a
    /// non-empty password is given.
    ///
    /// # Errors
    /// Entry encoding errors, or [`MetadataError::Crypto`] if sealing fails
    /// (including when encryption support is not compiled in).
    pub fn to_block(&self, password: Option<&str>) -> Result<Vec<u8>> {
        let encoded = entries::encode_entries(self)?;
        match crypto::non_empty(password) {
            Some(pw) => block::build_block(&crypto::seal(&encoded, pw)?, true),
            None => block::build_block(&encoded, false),
        }
    }
}

/// What a trailing block held.
#[derive(Debug, Clone)]
pub enum TrailingMetadata {
    Plain(Metadata),
    /// Entry payload as stored; open with [`open_sealed`].
    Sealed(Vec<u8>),
}

/// Decode the trailing region of a file.
///
/// A CRC mismatch is logged and the entries are decoded anyway.
///
/// # Errors
/// Block structure errors from [`block::parse_block`] and entry errors from
/// [`entries::decode_entries`].
pub fn read_trailing(trailing: &[u8]) -> Result<TrailingMetadata> {
    let parsed = block::parse_block(trailing)?;
    if !parsed.crc_matches() {
        log::warn!(
            "metadata block CRC mismatch (stored {:08x}, computed {:08x}); data may be corrupted",
            parsed.stored_crc,
            parsed.computed_crc
        );
    }
    if parsed.encrypted {
        return Ok(TrailingMetadata::Sealed(parsed.payload.to_vec()));
    }
    entries::decode_entries(parsed.payload).map(TrailingMetadata::Plain)
}

/// Open a sealed entry payload.
pub fn open_sealed(sealed: &[u8], password: &str) -> Result<Metadata> {
    let encoded = crypto::open(sealed, password)?;
    entries::decode_entries(&encoded)
}
