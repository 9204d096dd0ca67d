// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Entry-set encoding.
//!
//! ```text
//! [2 bytes] entry_count (u16 LE)
//! per entry:
//!   [2 bytes] key_len (u16 LE)
//!   [4 bytes] value_len (u32 LE)
//!   [K bytes] key (UTF-8)
//!   [V bytes] value
//! ```

use super::error::{MetadataError, Result};
use super::value::MetadataValue;
use super::Metadata;

/// Serialize all entries in insertion order.
///
/// # Errors
/// - [`MetadataError::TooManyEntries`] past 65,535 entries.
/// - [`MetadataError::EntryTooLarge`] if a key or value overflows its length field.
pub fn encode_entries(meta: &Metadata) -> Result<Vec<u8>> {
    let count = u16::try_from(meta.len()).map_err(|_| MetadataError::TooManyEntries(meta.len()))?;

    let mut buf = Vec::new();
    buf.extend_from_slice(&count.to_le_bytes());

    for (key, value) in meta.iter() {
        let key_bytes = key.as_bytes();
        let value_bytes = value.to_bytes();
        let too_large = || MetadataError::EntryTooLarge { key: key.to_string() };
        let key_len = u16::try_from(key_bytes.len()).map_err(|_| too_large())?;
        let value_len = u32::try_from(value_bytes.len()).map_err(|_| too_large())?;

        buf.extend_from_slice(&key_len.to_le_bytes());
        buf.extend_from_slice(&value_len.to_le_bytes());
        buf.extend_from_slice(key_bytes);
        buf.extend_from_slice(&value_bytes);
    }

    Ok(buf)
}

/// Parse an entry set into a fresh [`Metadata`].
///
/// Bytes after the last declared entry are ignored.
///
/// # Errors
/// - [`MetadataError::MalformedBlock`] if the data ends mid-entry.
/// - [`MetadataError::InvalidKey`] if a key is not UTF-8.
pub fn decode_entries(data: &[u8]) -> Result<Metadata> {
    if data.len() < 2 {
        return Err(MetadataError::MalformedBlock("entry payload too short"));
    }
    let count = u16::from_le_bytes([data[0], data[1]]) as usize;
    let mut meta = Metadata::new();
    let mut cursor = 2;

    for _ in 0..count {
        if cursor + 6 > data.len() {
            return Err(MetadataError::MalformedBlock("unexpected end of entry table"));
        }
        let key_len = u16::from_le_bytes([data[cursor], data[cursor + 1]]) as usize;
        let value_len = u32::from_le_bytes([
            data[cursor + 2],
            data[cursor + 3],
            data[cursor + 4],
            data[cursor + 5],
        ]) as usize;
        cursor += 6;

        if data.len() - cursor < key_len || data.len() - cursor - key_len < value_len {
            return Err(MetadataError::MalformedBlock("entry extends past payload"));
        }

        let key = std::str::from_utf8(&data[cursor..cursor + key_len])
            .map_err(|_| MetadataError::InvalidKey)?
            .to_string();
        cursor += key_len;

        let value = MetadataValue::from_bytes(&data[cursor..cursor + value_len]);
        cursor += value_len;

        meta.add(key, value);
    }

    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_set() {
        let encoded = encode_entries(&Metadata::new()).unwrap();
        assert_eq!(encoded, vec![0, 0]);
        assert!(decode_entries(&encoded).unwrap().is_empty());
    }

    #[test]
    fn exact_layout() {
        let mut meta = Metadata::new();
        meta.add("ab", "xyz");
        let encoded = encode_entries(&meta).unwrap();
        assert_eq!(
            encoded,
            vec![1, 0, 2, 0, 3, 0, 0, 0, b'a', b'b', b'x', b'y', b'z']
        );
    }

    #[test]
    fn mixed_values_roundtrip_in_order() {
        let mut meta = Metadata::new();
        meta.add("author", "alice");
        meta.add("count", 12i64);
        meta.add("ratio", 0.75);
        meta.add("tags", json!(["a", "b"]));
        meta.add("blob", vec![0xC3u8, 0x28]);

        let decoded = decode_entries(&encode_entries(&meta).unwrap()).unwrap();
        let keys: Vec<&str> = decoded.keys().collect();
        assert_eq!(keys, ["author", "count", "ratio", "tags", "blob"]);
        for (key, value) in meta.iter() {
            assert_eq!(decoded.get(key).unwrap(), value, "key {key}");
        }
    }

    #[test]
    fn truncated_entry_fails() {
        let mut meta = Metadata::new();
        meta.add("key", "value");
        let encoded = encode_entries(&meta).unwrap();
        for cut in [1, 5, encoded.len() - 1] {
            assert!(
                matches!(decode_entries(&encoded[..cut]), Err(MetadataError::MalformedBlock(_))),
                "cut at {cut}"
            );
        }
    }

    #[test]
    fn non_utf8_key_fails() {
        let data = vec![1, 0, 1, 0, 0, 0, 0, 0, 0xFF];
        assert_eq!(decode_entries(&data).unwrap_err(), MetadataError::InvalidKey);
    }

    #[test]
    fn oversized_key_rejected() {
        let mut meta = Metadata::new();
        meta.add("k".repeat(70_000), "v");
        assert!(matches!(encode_entries(&meta), Err(MetadataError::EntryTooLarge { .. })));
    }
}
