// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Trailing metadata block construction and parsing.
//!
//! The block is appended after the declared end of the BMP image:
//!
//! ```text
//! [4 bytes] magic "BMPM"
//! [4 bytes] block_size (u32 LE, whole block including this field and the CRC)
//! [2 bytes] version (u16 LE, = 1)
//! [1 byte ] encrypted flag (0 or 1)
//! [1 byte ] reserved (0)
//! [N bytes] entry payload (sealed when encrypted)
//! [4 bytes] CRC-32 (LE) of everything above
//! ```
//!
//! Total block size = 16 + payload_len bytes.

use super::error::{MetadataError, Result};

/// Block magic.
pub const METADATA_MAGIC: [u8; 4] = *b"BMPM";
/// The only block version written and accepted.
pub const METADATA_VERSION: u16 = 1;
/// Magic + size + version + flag + reserved.
pub const BLOCK_HEADER_LEN: usize = 12;
/// Header plus trailing CRC.
pub const BLOCK_OVERHEAD: usize = BLOCK_HEADER_LEN + 4;

/// Build a block around an already-encoded (and possibly sealed) payload.
///
/// # Errors
/// Returns [`MetadataError::MalformedBlock`] if the block would not fit the
/// u32 size field.
pub fn build_block(payload: &[u8], encrypted: bool) -> Result<Vec<u8>> {
    let block_size = u32::try_from(payload.len() + BLOCK_OVERHEAD)
        .map_err(|_| MetadataError::MalformedBlock("block exceeds 4 GiB"))?;

    let mut block = Vec::with_capacity(block_size as usize);
    block.extend_from_slice(&METADATA_MAGIC);
    block.extend_from_slice(&block_size.to_le_bytes());
    block.extend_from_slice(&METADATA_VERSION.to_le_bytes());
    block.push(u8::from(encrypted));
    block.push(0);
    block.extend_from_slice(payload);

    let crc = crc32fast::hash(&block);
    block.extend_from_slice(&crc.to_le_bytes());

    Ok(block)
}

/// A parsed block. The CRC is reported, not enforced.
#[derive(Debug)]
pub struct ParsedBlock<'a> {
    pub block_size: u32,
    pub version: u16,
    pub encrypted: bool,
    /// Entry payload, still sealed when `encrypted` is set.
    pub payload: &'a [u8],
    pub stored_crc: u32,
    pub computed_crc: u32,
}

impl ParsedBlock<'_> {
    pub fn crc_matches(&self) -> bool {
        self.stored_crc == self.computed_crc
    }
}

/// Parse a block from the bytes following the declared end of the image.
///
/// Trailing bytes after `block_size` are ignored.
///
/// # Errors
/// Returns [`MetadataError::MalformedBlock`] if the region is shorter than a
/// block, the magic is wrong, `block_size` is out of range, or the version is
/// not 1.
pub fn parse_block(trailing: &[u8]) -> Result<ParsedBlock<'_>> {
    if trailing.len() < BLOCK_OVERHEAD {
        return Err(MetadataError::MalformedBlock("trailing region shorter than a block"));
    }
    if trailing[..4] != METADATA_MAGIC {
        return Err(MetadataError::MalformedBlock("missing BMPM magic"));
    }

    let block_size = u32::from_le_bytes([trailing[4], trailing[5], trailing[6], trailing[7]]);
    let size = block_size as usize;
    if size < BLOCK_OVERHEAD || size > trailing.len() {
        return Err(MetadataError::MalformedBlock("block size out of range"));
    }

    let version = u16::from_le_bytes([trailing[8], trailing[9]]);
    if version != METADATA_VERSION {
        return Err(MetadataError::MalformedBlock("unsupported block version"));
    }

    let body = &trailing[..size - 4];
    let crc_bytes = &trailing[size - 4..size];
    let stored_crc = u32::from_le_bytes([crc_bytes[0], crc_bytes[1], crc_bytes[2], crc_bytes[3]]);

    Ok(ParsedBlock {
        block_size,
        version,
        encrypted: trailing[10] == 1,
        payload: &body[BLOCK_HEADER_LEN..],
        stored_crc,
        computed_crc: crc32fast::hash(body),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout() {
        let block = build_block(b"\x00\x00", false).unwrap();
        assert_eq!(block.len(), 18);
        assert_eq!(&block[..4], b"BMPM");
        assert_eq!(u32::from_le_bytes(block[4..8].try_into().unwrap()), 18);
        assert_eq!(&block[8..12], &[1, 0, 0, 0]);
        let crc = crc32fast::hash(&block[..14]);
        assert_eq!(&block[14..], &crc.to_le_bytes());
    }

    #[test]
    fn parse_roundtrip() {
        let block = build_block(b"payload", true).unwrap();
        let parsed = parse_block(&block).unwrap();
        assert!(parsed.encrypted);
        assert!(parsed.crc_matches());
        assert_eq!(parsed.payload, b"payload");
        assert_eq!(parsed.block_size as usize, block.len());
    }

    #[test]
    fn flipped_payload_byte_changes_crc() {
        let block = build_block(b"some entries", false).unwrap();
        for i in BLOCK_HEADER_LEN..block.len() - 4 {
            let mut tampered = block.clone();
            tampered[i] ^= 0x40;
            let parsed = parse_block(&tampered).unwrap();
            assert!(!parsed.crc_matches(), "flip at {i} went unnoticed");
        }
    }

    #[test]
    fn trailing_garbage_ignored() {
        let mut block = build_block(b"x", false).unwrap();
        block.extend_from_slice(b"garbage");
        let parsed = parse_block(&block).unwrap();
        assert_eq!(parsed.payload, b"x");
        assert!(parsed.crc_matches());
    }

    #[test]
    fn rejects_bad_blocks() {
        let block = build_block(b"abc", false).unwrap();

        assert!(parse_block(&block[..10]).is_err());

        let mut bad_magic = block.clone();
        bad_magic[0] = b'X';
        assert!(parse_block(&bad_magic).is_err());

        let mut bad_size = block.clone();
        bad_size[4..8].copy_from_slice(&1000u32.to_le_bytes());
        assert!(parse_block(&bad_size).is_err());

        let mut bad_version = block.clone();
        bad_version[8] = 2;
        assert!(matches!(
            parse_block(&bad_version),
            Err(MetadataError::MalformedBlock("unsupported block version"))
        ));
    }
}
