// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! BMP file header and DIB header parsing.
//!
//! ```text
//! File header (14 bytes, little-endian):
//! [2] "BM"  [4] file_size  [2] reserved1  [2] reserved2  [4] pixel_offset
//!
//! DIB header, first 40 bytes (BITMAPINFOHEADER layout):
//! [4] size  [4] width (i32)  [4] height (i32)  [2] planes  [2] bit_count
//! [4] compression  [4] image_size  [4] x_ppm (i32)  [4] y_ppm (i32)
//! [4] colors_used  [4] colors_important
//! ```
//!
//! Larger DIB variants (V2–V5) keep their extra bytes as opaque data.

use super::error::{BmpError, Result};
use super::tables;

/// Size of the BMP file header in bytes.
pub const FILE_HEADER_SIZE: usize = 14;
/// Bytes of the DIB header decoded into fields.
pub const DIB_CORE_FIELDS_SIZE: usize = 40;
/// The two-byte BMP marker.
pub const SIGNATURE: [u8; 2] = *b"BM";

/// The 14-byte file header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileHeader {
    pub signature: [u8; 2],
    /// Declared total size of the image file (excluding trailing blocks).
    pub file_size: u32,
    pub reserved1: u16,
    pub reserved2: u16,
    /// Absolute offset of the first pixel byte.
    pub pixel_offset: u32,
}

/// Fields of the DIB header plus its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DibHeader {
    /// Declared header size (one of 40, 52, 56, 108, 124).
    pub header_size: u32,
    pub width: i32,
    /// Absolute height in pixels.
    pub height: u32,
    /// Rows are stored top-to-bottom (negative height on disk).
    pub top_down: bool,
    pub planes: u16,
    pub bit_count: u16,
    pub compression: u32,
    pub image_size: u32,
    pub x_ppm: i32,
    pub y_ppm: i32,
    pub colors_used: u32,
    pub colors_important: u32,
    /// The full header exactly as read, `header_size` bytes.
    pub raw: Vec<u8>,
}

impl DibHeader {
    /// Bytes beyond the first 40, present for V2–V5 headers.
    pub fn extension(&self) -> Option<&[u8]> {
        if self.raw.len() > DIB_CORE_FIELDS_SIZE {
            Some(&self.raw[DIB_CORE_FIELDS_SIZE..])
        } else {
            None
        }
    }
}

pub(crate) fn read_u16(data: &[u8], pos: usize) -> u16 {
    u16::from_le_bytes([data[pos], data[pos + 1]])
}

pub(crate) fn read_u32(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

fn read_i32(data: &[u8], pos: usize) -> i32 {
    i32::from_le_bytes([data[pos], data[pos + 1], data[pos + 2], data[pos + 3]])
}

/// Parse the 14-byte file header.
///
/// # Errors
/// - [`BmpError::TruncatedHeader`] if fewer than 14 bytes are available.
/// - [`BmpError::InvalidSignature`] if the data does not start with `BM`.
pub fn parse_file_header(data: &[u8]) -> Result<FileHeader> {
    if data.len() < FILE_HEADER_SIZE {
        return Err(BmpError::TruncatedHeader);
    }
    let signature = [data[0], data[1]];
    if signature != SIGNATURE {
        return Err(BmpError::InvalidSignature(signature));
    }
    Ok(FileHeader {
        signature,
        file_size: read_u32(data, 2),
        reserved1: read_u16(data, 6),
        reserved2: read_u16(data, 8),
        pixel_offset: read_u32(data, 10),
    })
}

/// Parse the DIB header that starts right after the file header.
///
/// # Errors
/// - [`BmpError::TruncatedHeader`] if the size field or the declared header
///   bytes are missing.
/// - [`BmpError::UnsupportedHeader`] if the size is not a supported variant.
pub fn parse_dib_header(data: &[u8]) -> Result<DibHeader> {
    let start = FILE_HEADER_SIZE;
    if data.len() < start + 4 {
        return Err(BmpError::TruncatedHeader);
    }
    let header_size = read_u32(data, start);
    if !tables::is_supported_dib_size(header_size) {
        return Err(BmpError::UnsupportedHeader(header_size));
    }
    let end = start + header_size as usize;
    if data.len() < end {
        return Err(BmpError::TruncatedHeader);
    }
    let dib = &data[start..end];

    let signed_height = read_i32(dib, 8);
    Ok(DibHeader {
        header_size,
        width: read_i32(dib, 4),
        height: signed_height.unsigned_abs(),
        top_down: signed_height < 0,
        planes: read_u16(dib, 12),
        bit_count: read_u16(dib, 14),
        compression: read_u32(dib, 16),
        image_size: read_u32(dib, 20),
        x_ppm: read_i32(dib, 24),
        y_ppm: read_i32(dib, 28),
        colors_used: read_u32(dib, 32),
        colors_important: read_u32(dib, 36),
        raw: dib.to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header_bytes(dib_size: u32, height: i32) -> Vec<u8> {
        let mut data = Vec::new();
        data.extend_from_slice(b"BM");
        data.extend_from_slice(&100u32.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&0u16.to_le_bytes());
        data.extend_from_slice(&(14 + dib_size).to_le_bytes());
        data.extend_from_slice(&dib_size.to_le_bytes());
        data.extend_from_slice(&3i32.to_le_bytes());
        data.extend_from_slice(&height.to_le_bytes());
        data.extend_from_slice(&1u16.to_le_bytes());
        data.extend_from_slice(&24u16.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&2835i32.to_le_bytes());
        data.extend_from_slice(&2835i32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.extend_from_slice(&0u32.to_le_bytes());
        data.resize(14 + dib_size as usize, 0xAB);
        data
    }

    #[test]
    fn parses_info_header() {
        let data = header_bytes(40, 5);
        let fh = parse_file_header(&data).unwrap();
        assert_eq!(fh.file_size, 100);
        assert_eq!(fh.pixel_offset, 54);
        let dib = parse_dib_header(&data).unwrap();
        assert_eq!(dib.width, 3);
        assert_eq!(dib.height, 5);
        assert!(!dib.top_down);
        assert_eq!(dib.bit_count, 24);
        assert_eq!(dib.x_ppm, 2835);
        assert!(dib.extension().is_none());
    }

    #[test]
    fn negative_height_is_top_down() {
        let dib = parse_dib_header(&header_bytes(40, -7)).unwrap();
        assert_eq!(dib.height, 7);
        assert!(dib.top_down);
    }

    #[test]
    fn v5_header_keeps_extension_bytes() {
        let dib = parse_dib_header(&header_bytes(124, 2)).unwrap();
        assert_eq!(dib.raw.len(), 124);
        let ext = dib.extension().unwrap();
        assert_eq!(ext.len(), 84);
        assert!(ext.iter().all(|&b| b == 0xAB));
    }

    #[test]
    fn bad_signature() {
        let mut data = header_bytes(40, 1);
        data[0] = b'P';
        assert!(matches!(parse_file_header(&data), Err(BmpError::InvalidSignature([b'P', b'M']))));
    }

    #[test]
    fn core_header_rejected() {
        let mut data = header_bytes(40, 1);
        data[14..18].copy_from_slice(&12u32.to_le_bytes());
        assert!(matches!(parse_dib_header(&data), Err(BmpError::UnsupportedHeader(12))));
    }

    #[test]
    fn truncated_dib() {
        let data = header_bytes(108, 1);
        assert!(matches!(parse_dib_header(&data[..60]), Err(BmpError::TruncatedHeader)));
        assert!(matches!(parse_dib_header(&data[..16]), Err(BmpError::TruncatedHeader)));
        assert!(matches!(parse_file_header(&data[..10]), Err(BmpError::TruncatedHeader)));
    }
}
