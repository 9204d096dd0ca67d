// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Synthetic BMP files for integration tests.

#![allow(dead_code)]

/// Shape of a generated BMP.
#[derive(Clone, Copy)]
pub struct BmpShape {
    pub width: i32,
    /// Negative for top-down row order.
    pub height: i32,
    pub bit_count: u16,
    pub dib_size: u32,
    pub compression: u32,
    /// Fill every pixel byte with this value instead of a pattern.
    pub fill: Option<u8>,
}

impl Default for BmpShape {
    fn default() -> Self {
        Self { width: 16, height: 16, bit_count: 24, dib_size: 40, compression: 0, fill: None }
    }
}

/// Bytes per padded row.
pub fn row_stride(width: i32, bit_count: u16) -> usize {
    (width as usize * bit_count as usize + 31) / 32 * 4
}

/// Build a complete, valid BMP file.
pub fn build(shape: BmpShape) -> Vec<u8> {
    let pixel_len = row_stride(shape.width, shape.bit_count) * shape.height.unsigned_abs() as usize;
    let palette_len = if shape.bit_count <= 8 { 4usize << shape.bit_count } else { 0 };
    let offset = 14 + shape.dib_size as usize + palette_len;
    let file_size = offset + pixel_len;

    let mut data = Vec::with_capacity(file_size);
    data.extend_from_slice(b"BM");
    data.extend_from_slice(&(file_size as u32).to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&0u16.to_le_bytes());
    data.extend_from_slice(&(offset as u32).to_le_bytes());

    data.extend_from_slice(&shape.dib_size.to_le_bytes());
    data.extend_from_slice(&shape.width.to_le_bytes());
    data.extend_from_slice(&shape.height.to_le_bytes());
    data.extend_from_slice(&1u16.to_le_bytes());
    data.extend_from_slice(&shape.bit_count.to_le_bytes());
    data.extend_from_slice(&shape.compression.to_le_bytes());
    data.extend_from_slice(&(pixel_len as u32).to_le_bytes());
    data.extend_from_slice(&2835i32.to_le_bytes());
    data.extend_from_slice(&2835i32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&0u32.to_le_bytes());
    // Extended DIB variants: distinctive filler so tests can spot it.
    data.resize(14 + shape.dib_size as usize, 0x5A);

    for i in 0..palette_len / 4 {
        let v = i as u8;
        data.extend_from_slice(&[v, v, v, 0]);
    }

    for i in 0..pixel_len {
        data.push(shape.fill.unwrap_or(((i * 31 + 7) % 256) as u8));
    }
    data
}

/// A `width` × `height` uncompressed BMP with a 40-byte header.
pub fn bmp(width: i32, height: i32, bit_count: u16) -> Vec<u8> {
    build(BmpShape { width, height, bit_count, ..BmpShape::default() })
}
