// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Fixed name tables for DIB header variants and compression codes.

/// DIB header size → header name. Only the sizes in
/// [`SUPPORTED_DIB_SIZES`] can be loaded.
pub const DIB_HEADER_NAMES: [(u32, &str); 6] = [
    (12, "BITMAPCOREHEADER"),
    (40, "BITMAPINFOHEADER"),
    (52, "BITMAPV2INFOHEADER"),
    (56, "BITMAPV3INFOHEADER"),
    (108, "BITMAPV4HEADER"),
    (124, "BITMAPV5HEADER"),
];

/// DIB header sizes the parser accepts.
pub const SUPPORTED_DIB_SIZES: [u32; 5] = [40, 52, 56, 108, 124];

/// Compression code → `BI_*` name.
pub const COMPRESSION_NAMES: [(u32, &str); 10] = [
    (0, "BI_RGB"),
    (1, "BI_RLE8"),
    (2, "BI_RLE4"),
    (3, "BI_BITFIELDS"),
    (4, "BI_JPEG"),
    (5, "BI_PNG"),
    (6, "BI_ALPHABITFIELDS"),
    (11, "BI_CMYK"),
    (12, "BI_CMYKRLE8"),
    (13, "BI_CMYKRLE4"),
];

/// Uncompressed pixel data.
pub const BI_RGB: u32 = 0;

pub fn is_supported_dib_size(size: u32) -> bool {
    SUPPORTED_DIB_SIZES.contains(&size)
}

/// Name of a DIB header variant, or `Unknown (<size>)`.
pub fn header_name(size: u32) -> String {
    lookup(&DIB_HEADER_NAMES, size)
}

/// Name of a compression code, or `Unknown (<code>)`.
pub fn compression_name(code: u32) -> String {
    lookup(&COMPRESSION_NAMES, code)
}

fn lookup(table: &[(u32, &str)], key: u32) -> String {
    table
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, name)| (*name).to_string())
        .unwrap_or_else(|| format!("Unknown ({key})"))
}
