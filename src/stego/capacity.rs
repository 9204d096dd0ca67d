// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! LSB capacity.
//!
//! ```text
//! usable_channels = min(channels, bytes_per_pixel)
//! total_bits      = width * height * usable_channels * bit_depth
//! capacity        = total_bits / 8 - 4
//! ```
//!
//! The 4 bytes are the embedded length prefix. A negative capacity means the
//! carrier cannot hold even an empty payload.

use super::LsbParams;

/// Bytes reserved for the little-endian length prefix.
pub const LENGTH_PREFIX_BYTES: usize = 4;

/// Channel bytes per pixel that take part in embedding.
pub fn usable_channels(bit_count: u16, channels: u8) -> usize {
    (channels as usize).min(bit_count as usize / 8)
}

/// Payload capacity in bytes for a `width` × `height` carrier.
///
/// Row padding is not counted, so the estimate never exceeds what the pixel
/// buffer can hold.
pub fn capacity(width: i32, height: u32, bit_count: u16, params: LsbParams) -> i64 {
    let usable = usable_channels(bit_count, params.channels) as i64;
    let total_bits = i64::from(width)
        .saturating_mul(i64::from(height))
        .saturating_mul(usable)
        .saturating_mul(i64::from(params.bit_depth));
    total_bits.div_euclid(8) - LENGTH_PREFIX_BYTES as i64
}
