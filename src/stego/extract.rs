// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Reading the length-prefixed stream back out of pixel bits.
//!
//! The decoder counterpart to [`super::embed`]. It walks the same slots,
//! reads 32 bits of length, validates it, then reads exactly that many bytes.

use super::bitio::BitWriter;
use super::error::{Result, StegoError};
use super::walk::SlotWalk;

fn read_bytes(pixels: &[u8], slots: &mut SlotWalk, count: usize) -> Result<Vec<u8>> {
    let mut out = BitWriter::with_capacity(count);
    for _ in 0..count * 8 {
        let slot = slots.next().ok_or(StegoError::CorruptData)?;
        out.write_bit((pixels[slot.index] >> slot.plane) & 1);
    }
    Ok(out.into_bytes())
}

/// Extract the embedded bytes (without the length prefix).
///
/// # Errors
/// Returns [`StegoError::CorruptData`] if the decoded length exceeds
/// `capacity` or the slots left in `pixels`.
pub fn extract_stream(
    pixels: &[u8],
    stride: usize,
    channels: usize,
    bit_depth: u8,
    capacity: i64,
) -> Result<Vec<u8>> {
    let mut slots = SlotWalk::new(pixels.len(), stride, channels, bit_depth);

    let prefix = read_bytes(pixels, &mut slots, 4)?;
    let len = u32::from_le_bytes([prefix[0], prefix[1], prefix[2], prefix[3]]);
    // `capacity` follows the header dimensions; the buffer may be smaller.
    let available = slots.clone().count() / 8;
    if i64::from(len) > capacity || len as usize > available {
        return Err(StegoError::CorruptData);
    }

    read_bytes(pixels, &mut slots, len as usize)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::embed::{build_stream, embed_stream};

    #[test]
    fn roundtrip_raw() {
        let mut pixels: Vec<u8> = (0..300u32).map(|i| (i * 37 % 251) as u8).collect();
        let stream = build_stream(b"abc").unwrap();
        embed_stream(&mut pixels, 4, 3, 1, &stream).unwrap();
        assert_eq!(extract_stream(&pixels, 4, 3, 1, 1000).unwrap(), b"abc");
    }

    #[test]
    fn implausible_length_is_corrupt() {
        let mut pixels = vec![0u8; 96];
        embed_stream(&mut pixels, 3, 3, 1, &build_stream(&[0u8; 8]).unwrap()).unwrap();
        assert_eq!(extract_stream(&pixels, 3, 3, 1, 7), Err(StegoError::CorruptData));
    }

    #[test]
    fn negative_capacity_rejects_everything() {
        let pixels = vec![0u8; 96];
        assert_eq!(extract_stream(&pixels, 3, 3, 1, -1), Err(StegoError::CorruptData));
    }

    #[test]
    fn too_few_slots_for_prefix() {
        assert_eq!(extract_stream(&[0u8; 3], 3, 3, 1, 10), Err(StegoError::CorruptData));
    }

    #[test]
    fn length_bounded_by_buffer_not_capacity() {
        // At 8 bits per channel byte the stream maps onto pixel bytes 1:1.
        let mut pixels = vec![0u8; 96];
        pixels[..4].copy_from_slice(&0xF000_0000u32.to_le_bytes());
        assert_eq!(
            extract_stream(&pixels, 3, 3, 8, 4_799_999_996),
            Err(StegoError::CorruptData)
        );

        pixels[..4].copy_from_slice(&92u32.to_le_bytes());
        assert_eq!(extract_stream(&pixels, 3, 3, 8, 4_799_999_996).unwrap().len(), 92);
        pixels[..4].copy_from_slice(&93u32.to_le_bytes());
        assert_eq!(
            extract_stream(&pixels, 3, 3, 8, 4_799_999_996),
            Err(StegoError::CorruptData)
        );
    }
}
