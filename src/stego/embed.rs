// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Writing the length-prefixed stream into pixel bits.

use super::bitio::BitReader;
use super::error::{Result, StegoError};
use super::walk::SlotWalk;

/// Build the embedded stream: `u32` LE length of `data`, then `data`.
///
/// Returns `None` if `data` is longer than `u32::MAX` bytes.
pub fn build_stream(data: &[u8]) -> Option<Vec<u8>> {
    let len = u32::try_from(data.len()).ok()?;
    let mut stream = Vec::with_capacity(4 + data.len());
    stream.extend_from_slice(&len.to_le_bytes());
    stream.extend_from_slice(data);
    Some(stream)
}

/// Overwrite pixel bits with `stream`, walking slots in protocol order.
///
/// Bits above `bit_depth` in each channel byte are left untouched, as are all
/// slots after the stream is exhausted.
///
/// # Errors
/// Returns [`StegoError::CapacityExceeded`] if the buffer runs out of slots
/// first. `pixels` is partially written in that case.
pub fn embed_stream(
    pixels: &mut [u8],
    stride: usize,
    channels: usize,
    bit_depth: u8,
    stream: &[u8],
) -> Result<()> {
    let mut slots = SlotWalk::new(pixels.len(), stride, channels, bit_depth);
    let mut bits = BitReader::new(stream);

    while let Some(bit) = bits.read_bit() {
        let Some(slot) = slots.next() else {
            let available = SlotWalk::new(pixels.len(), stride, channels, bit_depth).count();
            return Err(StegoError::CapacityExceeded {
                needed: stream.len().saturating_sub(4),
                capacity: (available / 8) as i64 - 4,
            });
        };
        let mask = 1u8 << slot.plane;
        if bit == 1 {
            pixels[slot.index] |= mask;
        } else {
            pixels[slot.index] &= !mask;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stream_has_le_prefix() {
        assert_eq!(build_stream(b"hi").unwrap(), vec![2, 0, 0, 0, b'h', b'i']);
    }

    #[test]
    fn only_low_planes_change() {
        let mut pixels = vec![0xFFu8; 12];
        embed_stream(&mut pixels, 3, 3, 2, &[0x00, 0x00]).unwrap();
        // 16 bits at 2 per byte touch the first 8 bytes; only the low 2 bits clear.
        assert!(pixels[..8].iter().all(|&b| b == 0xFC));
        assert!(pixels[8..].iter().all(|&b| b == 0xFF));
    }

    #[test]
    fn runs_out_of_slots() {
        let mut pixels = vec![0u8; 3];
        let err = embed_stream(&mut pixels, 3, 3, 1, &[0xAA]).unwrap_err();
        assert!(matches!(err, StegoError::CapacityExceeded { .. }));
    }
}
