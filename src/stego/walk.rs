// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embedding slot order.
//!
//! Writer and reader must visit pixel bits in exactly the same order, so both
//! sides iterate [`SlotWalk`]:
//!
//! ```text
//! for pixel in (0..len).step_by(bytes_per_pixel)      // pixel-major
//!     for channel in 0..usable_channels               // channel
//!         for plane in 0..bit_depth                   // bit plane, minor
//!             yield (pixel + channel, plane)
//! ```
//!
//! Channel bytes past the end of the buffer (a partial last pixel) are
//! skipped. Row padding bytes are visited like any other byte.

/// One embedding position: a byte index into the pixel buffer and the bit
/// plane (0 = least significant) within it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub index: usize,
    pub plane: u8,
}

/// Iterator over embedding slots in protocol order.
#[derive(Debug, Clone)]
pub struct SlotWalk {
    len: usize,
    stride: usize,
    channels: usize,
    bit_depth: u8,
    pixel: usize,
    channel: usize,
    plane: u8,
}

impl SlotWalk {
    /// `stride` is bytes per pixel; `channels` must already be capped to it.
    pub fn new(len: usize, stride: usize, channels: usize, bit_depth: u8) -> Self {
        debug_assert!(stride > 0 && channels <= stride);
        Self { len, stride, channels, bit_depth, pixel: 0, channel: 0, plane: 0 }
    }
}

impl Iterator for SlotWalk {
    type Item = Slot;

    fn next(&mut self) -> Option<Slot> {
        if self.channels == 0 || self.bit_depth == 0 {
            return None;
        }
        loop {
            if self.pixel >= self.len {
                return None;
            }
            let index = self.pixel + self.channel;
            if self.channel >= self.channels || index >= self.len {
                self.pixel += self.stride;
                self.channel = 0;
                self.plane = 0;
                continue;
            }
            if self.plane >= self.bit_depth {
                self.channel += 1;
                self.plane = 0;
                continue;
            }
            let slot = Slot { index, plane: self.plane };
            self.plane += 1;
            return Some(slot);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slots(len: usize, stride: usize, channels: usize, depth: u8) -> Vec<(usize, u8)> {
        SlotWalk::new(len, stride, channels, depth).map(|s| (s.index, s.plane)).collect()
    }

    #[test]
    fn pixel_major_channel_then_plane() {
        assert_eq!(
            slots(6, 3, 2, 2),
            [(0, 0), (0, 1), (1, 0), (1, 1), (3, 0), (3, 1), (4, 0), (4, 1)]
        );
    }

    #[test]
    fn alpha_channel_skipped_with_three_channels() {
        let idx: Vec<usize> = slots(8, 4, 3, 1).into_iter().map(|(i, _)| i).collect();
        assert_eq!(idx, [0, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn partial_last_pixel() {
        // 5 bytes at stride 3: second pixel only has channels 3 and 4.
        let idx: Vec<usize> = slots(5, 3, 3, 1).into_iter().map(|(i, _)| i).collect();
        assert_eq!(idx, [0, 1, 2, 3, 4]);
    }

    #[test]
    fn slot_count() {
        assert_eq!(SlotWalk::new(12 * 3, 3, 3, 4).count(), 12 * 3 * 4);
        assert_eq!(SlotWalk::new(0, 3, 3, 1).count(), 0);
        assert_eq!(SlotWalk::new(9, 3, 0, 1).count(), 0);
    }
}
