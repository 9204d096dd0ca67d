// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Bit-level I/O for the embedded stream.
//!
//! Both [`BitReader`] and [`BitWriter`] operate in LSB-first bit order:
//! bit 0 of byte 0 is the first bit of the stream.

/// Yields the bits of a byte slice, LSB-first.
pub struct BitReader<'a> {
    data: &'a [u8],
    pos: usize,
    bit: u8,
}

impl<'a> BitReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, bit: 0 }
    }

    /// Read the next bit (0 or 1), or `None` at the end of data.
    pub fn read_bit(&mut self) -> Option<u8> {
        let byte = *self.data.get(self.pos)?;
        let val = (byte >> self.bit) & 1;
        self.bit += 1;
        if self.bit == 8 {
            self.bit = 0;
            self.pos += 1;
        }
        Some(val)
    }

    /// Bits not yet read.
    pub fn remaining(&self) -> usize {
        (self.data.len() - self.pos) * 8 - self.bit as usize
    }
}

impl Iterator for BitReader<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        self.read_bit()
    }
}

/// Packs bits into bytes, LSB-first.
pub struct BitWriter {
    buf: Vec<u8>,
    bit: u8,
}

impl BitWriter {
    pub fn with_capacity(bytes: usize) -> Self {
        Self { buf: Vec::with_capacity(bytes), bit: 0 }
    }

    /// Append one bit (only the lowest bit of `val` is used).
    pub fn write_bit(&mut self, val: u8) {
        if self.bit == 0 {
            self.buf.push(0);
        }
        if val & 1 != 0 {
            if let Some(last) = self.buf.last_mut() {
                *last |= 1 << self.bit;
            }
        }
        self.bit = (self.bit + 1) % 8;
    }

    /// Finish and return the bytes. A trailing partial byte is zero-padded.
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lsb_first_order() {
        let bits: Vec<u8> = BitReader::new(&[0b0000_0110, 0x80]).collect();
        assert_eq!(bits, [0, 1, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn writer_packs_lsb_first() {
        let mut w = BitWriter::with_capacity(1);
        for bit in [1, 0, 1] {
            w.write_bit(bit);
        }
        assert_eq!(w.into_bytes(), vec![0b0000_0101]);
    }

    #[test]
    fn reader_writer_agree() {
        let data = [0xDE, 0xAD, 0xBE, 0xEF, 0x00, 0x7F];
        let mut w = BitWriter::with_capacity(data.len());
        let mut r = BitReader::new(&data);
        assert_eq!(r.remaining(), 48);
        while let Some(bit) = r.read_bit() {
            w.write_bit(bit);
        }
        assert_eq!(r.remaining(), 0);
        assert_eq!(w.into_bytes(), data);
    }
}
