// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for BMP container parsing and writing.

use std::fmt;
use std::io;

/// Errors that can occur while loading or saving a BMP file.
#[derive(Debug)]
pub enum BmpError {
    /// The first two bytes are not `BM`.
    InvalidSignature([u8; 2]),
    /// DIB header size is not one of 40, 52, 56, 108, 124.
    UnsupportedHeader(u32),
    /// Input ends before the file header or the declared DIB header.
    TruncatedHeader,
    /// Pixel data offset points inside the headers or past the end of input.
    InvalidPixelOffset { offset: u32, len: usize },
    /// Nothing to save: the document has no pixel data.
    NoPixelData,
    /// Reading or writing the file failed.
    Io(io::Error),
}

impl fmt::Display for BmpError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidSignature(sig) => {
                write!(f, "invalid BMP signature: {:02X} {:02X} (expected 'BM')", sig[0], sig[1])
            }
            Self::UnsupportedHeader(size) => write!(f, "unsupported DIB header size: {size}"),
            Self::TruncatedHeader => write!(f, "BMP header is truncated"),
            Self::InvalidPixelOffset { offset, len } => {
                write!(f, "invalid pixel data offset {offset} (file is {len} bytes)")
            }
            Self::NoPixelData => write!(f, "document has no pixel data"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for BmpError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for BmpError {
    fn from(e: io::Error) -> Self {
        Self::Io(e)
    }
}

pub type Result<T> = std::result::Result<T, BmpError>;
