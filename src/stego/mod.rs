// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Least-significant-bit steganography over BMP pixel data.
//!
//! The embedded stream is a 32-bit little-endian length followed by the
//! payload bytes, expanded LSB-first and written into the low `bit_depth`
//! bits of the first `channels` bytes of every pixel (see [`walk`] for the
//! exact order). With a password the payload is sealed through
//! [`crate::crypto`] before embedding, and the capacity check is made
//! against the sealed length.
//!
//! Only uncompressed (`BI_RGB`) 24- and 32-bit carriers are accepted.

pub mod bitio;
pub mod capacity;
pub mod embed;
pub mod error;
pub mod extract;
pub mod walk;

pub use error::StegoError;

use std::borrow::Cow;

use crate::bmp::tables::BI_RGB;
use crate::bmp::BmpDocument;
use crate::crypto;
use error::Result;

/// Bits per channel used when none are given.
pub const DEFAULT_BIT_DEPTH: u8 = 1;
/// Channels per pixel used when none are given (B, G, R).
pub const DEFAULT_CHANNELS: u8 = 3;

/// How many low bits of how many channel bytes carry payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LsbParams {
    /// Low bits overwritten per channel byte (1–8).
    pub bit_depth: u8,
    /// Leading channel bytes used per pixel (capped at bytes per pixel).
    pub channels: u8,
}

impl Default for LsbParams {
    fn default() -> Self {
        Self { bit_depth: DEFAULT_BIT_DEPTH, channels: DEFAULT_CHANNELS }
    }
}

impl LsbParams {
    pub fn new(bit_depth: u8, channels: u8) -> Self {
        Self { bit_depth, channels }
    }

    /// # Errors
    /// [`StegoError::InvalidParameters`] unless `bit_depth` is 1–8 and
    /// `channels` is at least 1.
    pub fn validate(self) -> Result<Self> {
        if (1..=8).contains(&self.bit_depth) && self.channels >= 1 {
            Ok(self)
        } else {
            Err(StegoError::InvalidParameters { bit_depth: self.bit_depth, channels: self.channels })
        }
    }
}

/// Fail unless `doc` is an uncompressed 24- or 32-bit BMP.
pub fn check_format(doc: &BmpDocument) -> Result<()> {
    let bit_count = doc.bit_count();
    if !matches!(bit_count, 24 | 32) || doc.compression() != BI_RGB {
        return Err(StegoError::UnsupportedFormat {
            bit_count,
            compression: doc.compression_name(),
        });
    }
    Ok(())
}

/// Payload capacity of `doc` in bytes (negative when nothing fits).
pub fn capacity_of(doc: &BmpDocument, params: LsbParams) -> i64 {
    capacity::capacity(doc.width(), doc.height(), doc.bit_count(), params)
}

/// Recover a payload from `doc`. The format must already be checked.
fn extract_from(doc: &BmpDocument, params: LsbParams, password: Option<&str>) -> Result<Vec<u8>> {
    let params = params.validate()?;
    let password = crypto::non_empty(password);
    let stride = doc.bit_count() as usize / 8;
    let channels = capacity::usable_channels(doc.bit_count(), params.channels);

    let data = extract::extract_stream(
        doc.pixels(),
        stride,
        channels,
        params.bit_depth,
        capacity_of(doc, params),
    )?;
    log::debug!("extracted {} embedded bytes", data.len());

    match password {
        Some(pw) => Ok(crypto::open(&data, pw)?),
        None => Ok(data),
    }
}

/// Recover a payload from `doc` after checking its format.
///
/// # Errors
/// - [`StegoError::UnsupportedFormat`] for unsuitable carriers.
/// - [`StegoError::CorruptData`] if no plausible length prefix is present.
/// - [`StegoError::WrongPasswordOrCorrupt`] if the sealed payload does not open.
pub fn extract(doc: &BmpDocument, params: LsbParams, password: Option<&str>) -> Result<Vec<u8>> {
    check_format(doc)?;
    extract_from(doc, params, password)
}

/// LSB codec bound to one document.
///
/// Construction validates the carrier format once; [`hide`](Self::hide)
/// mutates the document's pixel buffer in place.
pub struct LsbStego<'a> {
    doc: &'a mut BmpDocument,
}

impl<'a> LsbStego<'a> {
    /// # Errors
    /// [`StegoError::UnsupportedFormat`] unless the document is an
    /// uncompressed 24- or 32-bit BMP.
    pub fn new(doc: &'a mut BmpDocument) -> Result<Self> {
        check_format(doc)?;
        Ok(Self { doc })
    }

    /// Payload capacity in bytes; see [`capacity::capacity`].
    pub fn capacity(&self, params: LsbParams) -> i64 {
        capacity_of(self.doc, params)
    }

    /// Hide `payload`, sealing it first when a non-empty `password` is given.
    ///
    /// The pixel buffer is only replaced if the whole stream fits.
    ///
    /// # Errors
    /// - [`StegoError::InvalidParameters`] for out-of-range parameters.
    /// - [`StegoError::CapacityExceeded`] if the embedded length (sealed
    ///   length with a password) exceeds [`capacity`](Self::capacity).
    /// - [`StegoError::Crypto`] if sealing is unavailable or fails.
    pub fn hide(&mut self, payload: &[u8], params: LsbParams, password: Option<&str>) -> Result<()> {
        let params = params.validate()?;
        let password = crypto::non_empty(password);
        let capacity = self.capacity(params);
        let needed = match password {
            Some(_) => crypto::sealed_len(payload.len()),
            None => payload.len(),
        };
        if i64::try_from(needed).map_or(true, |n| n > capacity) {
            return Err(StegoError::CapacityExceeded { needed, capacity });
        }

        let data: Cow<'_, [u8]> = match password {
            Some(pw) => Cow::Owned(crypto::seal(payload, pw)?),
            None => Cow::Borrowed(payload),
        };
        let stream = embed::build_stream(&data)
            .ok_or(StegoError::CapacityExceeded { needed: data.len(), capacity })?;

        let stride = self.doc.bit_count() as usize / 8;
        let channels = capacity::usable_channels(self.doc.bit_count(), params.channels);
        let mut pixels = self.doc.pixels().to_vec();
        embed::embed_stream(&mut pixels, stride, channels, params.bit_depth, &stream)?;
        self.doc.replace_pixels(pixels);

        log::debug!(
            "embedded {} bytes ({} payload) at {} bit(s) x {} channel(s)",
            stream.len(),
            payload.len(),
            params.bit_depth,
            channels
        );
        Ok(())
    }

    /// Recover the payload hidden with the same parameters and password.
    pub fn extract(&self, params: LsbParams, password: Option<&str>) -> Result<Vec<u8>> {
        extract_from(self.doc, params, password)
    }

    /// Hide UTF-8 text.
    pub fn hide_text(&mut self, text: &str, params: LsbParams, password: Option<&str>) -> Result<()> {
        self.hide(text.as_bytes(), params, password)
    }

    /// Recover text hidden with [`hide_text`](Self::hide_text).
    ///
    /// # Errors
    /// [`StegoError::InvalidUtf8`] if the payload is not UTF-8, plus every
    /// error of [`extract`](Self::extract).
    pub fn extract_text(&self, params: LsbParams, password: Option<&str>) -> Result<String> {
        let data = self.extract(params, password)?;
        String::from_utf8(data).map_err(|_| StegoError::InvalidUtf8)
    }
}
