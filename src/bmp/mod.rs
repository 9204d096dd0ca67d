// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! BMP container parsing and reassembly.
//!
//! Supports:
//! - BITMAPINFOHEADER and the V2/V3/V4/V5 extensions (40, 52, 56, 108, 124 bytes)
//! - Palettes for bit depths up to 8
//! - Bottom-up and top-down row order (kept as a flag, never rewritten)
//! - A trailing metadata block after the declared file size ([`crate::metadata`])
//!
//! Does NOT support:
//! - BITMAPCOREHEADER (12 bytes) -- rejected at parse time
//! - Decoding pixels; the pixel buffer is treated as opaque bytes

pub mod error;
pub mod header;
pub mod tables;

use std::path::Path;

use error::{BmpError, Result};
use header::{DibHeader, FileHeader, FILE_HEADER_SIZE};

use crate::metadata::{self, Metadata, MetadataError, MetadataStorage, MetadataValue, TrailingMetadata};
use crate::stego::{self, LsbParams, LsbStego, StegoError};

/// Metadata attached to a document.
#[derive(Debug, Clone)]
enum MetadataSlot {
    Absent,
    Plain(Metadata),
    /// Entry payload of an encrypted block that has not been opened yet.
    Sealed(Vec<u8>),
}

/// Summary of a loaded document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BmpInfo {
    pub file_name: Option<String>,
    pub file_size: u32,
    pub header_type: String,
    pub width: i32,
    pub height: u32,
    pub bit_depth: u16,
    pub compression: String,
    pub has_metadata: bool,
    /// Empty while the metadata is still sealed.
    pub metadata_keys: Vec<String>,
}

impl BmpInfo {
    /// `WxH`.
    pub fn dimensions(&self) -> String {
        format!("{}x{}", self.width, self.height)
    }
}

/// An in-memory BMP file.
///
/// Created with [`BmpDocument::load`] or [`BmpDocument::load_file`]. Header,
/// DIB header, and palette bytes are kept exactly as read; the pixel buffer
/// may be modified (e.g. by [`stego_hide`](Self::stego_hide)) and metadata
/// may be attached. [`to_bytes`](Self::to_bytes) and [`save`](Self::save)
/// reassemble the file from the original prefix, the current pixel buffer,
/// and a freshly built metadata block.
#[derive(Debug, Clone)]
pub struct BmpDocument {
    file_name: Option<String>,
    file_header: FileHeader,
    dib_header: DibHeader,
    /// Everything before the pixel data, as read.
    prefix: Vec<u8>,
    palette: Option<Vec<u8>>,
    pixels: Vec<u8>,
    metadata: MetadataSlot,
    /// Used to seal metadata on save.
    metadata_password: Option<String>,
}

impl BmpDocument {
    /// Parse a BMP file from bytes.
    ///
    /// Bytes past the declared file size are tried as a metadata block.
    /// A malformed block is logged and ignored, so a damaged trailer never
    /// makes the image itself unreadable.
    ///
    /// # Errors
    /// - [`BmpError::TruncatedHeader`] if the file or DIB header is cut short.
    /// - [`BmpError::InvalidSignature`] if the data does not start with `BM`.
    /// - [`BmpError::UnsupportedHeader`] for DIB header sizes other than
    ///   40, 52, 56, 108, 124.
    /// - [`BmpError::InvalidPixelOffset`] if the pixel offset lies inside the
    ///   headers or past the data, or the declared file size ends before it.
    pub fn load(data: &[u8]) -> Result<Self> {
        let file_header = header::parse_file_header(data)?;
        let dib_header = header::parse_dib_header(data)?;

        let headers_end = FILE_HEADER_SIZE + dib_header.header_size as usize;
        let pixel_offset = file_header.pixel_offset as usize;
        let invalid_offset = || BmpError::InvalidPixelOffset {
            offset: file_header.pixel_offset,
            len: data.len(),
        };
        if pixel_offset < headers_end || pixel_offset > data.len() {
            return Err(invalid_offset());
        }

        let declared_end = file_header.file_size as usize;
        if declared_end < pixel_offset {
            return Err(invalid_offset());
        }
        let pixel_end = if declared_end > data.len() {
            log::warn!(
                "declared file size {} exceeds the {} bytes available; pixel data truncated",
                declared_end,
                data.len()
            );
            data.len()
        } else {
            declared_end
        };

        let palette = if dib_header.bit_count <= 8 && pixel_offset > headers_end {
            Some(data[headers_end..pixel_offset].to_vec())
        } else {
            None
        };

        let metadata = if data.len() > declared_end {
            read_metadata_slot(&data[declared_end..])
        } else {
            MetadataSlot::Absent
        };

        Ok(Self {
            file_name: None,
            prefix: data[..pixel_offset].to_vec(),
            pixels: data[pixel_offset..pixel_end].to_vec(),
            file_header,
            dib_header,
            palette,
            metadata,
            metadata_password: None,
        })
    }

    /// Read and parse a BMP file from disk.
    pub fn load_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        let mut doc = Self::load(&data)?;
        doc.file_name = path.file_name().map(|n| n.to_string_lossy().into_owned());
        Ok(doc)
    }

    /// Reassemble the file: original headers and palette, the current pixel
    /// buffer, then the metadata block if any.
    ///
    /// # Errors
    /// - [`BmpError::NoPixelData`] if the pixel buffer is empty.
    /// - Metadata encoding or sealing errors, wrapped as
    ///   [`SaveError::Metadata`].
    pub fn to_bytes(&self) -> std::result::Result<Vec<u8>, SaveError> {
        if self.pixels.is_empty() {
            return Err(SaveError::Bmp(BmpError::NoPixelData));
        }
        let mut out = Vec::with_capacity(self.prefix.len() + self.pixels.len());
        out.extend_from_slice(&self.prefix);
        out.extend_from_slice(&self.pixels);

        match &self.metadata {
            MetadataSlot::Absent => {}
            MetadataSlot::Plain(meta) => {
                out.extend_from_slice(&meta.to_block(self.metadata_password.as_deref())?);
            }
            MetadataSlot::Sealed(sealed) => {
                out.extend_from_slice(&metadata::block::build_block(sealed, true)?);
            }
        }
        Ok(out)
    }

    /// Write [`to_bytes`](Self::to_bytes) to `path` in one call.
    pub fn save(&self, path: impl AsRef<Path>) -> std::result::Result<(), SaveError> {
        let bytes = self.to_bytes()?;
        std::fs::write(path, bytes).map_err(|e| SaveError::Bmp(BmpError::Io(e)))
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn file_header(&self) -> &FileHeader {
        &self.file_header
    }

    pub fn dib_header(&self) -> &DibHeader {
        &self.dib_header
    }

    pub fn width(&self) -> i32 {
        self.dib_header.width
    }

    /// Absolute height; see [`is_top_down`](Self::is_top_down) for row order.
    pub fn height(&self) -> u32 {
        self.dib_header.height
    }

    pub fn is_top_down(&self) -> bool {
        self.dib_header.top_down
    }

    pub fn planes(&self) -> u16 {
        self.dib_header.planes
    }

    pub fn bit_count(&self) -> u16 {
        self.dib_header.bit_count
    }

    /// Declared file size from the file header.
    pub fn file_size(&self) -> u32 {
        self.file_header.file_size
    }

    pub fn pixel_data_offset(&self) -> u32 {
        self.file_header.pixel_offset
    }

    /// Raw compression code.
    pub fn compression(&self) -> u32 {
        self.dib_header.compression
    }

    pub fn compression_name(&self) -> String {
        tables::compression_name(self.dib_header.compression)
    }

    pub fn header_type(&self) -> String {
        tables::header_name(self.dib_header.header_size)
    }

    /// Pixels per metre, (x, y).
    pub fn resolution(&self) -> (i32, i32) {
        (self.dib_header.x_ppm, self.dib_header.y_ppm)
    }

    pub fn colors_used(&self) -> u32 {
        self.dib_header.colors_used
    }

    pub fn colors_important(&self) -> u32 {
        self.dib_header.colors_important
    }

    /// DIB header bytes beyond the first 40 (V2–V5 headers).
    pub fn dib_extension(&self) -> Option<&[u8]> {
        self.dib_header.extension()
    }

    pub fn palette(&self) -> Option<&[u8]> {
        self.palette.as_deref()
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    /// Mutable pixel bytes. The length is fixed; it must keep matching the
    /// declared file size.
    pub fn pixels_mut(&mut self) -> &mut [u8] {
        &mut self.pixels
    }

    pub(crate) fn replace_pixels(&mut self, pixels: Vec<u8>) {
        debug_assert_eq!(pixels.len(), self.pixels.len());
        self.pixels = pixels;
    }

    /// Summary for display.
    pub fn info(&self) -> BmpInfo {
        let (has_metadata, metadata_keys) = match &self.metadata {
            MetadataSlot::Absent => (false, Vec::new()),
            MetadataSlot::Plain(meta) => (true, meta.keys().map(str::to_string).collect()),
            MetadataSlot::Sealed(_) => (true, Vec::new()),
        };
        BmpInfo {
            file_name: self.file_name.clone(),
            file_size: self.file_size(),
            header_type: self.header_type(),
            width: self.width(),
            height: self.height(),
            bit_depth: self.bit_count(),
            compression: self.compression_name(),
            has_metadata,
            metadata_keys,
        }
    }

    // --- Metadata ---

    pub fn has_metadata(&self) -> bool {
        !matches!(self.metadata, MetadataSlot::Absent)
    }

    /// Whether the attached metadata is still encrypted.
    pub fn is_metadata_sealed(&self) -> bool {
        matches!(self.metadata, MetadataSlot::Sealed(_))
    }

    /// Return the attached metadata, opening a sealed block with `password`.
    ///
    /// A successfully opened block stays open and is re-sealed with the same
    /// password on save. Sealed metadata with no password (or without
    /// encryption support) is logged and reported as `None`.
    ///
    /// # Errors
    /// [`MetadataError::Crypto`] if the password is wrong or the sealed
    /// payload is damaged; entry errors if it decrypts to garbage.
    pub fn extract_metadata(&mut self, password: Option<&str>) -> std::result::Result<Option<&Metadata>, MetadataError> {
        if let MetadataSlot::Sealed(sealed) = &self.metadata {
            let Some(pw) = crate::crypto::non_empty(password) else {
                log::warn!("metadata is encrypted; supply a password to read it");
                return Ok(None);
            };
            if !crate::crypto::is_available() {
                log::warn!("metadata is encrypted but encryption support is not compiled in");
                return Ok(None);
            }
            let opened = metadata::open_sealed(sealed, pw)?;
            self.metadata = MetadataSlot::Plain(opened);
            self.metadata_password = Some(pw.to_string());
        }
        match &self.metadata {
            MetadataSlot::Plain(meta) => Ok(Some(meta)),
            _ => Ok(None),
        }
    }

    /// Add or replace one entry, stored as a trailing block.
    ///
    /// With a password the block is sealed on save; a sealed block already
    /// attached is opened with it first. `Some("")` counts as no password.
    ///
    /// # Errors
    /// - [`MetadataError::Sealed`] if existing metadata is sealed and no
    ///   password is given.
    /// - [`MetadataError::Crypto`] if the password does not open it.
    pub fn add_metadata(
        &mut self,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
        password: Option<&str>,
    ) -> std::result::Result<(), MetadataError> {
        self.add_metadata_with(MetadataStorage::EofAppend, key, value, password)
    }

    /// [`add_metadata`](Self::add_metadata) with an explicit storage method.
    ///
    /// # Errors
    /// [`MetadataError::NotSupported`] for anything but
    /// [`MetadataStorage::EofAppend`].
    pub fn add_metadata_with(
        &mut self,
        storage: MetadataStorage,
        key: impl Into<String>,
        value: impl Into<MetadataValue>,
        password: Option<&str>,
    ) -> std::result::Result<(), MetadataError> {
        storage.ensure_supported()?;
        let password = crate::crypto::non_empty(password);
        let meta = self.open_metadata_for_edit(password)?;
        meta.add(key, value);
        if let Some(pw) = password {
            self.metadata_password = Some(pw.to_string());
        }
        Ok(())
    }

    /// Replace all metadata. `password` controls sealing on save.
    pub fn set_metadata(&mut self, meta: Metadata, password: Option<&str>) {
        self.metadata = MetadataSlot::Plain(meta);
        self.metadata_password = crate::crypto::non_empty(password).map(str::to_string);
    }

    /// Remove one entry from open metadata.
    ///
    /// # Errors
    /// [`MetadataError::KeyNotFound`] if absent, [`MetadataError::Sealed`] if
    /// the metadata has not been opened.
    pub fn remove_metadata(&mut self, key: &str) -> std::result::Result<MetadataValue, MetadataError> {
        match &mut self.metadata {
            MetadataSlot::Plain(meta) => meta.remove(key),
            MetadataSlot::Sealed(_) => Err(MetadataError::Sealed),
            MetadataSlot::Absent => Err(MetadataError::KeyNotFound(key.to_string())),
        }
    }

    /// Drop all metadata; the next save writes a plain BMP.
    pub fn clear_metadata(&mut self) {
        self.metadata = MetadataSlot::Absent;
        self.metadata_password = None;
    }

    fn open_metadata_for_edit(&mut self, password: Option<&str>) -> std::result::Result<&mut Metadata, MetadataError> {
        if let MetadataSlot::Sealed(sealed) = &self.metadata {
            let pw = password.ok_or(MetadataError::Sealed)?;
            self.metadata = MetadataSlot::Plain(metadata::open_sealed(sealed, pw)?);
        }
        if matches!(self.metadata, MetadataSlot::Absent) {
            self.metadata = MetadataSlot::Plain(Metadata::new());
        }
        match &mut self.metadata {
            MetadataSlot::Plain(meta) => Ok(meta),
            _ => Err(MetadataError::Sealed),
        }
    }

    // --- Steganography ---

    /// Payload capacity in bytes for these parameters.
    ///
    /// # Errors
    /// [`StegoError::UnsupportedFormat`] for unsuitable carriers.
    pub fn stego_capacity(&self, params: LsbParams) -> std::result::Result<i64, StegoError> {
        stego::check_format(self)?;
        Ok(stego::capacity_of(self, params))
    }

    /// Hide `payload` in the pixel data; see [`LsbStego::hide`].
    pub fn stego_hide(
        &mut self,
        payload: &[u8],
        params: LsbParams,
        password: Option<&str>,
    ) -> std::result::Result<(), StegoError> {
        LsbStego::new(self)?.hide(payload, params, password)
    }

    /// Recover a hidden payload; see [`LsbStego::extract`].
    pub fn stego_extract(&self, params: LsbParams, password: Option<&str>) -> std::result::Result<Vec<u8>, StegoError> {
        stego::extract(self, params, password)
    }
}

fn read_metadata_slot(trailing: &[u8]) -> MetadataSlot {
    if !trailing.starts_with(&metadata::block::METADATA_MAGIC) {
        log::debug!("ignoring {} trailing bytes without a metadata block", trailing.len());
        return MetadataSlot::Absent;
    }
    match metadata::read_trailing(trailing) {
        Ok(TrailingMetadata::Plain(meta)) => MetadataSlot::Plain(meta),
        Ok(TrailingMetadata::Sealed(sealed)) => {
            if !crate::crypto::is_available() {
                log::warn!("encrypted metadata found but encryption support is not compiled in");
            }
            MetadataSlot::Sealed(sealed)
        }
        Err(e) => {
            log::warn!("ignoring unreadable metadata block: {e}");
            MetadataSlot::Absent
        }
    }
}

/// Errors from [`BmpDocument::to_bytes`] and [`BmpDocument::save`].
#[derive(Debug)]
pub enum SaveError {
    Bmp(BmpError),
    Metadata(MetadataError),
}

impl std::fmt::Display for SaveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Bmp(e) => write!(f, "{e}"),
            Self::Metadata(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for SaveError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Bmp(e) => Some(e),
            Self::Metadata(e) => Some(e),
        }
    }
}

impl From<BmpError> for SaveError {
    fn from(e: BmpError) -> Self {
        Self::Bmp(e)
    }
}

impl From<MetadataError> for SaveError {
    fn from(e: MetadataError) -> Self {
        Self::Metadata(e)
    }
}
