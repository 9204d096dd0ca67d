// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # bmpm-core
//!
//! Byte-level BMP manipulation:
//!
//! - **Container** (`bmp`): parse and validate BMP files with any of the
//!   40/52/56/108/124-byte DIB headers, keep the headers byte-exact, and
//!   reassemble the file around a possibly modified pixel buffer.
//! - **Metadata** (`metadata`): attach an ordered key/value set as a
//!   CRC-protected `BMPM` block after the declared end of the image,
//!   optionally sealed with a password.
//! - **Steganography** (`stego`): hide a length-prefixed payload in the low
//!   bits of 24/32-bit pixel channels, optionally sealed with a password.
//!
//! Sealing (`crypto`) is AES-256-GCM with a PBKDF2-HMAC-SHA-256 key and is
//! shared by both features. It is behind the default `crypto` feature.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use bmpm_core::{BmpDocument, LsbParams};
//!
//! let mut doc = BmpDocument::load_file("cover.bmp").unwrap();
//! doc.stego_hide(b"secret message", LsbParams::default(), Some("passphrase")).unwrap();
//! doc.add_metadata("author", "alice", None).unwrap();
//! doc.save("stego.bmp").unwrap();
//!
//! let mut doc = BmpDocument::load_file("stego.bmp").unwrap();
//! let hidden = doc.stego_extract(LsbParams::default(), Some("passphrase")).unwrap();
//! assert_eq!(hidden, b"secret message");
//! ```

pub mod bmp;
pub mod crypto;
pub mod metadata;
pub mod stego;

pub use bmp::error::{BmpError, Result as BmpResult};
pub use bmp::{BmpDocument, BmpInfo, SaveError};
pub use crypto::CryptoError;
pub use metadata::{Metadata, MetadataError, MetadataStorage, MetadataValue};
pub use stego::{LsbParams, LsbStego, StegoError};
