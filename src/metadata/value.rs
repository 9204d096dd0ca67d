// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Metadata values and their byte representation.
//!
//! On the wire every value is an opaque byte string. Text, integers, and
//! floats are written as UTF-8 text; structured values as JSON text; raw
//! bytes pass through. Decoding reverses this by trying UTF-8, then JSON,
//! so a value's variant is inferred from its bytes.

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

/// A single metadata value.
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue {
    Text(String),
    Bytes(Vec<u8>),
    Int(i64),
    Float(f64),
    /// Booleans, null, arrays, objects, and integers above `i64::MAX`.
    Json(Value),
}

impl MetadataValue {
    /// Wire bytes for this value.
    pub fn to_bytes(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Text(s) => Cow::Borrowed(s.as_bytes()),
            Self::Bytes(b) => Cow::Borrowed(b),
            Self::Int(i) => Cow::Owned(i.to_string().into_bytes()),
            // Debug keeps the decimal point (`1.0`) so the value reads back as a float.
            Self::Float(x) => Cow::Owned(format!("{x:?}").into_bytes()),
            Self::Json(v) => Cow::Owned(v.to_string().into_bytes()),
        }
    }

    /// Infer a value from wire bytes: UTF-8 → JSON → text, else raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        match std::str::from_utf8(bytes) {
            Ok(text) => match serde_json::from_str::<Value>(text) {
                Ok(v) => Self::from_json(v),
                Err(_) => Self::Text(text.to_string()),
            },
            Err(_) => Self::Bytes(bytes.to_vec()),
        }
    }

    /// Map a JSON value onto the narrowest variant.
    pub fn from_json(v: Value) -> Self {
        match v {
            Value::String(s) => Self::Text(s),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Self::Int(i),
                // Integers past i64 stay exact.
                None if n.is_u64() => Self::Json(Value::Number(n)),
                None => n.as_f64().map(Self::Float).unwrap_or(Self::Json(Value::Number(n))),
            },
            other => Self::Json(other),
        }
    }

    /// JSON form used in reports. Raw bytes become a lowercase hex string.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::Bytes(b) => Value::String(b.iter().map(|byte| format!("{byte:02x}")).collect()),
            Self::Int(i) => Value::from(*i),
            Self::Float(x) => Value::from(*x),
            Self::Json(v) => v.clone(),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Bytes(b) => write!(f, "<{} bytes>", b.len()),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x:?}"),
            Self::Json(v) => write!(f, "{v}"),
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<u8>> for MetadataValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<&[u8]> for MetadataValue {
    fn from(b: &[u8]) -> Self {
        Self::Bytes(b.to_vec())
    }
}

impl From<i64> for MetadataValue {
    fn from(i: i64) -> Self {
        Self::Int(i)
    }
}

impl From<i32> for MetadataValue {
    fn from(i: i32) -> Self {
        Self::Int(i64::from(i))
    }
}

impl From<f64> for MetadataValue {
    fn from(x: f64) -> Self {
        Self::Float(x)
    }
}

impl From<Value> for MetadataValue {
    fn from(v: Value) -> Self {
        Self::from_json(v)
    }
}
