//! Container layer for HVF
//!
//! This crate turns record sequences into byte streams and back:
//!
//! - Header: 24-byte container header, endian detection, version check
//! - Encoder: deterministic single-buffer serialization
//! - Decoder: strict single-pass parsing with offset-tagged errors
//! - Config: decoder settings (lenient mode, payload limit), TOML loadable
//! - Corruption testing infrastructure

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config; // Decoder settings
pub mod decoder; // Stream to records
pub mod encoder; // Records to stream
pub mod header; // Header layout and endian marker
pub mod testing; // Stream corruption helpers

// === Re-exports ===
pub use config::{ConfigError, DecodeConfig};
pub use decoder::{decode, decode_with, DecodedContainer, SkippedRecord};
pub use encoder::{encode, encode_into, encode_versioned};
pub use header::{
    build_header, detect_endian, parse_header, ContainerHeader, ENDIAN_MARKER, FORMAT_VERSION,
    HEADER_SIZE, SUPPORTED_VERSIONS,
};
