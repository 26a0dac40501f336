//! HVF - Endian-tagged binary container for named, typed records
//!
//! An HVF stream is a 24-byte header followed by a flat sequence of records,
//! each carrying a type tag, a name and a raw value. A marker at the start of
//! the stream tells readers which byte order the producer used, so files move
//! between little- and big-endian machines unchanged.
//!
//! # Quick Start
//!
//! ```ignore
//! use hvf::{Endian, Record, VirtualFile};
//!
//! let mut vf = VirtualFile::new().with_endian(Endian::Little);
//! vf.add_item(Record::u32("vertex_count", 3, vf.endian()));
//! vf.add_item(Record::f32_array("positions", &[0.0, 1.0, 0.5], vf.endian()));
//!
//! let bytes = vf.to_bytes()?;
//! let loaded = VirtualFile::from_bytes(&bytes)?;
//! ```
//!
//! # Architecture
//!
//! - `hvf-core`: records, item types, byte order, primitive codec, errors
//! - `hvf-format`: header, encoder, decoder, decoder configuration
//! - this crate: [`VirtualFile`] plus re-exports of both layers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod container;
mod error;

pub use container::VirtualFile;
pub use error::{Error, Result};

// Re-export the codec layers
pub use hvf_core::{DecodeError, EncodeError, Endian, ItemType, Record, ValueError};
pub use hvf_format::{
    decode, decode_with, encode, encode_into, encode_versioned, ConfigError, ContainerHeader,
    DecodeConfig, DecodedContainer, SkippedRecord, FORMAT_VERSION, HEADER_SIZE,
    SUPPORTED_VERSIONS,
};
