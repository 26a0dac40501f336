//! Core types for the HVF container format
//!
//! This crate defines the foundational pieces every other layer builds on:
//! - Endian: byte order tag for a container
//! - ItemType: closed set of record payload kinds
//! - Record: one named, typed item
//! - Primitive codec: fixed-width integer and byte block encode/decode
//! - Error: decode, encode and value error taxonomy
//! - Limits: wire-format field widths

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod primitives;
pub mod record;
pub mod types;

pub use error::{DecodeError, EncodeError, ValueError};
pub use limits::{MAX_NAME_LEN, RECORD_OVERHEAD};
pub use primitives::{read_u32, read_u64, write_u32, write_u64, ByteReader, ByteWriter};
pub use record::Record;
pub use types::{Endian, ItemType};
