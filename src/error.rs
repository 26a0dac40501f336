//! Error types for the container facade.
//!
//! Codec errors from the lower layers pass through unchanged, so callers can
//! still match on the exact decode failure and its offset.

use hvf_core::{DecodeError, EncodeError, ValueError};

/// Virtual file errors.
///
/// | Category | Variants | Description |
/// |----------|----------|-------------|
/// | Codec | `Decode`, `Encode` | Stream could not be read or written |
/// | Value | `Value` | Typed accessor mismatch |
/// | Lookup | `ItemNotFound`, `IndexOutOfRange` | No such record |
/// | System | `Io` | Underlying reader or writer failed |
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stream is not a valid container
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    /// Records cannot be written as a container
    #[error("encode failed: {0}")]
    Encode(#[from] EncodeError),

    /// Record value does not match the requested type
    #[error(transparent)]
    Value(#[from] ValueError),

    /// No record carries the requested name
    #[error("item not found: {0}")]
    ItemNotFound(String),

    /// Index past the end of the record list
    #[error("item index {index} out of range ({len} items)")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Number of records
        len: usize,
    },
}

/// Result type for virtual file operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Decode failure details, if this is one
    pub fn as_decode(&self) -> Option<&DecodeError> {
        match self {
            Error::Decode(e) => Some(e),
            _ => None,
        }
    }
}
