//! Error types for the HVF container format
//!
//! This module defines every failure the codec can report.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! Decode errors are structural and terminal: each one carries the absolute
//! byte offset at which the problem was detected so a producer can be debugged
//! from the error alone. Encode errors only arise from caller misuse.

use crate::types::ItemType;
use thiserror::Error;

/// Errors produced while decoding a byte stream
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// Endian marker matches neither byte ordering of the sentinel
    #[error("offset {offset}: corrupt header, endian marker {found:02x?} is not recognized")]
    CorruptHeader {
        /// Offset of the marker
        offset: u64,
        /// Marker bytes found in the stream
        found: [u8; 4],
    },

    /// Format version is not one this decoder understands
    #[error("offset {offset}: unsupported format version {version}")]
    UnsupportedVersion {
        /// Offset of the version field
        offset: u64,
        /// Version found in the stream
        version: u32,
    },

    /// Stream ends before a declared field completes
    #[error("offset {offset}: truncated, needed {needed} bytes but only {available} available")]
    Truncated {
        /// Offset at which the field starts
        offset: u64,
        /// Bytes the field requires
        needed: u64,
        /// Bytes left in the stream
        available: u64,
    },

    /// Declared payload size disagrees with the parsed record bytes
    #[error("offset {offset}: payload size mismatch, declared {declared} bytes, parsed {actual}")]
    SizeMismatch {
        /// Offset at which the mismatch was detected
        offset: u64,
        /// Payload size from the header
        declared: u64,
        /// Bytes consumed by parsed records
        actual: u64,
    },

    /// Declared item count disagrees with the records present
    #[error("offset {offset}: item count mismatch, declared {declared}, found {found}")]
    CountMismatch {
        /// Offset at which the mismatch was detected
        offset: u64,
        /// Item count from the header
        declared: u64,
        /// Records actually present
        found: u64,
    },

    /// Bytes remain after the declared payload
    #[error("offset {offset}: {trailing} trailing bytes after payload")]
    TrailingData {
        /// Offset of the first trailing byte
        offset: u64,
        /// Number of trailing bytes
        trailing: u64,
    },

    /// Record type tag outside the recognized set
    #[error("offset {offset}: unknown record type {code}")]
    UnknownType {
        /// Offset of the type tag
        offset: u64,
        /// Raw type code
        code: u32,
    },

    /// Header declares a payload larger than the configured limit
    #[error("offset {offset}: declared payload of {declared} bytes exceeds limit of {limit}")]
    PayloadLimit {
        /// Offset of the payload size field
        offset: u64,
        /// Payload size from the header
        declared: u64,
        /// Configured maximum
        limit: u64,
    },
}

impl DecodeError {
    /// Byte offset at which the error was detected
    pub fn offset(&self) -> u64 {
        match self {
            DecodeError::CorruptHeader { offset, .. }
            | DecodeError::UnsupportedVersion { offset, .. }
            | DecodeError::Truncated { offset, .. }
            | DecodeError::SizeMismatch { offset, .. }
            | DecodeError::CountMismatch { offset, .. }
            | DecodeError::TrailingData { offset, .. }
            | DecodeError::UnknownType { offset, .. }
            | DecodeError::PayloadLimit { offset, .. } => *offset,
        }
    }

    /// True if the stream ended before a declared field completed
    pub fn is_truncation(&self) -> bool {
        matches!(self, DecodeError::Truncated { .. })
    }
}

/// Errors produced while encoding records
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// Record name does not fit the 32-bit length field
    #[error("record {index}: name of {len} bytes does not fit a u32 length")]
    NameTooLong {
        /// Position of the record in the input sequence
        index: usize,
        /// Name length in bytes
        len: usize,
    },

    /// Total payload size does not fit the 64-bit size field
    #[error("total payload size overflows u64")]
    PayloadTooLarge,

    /// Requested format version is not one this library can read back
    #[error("cannot write unsupported format version {version}")]
    UnsupportedVersion {
        /// Requested version
        version: u32,
    },
}

/// Errors produced by typed value accessors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    /// Record holds a different type than requested
    #[error("type mismatch: expected {expected:?}, record holds {actual:?}")]
    TypeMismatch {
        /// Type the accessor reads
        expected: ItemType,
        /// Type stored in the record
        actual: ItemType,
    },

    /// Payload length is not valid for the record type
    #[error("value of {len} bytes is not a valid {item_type:?} payload")]
    LengthMismatch {
        /// Record type
        item_type: ItemType,
        /// Payload length in bytes
        len: usize,
    },

    /// `Utf8` record payload is not valid UTF-8
    #[error("value is not valid UTF-8")]
    InvalidUtf8,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_offset() {
        let errors = [
            DecodeError::CorruptHeader {
                offset: 0,
                found: [0; 4],
            },
            DecodeError::UnsupportedVersion {
                offset: 4,
                version: 9,
            },
            DecodeError::Truncated {
                offset: 24,
                needed: 4,
                available: 1,
            },
            DecodeError::SizeMismatch {
                offset: 48,
                declared: 20,
                actual: 24,
            },
            DecodeError::CountMismatch {
                offset: 48,
                declared: 2,
                found: 1,
            },
            DecodeError::TrailingData {
                offset: 48,
                trailing: 1,
            },
            DecodeError::UnknownType {
                offset: 24,
                code: 99,
            },
            DecodeError::PayloadLimit {
                offset: 16,
                declared: 100,
                limit: 10,
            },
        ];
        let offsets: Vec<u64> = errors.iter().map(|e| e.offset()).collect();
        assert_eq!(offsets, vec![0, 4, 24, 48, 48, 48, 24, 16]);
    }

    #[test]
    fn test_error_display_truncated() {
        let err = DecodeError::Truncated {
            offset: 24,
            needed: 24,
            available: 23,
        };
        let msg = err.to_string();
        assert!(msg.contains("offset 24"));
        assert!(msg.contains("truncated"));
        assert!(msg.contains("23"));
        assert!(err.is_truncation());
    }

    #[test]
    fn test_error_display_corrupt_header() {
        let err = DecodeError::CorruptHeader {
            offset: 0,
            found: [0xde, 0xad, 0xbe, 0xef],
        };
        let msg = err.to_string();
        assert!(msg.contains("corrupt header"));
        assert!(msg.contains("de"));
        assert!(!err.is_truncation());
    }

    #[test]
    fn test_error_display_unknown_type() {
        let err = DecodeError::UnknownType {
            offset: 24,
            code: 1234,
        };
        assert!(err.to_string().contains("1234"));
    }

    #[test]
    fn test_encode_error_display() {
        let err = EncodeError::NameTooLong { index: 3, len: 10 };
        let msg = err.to_string();
        assert!(msg.contains("record 3"));
        assert!(EncodeError::PayloadTooLarge.to_string().contains("overflows"));
    }

    #[test]
    fn test_value_error_display() {
        let err = ValueError::TypeMismatch {
            expected: ItemType::U32,
            actual: ItemType::F64,
        };
        let msg = err.to_string();
        assert!(msg.contains("U32"));
        assert!(msg.contains("F64"));
    }
}
