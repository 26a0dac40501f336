//! Container corruption testing utilities
//!
//! Provides utilities for damaging an encoded HVF stream in controlled ways
//! to test that decoding fails cleanly with the right error.
//!
//! # Corruption Types
//!
//! - Truncation: Removes bytes from the stream tail (simulates a short read)
//! - Garbage: Appends bytes after the payload
//! - Partial record: Appends the first fields of a record and stops
//! - Bit rot: Flips bytes in the record area
//! - Field patching: Overwrites a header or record field with a chosen value
//!
//! # Example
//!
//! ```ignore
//! use hvf_format::testing::CorruptionTester;
//!
//! let mut tester = CorruptionTester::from_records(&records, Endian::Little)?;
//! tester.truncate_tail(1);
//! let verification = tester.verify_decode(&DecodeConfig::default());
//! assert!(!verification.decoded);
//! ```

use crate::config::DecodeConfig;
use crate::decoder::decode_with;
use crate::encoder::encode;
use crate::header::{detect_endian, HEADER_SIZE};
use hvf_core::{write_u32, write_u64, DecodeError, EncodeError, Endian, Record};

/// In-memory stream corruption utilities
#[derive(Debug, Clone)]
pub struct CorruptionTester {
    bytes: Vec<u8>,
    endian: Endian,
}

impl CorruptionTester {
    /// Wrap an encoded stream
    ///
    /// Field patches use the byte order named by the stream's marker, or
    /// little endian if the marker is already damaged.
    pub fn new(bytes: Vec<u8>) -> Self {
        let endian = bytes
            .get(0..4)
            .and_then(|m| <[u8; 4]>::try_from(m).ok())
            .and_then(detect_endian)
            .unwrap_or_default();
        CorruptionTester { bytes, endian }
    }

    /// Encode records and wrap the result
    pub fn from_records(records: &[Record], endian: Endian) -> Result<Self, EncodeError> {
        Ok(CorruptionTester {
            bytes: encode(records, endian)?,
            endian,
        })
    }

    /// Current stream contents
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume the tester, returning the stream
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Current stream length
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// True if the stream is empty
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Remove bytes from the stream tail
    ///
    /// Removes nothing if the stream is not longer than `bytes_to_remove`.
    pub fn truncate_tail(&mut self, bytes_to_remove: usize) -> TruncationResult {
        let original_size = self.bytes.len();
        if original_size <= bytes_to_remove {
            return TruncationResult {
                original_size,
                new_size: original_size,
                bytes_removed: 0,
            };
        }

        let new_size = original_size - bytes_to_remove;
        self.bytes.truncate(new_size);
        TruncationResult {
            original_size,
            new_size,
            bytes_removed: bytes_to_remove,
        }
    }

    /// Append garbage bytes after the current tail
    pub fn append_garbage(&mut self, garbage: &[u8]) -> GarbageResult {
        let original_size = self.bytes.len();
        self.bytes.extend_from_slice(garbage);
        GarbageResult {
            original_size,
            new_size: self.bytes.len(),
            bytes_appended: garbage.len(),
        }
    }

    /// Append pseudo-random garbage derived from `seed`
    pub fn append_seeded_garbage(&mut self, length: usize, seed: u64) -> GarbageResult {
        let garbage: Vec<u8> = (0..length)
            .map(|i| (seed.wrapping_mul(i as u64 + 1) >> 3) as u8)
            .collect();
        self.append_garbage(&garbage)
    }

    /// Append the start of a record that never finishes
    ///
    /// Writes a type tag and a name length of 8 followed by only 3 name bytes.
    pub fn create_partial_record(&mut self) -> GarbageResult {
        let mut partial = Vec::with_capacity(11);
        partial.extend_from_slice(&write_u32(0, self.endian));
        partial.extend_from_slice(&write_u32(8, self.endian));
        partial.extend_from_slice(b"par");
        self.append_garbage(&partial)
    }

    /// XOR the byte at `offset` with `mask`
    ///
    /// Returns false if `offset` is past the end.
    pub fn flip_byte(&mut self, offset: usize, mask: u8) -> bool {
        match self.bytes.get_mut(offset) {
            Some(byte) => {
                *byte ^= mask;
                true
            }
            None => false,
        }
    }

    /// Corrupt `count` distinct bytes in the record area
    ///
    /// Positions and masks are derived from `seed`, so a failing case can be
    /// replayed. The header is left intact. A position is never hit twice,
    /// and `count` is clamped to the record area length.
    pub fn corrupt_bytes(&mut self, count: usize, seed: u64) -> CorruptionResult {
        if self.bytes.len() <= HEADER_SIZE {
            return CorruptionResult {
                bytes_corrupted: 0,
                positions: Vec::new(),
            };
        }

        let body_len = self.bytes.len() - HEADER_SIZE;
        let target = count.min(body_len);
        let mut positions = Vec::with_capacity(target);
        let mut i = 0u64;
        while positions.len() < target {
            let pos_seed = seed.wrapping_mul(i + 1).wrapping_add(0x9E37_79B9);
            i += 1;
            let mut pos = HEADER_SIZE + (pos_seed as usize % body_len);
            // A second flip at the same byte could cancel the first
            while positions.contains(&pos) {
                pos = HEADER_SIZE + (pos - HEADER_SIZE + 1) % body_len;
            }
            let xor_value = (pos_seed >> 8) as u8;
            // At least one bit flips
            self.bytes[pos] ^= xor_value.max(1);
            positions.push(pos);
        }

        CorruptionResult {
            bytes_corrupted: positions.len(),
            positions,
        }
    }

    /// Overwrite a `u32` field at `offset` in the stream's byte order
    ///
    /// Returns false if the field would extend past the end.
    pub fn set_u32_at(&mut self, offset: usize, value: u32) -> bool {
        self.patch(offset, &write_u32(value, self.endian))
    }

    /// Overwrite a `u64` field at `offset` in the stream's byte order
    ///
    /// Returns false if the field would extend past the end.
    pub fn set_u64_at(&mut self, offset: usize, value: u64) -> bool {
        self.patch(offset, &write_u64(value, self.endian))
    }

    fn patch(&mut self, offset: usize, field: &[u8]) -> bool {
        match self.bytes.get_mut(offset..offset + field.len()) {
            Some(slot) => {
                slot.copy_from_slice(field);
                true
            }
            None => false,
        }
    }

    /// Decode the current stream and report the outcome
    pub fn verify_decode(&self, config: &DecodeConfig) -> DecodeVerification {
        match decode_with(&self.bytes, config) {
            Ok(decoded) => DecodeVerification {
                decoded: true,
                error: None,
                records_decoded: decoded.records.len(),
            },
            Err(e) => DecodeVerification {
                decoded: false,
                error: Some(e),
                records_decoded: 0,
            },
        }
    }
}

/// Result of tail truncation
#[derive(Debug)]
pub struct TruncationResult {
    /// Original stream length
    pub original_size: usize,
    /// Stream length after truncation
    pub new_size: usize,
    /// Bytes removed
    pub bytes_removed: usize,
}

/// Result of appending garbage
#[derive(Debug)]
pub struct GarbageResult {
    /// Original stream length
    pub original_size: usize,
    /// Stream length after append
    pub new_size: usize,
    /// Bytes appended
    pub bytes_appended: usize,
}

/// Result of byte corruption
#[derive(Debug)]
pub struct CorruptionResult {
    /// Total bytes corrupted
    pub bytes_corrupted: usize,
    /// Offsets that were modified, in order
    pub positions: Vec<usize>,
}

/// Result of a verification decode
#[derive(Debug)]
pub struct DecodeVerification {
    /// Whether decoding succeeded
    pub decoded: bool,
    /// Error if decoding failed
    pub error: Option<DecodeError>,
    /// Number of records decoded
    pub records_decoded: usize,
}
