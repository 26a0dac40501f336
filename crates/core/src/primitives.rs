//! Fixed-width integer and byte block codec
//!
//! Every field in an HVF stream is either a `u32`, a `u64`, or a raw byte
//! block. This module is the only place that converts single integers to and
//! from bytes; header fields and scalar records compose these calls. Array
//! payloads are converted in bulk by [`crate::record`] with byteorder's slice
//! helpers.
//!
//! Decoding goes through [`ByteReader`], which tracks the absolute offset of
//! the next unread byte so that truncation errors point at the exact field
//! that could not be completed.

use crate::error::DecodeError;
use crate::types::Endian;
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Encode a `u32` in the given byte order
pub fn write_u32(value: u32, endian: Endian) -> [u8; 4] {
    let mut buf = [0u8; 4];
    match endian {
        Endian::Little => LittleEndian::write_u32(&mut buf, value),
        Endian::Big => BigEndian::write_u32(&mut buf, value),
    }
    buf
}

/// Encode a `u64` in the given byte order
pub fn write_u64(value: u64, endian: Endian) -> [u8; 8] {
    let mut buf = [0u8; 8];
    match endian {
        Endian::Little => LittleEndian::write_u64(&mut buf, value),
        Endian::Big => BigEndian::write_u64(&mut buf, value),
    }
    buf
}

/// Decode a `u32` from the first four bytes of `bytes`
///
/// Fewer than four bytes is a truncation at offset 0.
pub fn read_u32(bytes: &[u8], endian: Endian) -> Result<u32, DecodeError> {
    ByteReader::new(bytes, endian).read_u32()
}

/// Decode a `u64` from the first eight bytes of `bytes`
///
/// Fewer than eight bytes is a truncation at offset 0.
pub fn read_u64(bytes: &[u8], endian: Endian) -> Result<u64, DecodeError> {
    ByteReader::new(bytes, endian).read_u64()
}

/// Offset-tracking reader over a borrowed byte slice
///
/// Reads never copy integers out of bounds: a read that needs more bytes
/// than remain returns `DecodeError::Truncated` carrying the absolute offset
/// of the field, and leaves the position unchanged.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
    base: u64,
    endian: Endian,
}

impl<'a> ByteReader<'a> {
    /// Create a reader positioned at the start of `buf`
    pub fn new(buf: &'a [u8], endian: Endian) -> Self {
        Self::with_base(buf, endian, 0)
    }

    /// Create a reader whose offsets are reported relative to `base`
    ///
    /// Used when `buf` is a tail slice of a larger stream.
    pub fn with_base(buf: &'a [u8], endian: Endian, base: u64) -> Self {
        ByteReader {
            buf,
            pos: 0,
            base,
            endian,
        }
    }

    /// Byte order used for integer reads
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Switch the byte order used for subsequent reads
    pub fn set_endian(&mut self, endian: Endian) {
        self.endian = endian;
    }

    /// Absolute offset of the next unread byte
    pub fn position(&self) -> u64 {
        self.base + self.pos as u64
    }

    /// Bytes consumed since the reader was created
    pub fn consumed(&self) -> usize {
        self.pos
    }

    /// Bytes left to read
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// True if every byte has been consumed
    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Unread tail of the buffer
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Fail with `Truncated` unless `needed` bytes remain
    pub fn require(&self, needed: u64) -> Result<(), DecodeError> {
        if (self.remaining() as u64) < needed {
            return Err(DecodeError::Truncated {
                offset: self.position(),
                needed,
                available: self.remaining() as u64,
            });
        }
        Ok(())
    }

    /// Take the next `len` bytes as a raw block
    pub fn take(&mut self, len: u64) -> Result<&'a [u8], DecodeError> {
        self.require(len)?;
        // `require` bounds `len` by `remaining()`, so it fits in usize
        let len = len as usize;
        let block = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(block)
    }

    /// Take the next four bytes as a fixed array
    pub fn take_array4(&mut self) -> Result<[u8; 4], DecodeError> {
        let mut out = [0u8; 4];
        out.copy_from_slice(self.take(4)?);
        Ok(out)
    }

    /// Read a `u32` in the reader's byte order
    pub fn read_u32(&mut self) -> Result<u32, DecodeError> {
        let bytes = self.take(4)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u32(bytes),
            Endian::Big => BigEndian::read_u32(bytes),
        })
    }

    /// Read a `u64` in the reader's byte order
    pub fn read_u64(&mut self) -> Result<u64, DecodeError> {
        let bytes = self.take(8)?;
        Ok(match self.endian {
            Endian::Little => LittleEndian::read_u64(bytes),
            Endian::Big => BigEndian::read_u64(bytes),
        })
    }
}

/// Appending writer over a caller-owned `Vec<u8>`
#[derive(Debug)]
pub struct ByteWriter<'a> {
    buf: &'a mut Vec<u8>,
    endian: Endian,
}

impl<'a> ByteWriter<'a> {
    /// Create a writer that appends to `buf`
    pub fn new(buf: &'a mut Vec<u8>, endian: Endian) -> Self {
        ByteWriter { buf, endian }
    }

    /// Byte order used for integer writes
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Append a `u32`
    pub fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&write_u32(value, self.endian));
    }

    /// Append a `u64`
    pub fn put_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&write_u64(value, self.endian));
    }

    /// Append a raw byte block unchanged
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Total length of the underlying buffer
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// True if the underlying buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}
