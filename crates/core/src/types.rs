//! Core types for the HVF format
//!
//! This module defines:
//! - Endian: byte order of every multi-byte integer in a container
//! - ItemType: discriminates the payload layout of a record

use serde::{Deserialize, Serialize};

/// Byte order of a container
///
/// Chosen once per stream and recorded by the endian marker. Every
/// multi-byte integer after the marker uses this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endian {
    /// Least significant byte first
    #[default]
    Little,
    /// Most significant byte first
    Big,
}

impl Endian {
    /// Byte order of the machine running this code
    pub fn native() -> Self {
        if cfg!(target_endian = "big") {
            Endian::Big
        } else {
            Endian::Little
        }
    }

    /// The opposite byte order
    pub fn swapped(self) -> Self {
        match self {
            Endian::Little => Endian::Big,
            Endian::Big => Endian::Little,
        }
    }
}

/// Record payload type tag
///
/// Each variant has a stable `u32` code written into the record's type field.
/// New kinds are added by appending a fresh code; codes are never reused.
///
/// - U32 = 0 .. F64 = 5 (scalars)
/// - Bytes = 6, Utf8 = 7
/// - U32Array = 8 .. F64Array = 13
///
/// Codes outside this set only appear at the decode boundary, as
/// `DecodeError::UnknownType`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u32)]
pub enum ItemType {
    /// 32-bit unsigned scalar
    U32 = 0,
    /// 32-bit signed scalar
    I32 = 1,
    /// 64-bit unsigned scalar
    U64 = 2,
    /// 64-bit signed scalar
    I64 = 3,
    /// IEEE-754 single precision scalar
    F32 = 4,
    /// IEEE-754 double precision scalar
    F64 = 5,
    /// Opaque byte blob
    Bytes = 6,
    /// UTF-8 string
    Utf8 = 7,
    /// Array of 32-bit unsigned integers
    U32Array = 8,
    /// Array of 32-bit signed integers
    I32Array = 9,
    /// Array of 64-bit unsigned integers
    U64Array = 10,
    /// Array of 64-bit signed integers
    I64Array = 11,
    /// Array of single precision floats
    F32Array = 12,
    /// Array of double precision floats
    F64Array = 13,
}

impl ItemType {
    /// Every recognized type, in code order
    pub const ALL: [ItemType; 14] = [
        ItemType::U32,
        ItemType::I32,
        ItemType::U64,
        ItemType::I64,
        ItemType::F32,
        ItemType::F64,
        ItemType::Bytes,
        ItemType::Utf8,
        ItemType::U32Array,
        ItemType::I32Array,
        ItemType::U64Array,
        ItemType::I64Array,
        ItemType::F32Array,
        ItemType::F64Array,
    ];

    /// Wire code of this type
    pub fn code(&self) -> u32 {
        *self as u32
    }

    /// Try to create from a wire code
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(ItemType::U32),
            1 => Some(ItemType::I32),
            2 => Some(ItemType::U64),
            3 => Some(ItemType::I64),
            4 => Some(ItemType::F32),
            5 => Some(ItemType::F64),
            6 => Some(ItemType::Bytes),
            7 => Some(ItemType::Utf8),
            8 => Some(ItemType::U32Array),
            9 => Some(ItemType::I32Array),
            10 => Some(ItemType::U64Array),
            11 => Some(ItemType::I64Array),
            12 => Some(ItemType::F32Array),
            13 => Some(ItemType::F64Array),
            _ => None,
        }
    }

    /// Width in bytes of one element of this type
    pub fn element_width(&self) -> usize {
        match self {
            ItemType::U32
            | ItemType::I32
            | ItemType::F32
            | ItemType::U32Array
            | ItemType::I32Array
            | ItemType::F32Array => 4,
            ItemType::U64
            | ItemType::I64
            | ItemType::F64
            | ItemType::U64Array
            | ItemType::I64Array
            | ItemType::F64Array => 8,
            ItemType::Bytes | ItemType::Utf8 => 1,
        }
    }

    /// True for single-element numeric types
    pub fn is_scalar(&self) -> bool {
        matches!(
            self,
            ItemType::U32
                | ItemType::I32
                | ItemType::U64
                | ItemType::I64
                | ItemType::F32
                | ItemType::F64
        )
    }

    /// True if a payload of `len` bytes is well-formed for this type
    ///
    /// Scalars need exactly one element, arrays a whole number of elements.
    /// Byte and string payloads accept any length.
    pub fn accepts_len(&self, len: usize) -> bool {
        if self.is_scalar() {
            len == self.element_width()
        } else {
            len % self.element_width() == 0
        }
    }

    /// Human-readable name
    pub fn name(&self) -> &'static str {
        match self {
            ItemType::U32 => "u32",
            ItemType::I32 => "i32",
            ItemType::U64 => "u64",
            ItemType::I64 => "i64",
            ItemType::F32 => "f32",
            ItemType::F64 => "f64",
            ItemType::Bytes => "bytes",
            ItemType::Utf8 => "utf8",
            ItemType::U32Array => "u32[]",
            ItemType::I32Array => "i32[]",
            ItemType::U64Array => "u64[]",
            ItemType::I64Array => "i64[]",
            ItemType::F32Array => "f32[]",
            ItemType::F64Array => "f64[]",
        }
    }
}
