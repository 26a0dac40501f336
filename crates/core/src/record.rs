//! Named, typed records
//!
//! A [`Record`] is one item of a container: a type tag, an opaque name, and a
//! value payload whose layout is determined by the tag. The payload length
//! written to the stream is always taken from the payload itself.
//!
//! Numeric payloads are stored in the byte order of the container they are
//! written to, so the typed constructors and accessors take an [`Endian`].
//! Build records with the same endian you encode with.
//!
//! Names are compared byte-for-byte. Duplicate names are allowed; resolving
//! them is left to the caller.

use crate::error::ValueError;
use crate::limits::record_len;
use crate::primitives::{read_u32, read_u64, write_u32, write_u64};
use crate::types::{Endian, ItemType};
use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// One named, typed item
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Record {
    item_type: ItemType,
    name: Vec<u8>,
    value: Vec<u8>,
}

impl Record {
    /// Create a record from a type tag, a name, and a raw payload
    pub fn new(item_type: ItemType, name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Record {
            item_type,
            name: name.into(),
            value: value.into(),
        }
    }

    /// Type tag
    pub fn item_type(&self) -> ItemType {
        self.item_type
    }

    /// Name bytes
    pub fn name(&self) -> &[u8] {
        &self.name
    }

    /// Name as UTF-8, if it is valid UTF-8
    pub fn name_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.name).ok()
    }

    /// True if this record's name equals `name`
    pub fn has_name(&self, name: impl AsRef<[u8]>) -> bool {
        self.name == name.as_ref()
    }

    /// Replace the name
    pub fn set_name(&mut self, name: impl Into<Vec<u8>>) {
        self.name = name.into();
    }

    /// Raw payload bytes
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Payload length as written to the value length field
    pub fn value_len(&self) -> u64 {
        self.value.len() as u64
    }

    /// Consume the record, returning its payload
    pub fn into_value(self) -> Vec<u8> {
        self.value
    }

    /// Bytes this record occupies in a stream
    ///
    /// type tag + name length + name + value length + value. Saturates at
    /// `u64::MAX`, which no real allocation can reach.
    pub fn serialized_len(&self) -> u64 {
        record_len(self.name.len(), self.value.len()).unwrap_or(u64::MAX)
    }

    // ========================================================================
    // Typed constructors
    // ========================================================================

    /// `u32` scalar record
    pub fn u32(name: impl Into<Vec<u8>>, value: u32, endian: Endian) -> Self {
        Record::new(ItemType::U32, name, write_u32(value, endian).to_vec())
    }

    /// `i32` scalar record
    pub fn i32(name: impl Into<Vec<u8>>, value: i32, endian: Endian) -> Self {
        Record::new(ItemType::I32, name, write_u32(value as u32, endian).to_vec())
    }

    /// `u64` scalar record
    pub fn u64(name: impl Into<Vec<u8>>, value: u64, endian: Endian) -> Self {
        Record::new(ItemType::U64, name, write_u64(value, endian).to_vec())
    }

    /// `i64` scalar record
    pub fn i64(name: impl Into<Vec<u8>>, value: i64, endian: Endian) -> Self {
        Record::new(ItemType::I64, name, write_u64(value as u64, endian).to_vec())
    }

    /// `f32` scalar record, stored as its IEEE 754 bits
    pub fn f32(name: impl Into<Vec<u8>>, value: f32, endian: Endian) -> Self {
        Record::new(ItemType::F32, name, write_u32(value.to_bits(), endian).to_vec())
    }

    /// `f64` scalar record, stored as its IEEE 754 bits
    pub fn f64(name: impl Into<Vec<u8>>, value: f64, endian: Endian) -> Self {
        Record::new(ItemType::F64, name, write_u64(value.to_bits(), endian).to_vec())
    }

    /// Opaque byte blob record
    pub fn bytes(name: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Record::new(ItemType::Bytes, name, value)
    }

    /// UTF-8 string record
    pub fn utf8(name: impl Into<Vec<u8>>, value: &str) -> Self {
        Record::new(ItemType::Utf8, name, value.as_bytes())
    }

    /// `u32` array record
    pub fn u32_array(name: impl Into<Vec<u8>>, values: &[u32], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 4];
        match endian {
            Endian::Little => LittleEndian::write_u32_into(values, &mut buf),
            Endian::Big => BigEndian::write_u32_into(values, &mut buf),
        }
        Record::new(ItemType::U32Array, name, buf)
    }

    /// `i32` array record
    pub fn i32_array(name: impl Into<Vec<u8>>, values: &[i32], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 4];
        match endian {
            Endian::Little => LittleEndian::write_i32_into(values, &mut buf),
            Endian::Big => BigEndian::write_i32_into(values, &mut buf),
        }
        Record::new(ItemType::I32Array, name, buf)
    }

    /// `u64` array record
    pub fn u64_array(name: impl Into<Vec<u8>>, values: &[u64], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 8];
        match endian {
            Endian::Little => LittleEndian::write_u64_into(values, &mut buf),
            Endian::Big => BigEndian::write_u64_into(values, &mut buf),
        }
        Record::new(ItemType::U64Array, name, buf)
    }

    /// `i64` array record
    pub fn i64_array(name: impl Into<Vec<u8>>, values: &[i64], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 8];
        match endian {
            Endian::Little => LittleEndian::write_i64_into(values, &mut buf),
            Endian::Big => BigEndian::write_i64_into(values, &mut buf),
        }
        Record::new(ItemType::I64Array, name, buf)
    }

    /// `f32` array record
    pub fn f32_array(name: impl Into<Vec<u8>>, values: &[f32], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 4];
        match endian {
            Endian::Little => LittleEndian::write_f32_into(values, &mut buf),
            Endian::Big => BigEndian::write_f32_into(values, &mut buf),
        }
        Record::new(ItemType::F32Array, name, buf)
    }

    /// `f64` array record
    pub fn f64_array(name: impl Into<Vec<u8>>, values: &[f64], endian: Endian) -> Self {
        let mut buf = vec![0u8; values.len() * 8];
        match endian {
            Endian::Little => LittleEndian::write_f64_into(values, &mut buf),
            Endian::Big => BigEndian::write_f64_into(values, &mut buf),
        }
        Record::new(ItemType::F64Array, name, buf)
    }

    // ========================================================================
    // Typed accessors
    // ========================================================================

    /// Payload checked against the expected type and its length rule
    fn payload_as(&self, expected: ItemType) -> Result<&[u8], ValueError> {
        if self.item_type != expected {
            return Err(ValueError::TypeMismatch {
                expected,
                actual: self.item_type,
            });
        }
        if !expected.accepts_len(self.value.len()) {
            return Err(ValueError::LengthMismatch {
                item_type: expected,
                len: self.value.len(),
            });
        }
        Ok(&self.value)
    }

    /// Scalar payload as a 32-bit word
    fn word32(&self, expected: ItemType, endian: Endian) -> Result<u32, ValueError> {
        let b = self.payload_as(expected)?;
        read_u32(b, endian).map_err(|_| ValueError::LengthMismatch {
            item_type: expected,
            len: b.len(),
        })
    }

    /// Scalar payload as a 64-bit word
    fn word64(&self, expected: ItemType, endian: Endian) -> Result<u64, ValueError> {
        let b = self.payload_as(expected)?;
        read_u64(b, endian).map_err(|_| ValueError::LengthMismatch {
            item_type: expected,
            len: b.len(),
        })
    }

    /// Read a `u32` scalar
    pub fn as_u32(&self, endian: Endian) -> Result<u32, ValueError> {
        self.word32(ItemType::U32, endian)
    }

    /// Read an `i32` scalar
    pub fn as_i32(&self, endian: Endian) -> Result<i32, ValueError> {
        self.word32(ItemType::I32, endian).map(|w| w as i32)
    }

    /// Read a `u64` scalar
    pub fn as_u64(&self, endian: Endian) -> Result<u64, ValueError> {
        self.word64(ItemType::U64, endian)
    }

    /// Read an `i64` scalar
    pub fn as_i64(&self, endian: Endian) -> Result<i64, ValueError> {
        self.word64(ItemType::I64, endian).map(|w| w as i64)
    }

    /// Read an `f32` scalar
    pub fn as_f32(&self, endian: Endian) -> Result<f32, ValueError> {
        self.word32(ItemType::F32, endian).map(f32::from_bits)
    }

    /// Read an `f64` scalar
    pub fn as_f64(&self, endian: Endian) -> Result<f64, ValueError> {
        self.word64(ItemType::F64, endian).map(f64::from_bits)
    }

    /// Borrow a `Bytes` payload
    pub fn as_bytes(&self) -> Result<&[u8], ValueError> {
        self.payload_as(ItemType::Bytes)
    }

    /// Borrow a `Utf8` payload as `&str`
    pub fn as_str(&self) -> Result<&str, ValueError> {
        let b = self.payload_as(ItemType::Utf8)?;
        std::str::from_utf8(b).map_err(|_| ValueError::InvalidUtf8)
    }

    /// Read a `u32` array
    pub fn as_u32_array(&self, endian: Endian) -> Result<Vec<u32>, ValueError> {
        let b = self.payload_as(ItemType::U32Array)?;
        let mut out = vec![0u32; b.len() / 4];
        match endian {
            Endian::Little => LittleEndian::read_u32_into(b, &mut out),
            Endian::Big => BigEndian::read_u32_into(b, &mut out),
        }
        Ok(out)
    }

    /// Read an `i32` array
    pub fn as_i32_array(&self, endian: Endian) -> Result<Vec<i32>, ValueError> {
        let b = self.payload_as(ItemType::I32Array)?;
        let mut out = vec![0i32; b.len() / 4];
        match endian {
            Endian::Little => LittleEndian::read_i32_into(b, &mut out),
            Endian::Big => BigEndian::read_i32_into(b, &mut out),
        }
        Ok(out)
    }

    /// Read a `u64` array
    pub fn as_u64_array(&self, endian: Endian) -> Result<Vec<u64>, ValueError> {
        let b = self.payload_as(ItemType::U64Array)?;
        let mut out = vec![0u64; b.len() / 8];
        match endian {
            Endian::Little => LittleEndian::read_u64_into(b, &mut out),
            Endian::Big => BigEndian::read_u64_into(b, &mut out),
        }
        Ok(out)
    }

    /// Read an `i64` array
    pub fn as_i64_array(&self, endian: Endian) -> Result<Vec<i64>, ValueError> {
        let b = self.payload_as(ItemType::I64Array)?;
        let mut out = vec![0i64; b.len() / 8];
        match endian {
            Endian::Little => LittleEndian::read_i64_into(b, &mut out),
            Endian::Big => BigEndian::read_i64_into(b, &mut out),
        }
        Ok(out)
    }

    /// Read an `f32` array
    pub fn as_f32_array(&self, endian: Endian) -> Result<Vec<f32>, ValueError> {
        let b = self.payload_as(ItemType::F32Array)?;
        let mut out = vec![0f32; b.len() / 4];
        match endian {
            Endian::Little => LittleEndian::read_f32_into(b, &mut out),
            Endian::Big => BigEndian::read_f32_into(b, &mut out),
        }
        Ok(out)
    }

    /// Read an `f64` array
    pub fn as_f64_array(&self, endian: Endian) -> Result<Vec<f64>, ValueError> {
        let b = self.payload_as(ItemType::F64Array)?;
        let mut out = vec![0f64; b.len() / 8];
        match endian {
            Endian::Little => LittleEndian::read_f64_into(b, &mut out),
            Endian::Big => BigEndian::read_f64_into(b, &mut out),
        }
        Ok(out)
    }
}
