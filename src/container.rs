//! Mutable in-memory container
//!
//! [`VirtualFile`] holds an ordered list of records together with the byte
//! order and format version they will be written with. It is a thin owner
//! over the codec: encoding and decoding go through `hvf_format` unchanged.
//!
//! Record values are stored as raw bytes in the file's byte order. Use
//! [`VirtualFile::endian`] when building records or reading typed values:
//!
//! ```ignore
//! let mut vf = VirtualFile::new();
//! vf.add_item(Record::u32("vertex_count", 3, vf.endian()));
//! let bytes = vf.to_bytes()?;
//!
//! let loaded = VirtualFile::from_bytes(&bytes)?;
//! assert_eq!(loaded.get("vertex_count").unwrap().as_u32(loaded.endian())?, 3);
//! ```

use crate::error::{Error, Result};
use hvf_core::{Endian, ItemType, Record};
use hvf_format::{decode_with, encode_versioned, DecodeConfig, FORMAT_VERSION};
use std::io::{Read, Write};
use tracing::warn;

/// Ordered, named, typed records plus their container settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VirtualFile {
    version: u32,
    endian: Endian,
    records: Vec<Record>,
}

impl Default for VirtualFile {
    fn default() -> Self {
        Self::new()
    }
}

impl VirtualFile {
    /// Empty file in the host byte order at the current format version
    pub fn new() -> Self {
        VirtualFile {
            version: FORMAT_VERSION,
            endian: Endian::native(),
            records: Vec::new(),
        }
    }

    /// Set the format version
    pub fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// Set the byte order
    ///
    /// Only meaningful before records are added; existing values are not
    /// converted.
    pub fn with_endian(mut self, endian: Endian) -> Self {
        self.endian = endian;
        self
    }

    /// Format version written by [`to_bytes`](Self::to_bytes)
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Change the format version
    pub fn set_version(&mut self, version: u32) {
        if version < self.version {
            warn!(
                from = self.version,
                to = version,
                "Setting virtual file version lower than the existing one"
            );
        }
        self.version = version;
    }

    /// Byte order of the file and its record values
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Append a record, returning its index
    pub fn add_item(&mut self, record: Record) -> usize {
        self.records.push(record);
        self.records.len() - 1
    }

    /// Append a record from its parts, returning its index
    pub fn add(
        &mut self,
        item_type: ItemType,
        name: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
    ) -> usize {
        self.add_item(Record::new(item_type, name, value))
    }

    /// Rename the record at `index`
    pub fn rename_item(&mut self, index: usize, new_name: impl Into<Vec<u8>>) -> Result<()> {
        let len = self.records.len();
        self.records
            .get_mut(index)
            .ok_or(Error::IndexOutOfRange { index, len })?
            .set_name(new_name);
        Ok(())
    }

    /// Remove and return the record at `index`
    pub fn remove_item(&mut self, index: usize) -> Result<Record> {
        if index >= self.records.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: self.records.len(),
            });
        }
        Ok(self.records.remove(index))
    }

    /// Index of the first record named `name`
    pub fn item_index(&self, name: impl AsRef<[u8]>) -> Option<usize> {
        let name = name.as_ref();
        self.records.iter().position(|r| r.has_name(name))
    }

    /// First record named `name`
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Record> {
        self.item_index(name).map(|i| &self.records[i])
    }

    /// First record named `name`, or `ItemNotFound`
    pub fn require(&self, name: impl AsRef<[u8]>) -> Result<&Record> {
        let name = name.as_ref();
        self.get(name)
            .ok_or_else(|| Error::ItemNotFound(String::from_utf8_lossy(name).into_owned()))
    }

    /// Record at `index`
    pub fn item(&self, index: usize) -> Result<&Record> {
        self.records.get(index).ok_or(Error::IndexOutOfRange {
            index,
            len: self.records.len(),
        })
    }

    /// Type of the record at `index`
    pub fn item_type(&self, index: usize) -> Result<ItemType> {
        Ok(self.item(index)?.item_type())
    }

    /// Value length in bytes of the record at `index`
    pub fn item_size(&self, index: usize) -> Result<u64> {
        Ok(self.item(index)?.value_len())
    }

    /// Raw value bytes of the record at `index`
    pub fn item_data(&self, index: usize) -> Result<&[u8]> {
        Ok(self.item(index)?.value())
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True if the file holds no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in order
    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Records as a slice
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Consume the file, keeping only the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }

    /// Encode as a single contiguous stream
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(encode_versioned(&self.records, self.endian, self.version)?)
    }

    /// Decode a stream in strict mode
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::from_bytes_with(bytes, &DecodeConfig::default())
    }

    /// Decode a stream with explicit settings
    ///
    /// Records skipped in lenient mode are dropped from the file.
    pub fn from_bytes_with(bytes: &[u8], config: &DecodeConfig) -> Result<Self> {
        let decoded = decode_with(bytes, config)?;
        Ok(VirtualFile {
            version: decoded.header.version,
            endian: decoded.endian,
            records: decoded.records,
        })
    }

    /// Encode and write the whole stream to `writer`
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<()> {
        let bytes = self.to_bytes()?;
        writer.write_all(&bytes)?;
        writer.flush()?;
        Ok(())
    }

    /// Read `reader` to its end and decode it in strict mode
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Self> {
        Self::read_from_with(reader, &DecodeConfig::default())
    }

    /// Read `reader` to its end and decode it with explicit settings
    pub fn read_from_with<R: Read>(reader: &mut R, config: &DecodeConfig) -> Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_bytes_with(&bytes, config)
    }
}

impl<'a> IntoIterator for &'a VirtualFile {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl FromIterator<Record> for VirtualFile {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        VirtualFile {
            records: iter.into_iter().collect(),
            ..Self::new()
        }
    }
}

impl Extend<Record> for VirtualFile {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}
