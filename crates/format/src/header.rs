//! Container header format
//!
//! Every HVF stream starts with a 24-byte header:
//!
//! ```text
//! +------------------+ 0
//! | Endian marker    | 4 bytes (0x01234567 in the stream's byte order)
//! +------------------+ 4
//! | Format version   | 4 bytes (u32)
//! +------------------+ 8
//! | Item count N     | 8 bytes (u64)
//! +------------------+ 16
//! | Payload size S   | 8 bytes (u64, bytes after this field to end of stream)
//! +------------------+ 24
//! ```
//!
//! The marker is read first. Its byte pattern tells the reader which order
//! every later integer uses; a pattern matching neither order means the
//! stream is not an HVF container.
//!
//! Headers are always computed from the records they describe, never supplied
//! independently, so count and size cannot drift from the body.

use hvf_core::{ByteReader, DecodeError, EncodeError, Endian, Record};

/// Endian sentinel written as the first field of every stream
pub const ENDIAN_MARKER: u32 = 0x0123_4567;

/// Format version written by this encoder
pub const FORMAT_VERSION: u32 = 0;

/// Format versions this decoder accepts
pub const SUPPORTED_VERSIONS: [u32; 1] = [FORMAT_VERSION];

/// Header size in bytes
pub const HEADER_SIZE: usize = 24;

/// Offset of the format version field
pub const VERSION_OFFSET: usize = 4;

/// Offset of the item count field
pub const ITEM_COUNT_OFFSET: usize = 8;

/// Offset of the payload size field
pub const PAYLOAD_SIZE_OFFSET: usize = 16;

/// Container header (24 bytes on the wire, marker included)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContainerHeader {
    /// Format version
    pub version: u32,
    /// Number of records that follow
    pub item_count: u64,
    /// Exact byte length of all records
    pub payload_size: u64,
}

impl ContainerHeader {
    /// Create a header with the current format version
    pub fn new(item_count: u64, payload_size: u64) -> Self {
        ContainerHeader {
            version: FORMAT_VERSION,
            item_count,
            payload_size,
        }
    }

    /// Total stream length this header describes
    ///
    /// Returns `None` if it does not fit in a `u64`.
    pub fn stream_len(&self) -> Option<u64> {
        (HEADER_SIZE as u64).checked_add(self.payload_size)
    }

    /// Serialize header (marker first) in the given byte order
    pub fn to_bytes(&self, endian: Endian) -> [u8; HEADER_SIZE] {
        let mut bytes = [0u8; HEADER_SIZE];
        bytes[0..4].copy_from_slice(&hvf_core::write_u32(ENDIAN_MARKER, endian));
        bytes[4..8].copy_from_slice(&hvf_core::write_u32(self.version, endian));
        bytes[8..16].copy_from_slice(&hvf_core::write_u64(self.item_count, endian));
        bytes[16..24].copy_from_slice(&hvf_core::write_u64(self.payload_size, endian));
        bytes
    }

    /// True if this decoder understands the header's version
    pub fn is_supported(&self) -> bool {
        SUPPORTED_VERSIONS.contains(&self.version)
    }
}

/// Determine the byte order from the four marker bytes
///
/// Returns `None` if the bytes are neither ordering of [`ENDIAN_MARKER`].
pub fn detect_endian(marker: [u8; 4]) -> Option<Endian> {
    if marker == hvf_core::write_u32(ENDIAN_MARKER, Endian::Little) {
        Some(Endian::Little)
    } else if marker == hvf_core::write_u32(ENDIAN_MARKER, Endian::Big) {
        Some(Endian::Big)
    } else {
        None
    }
}

/// Compute the header for a record sequence
///
/// Item count is the sequence length; payload size is the sum of every
/// record's serialized length. The endian does not change either value but
/// is part of the contract so callers build and encode with the same order.
pub fn build_header(records: &[Record], _endian: Endian) -> Result<ContainerHeader, EncodeError> {
    let mut payload_size: u64 = 0;
    for record in records {
        payload_size = payload_size
            .checked_add(record.serialized_len())
            .ok_or(EncodeError::PayloadTooLarge)?;
    }
    // Header plus payload must also be addressable as one stream
    if (HEADER_SIZE as u64).checked_add(payload_size).is_none() {
        return Err(EncodeError::PayloadTooLarge);
    }
    Ok(ContainerHeader::new(records.len() as u64, payload_size))
}

/// Parse the header at the start of `bytes`
///
/// Reads the marker first and fails with `CorruptHeader` before looking at
/// any other field if it matches neither byte order. Returns the header, the
/// detected byte order, and the bytes following the header.
pub fn parse_header(bytes: &[u8]) -> Result<(ContainerHeader, Endian, &[u8]), DecodeError> {
    let mut reader = ByteReader::new(bytes, Endian::Little);
    let (header, endian) = read_header(&mut reader)?;
    Ok((header, endian, reader.rest()))
}

/// Read the header from `reader`, switching it to the detected byte order
///
/// The reader's initial byte order is ignored.
pub(crate) fn read_header(
    reader: &mut ByteReader<'_>,
) -> Result<(ContainerHeader, Endian), DecodeError> {
    let marker_offset = reader.position();
    let marker = reader.take_array4()?;
    let endian = detect_endian(marker).ok_or(DecodeError::CorruptHeader {
        offset: marker_offset,
        found: marker,
    })?;

    reader.set_endian(endian);

    let version_offset = reader.position();
    let version = reader.read_u32()?;
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(DecodeError::UnsupportedVersion {
            offset: version_offset,
            version,
        });
    }

    let item_count = reader.read_u64()?;
    let payload_size = reader.read_u64()?;

    Ok((
        ContainerHeader {
            version,
            item_count,
            payload_size,
        },
        endian,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_records(endian: Endian) -> Vec<Record> {
        vec![
            Record::u32("test", 50, endian),
            Record::utf8("label", "quad"),
        ]
    }

    #[test]
    fn test_header_layout_little_endian() {
        let header = ContainerHeader::new(1, 24);
        let bytes = header.to_bytes(Endian::Little);

        assert_eq!(&bytes[0..4], &[0x67, 0x45, 0x23, 0x01]);
        assert_eq!(&bytes[4..8], &[0, 0, 0, 0]);
        assert_eq!(bytes[ITEM_COUNT_OFFSET], 1);
        assert_eq!(bytes[PAYLOAD_SIZE_OFFSET], 24);
    }

    #[test]
    fn test_header_layout_big_endian() {
        let bytes = ContainerHeader::new(1, 24).to_bytes(Endian::Big);
        assert_eq!(&bytes[0..4], &[0x01, 0x23, 0x45, 0x67]);
        assert_eq!(bytes[ITEM_COUNT_OFFSET + 7], 1);
        assert_eq!(bytes[PAYLOAD_SIZE_OFFSET + 7], 24);
    }

    #[test]
    fn test_header_roundtrip() {
        for endian in [Endian::Little, Endian::Big] {
            let header = ContainerHeader::new(7, 1234);
            let bytes = header.to_bytes(endian);
            let (parsed, detected, rest) = parse_header(&bytes).unwrap();
            assert_eq!(parsed, header);
            assert_eq!(detected, endian);
            assert!(rest.is_empty());
        }
    }

    #[test]
    fn test_parse_returns_body() {
        let mut bytes = ContainerHeader::new(0, 3).to_bytes(Endian::Little).to_vec();
        bytes.extend_from_slice(&[1, 2, 3]);
        let (_, _, rest) = parse_header(&bytes).unwrap();
        assert_eq!(rest, &[1, 2, 3]);
    }

    #[test]
    fn test_detect_endian() {
        assert_eq!(detect_endian([0x67, 0x45, 0x23, 0x01]), Some(Endian::Little));
        assert_eq!(detect_endian([0x01, 0x23, 0x45, 0x67]), Some(Endian::Big));
        assert_eq!(detect_endian([0x45, 0x67, 0x01, 0x23]), None);
        assert_eq!(detect_endian([0; 4]), None);
    }

    #[test]
    fn test_corrupt_marker() {
        let mut bytes = ContainerHeader::new(0, 0).to_bytes(Endian::Little);
        bytes[1] ^= 0xFF;
        let err = parse_header(&bytes).unwrap_err();
        assert!(matches!(err, DecodeError::CorruptHeader { offset: 0, .. }));
    }

    #[test]
    fn test_unsupported_version() {
        let mut header = ContainerHeader::new(0, 0);
        header.version = FORMAT_VERSION + 1;
        assert!(!header.is_supported());

        let err = parse_header(&header.to_bytes(Endian::Big)).unwrap_err();
        assert_eq!(
            err,
            DecodeError::UnsupportedVersion {
                offset: VERSION_OFFSET as u64,
                version: FORMAT_VERSION + 1,
            }
        );
    }

    #[test]
    fn test_truncated_header() {
        let bytes = ContainerHeader::new(0, 0).to_bytes(Endian::Little);

        let err = parse_header(&bytes[..2]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 0, .. }));

        let err = parse_header(&bytes[..20]).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: PAYLOAD_SIZE_OFFSET as u64,
                needed: 8,
                available: 4,
            }
        );
    }

    #[test]
    fn test_build_header_counts_and_sizes() {
        let records = sample_records(Endian::Little);
        let header = build_header(&records, Endian::Little).unwrap();
        assert_eq!(header.item_count, 2);
        // "test": 16 + 4 + 4, "label": 16 + 5 + 4
        assert_eq!(header.payload_size, 24 + 25);
        assert_eq!(header.version, FORMAT_VERSION);
        assert_eq!(header.stream_len(), Some(24 + 49));
    }

    #[test]
    fn test_build_header_empty() {
        let header = build_header(&[], Endian::Big).unwrap();
        assert_eq!(header, ContainerHeader::new(0, 0));
    }
}
