//! Container decoding
//!
//! Parses an HVF stream back into its header and record sequence. Decoding
//! is a strict, single pass over the input:
//!
//! 1. Marker: determine byte order or fail `CorruptHeader`
//! 2. Version: fail `UnsupportedVersion` if not recognized
//! 3. Item count N and payload size S
//! 4. Length check: at least S bytes must follow, else `Truncated`
//! 5. N records, read field by field from the declared payload only
//!    (`CountMismatch` if it runs out, `SizeMismatch` if a record crosses its
//!    end, `Truncated`, `UnknownType`)
//! 6. Finalize: records must fill S exactly (`SizeMismatch`,
//!    `CountMismatch`), then nothing may follow the payload (`TrailingData`)
//!
//! Every error carries the absolute offset at which it was detected. The
//! decoder holds no state between calls.

use crate::config::DecodeConfig;
use crate::header::{read_header, ContainerHeader, PAYLOAD_SIZE_OFFSET};
use hvf_core::{ByteReader, DecodeError, Endian, ItemType, Record, RECORD_OVERHEAD};
use tracing::{debug, trace, warn};

/// Result of a successful decode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedContainer {
    /// Header as read from the stream
    pub header: ContainerHeader,
    /// Byte order of the stream
    pub endian: Endian,
    /// Records in stream order
    pub records: Vec<Record>,
    /// Records dropped in lenient mode because their type was not recognized
    pub skipped: Vec<SkippedRecord>,
}

impl DecodedContainer {
    /// First record with the given name
    pub fn get(&self, name: impl AsRef<[u8]>) -> Option<&Record> {
        let name = name.as_ref();
        self.records.iter().find(|r| r.has_name(name))
    }

    /// Consume the result, keeping only the records
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// A record skipped in lenient mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    /// Offset of the record's type tag
    pub offset: u64,
    /// Unrecognized type code
    pub type_code: u32,
    /// Record name
    pub name: Vec<u8>,
}

/// One record as read from the stream, before type resolution
struct RawRecord<'a> {
    offset: u64,
    type_code: u32,
    name: &'a [u8],
    value: &'a [u8],
}

/// Decode a stream in strict mode
pub fn decode(bytes: &[u8]) -> Result<DecodedContainer, DecodeError> {
    decode_with(bytes, &DecodeConfig::default())
}

/// Decode a stream with explicit settings
pub fn decode_with(bytes: &[u8], config: &DecodeConfig) -> Result<DecodedContainer, DecodeError> {
    let mut reader = ByteReader::new(bytes, Endian::Little);

    // Marker, version, count, size
    let (header, endian) = read_header(&mut reader)?;

    if let Some(limit) = config.max_payload_size {
        if header.payload_size > limit {
            return Err(DecodeError::PayloadLimit {
                offset: PAYLOAD_SIZE_OFFSET as u64,
                declared: header.payload_size,
                limit,
            });
        }
    }

    // Length check before trusting any per-record length
    reader.require(header.payload_size)?;

    let payload_start = reader.position();
    // `require` bounds the payload size by the remaining input
    let payload = &reader.rest()[..header.payload_size as usize];
    let mut body = ByteReader::with_base(payload, endian, payload_start);

    // N is untrusted: never reserve more than the payload could hold
    let max_records = (body.remaining() / RECORD_OVERHEAD) as u64;
    let mut records = Vec::with_capacity(header.item_count.min(max_records) as usize);
    let mut skipped = Vec::new();

    for index in 0..header.item_count {
        if body.is_empty() {
            return Err(DecodeError::CountMismatch {
                offset: body.position(),
                declared: header.item_count,
                found: index,
            });
        }

        let raw = read_payload_record(&mut body, &reader, &header)?;
        trace!(
            offset = raw.offset,
            type_code = raw.type_code,
            name_len = raw.name.len(),
            value_len = raw.value.len(),
            "Read record"
        );

        match ItemType::from_code(raw.type_code) {
            Some(item_type) => records.push(Record::new(item_type, raw.name, raw.value)),
            None if config.lenient => {
                warn!(
                    offset = raw.offset,
                    type_code = raw.type_code,
                    "Skipping record with unknown type"
                );
                skipped.push(SkippedRecord {
                    offset: raw.offset,
                    type_code: raw.type_code,
                    name: raw.name.to_vec(),
                });
            }
            None => {
                return Err(DecodeError::UnknownType {
                    offset: raw.offset,
                    code: raw.type_code,
                })
            }
        }
    }

    finalize(&body, &header, payload_start)?;

    let trailing = reader.remaining() as u64 - header.payload_size;
    if trailing > 0 {
        return Err(DecodeError::TrailingData {
            offset: payload_start + header.payload_size,
            trailing,
        });
    }

    debug!(
        items = header.item_count,
        payload_size = header.payload_size,
        skipped = skipped.len(),
        ?endian,
        "Decoded container"
    );

    Ok(DecodedContainer {
        header,
        endian,
        records,
        skipped,
    })
}

/// Read one record's fields without interpreting its type
fn read_raw_record<'a>(reader: &mut ByteReader<'a>) -> Result<RawRecord<'a>, DecodeError> {
    let offset = reader.position();
    let type_code = reader.read_u32()?;
    let name_len = reader.read_u32()?;
    let name = reader.take(name_len as u64)?;
    let value_len = reader.read_u64()?;
    let value = reader.take(value_len)?;
    Ok(RawRecord {
        offset,
        type_code,
        name,
        value,
    })
}

/// Read one record from the declared payload
///
/// A record that runs past the payload end is a size mismatch when the
/// stream itself holds the whole record, and a truncation otherwise.
fn read_payload_record<'a>(
    body: &mut ByteReader<'a>,
    stream: &ByteReader<'a>,
    header: &ContainerHeader,
) -> Result<RawRecord<'a>, DecodeError> {
    let start = body.position();
    match read_raw_record(body) {
        Err(err) if err.is_truncation() => {
            // `stream` still sits at the payload start
            let skip = (start - stream.position()) as usize;
            let mut full = ByteReader::with_base(&stream.rest()[skip..], stream.endian(), start);
            read_raw_record(&mut full)?;
            Err(DecodeError::SizeMismatch {
                offset: full.position(),
                declared: header.payload_size,
                actual: full.position() - stream.position(),
            })
        }
        result => result,
    }
}

/// Verify the records consumed the whole declared payload
///
/// `body` covers exactly the payload, so it can only fall short.
fn finalize(
    body: &ByteReader<'_>,
    header: &ContainerHeader,
    payload_start: u64,
) -> Result<(), DecodeError> {
    if body.is_empty() {
        return Ok(());
    }

    // Leftover declared payload: more records than declared, or garbage
    let extra = count_whole_records(body.rest(), body.endian(), body.position());
    if extra > 0 {
        return Err(DecodeError::CountMismatch {
            offset: body.position(),
            declared: header.item_count,
            found: header.item_count + extra,
        });
    }
    Err(DecodeError::SizeMismatch {
        offset: body.position(),
        declared: header.payload_size,
        actual: body.position() - payload_start,
    })
}

/// Number of well-formed records that exactly fill `bytes`, or 0 if they don't
fn count_whole_records(bytes: &[u8], endian: Endian, base: u64) -> u64 {
    let mut reader = ByteReader::with_base(bytes, endian, base);
    let mut count = 0;
    while !reader.is_empty() {
        if read_raw_record(&mut reader).is_err() {
            return 0;
        }
        count += 1;
    }
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoder::encode;
    use crate::header::{HEADER_SIZE, ITEM_COUNT_OFFSET};
    use hvf_core::write_u64;

    fn single_record_stream() -> Vec<u8> {
        encode(&[Record::u32("test", 50, Endian::Little)], Endian::Little).unwrap()
    }

    fn patch_u64(bytes: &mut [u8], at: usize, value: u64, endian: Endian) {
        bytes[at..at + 8].copy_from_slice(&write_u64(value, endian));
    }

    #[test]
    fn test_decode_single_record() {
        let bytes = single_record_stream();
        assert_eq!(bytes.len(), 48);

        let decoded = decode(&bytes).unwrap();
        assert_eq!(decoded.header.item_count, 1);
        assert_eq!(decoded.header.payload_size, 24);
        assert_eq!(decoded.endian, Endian::Little);
        assert_eq!(decoded.records.len(), 1);

        let record = &decoded.records[0];
        assert_eq!(record.name(), b"test");
        assert_eq!(record.item_type(), ItemType::U32);
        assert_eq!(record.as_u32(Endian::Little).unwrap(), 50);
        assert!(decoded.skipped.is_empty());
    }

    #[test]
    fn test_decode_empty_container() {
        let bytes = encode(&[], Endian::Big).unwrap();
        let decoded = decode(&bytes).unwrap();
        assert!(decoded.records.is_empty());
        assert_eq!(decoded.endian, Endian::Big);
    }

    #[test]
    fn test_trailing_byte() {
        let mut bytes = single_record_stream();
        bytes.push(0);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::TrailingData {
                offset: 48,
                trailing: 1
            }
        );
    }

    #[test]
    fn test_truncated_by_one() {
        let bytes = single_record_stream();
        assert_eq!(
            decode(&bytes[..47]).unwrap_err(),
            DecodeError::Truncated {
                offset: HEADER_SIZE as u64,
                needed: 24,
                available: 23
            }
        );
    }

    #[test]
    fn test_empty_input() {
        let err = decode(&[]).unwrap_err();
        assert!(matches!(err, DecodeError::Truncated { offset: 0, .. }));
    }

    #[test]
    fn test_unknown_type_strict() {
        let mut bytes = single_record_stream();
        bytes[24] = 200;
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::UnknownType {
                offset: 24,
                code: 200
            }
        );
    }

    #[test]
    fn test_unknown_type_lenient() {
        let records = vec![
            Record::u32("keep", 1, Endian::Little),
            Record::u32("drop", 2, Endian::Little),
        ];
        let mut bytes = encode(&records, Endian::Little).unwrap();
        // Second record starts after header + first record (16 + 4 + 4)
        let second = HEADER_SIZE + 24;
        bytes[second] = 0x7F;

        let config = DecodeConfig::strict().lenient(true);
        let decoded = decode_with(&bytes, &config).unwrap();
        assert_eq!(decoded.records, vec![records[0].clone()]);
        assert_eq!(
            decoded.skipped,
            vec![SkippedRecord {
                offset: second as u64,
                type_code: 0x7F,
                name: b"drop".to_vec(),
            }]
        );
        assert_eq!(decoded.header.item_count, 2);
    }

    #[test]
    fn test_size_under_declared() {
        let mut bytes = single_record_stream();
        // Claim 20 payload bytes; the record needs 24, 4 become trailing
        patch_u64(&mut bytes, PAYLOAD_SIZE_OFFSET, 20, Endian::Little);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::SizeMismatch {
                offset: 48,
                declared: 20,
                actual: 24
            }
        );
    }

    #[test]
    fn test_size_over_declared_with_padding() {
        let mut bytes = single_record_stream();
        bytes.extend_from_slice(&[0; 3]);
        patch_u64(&mut bytes, PAYLOAD_SIZE_OFFSET, 27, Endian::Little);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::SizeMismatch {
                offset: 48,
                declared: 27,
                actual: 24
            }
        );
    }

    #[test]
    fn test_count_over_declared() {
        let mut bytes = single_record_stream();
        patch_u64(&mut bytes, ITEM_COUNT_OFFSET, 2, Endian::Little);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::CountMismatch {
                offset: 48,
                declared: 2,
                found: 1
            }
        );
    }

    #[test]
    fn test_count_over_declared_with_bytes_after_payload() {
        for extra in [1usize, 20] {
            let mut bytes = single_record_stream();
            patch_u64(&mut bytes, ITEM_COUNT_OFFSET, 2, Endian::Little);
            bytes.extend(std::iter::repeat(0xAB).take(extra));
            assert_eq!(
                decode(&bytes).unwrap_err(),
                DecodeError::CountMismatch {
                    offset: 48,
                    declared: 2,
                    found: 1
                },
                "{extra} bytes after payload"
            );
        }
    }

    #[test]
    fn test_record_never_built_from_bytes_after_payload() {
        // A well-formed record after S must not satisfy the declared count
        let mut bytes = single_record_stream();
        patch_u64(&mut bytes, ITEM_COUNT_OFFSET, 2, Endian::Little);
        let extra = encode(&[Record::u32("next", 7, Endian::Little)], Endian::Little).unwrap();
        bytes.extend_from_slice(&extra[HEADER_SIZE..]);
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            DecodeError::CountMismatch { found: 1, .. }
        ));

        patch_u64(&mut bytes, ITEM_COUNT_OFFSET, 1, Endian::Little);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::TrailingData {
                offset: 48,
                trailing: 24
            }
        );
    }

    #[test]
    fn test_record_crossing_payload_end_with_bytes_after() {
        let mut bytes = single_record_stream();
        bytes.extend_from_slice(&[0; 8]);
        patch_u64(&mut bytes, PAYLOAD_SIZE_OFFSET, 20, Endian::Little);
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::SizeMismatch {
                offset: 48,
                declared: 20,
                actual: 24
            }
        );
    }

    #[test]
    fn test_count_under_declared() {
        let records = vec![
            Record::u32("a", 1, Endian::Little),
            Record::u32("b", 2, Endian::Little),
        ];
        let mut bytes = encode(&records, Endian::Little).unwrap();
        patch_u64(&mut bytes, ITEM_COUNT_OFFSET, 1, Endian::Little);
        let first_end = (HEADER_SIZE + records[0].serialized_len() as usize) as u64;
        assert_eq!(
            decode(&bytes).unwrap_err(),
            DecodeError::CountMismatch {
                offset: first_end,
                declared: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_huge_count_does_not_allocate() {
        let mut bytes = encode(&[], Endian::Little).unwrap();
        patch_u64(&mut bytes, ITEM_COUNT_OFFSET, u64::MAX, Endian::Little);
        assert!(matches!(
            decode(&bytes).unwrap_err(),
            DecodeError::CountMismatch { found: 0, .. }
        ));
    }

    #[test]
    fn test_huge_value_length_is_truncation() {
        let mut bytes = single_record_stream();
        // value length field of the only record
        patch_u64(&mut bytes, 36, u64::MAX, Endian::Little);
        let err = decode(&bytes).unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                offset: 44,
                needed: u64::MAX,
                available: 4
            }
        );
    }

    #[test]
    fn test_payload_limit() {
        let bytes = single_record_stream();
        let config = DecodeConfig::strict().max_payload_size(10);
        assert_eq!(
            decode_with(&bytes, &config).unwrap_err(),
            DecodeError::PayloadLimit {
                offset: PAYLOAD_SIZE_OFFSET as u64,
                declared: 24,
                limit: 10
            }
        );
        let config = DecodeConfig::strict().max_payload_size(24);
        assert!(decode_with(&bytes, &config).is_ok());
    }

    #[test]
    fn test_get_first_match() {
        let records = vec![
            Record::u32("dup", 1, Endian::Little),
            Record::u32("dup", 2, Endian::Little),
        ];
        let decoded = decode(&encode(&records, Endian::Little).unwrap()).unwrap();
        assert_eq!(decoded.get("dup").unwrap().as_u32(Endian::Little).unwrap(), 1);
        assert!(decoded.get("missing").is_none());
        assert_eq!(decoded.into_records(), records);
    }
}
