//! Container encoding
//!
//! Serializes a record sequence into one contiguous HVF stream:
//!
//! ```text
//! [header: 24 bytes][record 1][record 2]...[record N]
//!
//! record: [type: u32][name len: u32][name][value len: u64][value]
//! ```
//!
//! The header is derived from the records. All validation runs before the
//! first byte is written, so a failed encode never leaves partial output.
//! Output is deterministic: the same records and byte order always produce
//! identical bytes.

use crate::header::{build_header, ContainerHeader, FORMAT_VERSION, HEADER_SIZE, SUPPORTED_VERSIONS};
use hvf_core::{ByteWriter, EncodeError, Endian, Record, MAX_NAME_LEN};
use tracing::{debug, trace};

/// Encode records into a new buffer
///
/// # Errors
///
/// - `NameTooLong` if a record name does not fit the 32-bit length field
/// - `PayloadTooLarge` if the total size does not fit the 64-bit size field
pub fn encode(records: &[Record], endian: Endian) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_into(records, endian, &mut buf)?;
    Ok(buf)
}

/// Encode records, appending to `buf`
///
/// On error `buf` is left exactly as it was.
pub fn encode_into(records: &[Record], endian: Endian, buf: &mut Vec<u8>) -> Result<(), EncodeError> {
    encode_versioned_into(records, endian, FORMAT_VERSION, buf)
}

/// Encode records with an explicit format version
///
/// Only versions this library can decode are accepted.
pub fn encode_versioned(records: &[Record], endian: Endian, version: u32) -> Result<Vec<u8>, EncodeError> {
    let mut buf = Vec::new();
    encode_versioned_into(records, endian, version, &mut buf)?;
    Ok(buf)
}

fn encode_versioned_into(
    records: &[Record],
    endian: Endian,
    version: u32,
    buf: &mut Vec<u8>,
) -> Result<(), EncodeError> {
    if !SUPPORTED_VERSIONS.contains(&version) {
        return Err(EncodeError::UnsupportedVersion { version });
    }
    let mut header = validate(records, endian)?;
    header.version = version;
    let start = buf.len();

    // Checked in `validate`: fits u64; usize may still be narrower
    let total = usize::try_from(HEADER_SIZE as u64 + header.payload_size)
        .map_err(|_| EncodeError::PayloadTooLarge)?;
    buf.reserve(total);

    write_header(buf, &header, endian);
    let mut writer = ByteWriter::new(buf, endian);
    for record in records {
        write_record(&mut writer, record);
    }

    debug_assert_eq!(buf.len() - start, total);
    debug!(
        items = header.item_count,
        payload_size = header.payload_size,
        ?endian,
        "Encoded container"
    );
    Ok(())
}

/// Check every record and compute the header
fn validate(records: &[Record], endian: Endian) -> Result<ContainerHeader, EncodeError> {
    for (index, record) in records.iter().enumerate() {
        if record.name().len() as u64 > MAX_NAME_LEN {
            return Err(EncodeError::NameTooLong {
                index,
                len: record.name().len(),
            });
        }
    }
    build_header(records, endian)
}

fn write_header(buf: &mut Vec<u8>, header: &ContainerHeader, endian: Endian) {
    buf.extend_from_slice(&header.to_bytes(endian));
}

/// Write one record; the name length was checked in `validate`
fn write_record(writer: &mut ByteWriter<'_>, record: &Record) {
    trace!(
        offset = writer.len(),
        type_code = record.item_type().code(),
        name_len = record.name().len(),
        value_len = record.value_len(),
        "Writing record"
    );
    writer.put_u32(record.item_type().code());
    writer.put_u32(record.name().len() as u32);
    writer.put_bytes(record.name());
    writer.put_u64(record.value_len());
    writer.put_bytes(record.value());
}
