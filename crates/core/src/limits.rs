//! Wire-format field widths and size limits
//!
//! These sizes are part of the on-disk contract and cannot change without a
//! new format version.

/// Width of the record type tag field
pub const TYPE_FIELD_SIZE: usize = 4;

/// Width of the record name length field
pub const NAME_LEN_FIELD_SIZE: usize = 4;

/// Width of the record value length field
pub const VALUE_LEN_FIELD_SIZE: usize = 8;

/// Fixed bytes every record carries besides its name and value
///
/// Also the size of the smallest possible record (empty name, empty value).
pub const RECORD_OVERHEAD: usize = TYPE_FIELD_SIZE + NAME_LEN_FIELD_SIZE + VALUE_LEN_FIELD_SIZE;

/// Longest name the 32-bit length field can describe
pub const MAX_NAME_LEN: u64 = u32::MAX as u64;

/// Serialized length of a record with the given name and value lengths
///
/// Returns `None` if the total does not fit in a `u64`.
pub fn record_len(name_len: usize, value_len: usize) -> Option<u64> {
    (RECORD_OVERHEAD as u64)
        .checked_add(name_len as u64)?
        .checked_add(value_len as u64)
}
