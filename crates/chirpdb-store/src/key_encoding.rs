//! Key encoding for composite row keys.
//!
//! A row key is the partition key followed by a NUL separator and the
//! clustering bytes: `{partition}\0{clustering}`. Partition keys are
//! validated upstream to contain no NUL byte, so the first NUL in a stored
//! key is always the separator and the encoding stays order-preserving:
//! a shorter partition key (`bob`) can never collide with the prefix of a
//! longer one (`bobby`), because `\0` sorts below every valid key byte.
//!
//! Clustering bytes are the 16 raw bytes of a time-ordered UUID, whose
//! byte order equals chronological order, so a prefix scan over
//! `{partition}\0` yields one partition in ascending creation order.

use crate::storage_trait::StorageError;

/// Separator between the partition and clustering segments of a row key.
pub const KEY_SEPARATOR: u8 = 0x00;

/// Encode a row key: `{partition}\0{clustering}`
///
/// # Examples
///
/// ```
/// use chirpdb_store::key_encoding::row_key;
///
/// let key = row_key(b"alice", &[1, 2]);
/// assert_eq!(key, b"alice\x00\x01\x02");
/// ```
pub fn row_key(partition: &[u8], clustering: &[u8]) -> Vec<u8> {
    let mut key = Vec::with_capacity(partition.len() + 1 + clustering.len());
    key.extend_from_slice(partition);
    key.push(KEY_SEPARATOR);
    key.extend_from_slice(clustering);
    key
}

/// Encode the scan prefix selecting every row of one partition:
/// `{partition}\0`
pub fn partition_prefix(partition: &[u8]) -> Vec<u8> {
    let mut prefix = Vec::with_capacity(partition.len() + 1);
    prefix.extend_from_slice(partition);
    prefix.push(KEY_SEPARATOR);
    prefix
}

/// Split a row key into `(partition, clustering)`.
pub fn parse_row_key(key: &[u8]) -> Result<(&[u8], &[u8]), StorageError> {
    let sep = key
        .iter()
        .position(|&b| b == KEY_SEPARATOR)
        .ok_or_else(|| {
            StorageError::InvalidKey("row key has no partition separator".to_string())
        })?;
    Ok((&key[..sep], &key[sep + 1..]))
}
