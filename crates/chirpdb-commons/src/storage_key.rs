//! Storage key trait for typed key serialization.
//!
//! Row keys are stored in lexicographic (byte-by-byte) order, so every key
//! type must produce bytes whose ordering matches the ordering the schema
//! promises. Composite keys (partition key plus clustering token) must
//! serialize the full composite representation, never just the first
//! component — relying on `AsRef<[u8]>` for that has caused wrong-key bugs
//! before, hence the explicit contract.

/// Trait for keys that can be serialized for storage.
///
/// ## Ordering
///
/// `storage_key()` must be order-preserving: if `a < b` in the domain, the
/// returned bytes must compare the same way. Partition-key strings are
/// validated to contain no NUL byte so that a NUL separator between the
/// partition and clustering segments keeps composite ordering intact.
pub trait StorageKey: Clone + Send + Sync + 'static {
    /// Serialize this key to bytes using an order-preserving encoding.
    fn storage_key(&self) -> Vec<u8>;

    /// Deserialize this key from bytes.
    fn from_storage_key(bytes: &[u8]) -> Result<Self, String>
    where
        Self: Sized;
}

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid utf-8 in key: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_round_trip() {
        let key = "alice".to_string();
        let bytes = key.storage_key();
        assert_eq!(String::from_storage_key(&bytes).unwrap(), key);
    }

    #[test]
    fn string_ordering_preserved() {
        let alice = "alice".to_string().storage_key();
        let bob = "bob".to_string().storage_key();
        assert!(alice < bob);
    }
}
