//! Typed entity storage over a `StorageBackend`.
//!
//! `EntityStore<K, V>` gives each table store strongly-typed put/get/scan
//! operations with compile-time key safety: a store keyed by one id type
//! will not accept another. Values are serialized as JSON.
//!
//! ## Architecture
//!
//! ```text
//! EntityStore<K, V>        ← typed entity operations (this file)
//!     ↓
//! StorageBackend           ← generic K/V operations (storage_trait.rs)
//!     ↓
//! RocksDB / in-memory      ← actual storage implementation
//! ```

use crate::storage_trait::{Result, StorageBackend, StorageError, Table};
use chirpdb_commons::StorageKey;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Trait for typed entity storage with type-safe keys and automatic
/// serialization.
///
/// ## Required methods
/// - `backend()`: the storage backend handle
/// - `table()`: the physical table this store writes to
///
/// ## Provided methods
/// - `put()` / `get()` by typed key
/// - `scan_prefix()`: decoded entities under a raw key prefix
/// - `scan_raw()`: raw (key, value-bytes) pairs, for callers that decode
///   row by row and need the rows accumulated before a decode failure
pub trait EntityStore<K, V>
where
    K: StorageKey,
    V: Serialize + for<'de> Deserialize<'de> + Send + Sync,
{
    /// Returns a reference to the storage backend.
    fn backend(&self) -> &Arc<dyn StorageBackend>;

    /// Returns the table this store operates on.
    fn table(&self) -> &Table;

    /// Serializes an entity to bytes (JSON).
    fn serialize(&self, entity: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Deserializes bytes to an entity.
    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
    }

    /// Stores an entity under the given key, replacing any existing value.
    fn put(&self, key: &K, entity: &V) -> Result<()> {
        let value = self.serialize(entity)?;
        self.backend().put(self.table(), &key.storage_key(), &value)
    }

    /// Retrieves an entity by key. Returns `Ok(None)` if absent.
    fn get(&self, key: &K) -> Result<Option<V>> {
        match self.backend().get(self.table(), &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Scans raw (key, value-bytes) pairs under a prefix, in key order.
    /// Pass an empty prefix to scan the whole table.
    fn scan_raw(&self, prefix: &[u8], limit: Option<usize>) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let prefix = (!prefix.is_empty()).then_some(prefix);
        let iter = self.backend().scan(self.table(), prefix, limit)?;
        Ok(iter.collect())
    }

    /// Scans decoded entities under a prefix, in key order.
    ///
    /// A decode failure aborts the scan with an error; use [`scan_raw`] and
    /// [`deserialize`] directly to keep partially-decoded results.
    ///
    /// [`scan_raw`]: EntityStore::scan_raw
    /// [`deserialize`]: EntityStore::deserialize
    fn scan_prefix(&self, prefix: &[u8], limit: Option<usize>) -> Result<Vec<V>> {
        let mut entities = Vec::new();
        for (_, value) in self.scan_raw(prefix, limit)? {
            entities.push(self.deserialize(&value)?);
        }
        Ok(entities)
    }
}
