//! Test utilities for chirpdb-store and dependent crates.
//!
//! `InMemoryBackend` implements `StorageBackend` over ordered maps so table
//! stores can run their tests without touching disk. BTreeMap keeps the
//! ordered-scan semantics RocksDB provides, which the clustering-order
//! guarantees depend on.

use crate::storage_trait::{KvIterator, Result, StorageBackend, StorageError, Table};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

/// In-memory storage backend with RocksDB-compatible semantics.
pub struct InMemoryBackend {
    tables: RwLock<HashMap<String, BTreeMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryBackend {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for InMemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, table: &Table, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get(table.name())
            .ok_or_else(|| StorageError::TableNotFound(table.name().to_string()))?;
        Ok(rows.get(key).cloned())
    }

    fn put(&self, table: &Table, key: &[u8], value: &[u8]) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get_mut(table.name())
            .ok_or_else(|| StorageError::TableNotFound(table.name().to_string()))?;
        rows.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn scan(
        &self,
        table: &Table,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<KvIterator<'_>> {
        let tables = self.tables.read().unwrap_or_else(|e| e.into_inner());
        let rows = tables
            .get(table.name())
            .ok_or_else(|| StorageError::TableNotFound(table.name().to_string()))?;

        let mut entries: Vec<(Vec<u8>, Vec<u8>)> = match prefix {
            Some(p) => rows
                .range(p.to_vec()..)
                .take_while(|(k, _)| k.starts_with(p))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
            None => rows.iter().map(|(k, v)| (k.clone(), v.clone())).collect(),
        };
        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(Box::new(entries.into_iter()))
    }

    fn table_exists(&self, table: &Table) -> bool {
        self.tables
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .contains_key(table.name())
    }

    fn create_table(&self, table: &Table) -> Result<()> {
        let mut tables = self.tables.write().unwrap_or_else(|e| e.into_inner());
        tables.entry(table.name().to_string()).or_default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with_table(name: &str) -> (InMemoryBackend, Table) {
        let backend = InMemoryBackend::new();
        let table = Table::new(name);
        backend.create_table(&table).unwrap();
        (backend, table)
    }

    #[test]
    fn put_get_delete_missing() {
        let (backend, table) = backend_with_table("t");
        backend.put(&table, b"k", b"v").unwrap();
        assert_eq!(backend.get(&table, b"k").unwrap(), Some(b"v".to_vec()));
        assert_eq!(backend.get(&table, b"missing").unwrap(), None);
    }

    #[test]
    fn missing_table_is_an_error() {
        let backend = InMemoryBackend::new();
        let table = Table::new("nope");
        assert!(matches!(
            backend.get(&table, b"k"),
            Err(StorageError::TableNotFound(_))
        ));
    }

    #[test]
    fn create_table_is_idempotent() {
        let (backend, table) = backend_with_table("t");
        backend.put(&table, b"k", b"v").unwrap();
        backend.create_table(&table).unwrap();
        // Existing rows survive the second create.
        assert_eq!(backend.get(&table, b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn scan_is_ordered_and_prefix_scoped() {
        let (backend, table) = backend_with_table("t");
        backend.put(&table, b"b\x002", b"v2").unwrap();
        backend.put(&table, b"b\x001", b"v1").unwrap();
        backend.put(&table, b"a\x001", b"v0").unwrap();

        let all: Vec<_> = backend
            .scan(&table, None, None)
            .unwrap()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            all,
            vec![b"a\x001".to_vec(), b"b\x001".to_vec(), b"b\x002".to_vec()]
        );

        let scoped: Vec<_> = backend.scan(&table, Some(b"b\x00"), None).unwrap().collect();
        assert_eq!(scoped.len(), 2);
    }

    #[test]
    fn scan_with_limit() {
        let (backend, table) = backend_with_table("t");
        for i in 0..4u8 {
            backend.put(&table, &[i], b"v").unwrap();
        }
        let limited: Vec<_> = backend.scan(&table, None, Some(2)).unwrap().collect();
        assert_eq!(limited.len(), 2);
    }
}
