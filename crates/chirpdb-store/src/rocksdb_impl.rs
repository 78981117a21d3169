//! RocksDB implementation of the StorageBackend trait.
//!
//! Maps each [`Table`] to a RocksDB column family. The handle is opened in
//! multi-threaded column-family mode so tables can be created on a shared
//! `&DB` without exclusive access.

use crate::storage_trait::{KvIterator, Result, StorageBackend, StorageError, Table};
use rocksdb::{
    BoundColumnFamily, DBIteratorWithThreadMode, Direction, IteratorMode, Options, ReadOptions,
    SnapshotWithThreadMode, DB,
};
use std::sync::Arc;

/// RocksDB implementation of the StorageBackend trait.
///
/// ## Example
///
/// ```rust,ignore
/// use chirpdb_store::{RocksDbBackend, RocksDbInit, StorageBackend, Table};
///
/// let db = RocksDbInit::with_defaults("/var/lib/chirpdb").open(&[])?;
/// let backend = RocksDbBackend::new(db);
///
/// let table = Table::qualified("tweet", "user_likes");
/// backend.create_table(&table)?;
/// backend.put(&table, b"key1", b"value1")?;
/// ```
pub struct RocksDbBackend {
    db: Arc<DB>,
}

impl RocksDbBackend {
    /// Creates a new RocksDB backend around an open database handle.
    pub fn new(db: Arc<DB>) -> Self {
        Self { db }
    }

    fn cf(&self, table: &Table) -> Result<Arc<BoundColumnFamily<'_>>> {
        self.db
            .cf_handle(table.name())
            .ok_or_else(|| StorageError::TableNotFound(table.name().to_string()))
    }
}

impl StorageBackend for RocksDbBackend {
    fn get(&self, table: &Table, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let cf = self.cf(table)?;
        self.db
            .get_cf(&cf, key)
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    fn put(&self, table: &Table, key: &[u8], value: &[u8]) -> Result<()> {
        let cf = self.cf(table)?;
        self.db
            .put_cf(&cf, key, value)
            .map_err(|e| StorageError::Io(e.to_string()))
    }

    fn scan(
        &self,
        table: &Table,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<KvIterator<'_>> {
        let cf = self.cf(table)?;

        // Pin a snapshot so the scan sees a consistent view for its
        // whole lifetime.
        let snapshot = self.db.snapshot();

        let prefix_vec = prefix.map(|p| p.to_vec());
        let mode = match &prefix_vec {
            Some(p) => IteratorMode::From(p.as_slice(), Direction::Forward),
            None => IteratorMode::Start,
        };

        let mut readopts = ReadOptions::default();
        readopts.set_snapshot(&snapshot);
        let inner = self.db.iterator_cf_opt(&cf, readopts, mode);

        struct SnapshotScanIter<'a> {
            // Holds the snapshot alive for as long as the iterator runs.
            _snapshot: SnapshotWithThreadMode<'a, DB>,
            inner: DBIteratorWithThreadMode<'a, DB>,
            prefix: Option<Vec<u8>>,
            remaining: Option<usize>,
        }

        impl<'a> Iterator for SnapshotScanIter<'a> {
            type Item = (Vec<u8>, Vec<u8>);

            fn next(&mut self) -> Option<Self::Item> {
                if let Some(0) = self.remaining {
                    return None;
                }

                match self.inner.next()? {
                    Ok((k, v)) => {
                        if let Some(ref p) = self.prefix {
                            if !k.starts_with(p) {
                                return None;
                            }
                        }
                        if let Some(ref mut left) = self.remaining {
                            *left -= 1;
                        }
                        Some((k.to_vec(), v.to_vec()))
                    }
                    Err(_) => None,
                }
            }
        }

        Ok(Box::new(SnapshotScanIter {
            _snapshot: snapshot,
            inner,
            prefix: prefix_vec,
            remaining: limit,
        }))
    }

    fn table_exists(&self, table: &Table) -> bool {
        self.db.cf_handle(table.name()).is_some()
    }

    fn create_table(&self, table: &Table) -> Result<()> {
        if self.table_exists(table) {
            return Ok(());
        }

        match self.db.create_cf(table.name(), &Options::default()) {
            Ok(()) => Ok(()),
            Err(e) => {
                let msg = e.to_string();
                // Benign race: another thread created the CF between the
                // exists-check and the create.
                if msg.to_lowercase().contains("column family already exists") {
                    Ok(())
                } else {
                    Err(StorageError::Io(msg))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_db() -> (Arc<DB>, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let db = DB::open(&opts, temp_dir.path()).unwrap();
        (Arc::new(db), temp_dir)
    }

    #[test]
    fn create_and_check_table() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("test_cf");
        backend.create_table(&table).unwrap();
        assert!(backend.table_exists(&table));

        // Idempotent
        backend.create_table(&table).unwrap();
    }

    #[test]
    fn put_and_get() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("test_cf");
        backend.create_table(&table).unwrap();

        backend.put(&table, b"key1", b"value1").unwrap();
        assert_eq!(
            backend.get(&table, b"key1").unwrap(),
            Some(b"value1".to_vec())
        );
        assert_eq!(backend.get(&table, b"missing").unwrap(), None);
    }

    #[test]
    fn get_on_missing_table_fails() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("never_created");
        assert!(matches!(
            backend.get(&table, b"key"),
            Err(StorageError::TableNotFound(_))
        ));
    }

    #[test]
    fn scan_is_ordered() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("test_cf");
        backend.create_table(&table).unwrap();

        backend.put(&table, b"c", b"3").unwrap();
        backend.put(&table, b"a", b"1").unwrap();
        backend.put(&table, b"b", b"2").unwrap();

        let keys: Vec<_> = backend
            .scan(&table, None, None)
            .unwrap()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn scan_with_prefix() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("test_cf");
        backend.create_table(&table).unwrap();

        backend.put(&table, b"user\x001", b"v1").unwrap();
        backend.put(&table, b"user\x002", b"v2").unwrap();
        backend.put(&table, b"admin\x001", b"v3").unwrap();

        let results: Vec<_> = backend
            .scan(&table, Some(b"user\x00"), None)
            .unwrap()
            .collect();
        assert_eq!(results.len(), 2);
    }

    #[test]
    fn scan_with_limit() {
        let (db, _temp) = create_test_db();
        let backend = RocksDbBackend::new(db);

        let table = Table::new("test_cf");
        backend.create_table(&table).unwrap();

        for i in 0..5u8 {
            backend.put(&table, &[i], b"v").unwrap();
        }

        let results: Vec<_> = backend.scan(&table, None, Some(2)).unwrap().collect();
        assert_eq!(results.len(), 2);
    }
}
