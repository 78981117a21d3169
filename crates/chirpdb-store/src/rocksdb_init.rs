//! RocksDB initialization.
//!
//! Thin helper that opens (or creates) the database with every required
//! table's column family present and the tuning options applied. Open
//! failures here are the engine's "connection errors": they propagate to
//! the caller of the constructor instead of being swallowed.

use crate::storage_trait::{Result, StorageError, Table};
use log::info;
use rocksdb::{BlockBasedOptions, Cache, ColumnFamilyDescriptor, Options, DB};
use std::path::Path;
use std::sync::Arc;

/// Tuning settings for the RocksDB instance.
#[derive(Debug, Clone)]
pub struct RocksDbSettings {
    /// Write buffer size per column family in bytes (default: 64MB)
    pub write_buffer_size: usize,

    /// Maximum number of write buffers (default: 3)
    pub max_write_buffers: i32,

    /// Block cache size shared across all column families (default: 256MB)
    pub block_cache_size: usize,

    /// Maximum number of background jobs (default: 4)
    pub max_background_jobs: i32,
}

impl Default for RocksDbSettings {
    fn default() -> Self {
        Self {
            write_buffer_size: 64 * 1024 * 1024,
            max_write_buffers: 3,
            block_cache_size: 256 * 1024 * 1024,
            max_background_jobs: 4,
        }
    }
}

/// RocksDB initializer for creating/opening a database with the keyspace
/// column families.
pub struct RocksDbInit {
    db_path: String,
    settings: RocksDbSettings,
}

impl RocksDbInit {
    /// Create a new initializer for the given path with custom settings.
    pub fn new(db_path: impl Into<String>, settings: RocksDbSettings) -> Self {
        Self {
            db_path: db_path.into(),
            settings,
        }
    }

    /// Create a new initializer with default settings.
    pub fn with_defaults(db_path: impl Into<String>) -> Self {
        Self::new(db_path, RocksDbSettings::default())
    }

    /// Open or create the database, ensuring the given tables' column
    /// families exist.
    pub fn open(&self, required: &[Table]) -> Result<Arc<DB>> {
        let path = Path::new(&self.db_path);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(true);
        db_opts.create_missing_column_families(true);
        db_opts.set_write_buffer_size(self.settings.write_buffer_size);
        db_opts.set_max_write_buffer_number(self.settings.max_write_buffers);
        db_opts.set_max_background_jobs(self.settings.max_background_jobs);
        db_opts.increase_parallelism(self.settings.max_background_jobs);

        // Block cache shared across all column families: adding tables does
        // not grow cache memory proportionally.
        let cache = Cache::new_lru_cache(self.settings.block_cache_size);
        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        db_opts.set_block_based_table_factory(&block_opts);

        // Union of column families already on disk and the required set.
        let mut cf_names = match DB::list_cf(&db_opts, path) {
            Ok(cfs) if !cfs.is_empty() => cfs,
            _ => vec!["default".to_string()],
        };
        for table in required {
            if !cf_names.iter().any(|n| n == table.name()) {
                cf_names.push(table.name().to_string());
            }
        }

        let cf_descriptors: Vec<_> = cf_names
            .iter()
            .map(|name| {
                let mut cf_opts = Options::default();
                cf_opts.set_write_buffer_size(self.settings.write_buffer_size);
                cf_opts.set_block_based_table_factory(&block_opts);
                ColumnFamilyDescriptor::new(name, cf_opts)
            })
            .collect();

        let db = DB::open_cf_descriptors(&db_opts, path, cf_descriptors)
            .map_err(|e| StorageError::Io(e.to_string()))?;

        info!(
            "Opened storage at {} with {} column families",
            self.db_path,
            cf_names.len()
        );

        Ok(Arc::new(db))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_required_tables() {
        let temp = TempDir::new().unwrap();
        let tables = [
            Table::qualified("tweet", "tweets_by_user"),
            Table::qualified("tweet", "user_likes"),
        ];

        let db = RocksDbInit::with_defaults(temp.path().to_string_lossy())
            .open(&tables)
            .unwrap();

        for table in &tables {
            assert!(db.cf_handle(table.name()).is_some());
        }
    }

    #[test]
    fn reopen_preserves_tables() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().to_string_lossy().to_string();
        let tables = [Table::qualified("tweet", "tweets_by_user")];

        {
            let init = RocksDbInit::with_defaults(&path);
            let _db = init.open(&tables).unwrap();
        }

        // Second open with no required list still finds the family on disk.
        let db = RocksDbInit::with_defaults(&path).open(&[]).unwrap();
        assert!(db.cf_handle(tables[0].name()).is_some());
    }

    #[test]
    fn open_fails_on_unusable_path() {
        let temp = TempDir::new().unwrap();
        let file_path = temp.path().join("occupied");
        std::fs::write(&file_path, b"not a database").unwrap();

        let result =
            RocksDbInit::with_defaults(file_path.to_string_lossy()).open(&[]);
        assert!(matches!(result, Err(StorageError::Io(_))));
    }
}
