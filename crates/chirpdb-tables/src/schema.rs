//! Keyspace and table metadata plus the startup schema manager.
//!
//! The engine stores data in three access-pattern-specific tables. Their
//! layout is fixed here in one place (`TableSpec`) and consumed by the
//! schema manager and the distinct-key lister.

use chirpdb_store::{StorageBackend, Table};
use log::{error, info};
use std::sync::Arc;

/// Layout of one table: its name, partition-key column and clustering-key
/// column. Rows cluster ascending by the clustering column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableSpec {
    pub name: &'static str,
    pub partition_key: &'static str,
    pub clustering_key: &'static str,
}

/// `tweets_by_user`: tweets keyed by owner id, ordered by creation token.
pub const TWEETS_BY_USER: TableSpec = TableSpec {
    name: "tweets_by_user",
    partition_key: "user_id",
    clustering_key: "created_on",
};

/// `tweets_by_username`: tweets keyed by owner username.
pub const TWEETS_BY_USERNAME: TableSpec = TableSpec {
    name: "tweets_by_username",
    partition_key: "username",
    clustering_key: "created_on",
};

/// `user_likes`: one row per (username, tweet) interaction.
pub const USER_LIKES: TableSpec = TableSpec {
    name: "user_likes",
    partition_key: "username",
    clustering_key: "tweetid",
};

impl TableSpec {
    /// All tables of the keyspace, in creation order.
    pub fn all() -> [&'static TableSpec; 3] {
        [&TWEETS_BY_USER, &TWEETS_BY_USERNAME, &USER_LIKES]
    }

    /// Looks a table up by its unqualified name.
    pub fn by_name(name: &str) -> Option<&'static TableSpec> {
        Self::all().into_iter().find(|spec| spec.name == name)
    }
}

/// Keyspace settings relevant to schema setup.
///
/// The embedded engine keeps a single replica and acknowledges writes at
/// one replica; the replication factor is recorded and validated upstream
/// rather than driving any copying here.
#[derive(Debug, Clone)]
pub struct Keyspace {
    name: String,
    replication_factor: u32,
}

impl Keyspace {
    pub fn new(name: impl Into<String>, replication_factor: u32) -> Self {
        Self {
            name: name.into(),
            replication_factor,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn replication_factor(&self) -> u32 {
        self.replication_factor
    }

    /// Returns the physical table for a spec, qualified by this keyspace.
    pub fn table(&self, spec: &TableSpec) -> Table {
        Table::qualified(&self.name, spec.name)
    }
}

/// Ensures the keyspace's tables exist on startup.
///
/// Create-if-absent: existing tables are left untouched. Table-creation
/// errors are logged and swallowed so a half-provisioned store still comes
/// up; only the storage-open step before this may fail the constructor.
pub struct SchemaManager {
    backend: Arc<dyn StorageBackend>,
    keyspace: Keyspace,
}

impl SchemaManager {
    pub fn new(backend: Arc<dyn StorageBackend>, keyspace: Keyspace) -> Self {
        Self { backend, keyspace }
    }

    /// Creates every missing table of the keyspace.
    pub fn ensure_schema(&self) {
        info!(
            "Ensuring keyspace '{}' (replication factor {})",
            self.keyspace.name(),
            self.keyspace.replication_factor()
        );

        for spec in TableSpec::all() {
            let table = self.keyspace.table(spec);
            match self.backend.create_table(&table) {
                Ok(()) => info!(
                    "Table {} ready (partition key {}, clustering key {} ASC)",
                    table, spec.partition_key, spec.clustering_key
                ),
                Err(e) => error!("Failed to create table {}: {}", table, e),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpdb_store::test_utils::InMemoryBackend;
    use chirpdb_store::{KvIterator, StorageError};

    fn keyspace() -> Keyspace {
        Keyspace::new("tweet", 1)
    }

    #[test]
    fn ensure_schema_creates_all_tables() {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        let manager = SchemaManager::new(Arc::clone(&backend), keyspace());

        manager.ensure_schema();

        for spec in TableSpec::all() {
            assert!(backend.table_exists(&keyspace().table(spec)));
        }
    }

    #[test]
    fn ensure_schema_is_idempotent() {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        let manager = SchemaManager::new(Arc::clone(&backend), keyspace());

        manager.ensure_schema();
        let table = keyspace().table(&USER_LIKES);
        backend.put(&table, b"k", b"v").unwrap();

        manager.ensure_schema();
        assert_eq!(backend.get(&table, b"k").unwrap(), Some(b"v".to_vec()));
    }

    #[test]
    fn ddl_failures_do_not_panic() {
        struct FailingBackend;

        impl StorageBackend for FailingBackend {
            fn get(&self, _: &Table, _: &[u8]) -> chirpdb_store::storage_trait::Result<Option<Vec<u8>>> {
                Err(StorageError::Io("down".to_string()))
            }
            fn put(&self, _: &Table, _: &[u8], _: &[u8]) -> chirpdb_store::storage_trait::Result<()> {
                Err(StorageError::Io("down".to_string()))
            }
            fn scan(
                &self,
                _: &Table,
                _: Option<&[u8]>,
                _: Option<usize>,
            ) -> chirpdb_store::storage_trait::Result<KvIterator<'_>> {
                Err(StorageError::Io("down".to_string()))
            }
            fn table_exists(&self, _: &Table) -> bool {
                false
            }
            fn create_table(&self, _: &Table) -> chirpdb_store::storage_trait::Result<()> {
                Err(StorageError::Io("down".to_string()))
            }
        }

        // Startup continues regardless of DDL failures.
        let backend: Arc<dyn StorageBackend> = Arc::new(FailingBackend);
        SchemaManager::new(backend, keyspace()).ensure_schema();
    }

    #[test]
    fn spec_lookup_by_name() {
        assert_eq!(
            TableSpec::by_name("tweets_by_user"),
            Some(&TWEETS_BY_USER)
        );
        assert_eq!(TableSpec::by_name("user_likes").unwrap().partition_key, "username");
        assert!(TableSpec::by_name("unknown").is_none());
    }
}
