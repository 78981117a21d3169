//! Distinct partition-key enumeration.
//!
//! Lists the set of distinct partition-key values of a table without
//! fetching row bodies, for "all known tweet owners" style listings.
//! Only the partition-key column is enumerable: the key layout makes its
//! values readable from row keys alone, while any other column would need
//! an index this engine does not have.

use crate::error::{Result, TableError};
use crate::schema::{Keyspace, TableSpec};
use chirpdb_store::key_encoding::parse_row_key;
use chirpdb_store::StorageBackend;
use std::collections::HashSet;
use std::sync::Arc;

/// Enumerates distinct partition-key values.
pub struct DistinctLister {
    backend: Arc<dyn StorageBackend>,
    keyspace: Keyspace,
}

impl DistinctLister {
    pub fn new(backend: Arc<dyn StorageBackend>, keyspace: Keyspace) -> Self {
        Self { backend, keyspace }
    }

    /// Returns the distinct values of `column` in `table`, preserving the
    /// order the underlying scan yields (first occurrence wins).
    ///
    /// Snapshot semantics are not guaranteed: a scan may or may not
    /// observe rows inserted while it runs.
    pub fn distinct_ids(&self, column: &str, table: &str) -> Result<Vec<String>> {
        let spec = TableSpec::by_name(table).ok_or_else(|| {
            TableError::InvalidOperation(format!("unknown table: {}", table))
        })?;
        if column != spec.partition_key {
            return Err(TableError::InvalidOperation(format!(
                "distinct listing supports only the partition key ('{}' for {}), got '{}'",
                spec.partition_key, spec.name, column
            )));
        }

        let iter = self
            .backend
            .scan(&self.keyspace.table(spec), None, None)
            .map_err(TableError::from)?;

        let mut seen = HashSet::new();
        let mut ids = Vec::new();
        for (key, _) in iter {
            let (partition, _) = parse_row_key(&key).map_err(TableError::from)?;
            let id = String::from_utf8(partition.to_vec())
                .map_err(|e| TableError::Decode(format!("invalid utf-8 in partition key: {}", e)))?;
            if seen.insert(id.clone()) {
                ids.push(id);
            }
        }
        Ok(ids)
    }
}
