//! Storage backend abstraction for pluggable storage implementations.
//!
//! The engine talks to storage through the `StorageBackend` trait so that
//! the production RocksDB backend and the in-memory test backend are
//! interchangeable. A [`Table`] names a physical table; backends map it to
//! their native concept (RocksDB: column family, in-memory: ordered map).
//!
//! Backends must keep scans ordered: `scan` yields entries in ascending
//! byte order of their keys, which the key encoding turns into ascending
//! clustering order within a partition.

use std::fmt;

/// Result type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Clone)]
pub enum StorageError {
    /// Table (column family) not found
    TableNotFound(String),

    /// Generic I/O error from the underlying storage
    Io(String),

    /// Serialization/deserialization error
    Serialization(String),

    /// Malformed storage key
    InvalidKey(String),

    /// Other errors
    Other(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::TableNotFound(t) => write!(f, "Table not found: {}", t),
            StorageError::Io(msg) => write!(f, "I/O error: {}", msg),
            StorageError::Serialization(msg) => write!(f, "Serialization error: {}", msg),
            StorageError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
            StorageError::Other(msg) => write!(f, "Storage error: {}", msg),
        }
    }
}

impl std::error::Error for StorageError {}

/// Names a physical table within the storage backend.
///
/// The qualified form is `{keyspace}:{table}`, so several keyspaces can
/// share one database without colliding.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Table {
    name: String,
}

impl Table {
    /// Creates a table reference from an already-qualified name.
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Creates a table reference qualified by keyspace.
    pub fn qualified(keyspace: &str, table: &str) -> Self {
        Self {
            name: format!("{}:{}", keyspace, table),
        }
    }

    /// Returns the qualified table name.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Iterator over (key, value) pairs produced by a scan.
pub type KvIterator<'a> = Box<dyn Iterator<Item = (Vec<u8>, Vec<u8>)> + 'a>;

/// Trait for pluggable storage backend implementations.
///
/// Implementations must be thread-safe (Send + Sync): the backend handle is
/// shared process-wide and used concurrently by every table store. The
/// handle itself provides no mutual exclusion beyond per-operation
/// atomicity; serialization of multi-step protocols is the caller's job.
pub trait StorageBackend: Send + Sync {
    /// Retrieves a value by key. Returns `Ok(None)` if the key is absent.
    fn get(&self, table: &Table, key: &[u8]) -> Result<Option<Vec<u8>>>;

    /// Stores a key-value pair. An existing value for the key is replaced.
    fn put(&self, table: &Table, key: &[u8], value: &[u8]) -> Result<()>;

    /// Scans keys in ascending byte order.
    ///
    /// ## Parameters
    /// - `prefix`: if `Some`, only entries whose key starts with the prefix
    /// - `limit`: if `Some`, at most this many entries
    ///
    /// Scans are not guaranteed to observe writes committed while the scan
    /// is running.
    fn scan(&self, table: &Table, prefix: Option<&[u8]>, limit: Option<usize>)
        -> Result<KvIterator<'_>>;

    /// Checks whether a table exists.
    fn table_exists(&self, table: &Table) -> bool;

    /// Creates a table. Returns `Ok(())` if it already exists (idempotent).
    fn create_table(&self, table: &Table) -> Result<()>;
}
