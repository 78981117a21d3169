//! # chirpdb-store
//!
//! Low-level key-value store abstraction for the ChirpDB tables. This crate
//! isolates all direct RocksDB interaction, so the table stores above it
//! stay free of RocksDB types and can run their tests against an in-memory
//! backend instead.
//!
//! ## Architecture
//!
//! ```text
//! chirpdb-tables (schema, tweets, likes, distinct)
//!     ↓
//! chirpdb-store (K/V operations over named tables)
//!     ↓
//! RocksDB (one column family per table)
//! ```
//!
//! ## Key layout
//!
//! Every row key is `{partition key}\0{clustering bytes}` (see
//! [`key_encoding`]): rows of one partition share a prefix and sort by the
//! clustering token, which gives the ascending creation-order scans the
//! tables promise.

pub mod entity_store;
pub mod key_encoding;
pub mod rocksdb_impl;
pub mod rocksdb_init;
pub mod storage_trait;
pub mod test_utils;

pub use entity_store::EntityStore;
pub use rocksdb_impl::RocksDbBackend;
pub use rocksdb_init::{RocksDbInit, RocksDbSettings};
pub use storage_trait::{KvIterator, StorageBackend, StorageError, Table};

// Re-export StorageKey so dependent crates import it from one place.
pub use chirpdb_commons::StorageKey;
