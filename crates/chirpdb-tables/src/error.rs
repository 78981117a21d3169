//! Error types for table operations.

use chirpdb_store::StorageError;
use std::fmt;
use thiserror::Error;

/// Errors that can occur in table store operations.
#[derive(Error, Debug, Clone)]
pub enum TableError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}

/// Result type for table store operations.
pub type Result<T> = std::result::Result<T, TableError>;

impl From<StorageError> for TableError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Serialization(msg) => TableError::Decode(msg),
            other => TableError::Storage(other.to_string()),
        }
    }
}

/// A partition scan that failed partway through.
///
/// Rows decoded before the failure are preserved so callers can surface a
/// partial result alongside the error; callers must check both.
#[derive(Debug, Clone)]
pub struct ScanError<T> {
    /// Rows decoded before the failure, still in clustering order.
    pub partial: Vec<T>,
    /// The error that interrupted the scan.
    pub error: TableError,
}

impl<T> ScanError<T> {
    /// A scan that failed before producing any row.
    pub fn empty(error: TableError) -> Self {
        Self {
            partial: Vec::new(),
            error,
        }
    }
}

impl<T> fmt::Display for ScanError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "scan failed after {} rows: {}",
            self.partial.len(),
            self.error
        )
    }
}

impl<T: fmt::Debug> std::error::Error for ScanError<T> {}

/// Result type for partition scans with partial-result semantics.
pub type ScanResult<T> = std::result::Result<Vec<T>, ScanError<T>>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_error_maps_to_storage_variant() {
        let err: TableError = StorageError::Io("disk full".to_string()).into();
        assert!(matches!(err, TableError::Storage(_)));
    }

    #[test]
    fn serialization_error_maps_to_decode_variant() {
        let err: TableError = StorageError::Serialization("bad json".to_string()).into();
        assert!(matches!(err, TableError::Decode(_)));
    }

    #[test]
    fn scan_error_reports_partial_count() {
        let err = ScanError {
            partial: vec![1, 2, 3],
            error: TableError::Decode("bad row".to_string()),
        };
        assert!(err.to_string().contains("after 3 rows"));
    }
}
