//! Type-safe wrapper for tweet-owner identifiers.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{validate_partition_key, KeyValidationError};
use crate::storage_key::StorageKey;

/// Type-safe wrapper for the opaque id that owns a `tweets_by_user`
/// partition.
///
/// Owner ids are opaque strings supplied by the calling layer; freshly
/// minted ids come from [`OwnerId::generate`], which draws a random UUID so
/// that ids collide with negligible probability without any coordination.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OwnerId(String);

impl OwnerId {
    /// Creates a new OwnerId from a string.
    ///
    /// # Panics
    /// Panics if the id fails partition-key validation. Use [`try_new`]
    /// for fallible creation.
    ///
    /// [`try_new`]: OwnerId::try_new
    #[inline]
    pub fn new(id: impl Into<String>) -> Self {
        Self::try_new(id).expect("OwnerId contains invalid characters")
    }

    /// Creates a new OwnerId, returning an error if validation fails.
    pub fn try_new(id: impl Into<String>) -> Result<Self, KeyValidationError> {
        let id = id.into();
        validate_partition_key("owner id", &id)?;
        Ok(Self(id))
    }

    /// Generates a fresh random owner id (hyphenated UUID v4).
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for OwnerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for OwnerId {
    fn storage_key(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        let s = String::from_utf8(bytes.to_vec())
            .map_err(|e| format!("invalid utf-8 in owner id: {}", e))?;
        Self::try_new(s).map_err(|e| e.to_string())
    }
}
