//! Type-safe wrapper for usernames.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{validate_partition_key, KeyValidationError};
use crate::storage_key::StorageKey;

/// Type-safe wrapper for usernames used as partition keys.
///
/// The newtype keeps usernames from being confused with owner ids or other
/// string identifiers in store signatures.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserName(String);

impl UserName {
    /// Creates a new UserName from a string.
    ///
    /// # Panics
    /// Panics if the name fails partition-key validation. Use [`try_new`]
    /// for fallible creation.
    ///
    /// [`try_new`]: UserName::try_new
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        Self::try_new(name).expect("UserName contains invalid characters")
    }

    /// Creates a new UserName, returning an error if validation fails.
    pub fn try_new(name: impl Into<String>) -> Result<Self, KeyValidationError> {
        let name = name.into();
        validate_partition_key("username", &name)?;
        Ok(Self(name))
    }

    /// Returns the username as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the inner String.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for UserName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl StorageKey for UserName {
    fn storage_key(&self) -> Vec<u8> {
        self.0.as_bytes().to_vec()
    }

    fn from_storage_key(bytes: &[u8]) -> Result<Self, String> {
        let s = String::from_utf8(bytes.to_vec())
            .map_err(|e| format!("invalid utf-8 in username: {}", e))?;
        Self::try_new(s).map_err(|e| e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_names() {
        assert_eq!(UserName::new("alice").as_str(), "alice");
    }

    #[test]
    fn rejects_empty() {
        assert!(UserName::try_new("").is_err());
    }

    #[test]
    fn rejects_nul_bytes() {
        assert!(UserName::try_new("al\0ice").is_err());
    }

    #[test]
    fn storage_key_round_trip() {
        let name = UserName::new("bob");
        assert_eq!(UserName::from_storage_key(&name.storage_key()).unwrap(), name);
    }
}
