//! `tweets_by_username` projection: tweets partitioned by owner username.

use crate::error::{Result, ScanError, ScanResult};
use crate::schema::{Keyspace, TWEETS_BY_USERNAME};
use chirpdb_commons::escaping::unescape_body;
use chirpdb_commons::{StorageKey, TweetByUsername, TweetId, TweetIdGenerator, UserName};
use chirpdb_store::key_encoding::{parse_row_key, partition_prefix, row_key};
use chirpdb_store::{EntityStore, StorageBackend, Table};
use std::sync::Arc;

/// Composite row key: partition `username`, clustering `created_on`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetByUsernameKey {
    pub username: UserName,
    pub created_on: TweetId,
}

impl StorageKey for TweetByUsernameKey {
    fn storage_key(&self) -> Vec<u8> {
        row_key(self.username.as_str().as_bytes(), self.created_on.as_bytes())
    }

    fn from_storage_key(bytes: &[u8]) -> std::result::Result<Self, String> {
        let (partition, clustering) = parse_row_key(bytes).map_err(|e| e.to_string())?;
        Ok(Self {
            username: UserName::from_storage_key(partition)?,
            created_on: TweetId::from_bytes(clustering)?,
        })
    }
}

/// Store for the `tweets_by_username` projection.
///
/// Writes here are independent of `tweets_by_user`: inserting into one
/// projection says nothing about the other.
pub struct TweetsByUsernameStore {
    backend: Arc<dyn StorageBackend>,
    table: Table,
    ids: Arc<TweetIdGenerator>,
}

impl TweetsByUsernameStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        keyspace: &Keyspace,
        ids: Arc<TweetIdGenerator>,
    ) -> Self {
        let table = keyspace.table(&TWEETS_BY_USERNAME);
        Self { backend, table, ids }
    }

    /// Inserts one tweet row for the given username. See
    /// [`TweetsByUserStore::insert`] for the shared contract.
    ///
    /// [`TweetsByUserStore::insert`]: crate::tweets::TweetsByUserStore::insert
    pub fn insert(&self, username: &UserName, title: &str, body: &str) -> Result<TweetByUsername> {
        let created_on = self.ids.next_id();
        let row = TweetByUsername {
            username: username.clone(),
            title: title.to_string(),
            body: body.to_string(),
            created_on,
        };
        let key = TweetByUsernameKey {
            username: username.clone(),
            created_on,
        };
        self.put(&key, &row)?;
        Ok(row)
    }

    /// Returns the username's full partition, ascending by creation token,
    /// with bodies unescaped. Empty partition yields an empty vector.
    pub fn tweets(&self, username: &UserName) -> ScanResult<TweetByUsername> {
        let prefix = partition_prefix(username.as_str().as_bytes());
        let raw = self
            .scan_raw(&prefix, None)
            .map_err(|e| ScanError::empty(e.into()))?;

        let mut rows = Vec::with_capacity(raw.len());
        for (_, bytes) in raw {
            match self.deserialize(&bytes) {
                Ok(mut row) => {
                    row.body = unescape_body(&row.body);
                    rows.push(row);
                }
                Err(e) => {
                    return Err(ScanError {
                        partial: rows,
                        error: e.into(),
                    })
                }
            }
        }
        Ok(rows)
    }
}

impl EntityStore<TweetByUsernameKey, TweetByUsername> for TweetsByUsernameStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn table(&self) -> &Table {
        &self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chirpdb_store::test_utils::InMemoryBackend;

    fn create_store() -> TweetsByUsernameStore {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        let keyspace = Keyspace::new("tweet", 1);
        backend
            .create_table(&keyspace.table(&TWEETS_BY_USERNAME))
            .unwrap();
        TweetsByUsernameStore::new(backend, &keyspace, Arc::new(TweetIdGenerator::new()))
    }

    #[test]
    fn empty_partition_returns_empty_vec() {
        let store = create_store();
        assert!(store.tweets(&UserName::new("ghost")).unwrap().is_empty());
    }

    #[test]
    fn reads_come_back_in_insertion_order() {
        let store = create_store();
        let alice = UserName::new("alice");

        for i in 0..10 {
            store.insert(&alice, &format!("t{}", i), "body").unwrap();
        }

        let rows = store.tweets(&alice).unwrap();
        assert_eq!(rows.len(), 10);
        for pair in rows.windows(2) {
            assert!(pair[0].created_on < pair[1].created_on);
        }
    }

    #[test]
    fn prefix_usernames_do_not_bleed() {
        let store = create_store();
        let bob = UserName::new("bob");
        let bobby = UserName::new("bobby");

        store.insert(&bob, "t", "from bob").unwrap();
        store.insert(&bobby, "t", "from bobby").unwrap();

        let rows = store.tweets(&bob).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].body, "from bob");
    }

    #[test]
    fn key_round_trip() {
        let key = TweetByUsernameKey {
            username: UserName::new("alice"),
            created_on: TweetIdGenerator::new().next_id(),
        };
        let decoded = TweetByUsernameKey::from_storage_key(&key.storage_key()).unwrap();
        assert_eq!(key, decoded);
    }
}
