//! `tweets_by_user` projection: tweets partitioned by owner id.

use crate::error::{ScanError, ScanResult, Result};
use crate::schema::{Keyspace, TWEETS_BY_USER};
use chirpdb_commons::escaping::unescape_body;
use chirpdb_commons::{OwnerId, StorageKey, TweetByUser, TweetId, TweetIdGenerator};
use chirpdb_store::key_encoding::{parse_row_key, partition_prefix, row_key};
use chirpdb_store::{EntityStore, StorageBackend, Table};
use std::sync::Arc;

/// Composite row key: partition `user_id`, clustering `created_on`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TweetByUserKey {
    pub user_id: OwnerId,
    pub created_on: TweetId,
}

impl StorageKey for TweetByUserKey {
    fn storage_key(&self) -> Vec<u8> {
        row_key(self.user_id.as_str().as_bytes(), self.created_on.as_bytes())
    }

    fn from_storage_key(bytes: &[u8]) -> std::result::Result<Self, String> {
        let (partition, clustering) = parse_row_key(bytes).map_err(|e| e.to_string())?;
        Ok(Self {
            user_id: OwnerId::from_storage_key(partition)?,
            created_on: TweetId::from_bytes(clustering)?,
        })
    }
}

/// Store for the `tweets_by_user` projection.
pub struct TweetsByUserStore {
    backend: Arc<dyn StorageBackend>,
    table: Table,
    ids: Arc<TweetIdGenerator>,
}

impl TweetsByUserStore {
    pub fn new(
        backend: Arc<dyn StorageBackend>,
        keyspace: &Keyspace,
        ids: Arc<TweetIdGenerator>,
    ) -> Self {
        let table = keyspace.table(&TWEETS_BY_USER);
        Self { backend, table, ids }
    }

    /// Inserts one tweet row for the given owner.
    ///
    /// Draws a fresh time-ordered creation token, so rows land in the
    /// partition in insertion order. The body is stored exactly as handed
    /// in; escaping is the calling layer's responsibility. Fails if the
    /// write cannot be acknowledged; no automatic retry.
    pub fn insert(&self, user_id: &OwnerId, title: &str, body: &str) -> Result<TweetByUser> {
        let created_on = self.ids.next_id();
        let row = TweetByUser {
            user_id: user_id.clone(),
            title: title.to_string(),
            body: body.to_string(),
            created_on,
        };
        let key = TweetByUserKey {
            user_id: user_id.clone(),
            created_on,
        };
        self.put(&key, &row)?;
        Ok(row)
    }

    /// Returns the owner's full partition, ascending by creation token.
    ///
    /// An owner with no rows yields an empty vector, not an error. Bodies
    /// come back unescaped. If a row fails to decode partway through, the
    /// rows read so far are returned inside the error.
    pub fn tweets(&self, user_id: &OwnerId) -> ScanResult<TweetByUser> {
        let prefix = partition_prefix(user_id.as_str().as_bytes());
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

impl EntityStore<TweetByUserKey, TweetByUser> for TweetsByUserStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn table(&self) -> &Table {
        &self.table
    }
}
