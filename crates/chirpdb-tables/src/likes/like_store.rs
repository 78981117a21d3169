//! `user_likes` table: toggle protocol and aggregate scans.
//!
//! One row per (username, tweet) pair, keyed so that at most one row can
//! ever exist for a pair. A row is created on first interaction and its
//! `liked` flag is flipped in place afterwards; rows are never deleted.

use crate::error::{Result, TableError};
use crate::schema::{Keyspace, USER_LIKES};
use chirpdb_commons::{Like, StorageKey, TweetId, UserName};
use chirpdb_store::key_encoding::{parse_row_key, row_key};
use chirpdb_store::{EntityStore, StorageBackend, Table};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::{Mutex, MutexGuard};
use std::sync::Arc;

/// Composite row key: partition `username`, clustering `tweetid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LikeKey {
    pub username: UserName,
    pub tweet_id: TweetId,
}

impl StorageKey for LikeKey {
    fn storage_key(&self) -> Vec<u8> {
        row_key(self.username.as_str().as_bytes(), self.tweet_id.as_bytes())
    }

    fn from_storage_key(bytes: &[u8]) -> std::result::Result<Self, String> {
        let (partition, clustering) = parse_row_key(bytes).map_err(|e| e.to_string())?;
        Ok(Self {
            username: UserName::from_storage_key(partition)?,
            tweet_id: TweetId::from_bytes(clustering)?,
        })
    }
}

/// Number of lock shards. Toggles on the same pair always hash to the same
/// shard; unrelated pairs rarely contend.
const LOCK_SHARDS: usize = 32;

/// Fixed pool of mutexes sharded by key hash.
struct ShardedLocks {
    shards: Vec<Mutex<()>>,
}

impl ShardedLocks {
    fn new() -> Self {
        Self {
            shards: (0..LOCK_SHARDS).map(|_| Mutex::new(())).collect(),
        }
    }

    fn guard(&self, key: &LikeKey) -> MutexGuard<'_, ()> {
        let mut hasher = DefaultHasher::new();
        key.username.as_str().hash(&mut hasher);
        key.tweet_id.as_bytes().hash(&mut hasher);
        let shard = (hasher.finish() as usize) % self.shards.len();
        self.shards[shard]
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

/// Store for the `user_likes` table.
pub struct UserLikesStore {
    backend: Arc<dyn StorageBackend>,
    table: Table,
    locks: ShardedLocks,
}

impl UserLikesStore {
    pub fn new(backend: Arc<dyn StorageBackend>, keyspace: &Keyspace) -> Self {
        let table = keyspace.table(&USER_LIKES);
        Self {
            backend,
            table,
            locks: ShardedLocks::new(),
        }
    }

    /// Flips the user's like state on a tweet and returns the new state.
    ///
    /// A missing row counts as a neutral starting state (liked = false),
    /// so the first interaction records `liked = true`. The read-negate-
    /// write sequence runs under a shard lock keyed by (username, tweetid):
    /// concurrent toggles on the same pair within this process serialize
    /// instead of racing to a lost update. Across processes the policy is
    /// last writer wins.
    pub fn toggle(&self, username: &UserName, tweet_id: &TweetId) -> Result<bool> {
        let key = LikeKey {
            username: username.clone(),
            tweet_id: *tweet_id,
        };
        let _guard = self.locks.guard(&key);

        let existing = self.get(&key)?.map(|like| like.liked).unwrap_or(false);
        let row = Like {
            username: username.clone(),
            tweet_id: *tweet_id,
            liked: !existing,
        };
        self.put(&key, &row)?;
        Ok(row.liked)
    }

    /// Counts users currently liking the tweet.
    ///
    /// Scans the whole table across all username partitions — there is no
    /// index on tweet id, so this is O(total interactions) and unsuitable
    /// for hot tweets at scale.
    pub fn likes_count(&self, tweet_id: &TweetId) -> Result<usize> {
        let likes: Vec<Like> = self.scan_prefix(b"", None)?;
        Ok(likes
            .iter()
            .filter(|like| like.liked && like.tweet_id == *tweet_id)
            .count())
    }

    /// Lists the usernames currently liking the tweet, in scan order.
    /// Same full-scan caveat as [`likes_count`].
    ///
    /// [`likes_count`]: UserLikesStore::likes_count
    pub fn users_that_liked(&self, tweet_id: &TweetId) -> Result<Vec<UserName>> {
        let likes: Vec<Like> = self.scan_prefix(b"", None)?;
        Ok(likes
            .into_iter()
            .filter(|like| like.liked && like.tweet_id == *tweet_id)
            .map(|like| like.username)
            .collect())
    }

    /// Number of rows stored for one (username, tweet) pair. At most 1 by
    /// key construction; exposed for invariant checks.
    pub fn interaction_rows(&self, username: &UserName, tweet_id: &TweetId) -> Result<usize> {
        let key = LikeKey {
            username: username.clone(),
            tweet_id: *tweet_id,
        };
        Ok(usize::from(self.get(&key)?.is_some()))
    }
}

impl EntityStore<LikeKey, Like> for UserLikesStore {
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
    use chirpdb_commons::TweetIdGenerator;
    use chirpdb_store::test_utils::InMemoryBackend;
    use std::thread;

    fn create_store() -> Arc<UserLikesStore> {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        let keyspace = Keyspace::new("tweet", 1);
        backend.create_table(&keyspace.table(&USER_LIKES)).unwrap();
        Arc::new(UserLikesStore::new(backend, &keyspace))
    }

    #[test]
    fn toggle_from_neutral_likes() {
        let store = create_store();
        let alice = UserName::new("alice");
        let tweet = TweetIdGenerator::new().next_id();

        assert!(store.toggle(&alice, &tweet).unwrap());
        assert_eq!(store.likes_count(&tweet).unwrap(), 1);
        assert_eq!(store.users_that_liked(&tweet).unwrap(), vec![alice.clone()]);
    }

    #[test]
    fn double_toggle_returns_to_original_state() {
        let store = create_store();
        let alice = UserName::new("alice");
        let tweet = TweetIdGenerator::new().next_id();

        assert!(store.toggle(&alice, &tweet).unwrap());
        assert!(!store.toggle(&alice, &tweet).unwrap());

        assert_eq!(store.likes_count(&tweet).unwrap(), 0);
        assert!(store.users_that_liked(&tweet).unwrap().is_empty());
    }

    #[test]
    fn unlike_keeps_the_row() {
        let store = create_store();
        let alice = UserName::new("alice");
        let tweet = TweetIdGenerator::new().next_id();

        store.toggle(&alice, &tweet).unwrap();
        store.toggle(&alice, &tweet).unwrap();

        // The row is flipped, not deleted.
        assert_eq!(store.interaction_rows(&alice, &tweet).unwrap(), 1);
    }

    #[test]
    fn exactly_one_row_per_pair_after_many_toggles() {
        let store = create_store();
        let alice = UserName::new("alice");
        let tweet = TweetIdGenerator::new().next_id();

        for _ in 0..7 {
            store.toggle(&alice, &tweet).unwrap();
        }

        assert_eq!(store.interaction_rows(&alice, &tweet).unwrap(), 1);
        // Odd number of toggles ends in the liked state.
        assert_eq!(store.likes_count(&tweet).unwrap(), 1);
    }

    #[test]
    fn aggregates_span_partitions() {
        let store = create_store();
        let tweet = TweetIdGenerator::new().next_id();
        let other = TweetIdGenerator::new().next_id();

        store.toggle(&UserName::new("alice"), &tweet).unwrap();
        store.toggle(&UserName::new("bob"), &tweet).unwrap();
        store.toggle(&UserName::new("carol"), &other).unwrap();

        assert_eq!(store.likes_count(&tweet).unwrap(), 2);
        let users = store.users_that_liked(&tweet).unwrap();
        assert_eq!(users.len(), 2);
        assert!(users.contains(&UserName::new("alice")));
        assert!(users.contains(&UserName::new("bob")));
    }

    #[test]
    fn concurrent_toggles_serialize() {
        let store = create_store();
        let alice = UserName::new("alice");
        let tweet = TweetIdGenerator::new().next_id();

        let mut handles = vec![];
        for _ in 0..8 {
            let store = Arc::clone(&store);
            let alice = alice.clone();
            handles.push(thread::spawn(move || {
                for _ in 0..25 {
                    store.toggle(&alice, &tweet).unwrap();
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        // 8 * 25 toggles is even: back to the neutral state, single row.
        assert_eq!(store.likes_count(&tweet).unwrap(), 0);
        assert_eq!(store.interaction_rows(&alice, &tweet).unwrap(), 1);
    }

    #[test]
    fn key_round_trip() {
        let key = LikeKey {
            username: UserName::new("alice"),
            tweet_id: TweetIdGenerator::new().next_id(),
        };
        let decoded = LikeKey::from_storage_key(&key.storage_key()).unwrap();
        assert_eq!(key, decoded);
    }
}
