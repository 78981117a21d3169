//! The engine facade.
//!
//! `ChirpDb` owns the storage handle and wires every component around it by
//! constructor injection: no global session state. Opening runs the
//! idempotent schema pass; dropping the value closes the storage handle.

use std::sync::Arc;

use anyhow::Context;

use chirpdb_commons::escaping::escape_body;
use chirpdb_commons::{OwnerId, TweetByUser, TweetByUsername, TweetId, TweetIdGenerator, UserName};
use chirpdb_store::{RocksDbBackend, RocksDbInit, StorageBackend, Table};
use chirpdb_tables::schema::TableSpec;
use chirpdb_tables::{
    DistinctLister, Keyspace, Result, ScanResult, SchemaManager, TweetsByUserStore,
    TweetsByUsernameStore, UserLikesStore,
};

use crate::config::ChirpConfig;

/// Handle to an open ChirpDB engine.
///
/// The handle is `Send + Sync` and intended to be shared across request
/// workers (wrap it in an `Arc`). All operations are synchronous blocking
/// calls; callers that need bounded latency must impose timeouts at the
/// transport layer.
pub struct ChirpDb {
    tweets_by_user: TweetsByUserStore,
    tweets_by_username: TweetsByUsernameStore,
    user_likes: UserLikesStore,
    distinct: DistinctLister,
}

impl ChirpDb {
    /// Opens the engine at the configured storage path.
    ///
    /// Storage-open failures are fatal and propagate; schema (table
    /// creation) failures are logged and swallowed, matching the startup
    /// contract of the schema manager.
    pub fn open(config: &ChirpConfig) -> anyhow::Result<Self> {
        let keyspace = Keyspace::new(
            config.keyspace.name.as_str(),
            config.keyspace.replication_factor,
        );

        let required: Vec<Table> = TableSpec::all()
            .into_iter()
            .map(|spec| keyspace.table(spec))
            .collect();

        let db = RocksDbInit::new(config.storage.path.as_str(), config.storage.rocksdb.to_settings())
            .open(&required)
            .with_context(|| format!("failed to open storage at {}", config.storage.path))?;

        let backend: Arc<dyn StorageBackend> = Arc::new(RocksDbBackend::new(db));
        Ok(Self::with_backend(backend, keyspace))
    }

    /// Wires the engine around an existing backend handle.
    ///
    /// Used directly by tests with the in-memory backend; `open` goes
    /// through here after standing up RocksDB.
    pub fn with_backend(backend: Arc<dyn StorageBackend>, keyspace: Keyspace) -> Self {
        SchemaManager::new(Arc::clone(&backend), keyspace.clone()).ensure_schema();

        let ids = Arc::new(TweetIdGenerator::new());

        Self {
            tweets_by_user: TweetsByUserStore::new(
                Arc::clone(&backend),
                &keyspace,
                Arc::clone(&ids),
            ),
            tweets_by_username: TweetsByUsernameStore::new(
                Arc::clone(&backend),
                &keyspace,
                ids,
            ),
            user_likes: UserLikesStore::new(Arc::clone(&backend), &keyspace),
            distinct: DistinctLister::new(backend, keyspace),
        }
    }

    /// Inserts a tweet into the by-user-id projection and returns the
    /// stored row (with the caller's body, unescaped).
    pub fn insert_tweet_by_user(
        &self,
        user_id: &OwnerId,
        title: &str,
        body: &str,
    ) -> Result<TweetByUser> {
        let mut row = self
            .tweets_by_user
            .insert(user_id, title, &escape_body(body))?;
        row.body = body.to_string();
        Ok(row)
    }

    /// Inserts a tweet into the by-username projection. Independent of the
    /// by-user-id projection: neither insert touches the other table.
    pub fn insert_tweet_by_username(
        &self,
        username: &UserName,
        title: &str,
        body: &str,
    ) -> Result<TweetByUsername> {
        let mut row = self
            .tweets_by_username
            .insert(username, title, &escape_body(body))?;
        row.body = body.to_string();
        Ok(row)
    }

    /// Returns the owner's tweets ascending by creation token.
    pub fn tweets_by_user(&self, user_id: &OwnerId) -> ScanResult<TweetByUser> {
        self.tweets_by_user.tweets(user_id)
    }

    /// Returns the username's tweets ascending by creation token.
    pub fn tweets_by_username(&self, username: &UserName) -> ScanResult<TweetByUsername> {
        self.tweets_by_username.tweets(username)
    }

    /// Flips the user's like state on a tweet; returns the new state.
    pub fn like_dislike_tweet(&self, username: &UserName, tweet_id: &TweetId) -> Result<bool> {
        self.user_likes.toggle(username, tweet_id)
    }

    /// Counts users currently liking the tweet (full-scan aggregate).
    pub fn user_likes(&self, tweet_id: &TweetId) -> Result<usize> {
        self.user_likes.likes_count(tweet_id)
    }

    /// Lists usernames currently liking the tweet, order unspecified.
    pub fn users_that_liked(&self, tweet_id: &TweetId) -> Result<Vec<UserName>> {
        self.user_likes.users_that_liked(tweet_id)
    }

    /// Lists the distinct values of a partition-key column in a table.
    pub fn distinct_ids(&self, column: &str, table: &str) -> Result<Vec<String>> {
        self.distinct.distinct_ids(column, table)
    }
}
