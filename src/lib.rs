//! # ChirpDB
//!
//! Embedded wide-column store for short text posts ("tweets") and per-user
//! like relations. ChirpDB is a library: an HTTP layer is expected to embed
//! it and map its operations onto transport endpoints.
//!
//! ## Data model
//!
//! Three access-pattern-specific tables inside one keyspace:
//!
//! - `tweets_by_user` — tweets partitioned by owner id, clustered by
//!   creation token ascending.
//! - `tweets_by_username` — the same tweets projected by username. The two
//!   projections are written independently and never reconciled.
//! - `user_likes` — one row per (username, tweet) interaction, flipped in
//!   place by the toggle operation and never deleted.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use chirpdb::{ChirpConfig, ChirpDb, OwnerId};
//!
//! # fn main() -> anyhow::Result<()> {
//! let mut config = ChirpConfig::default();
//! config.storage.path = "/var/lib/chirpdb".to_string();
//!
//! let db = ChirpDb::open(&config)?;
//! let owner = OwnerId::generate();
//! db.insert_tweet_by_user(&owner, "hello", "first post")?;
//! let timeline = db.tweets_by_user(&owner)?;
//! assert_eq!(timeline.len(), 1);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod logging;
pub mod service;

pub use config::ChirpConfig;
pub use logging::init_logging;
pub use service::ChirpDb;

// Re-export the vocabulary types consumers need to drive the engine.
pub use chirpdb_commons::{Like, OwnerId, TweetByUser, TweetByUsername, TweetId, UserName};
pub use chirpdb_tables::{ScanError, ScanResult, TableError};
