//! # chirpdb-tables
//!
//! The domain stores of the ChirpDB engine, built on `chirpdb-store`:
//!
//! - **schema**: keyspace and table metadata plus the idempotent startup
//!   schema manager.
//! - **tweets**: the two denormalized tweet projections
//!   (`tweets_by_user`, `tweets_by_username`). Append-only; reads return a
//!   partition in ascending creation order.
//! - **likes**: the like/unlike toggle engine and the full-scan aggregate
//!   reads over `user_likes`.
//! - **distinct**: partition-key enumeration without row bodies.
//!
//! The three tables are not kept in referential sync: each write path
//! populates only the projection it targets, and callers must know which
//! table serves which access pattern.

pub mod distinct;
pub mod error;
pub mod likes;
pub mod schema;
pub mod tweets;

pub use distinct::DistinctLister;
pub use error::{Result, ScanError, ScanResult, TableError};
pub use likes::UserLikesStore;
pub use schema::{Keyspace, SchemaManager, TableSpec};
pub use tweets::{TweetsByUserStore, TweetsByUsernameStore};
