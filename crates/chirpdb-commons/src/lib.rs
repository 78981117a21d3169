//! # chirpdb-commons
//!
//! Shared vocabulary for the ChirpDB workspace: typed identifiers, row
//! models and the tweet-body escaping codec. This crate sits at the bottom
//! of the dependency graph so that the storage layer and the table stores
//! can agree on key and row types without depending on each other.
//!
//! ## Contents
//!
//! - **ids**: `OwnerId` (random unique owner key), `TweetId` (time-ordered
//!   unique token) with its process-local generator, and `UserName`
//!   (validated partition-key string).
//! - **models**: the denormalized rows stored by the engine
//!   (`TweetByUser`, `TweetByUsername`, `Like`).
//! - **escaping**: the angle-bracket body codec applied around storage.
//! - **storage_key**: trait implemented by every type used as a storage key.

pub mod escaping;
pub mod ids;
pub mod models;
pub mod storage_key;

pub use ids::{KeyValidationError, OwnerId, TweetId, TweetIdGenerator, UserName};
pub use models::{Like, TweetByUser, TweetByUsername};
pub use storage_key::StorageKey;
