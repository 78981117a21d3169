//! The two denormalized tweet projections.
//!
//! A tweet is stored once per projection; the projections are written
//! independently and are not reconciled. Rows are append-only: no update
//! or delete exists on either table.

mod by_user;
mod by_username;

pub use by_user::{TweetByUserKey, TweetsByUserStore};
pub use by_username::{TweetByUsernameKey, TweetsByUsernameStore};
