//! Denormalized row models stored by the engine.
//!
//! A tweet conceptually exists once but is stored in two independent
//! projections keyed differently, so each projection gets its own row type.
//! Rows repeat their key columns in the value, matching the wide-column
//! layout where every column of a row is readable without the key.

mod like;
mod tweet;

pub use like::Like;
pub use tweet::{TweetByUser, TweetByUsername};
