//! Time-ordered unique tweet identifiers.
//!
//! A `TweetId` doubles as the clustering key of every projection and as a
//! proxy for "when the tweet was created": comparing two ids compares their
//! creation instants. The generator hands out ids that are strictly
//! increasing per instance, so rows land in a partition already sorted.

use std::fmt;
use std::str::FromStr;
use std::sync::Mutex;
use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use uuid::{ContextV7, Timestamp, Uuid};

/// Time-ordered unique identifier for a tweet row.
///
/// Backed by a UUID v7 (64 bits of timestamp/counter followed by random
/// bits, 128 bits total): byte order, string order and chronological order
/// all agree, and ids minted concurrently on different machines stay unique
/// without coordination.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct TweetId(Uuid);

impl TweetId {
    /// Wraps an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the raw 16 key bytes (big-endian timestamp first, so the
    /// byte order is the chronological order).
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Reconstructs an id from its 16 key bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        Uuid::from_slice(bytes)
            .map(Self)
            .map_err(|e| format!("invalid tweet id bytes: {}", e))
    }

    /// Extracts the embedded creation instant.
    pub fn timestamp(&self) -> Option<SystemTime> {
        self.0.get_timestamp().map(|ts| {
            let (secs, nanos) = ts.to_unix();
            SystemTime::UNIX_EPOCH + std::time::Duration::new(secs, nanos)
        })
    }
}

impl fmt::Display for TweetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TweetId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Generator for [`TweetId`]s with a per-instance ordering guarantee.
///
/// Two ids drawn in sequence from the same generator always compare in
/// draw order, even inside a single millisecond: the shared [`ContextV7`]
/// fills the counter bits, and the last-issued guard waits out clock
/// regressions instead of emitting an out-of-order id.
pub struct TweetIdGenerator {
    context: ContextV7,
    last: Mutex<Uuid>,
}

impl TweetIdGenerator {
    /// Creates a new generator.
    pub fn new() -> Self {
        Self {
            context: ContextV7::new(),
            last: Mutex::new(Uuid::nil()),
        }
    }

    /// Returns the next id, strictly greater than every id this generator
    /// has issued before.
    pub fn next_id(&self) -> TweetId {
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());
        loop {
            let candidate = Uuid::new_v7(Timestamp::now(&self.context));
            if candidate > *last {
                *last = candidate;
                return TweetId(candidate);
            }
            // Clock moved backwards; spin until it catches up with the
            // last issued id.
        }
    }
}

impl Default for TweetIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}
