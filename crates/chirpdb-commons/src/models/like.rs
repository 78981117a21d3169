use serde::{Deserialize, Serialize};

use crate::ids::{TweetId, UserName};

/// Row of the `user_likes` table: one row per (username, tweet) pair.
///
/// Absence of a row means "no recorded interaction", not "not liked";
/// an explicit `liked = false` row records an unlike. Rows are flipped in
/// place by the toggle engine and never deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Like {
    pub username: UserName,
    pub tweet_id: TweetId,
    pub liked: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TweetIdGenerator;

    #[test]
    fn serde_round_trip() {
        let like = Like {
            username: UserName::new("alice"),
            tweet_id: TweetIdGenerator::new().next_id(),
            liked: true,
        };
        let json = serde_json::to_string(&like).unwrap();
        let back: Like = serde_json::from_str(&json).unwrap();
        assert_eq!(like, back);
    }
}
