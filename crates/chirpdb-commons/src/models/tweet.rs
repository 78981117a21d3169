use serde::{Deserialize, Serialize};

use crate::ids::{OwnerId, TweetId, UserName};

/// Row of the `tweets_by_user` projection.
///
/// Partition key: `user_id`. Clustering key: `created_on`, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetByUser {
    pub user_id: OwnerId,
    pub title: String,
    /// Stored in escaped form; readers reverse the escaping before
    /// returning the row.
    pub body: String,
    pub created_on: TweetId,
}

/// Row of the `tweets_by_username` projection.
///
/// Partition key: `username`. Clustering key: `created_on`, ascending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TweetByUsername {
    pub username: UserName,
    pub title: String,
    pub body: String,
    pub created_on: TweetId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::TweetIdGenerator;

    #[test]
    fn tweet_by_user_serde_round_trip() {
        let row = TweetByUser {
            user_id: OwnerId::new("u1"),
            title: "hello".to_string(),
            body: "first post".to_string(),
            created_on: TweetIdGenerator::new().next_id(),
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: TweetByUser = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }

    #[test]
    fn tweet_by_username_serde_round_trip() {
        let row = TweetByUsername {
            username: UserName::new("alice"),
            title: "hi".to_string(),
            body: "second post".to_string(),
            created_on: TweetIdGenerator::new().next_id(),
        };
        let json = serde_json::to_string(&row).unwrap();
        let back: TweetByUsername = serde_json::from_str(&json).unwrap();
        assert_eq!(row, back);
    }
}
