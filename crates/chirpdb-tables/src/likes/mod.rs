//! Like toggle engine and aggregate reads over `user_likes`.

mod like_store;

pub use like_store::{LikeKey, UserLikesStore};
