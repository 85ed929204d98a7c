//! Tweet document model.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A tweet document as stored in the `tweets` collection.
///
/// Only the owning identity may mutate or delete a tweet; the repository
/// exposes owner-scoped lookups for that check.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tweet {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub content: String,

    /// Owning user id.
    pub owner: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Tweet {
    /// Build a new unsaved tweet.
    pub fn new(content: impl Into<String>, owner: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            content: content.into(),
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_tweet_carries_owner() {
        let owner = ObjectId::new();
        let tweet = Tweet::new("hello world", owner);
        assert_eq!(tweet.owner, owner);
        assert!(tweet.id.is_none());
        assert_eq!(tweet.content, "hello world");
    }
}
