//! Typed repository for tweet documents.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use tracing::info;

use vidtube_models::Tweet;

use crate::error::{DbError, DbResult};

/// Repository over the `tweets` collection.
pub struct TweetRepository {
    collection: Collection<Tweet>,
}

impl TweetRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("tweets"),
        }
    }

    /// Insert a new tweet and return it with its assigned id.
    pub async fn insert(&self, tweet: &Tweet) -> DbResult<Tweet> {
        let result = self.collection.insert_one(tweet).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DbError::InvalidResponse("insert returned no object id".to_string()))?;

        info!("Created tweet {}", id);
        let mut persisted = tweet.clone();
        persisted.id = Some(id);
        Ok(persisted)
    }

    /// Point lookup by id.
    pub async fn find_by_id(&self, id: &ObjectId) -> DbResult<Option<Tweet>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Lookup scoped to (id AND owner).
    ///
    /// A miss here means either the tweet does not exist or the caller does
    /// not own it; callers treat both as an authorization failure.
    pub async fn find_owned(&self, id: &ObjectId, owner: &ObjectId) -> DbResult<Option<Tweet>> {
        Ok(self
            .collection
            .find_one(doc! { "_id": id, "owner": owner })
            .await?)
    }

    /// All tweets for one owner.
    pub async fn find_by_owner(&self, owner: &ObjectId) -> DbResult<Vec<Tweet>> {
        let cursor = self.collection.find(doc! { "owner": owner }).await?;
        Ok(cursor.try_collect().await?)
    }

    /// Replace the content of one tweet, bumping `updatedAt`.
    pub async fn update_content(&self, id: &ObjectId, content: &str) -> DbResult<Option<Tweet>> {
        let updated = self
            .collection
            .find_one_and_update(
                doc! { "_id": id },
                doc! { "$set": { "content": content, "updatedAt": DateTime::now() } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    /// Delete by id, returning the removed document when one existed.
    pub async fn delete_by_id(&self, id: &ObjectId) -> DbResult<Option<Tweet>> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        if deleted.is_some() {
            info!("Deleted tweet {}", id);
        }
        Ok(deleted)
    }
}
