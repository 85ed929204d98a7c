//! Typed repository for video documents.

use futures_util::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime, Document};
use mongodb::options::ReturnDocument;
use mongodb::{Collection, Database};
use serde::Deserialize;
use tracing::info;

use vidtube_models::{Video, VideoPage, VideoWithOwner};

use crate::error::{DbError, DbResult};
use crate::listing::{facet_total, VideoListQuery};

/// Deserialized `$facet` stage output.
#[derive(Debug, Deserialize)]
struct ListingFacet {
    #[serde(default)]
    items: Vec<VideoWithOwner>,
    #[serde(default)]
    total: Vec<Document>,
}

/// Repository over the `videos` collection.
pub struct VideoRepository {
    collection: Collection<Video>,
}

impl VideoRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection("videos"),
        }
    }

    /// Point lookup by id.
    pub async fn find_by_id(&self, id: &ObjectId) -> DbResult<Option<Video>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    /// Insert a new document and return it with its assigned id.
    pub async fn insert(&self, video: &Video) -> DbResult<Video> {
        let result = self.collection.insert_one(video).await?;
        let id = result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| DbError::InvalidResponse("insert returned no object id".to_string()))?;

        info!("Created video {}", id);
        let mut persisted = video.clone();
        persisted.id = Some(id);
        Ok(persisted)
    }

    /// Atomically set fields on one document, bumping `updatedAt`.
    ///
    /// Returns the post-image, or `None` when no document matched. Atomic at
    /// the single-document level; overlapping field writes are
    /// last-write-wins in store-arbitrated order.
    pub async fn update_by_id(&self, id: &ObjectId, mut set: Document) -> DbResult<Option<Video>> {
        set.insert("updatedAt", DateTime::now());
        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated)
    }

    /// Set the publish flag.
    pub async fn set_publish_state(&self, id: &ObjectId, published: bool) -> DbResult<Option<Video>> {
        self.update_by_id(id, doc! { "isPublished": published }).await
    }

    /// Delete by id, returning the removed document when one existed.
    pub async fn delete_by_id(&self, id: &ObjectId) -> DbResult<Option<Video>> {
        let deleted = self
            .collection
            .find_one_and_delete(doc! { "_id": id })
            .await?;
        if deleted.is_some() {
            info!("Deleted video {}", id);
        }
        Ok(deleted)
    }

    /// Run the listing pipeline and assemble one page.
    ///
    /// Zero matches is a normal result, not an error; only a driver failure
    /// propagates.
    pub async fn list(&self, query: &VideoListQuery) -> DbResult<VideoPage> {
        let mut cursor = self.collection.aggregate(query.build_pipeline()).await?;

        // $facet always emits exactly one document
        let facet_doc = cursor
            .try_next()
            .await?
            .ok_or_else(|| DbError::InvalidResponse("facet stage emitted nothing".to_string()))?;
        let facet: ListingFacet = mongodb::bson::from_document(facet_doc)?;

        let total = facet_total(&facet.total);
        Ok(VideoPage::new(facet.items, total, query.page, query.limit))
    }
}
