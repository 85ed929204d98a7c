//! Video document model.

use bson::oid::ObjectId;
use bson::serde_helpers::chrono_datetime_as_bson_datetime;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::user::OwnerProfile;

/// A video document as stored in the `videos` collection.
///
/// Field names are camelCase on the wire and in the store; `videoFile` and
/// `thumbnail` hold remote media-host URLs, not local paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Video {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,

    pub title: String,
    pub description: String,

    /// Remote URL of the primary video asset.
    pub video_file: String,
    /// Remote URL of the thumbnail asset.
    pub thumbnail: String,

    /// Duration in seconds, reported by the media host on upload.
    pub duration: f64,

    #[serde(default)]
    pub views: i64,

    pub is_published: bool,

    /// Owning user id (managed by the identity subsystem).
    pub owner: ObjectId,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

impl Video {
    /// Build a new unsaved video document.
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        video_file: impl Into<String>,
        thumbnail: impl Into<String>,
        duration: f64,
        owner: ObjectId,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: None,
            title: title.into(),
            description: description.into(),
            video_file: video_file.into(),
            thumbnail: thumbnail.into(),
            duration,
            views: 0,
            is_published: true,
            owner,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A video joined with the public projection of its owner, as produced by
/// the listing pipeline. The owner object is absent when the join is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoWithOwner {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,
    pub description: String,
    pub video_file: String,
    pub thumbnail: String,
    pub duration: f64,
    #[serde(default)]
    pub views: i64,
    pub is_published: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<OwnerProfile>,

    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_video_defaults() {
        let owner = ObjectId::new();
        let video = Video::new("Intro", "hello", "https://host/a.mp4", "https://host/a.jpg", 12.0, owner);

        assert!(video.id.is_none());
        assert!(video.is_published);
        assert_eq!(video.views, 0);
        assert_eq!(video.duration, 12.0);
        assert_eq!(video.created_at, video.updated_at);
    }

    #[test]
    fn wire_shape_is_camel_case() {
        let owner = ObjectId::new();
        let video = Video::new("t", "d", "https://host/v.mp4", "https://host/t.jpg", 3.5, owner);
        let json = serde_json::to_value(&video).unwrap();

        assert!(json.get("videoFile").is_some());
        assert!(json.get("thumbnail").is_some());
        assert!(json.get("isPublished").is_some());
        assert!(json.get("createdAt").is_some());
        // Unsaved documents carry no _id
        assert!(json.get("_id").is_none());
    }

    #[test]
    fn double_publish_toggle_is_identity() {
        let owner = ObjectId::new();
        let mut video = Video::new("t", "d", "v", "th", 1.0, owner);
        let original = video.is_published;
        video.is_published = !video.is_published;
        video.is_published = !video.is_published;
        assert_eq!(video.is_published, original);
    }
}
