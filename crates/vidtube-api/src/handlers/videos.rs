//! Video lifecycle handlers.

use axum::extract::{Multipart, Path, Query, State};
use axum::response::IntoResponse;
use mongodb::bson::doc;
use serde::Deserialize;
use tracing::warn;

use vidtube_db::{SortConfig, VideoListQuery};
use vidtube_models::Video;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics::{record_orphaned_asset, record_request};
use crate::response::ApiResponse;
use crate::state::AppState;
use crate::upload::UploadForm;

/// Raw query parameters for `GET /videos`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub query: Option<String>,
    pub sort_by: Option<String>,
    pub sort_type: Option<String>,
    pub user_id: Option<String>,
}

/// `POST /videos`
///
/// Uploads run video first, then thumbnail. If the thumbnail upload fails
/// the already-uploaded video asset is deleted best-effort so nothing is
/// inserted half-built.
pub async fn publish_video(
    State(state): State<AppState>,
    user: AuthUser,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;

    let title = form.title.take().map(|t| t.trim().to_string());
    let description = form.description.take().map(|d| d.trim().to_string());

    let (title, description) = match (title, description) {
        (Some(t), Some(d)) if !t.is_empty() && !d.is_empty() => (t, d),
        _ => {
            form.discard().await;
            return Err(ApiError::bad_request("title and description are required"));
        }
    };

    let Some(video_file) = form.video_file.take() else {
        form.discard().await;
        return Err(ApiError::bad_request("videoFile is required"));
    };
    let Some(thumbnail) = form.thumbnail.take() else {
        video_file.discard().await;
        return Err(ApiError::bad_request("thumbnail is required"));
    };

    let video_asset = match state.media.upload(&video_file.path).await {
        Ok(asset) => asset,
        Err(e) => {
            thumbnail.discard().await;
            return Err(e.into());
        }
    };

    let thumbnail_asset = match state.media.upload(&thumbnail.path).await {
        Ok(asset) => asset,
        Err(e) => {
            if !state.media.delete(&video_asset.url).await.is_ok() {
                warn!("Orphaned video asset after failed thumbnail upload: {}", video_asset.url);
                record_orphaned_asset("publish");
            }
            return Err(e.into());
        }
    };

    let video = Video::new(
        title,
        description,
        video_asset.url,
        thumbnail_asset.url,
        video_asset.duration.unwrap_or(0.0),
        user.id,
    );
    let created = state.db.videos().insert(&video).await?;

    record_request("videos", 201);
    Ok(ApiResponse::created(created, "Video published successfully"))
}

/// `GET /videos`
pub async fn list_videos(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> ApiResult<impl IntoResponse> {
    let owner = match params.user_id.as_deref() {
        Some(raw) if !raw.is_empty() => Some(vidtube_db::parse_object_id(raw)?),
        _ => None,
    };

    let sort = SortConfig::from_params(params.sort_by.as_deref(), params.sort_type.as_deref());
    let query = VideoListQuery::from_params(params.page, params.limit, params.query, sort, owner);

    // Zero matches comes back as an empty page, not an error
    let page = state.db.videos().list(&query).await?;

    record_request("videos", 200);
    Ok(ApiResponse::ok(page, "Videos fetched successfully"))
}

/// `GET /videos/{videoId}`
pub async fn get_video(
    State(state): State<AppState>,
    Path(video_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = vidtube_db::parse_object_id(&video_id)?;
    let video = state
        .db
        .videos()
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    record_request("videos", 200);
    Ok(ApiResponse::ok(video, "Video fetched successfully"))
}

/// `PATCH /videos/{videoId}`
///
/// Requires a replacement thumbnail plus at least one of title or
/// description. The new thumbnail is uploaded before the old one is
/// deleted; when the old delete cannot be confirmed the request is
/// rejected and the freshly uploaded asset stays orphaned on the host.
pub async fn update_video(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(video_id): Path<String>,
    multipart: Multipart,
) -> ApiResult<impl IntoResponse> {
    let mut form = UploadForm::from_multipart(multipart).await?;

    let title = form
        .title
        .take()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty());
    let description = form
        .description
        .take()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty());

    if title.is_none() && description.is_none() {
        form.discard().await;
        return Err(ApiError::bad_request(
            "at least one of title or description is required",
        ));
    }

    let Some(thumbnail) = form.thumbnail.take() else {
        form.discard().await;
        return Err(ApiError::bad_request("thumbnail is required"));
    };

    let id = match vidtube_db::parse_object_id(&video_id) {
        Ok(id) => id,
        Err(e) => {
            thumbnail.discard().await;
            return Err(e.into());
        }
    };

    let repo = state.db.videos();
    let existing = match repo.find_by_id(&id).await {
        Ok(Some(v)) => v,
        Ok(None) => {
            thumbnail.discard().await;
            return Err(ApiError::not_found("Video not found"));
        }
        Err(e) => {
            thumbnail.discard().await;
            return Err(e.into());
        }
    };

    let new_thumbnail = state.media.upload(&thumbnail.path).await?;

    if !state.media.delete(&existing.thumbnail).await.is_ok() {
        warn!(
            "Old thumbnail delete unconfirmed for video {}, new asset {} orphaned",
            id, new_thumbnail.url
        );
        record_orphaned_asset("update");
        return Err(ApiError::bad_request(
            "could not replace the existing thumbnail",
        ));
    }

    let mut set = doc! { "thumbnail": &new_thumbnail.url };
    if let Some(title) = &title {
        set.insert("title", title);
    }
    if let Some(description) = &description {
        set.insert("description", description);
    }

    let updated = repo
        .update_by_id(&id, set)
        .await?
        .ok_or_else(|| ApiError::internal("video update persisted nothing"))?;

    record_request("videos", 200);
    Ok(ApiResponse::ok(updated, "Video updated successfully"))
}

/// `DELETE /videos/{videoId}`
///
/// Remote asset deletion is best-effort: a failed or skipped remote delete
/// is counted and logged but never blocks removing the document.
pub async fn delete_video(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = vidtube_db::parse_object_id(&video_id)?;
    let repo = state.db.videos();

    let video = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    if !state.media.delete(&video.video_file).await.is_ok() {
        warn!("Video asset delete unconfirmed for {}", id);
        record_orphaned_asset("delete");
    }
    if !state.media.delete(&video.thumbnail).await.is_ok() {
        warn!("Thumbnail asset delete unconfirmed for {}", id);
        record_orphaned_asset("delete");
    }

    repo.delete_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::internal("video delete removed nothing"))?;

    record_request("videos", 200);
    Ok(ApiResponse::ok(
        serde_json::json!({ "deleted": true }),
        "Video deleted successfully",
    ))
}

/// `PATCH /videos/{videoId}/toggle-publish`
pub async fn toggle_publish(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(video_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = vidtube_db::parse_object_id(&video_id)?;
    let repo = state.db.videos();

    let video = repo
        .find_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::not_found("Video not found"))?;

    let updated = repo
        .set_publish_state(&id, !video.is_published)
        .await?
        .ok_or_else(|| ApiError::internal("publish toggle persisted nothing"))?;

    record_request("videos", 200);
    Ok(ApiResponse::ok(updated, "Publish state toggled successfully"))
}
