//! Multipart upload staging.
//!
//! Incoming files are staged to the local temp directory before being
//! pushed to the media host. The media client removes staged files after
//! an upload attempt; [`StagedFile::discard`] covers the paths where a
//! request fails validation before any upload happens.

use std::path::PathBuf;

use axum::extract::Multipart;
use tracing::warn;
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};

/// A file staged on local disk, waiting for the media host.
#[derive(Debug)]
pub struct StagedFile {
    pub path: PathBuf,
    pub filename: String,
}

impl StagedFile {
    /// Remove the staged file. Failures are logged, not escalated.
    pub async fn discard(self) {
        if let Err(e) = tokio::fs::remove_file(&self.path).await {
            warn!("Failed to discard staged file {}: {}", self.path.display(), e);
        }
    }
}

/// Fields collected from a multipart form.
#[derive(Debug, Default)]
pub struct UploadForm {
    pub title: Option<String>,
    pub description: Option<String>,
    pub video_file: Option<StagedFile>,
    pub thumbnail: Option<StagedFile>,
}

impl UploadForm {
    /// Drain a multipart stream, staging file parts to disk and keeping
    /// text parts in memory. Unknown field names are ignored.
    pub async fn from_multipart(mut multipart: Multipart) -> ApiResult<Self> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::bad_request(format!("malformed multipart body: {e}")))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "title" => form.title = Some(read_text(field).await?),
                "description" => form.description = Some(read_text(field).await?),
                "videoFile" => form.video_file = Some(stage_file(field).await?),
                "thumbnail" => form.thumbnail = Some(stage_file(field).await?),
                _ => {}
            }
        }

        Ok(form)
    }

    /// Discard any staged files that were not consumed.
    pub async fn discard(self) {
        if let Some(f) = self.video_file {
            f.discard().await;
        }
        if let Some(f) = self.thumbnail {
            f.discard().await;
        }
    }
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::bad_request(format!("unreadable form field: {e}")))
}

async fn stage_file(field: axum::extract::multipart::Field<'_>) -> ApiResult<StagedFile> {
    let filename = field
        .file_name()
        .map(sanitize_filename)
        .unwrap_or_else(|| "upload.bin".to_string());

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(format!("unreadable file field: {e}")))?;

    if bytes.is_empty() {
        return Err(ApiError::bad_request("uploaded file is empty"));
    }

    let path = std::env::temp_dir().join(format!("vidtube-{}-{}", Uuid::new_v4(), filename));
    tokio::fs::write(&path, &bytes)
        .await
        .map_err(|e| ApiError::internal(format!("failed to stage upload: {e}")))?;

    Ok(StagedFile { path, filename })
}

/// Keep the extension intact but strip path separators and other
/// surprises from a client-supplied filename.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '.' || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_separators() {
        assert_eq!(sanitize_filename("../../etc/passwd"), ".._.._etc_passwd");
        assert_eq!(sanitize_filename("clip one.mp4"), "clip_one.mp4");
        assert_eq!(sanitize_filename("clip.mp4"), "clip.mp4");
    }

    #[test]
    fn sanitize_rejects_empty_names() {
        assert_eq!(sanitize_filename(""), "upload.bin");
        assert_eq!(sanitize_filename("///"), "upload.bin");
    }

    #[tokio::test]
    async fn discard_removes_staged_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("x.mp4");
        tokio::fs::write(&path, b"bytes").await.unwrap();

        let staged = StagedFile {
            path: path.clone(),
            filename: "x.mp4".to_string(),
        };
        staged.discard().await;
        assert!(!path.exists());
    }
}
