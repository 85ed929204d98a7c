//! Media host client implementation.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use metrics::counter;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::asset::{derive_public_id, AssetKind, DeleteOutcome, UploadedAsset};
use crate::error::{MediaError, MediaResult};

/// Total upload attempts before giving up. No backoff between attempts.
const UPLOAD_ATTEMPTS: u32 = 3;

/// Configuration for the media host client.
#[derive(Debug, Clone)]
pub struct MediaConfig {
    /// Account/cloud name, first path segment of every endpoint.
    pub cloud_name: String,
    /// API key sent with each signed request.
    pub api_key: String,
    /// API secret used for request signing. Never sent on the wire.
    pub api_secret: String,
    /// API base URL, overridable for tests.
    pub api_base: String,
}

impl MediaConfig {
    /// Create config from environment variables.
    pub fn from_env() -> MediaResult<Self> {
        Ok(Self {
            cloud_name: std::env::var("MEDIA_CLOUD_NAME")
                .map_err(|_| MediaError::config_error("MEDIA_CLOUD_NAME not set"))?,
            api_key: std::env::var("MEDIA_API_KEY")
                .map_err(|_| MediaError::config_error("MEDIA_API_KEY not set"))?,
            api_secret: std::env::var("MEDIA_API_SECRET")
                .map_err(|_| MediaError::config_error("MEDIA_API_SECRET not set"))?,
            api_base: std::env::var("MEDIA_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".to_string()),
        })
    }
}

/// Upload response returned by the media host.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    secure_url: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    public_id: String,
    #[serde(default)]
    duration: Option<f64>,
    #[serde(default)]
    resource_type: Option<String>,
}

/// Destroy response returned by the media host.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    #[serde(default)]
    result: String,
}

/// Client for the hosted media store.
///
/// Constructed once at startup from explicit configuration; holds no other
/// state beyond the HTTP connection pool.
#[derive(Clone)]
pub struct MediaClient {
    http: reqwest::Client,
    config: MediaConfig,
}

impl MediaClient {
    /// Create a new client from configuration.
    pub fn new(config: MediaConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Create from environment variables.
    pub fn from_env() -> MediaResult<Self> {
        Ok(Self::new(MediaConfig::from_env()?))
    }

    /// Upload a local file to the media host.
    ///
    /// Retries transient failures up to a fixed attempt count. The local
    /// file is removed exactly once on success, and is also removed before
    /// returning failure on retry exhaustion, so callers never have to
    /// clean up the staged upload themselves.
    pub async fn upload(&self, local_path: impl AsRef<Path>) -> MediaResult<UploadedAsset> {
        let local_path = local_path.as_ref();
        let filename = local_path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.bin")
            .to_string();

        let bytes = match tokio::fs::read(local_path).await {
            Ok(b) => b,
            Err(e) => {
                remove_temp_file(local_path).await;
                return Err(MediaError::Io(e));
            }
        };

        let mut last_error = None;
        for attempt in 1..=UPLOAD_ATTEMPTS {
            match self.try_upload(bytes.clone(), &filename).await {
                Ok(asset) => {
                    remove_temp_file(local_path).await;
                    info!(url = %asset.url, kind = %asset.kind, "Uploaded {}", filename);
                    return Ok(asset);
                }
                Err(e) => {
                    warn!(
                        attempt,
                        max_attempts = UPLOAD_ATTEMPTS,
                        "Media upload failed for {}: {}",
                        filename,
                        e
                    );
                    counter!("media_upload_retries_total").increment(1);
                    last_error = Some(e);
                }
            }
        }

        remove_temp_file(local_path).await;
        Err(last_error.unwrap_or_else(|| MediaError::upload_failed("exhausted upload attempts")))
    }

    async fn try_upload(&self, bytes: Vec<u8>, filename: &str) -> MediaResult<UploadedAsset> {
        let timestamp = unix_timestamp();
        let signature = sign(&format!("timestamp={timestamp}"), &self.config.api_secret);

        let form = Form::new()
            .part("file", Part::bytes(bytes).file_name(filename.to_string()))
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp.to_string())
            .text("signature", signature);

        let url = format!(
            "{}/{}/auto/upload",
            self.config.api_base, self.config.cloud_name
        );
        debug!("Uploading {} to {}", filename, url);

        let response = self.http.post(&url).multipart(form).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MediaError::upload_failed(format!(
                "media host returned {status}: {body}"
            )));
        }

        let parsed: UploadResponse = response.json().await?;
        let asset_url = parsed
            .secure_url
            .or(parsed.url)
            .filter(|u| !u.is_empty())
            .ok_or_else(|| {
                MediaError::InvalidResponse("upload response carried no asset URL".to_string())
            })?;

        let kind = match parsed.resource_type.as_deref() {
            Some("video") => AssetKind::Video,
            Some("raw") => AssetKind::Raw,
            Some(_) | None => AssetKind::from_url(&asset_url),
        };

        Ok(UploadedAsset {
            url: asset_url,
            public_id: parsed.public_id,
            duration: parsed.duration,
            kind,
        })
    }

    /// Delete a remote asset by URL, best-effort.
    ///
    /// Never returns an error: transport and host failures are reported as
    /// a non-ok outcome. Empty or unparseable URLs are a neutral no-op.
    /// No retry is performed.
    pub async fn delete(&self, remote_url: &str) -> DeleteOutcome {
        let Some(public_id) = derive_public_id(remote_url) else {
            debug!("Skipping media delete, no identifier in {:?}", remote_url);
            return DeleteOutcome::Skipped;
        };

        let kind = AssetKind::from_url(remote_url);
        let timestamp = unix_timestamp();
        let signature = sign(
            &format!("public_id={public_id}&timestamp={timestamp}"),
            &self.config.api_secret,
        );

        let url = format!(
            "{}/{}/{}/destroy",
            self.config.api_base, self.config.cloud_name, kind
        );

        let form = [
            ("public_id", public_id.clone()),
            ("api_key", self.config.api_key.clone()),
            ("timestamp", timestamp.to_string()),
            ("signature", signature),
        ];

        let response = match self.http.post(&url).form(&form).send().await {
            Ok(r) => r,
            Err(e) => {
                warn!("Media delete request failed for {}: {}", public_id, e);
                counter!("media_delete_failures_total", "kind" => kind.as_str()).increment(1);
                return DeleteOutcome::Failed(e.to_string());
            }
        };

        let status = response.status();
        if !status.is_success() {
            warn!("Media delete for {} returned {}", public_id, status);
            counter!("media_delete_failures_total", "kind" => kind.as_str()).increment(1);
            return DeleteOutcome::Failed(format!("media host returned {status}"));
        }

        match response.json::<DestroyResponse>().await {
            Ok(body) if body.result == "ok" => {
                info!("Deleted remote asset {} ({})", public_id, kind);
                DeleteOutcome::Deleted
            }
            Ok(body) => {
                warn!("Media delete for {} reported {:?}", public_id, body.result);
                counter!("media_delete_failures_total", "kind" => kind.as_str()).increment(1);
                DeleteOutcome::Failed(body.result)
            }
            Err(e) => {
                warn!("Media delete response unparseable for {}: {}", public_id, e);
                counter!("media_delete_failures_total", "kind" => kind.as_str()).increment(1);
                DeleteOutcome::Failed(e.to_string())
            }
        }
    }
}

/// SHA-1 hex digest over the serialized params plus the API secret.
fn sign(params: &str, secret: &str) -> String {
    use sha1::{Digest, Sha1};
    let mut hasher = Sha1::new();
    hasher.update(params.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Remove a staged upload. Deletion failure is logged, not escalated.
async fn remove_temp_file(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        warn!("Failed to remove staged upload {}: {}", path.display(), e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_config(api_base: String) -> MediaConfig {
        MediaConfig {
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            api_base,
        }
    }

    fn stage_file(dir: &tempfile::TempDir, name: &str) -> std::path::PathBuf {
        let p = dir.path().join(name);
        std::fs::write(&p, b"fake bytes").unwrap();
        p
    }

    #[test]
    fn signature_is_stable_hex() {
        let a = sign("timestamp=42", "secret");
        let b = sign("timestamp=42", "secret");
        assert_eq!(a, b);
        assert_eq!(a.len(), 40);
        assert_ne!(a, sign("timestamp=43", "secret"));
    }

    #[tokio::test]
    async fn upload_succeeds_and_removes_staged_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "secure_url": "https://host/a.mp4",
                "public_id": "a",
                "duration": 12.0,
                "resource_type": "video"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let staged = stage_file(&dir, "clip.mp4");

        let client = MediaClient::new(test_config(server.uri()));
        let asset = client.upload(&staged).await.unwrap();

        assert_eq!(asset.url, "https://host/a.mp4");
        assert_eq!(asset.duration, Some(12.0));
        assert_eq!(asset.kind, AssetKind::Video);
        assert!(!staged.exists(), "staged file should be removed on success");
    }

    #[tokio::test]
    async fn upload_exhausts_attempts_and_removes_staged_file() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(500))
            .expect(3)
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let staged = stage_file(&dir, "clip.mp4");

        let client = MediaClient::new(test_config(server.uri()));
        let err = client.upload(&staged).await.unwrap_err();

        assert!(matches!(err, MediaError::UploadFailed(_)));
        assert!(!staged.exists(), "staged file should be removed on failure");
    }

    #[tokio::test]
    async fn upload_without_usable_url_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/auto/upload"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "public_id": "a"
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let staged = stage_file(&dir, "thumb.jpg");

        let client = MediaClient::new(test_config(server.uri()));
        assert!(client.upload(&staged).await.is_err());
    }

    #[tokio::test]
    async fn delete_confirmed_by_host() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/video/destroy"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "result": "ok" })))
            .expect(1)
            .mount(&server)
            .await;

        let client = MediaClient::new(test_config(server.uri()));
        let outcome = client.delete("https://host/folder/abc.mp4").await;
        assert_eq!(outcome, DeleteOutcome::Deleted);
    }

    #[tokio::test]
    async fn delete_failure_is_swallowed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/demo/image/destroy"))
            .respond_with(ResponseTemplate::new(500))
            .expect(1)
            .mount(&server)
            .await;

        let client = MediaClient::new(test_config(server.uri()));
        let outcome = client.delete("https://host/thumb.jpg").await;
        assert!(matches!(outcome, DeleteOutcome::Failed(_)));
    }

    #[tokio::test]
    async fn delete_empty_url_is_neutral() {
        // api_base points nowhere; a skipped delete must not touch the network
        let client = MediaClient::new(test_config("http://127.0.0.1:1".to_string()));
        assert_eq!(client.delete("").await, DeleteOutcome::Skipped);
        assert_eq!(client.delete("https://host/.hidden").await, DeleteOutcome::Skipped);
    }
}
