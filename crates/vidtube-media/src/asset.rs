//! Remote asset classification and identifiers.

use std::fmt;

/// Asset kind inferred from a file extension.
///
/// The kind selects which deletion endpoint the media host expects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AssetKind {
    /// Images and anything unrecognized.
    #[default]
    Image,
    /// Video containers.
    Video,
    /// Audio and other raw blobs.
    Raw,
}

impl AssetKind {
    /// Classify by the extension of the URL's last path segment.
    pub fn from_url(url: &str) -> Self {
        let ext = url
            .rsplit('/')
            .next()
            .and_then(|name| name.rsplit_once('.'))
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "mp4" | "mkv" | "mov" | "avi" => Self::Video,
            "mp3" | "wav" => Self::Raw,
            _ => Self::Image,
        }
    }

    /// Endpoint path segment used by the media host.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Video => "video",
            Self::Raw => "raw",
        }
    }
}

impl fmt::Display for AssetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Derive the remote public identifier from an asset URL.
///
/// The media host keys assets by the last path segment without its
/// extension. Returns `None` when no identifier can be derived.
pub fn derive_public_id(url: &str) -> Option<String> {
    if url.trim().is_empty() {
        return None;
    }

    let segment = url.trim_end_matches('/').rsplit('/').next()?;
    let id = match segment.rsplit_once('.') {
        Some((stem, _)) => stem,
        None => segment,
    };

    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

/// A successfully uploaded remote asset.
#[derive(Debug, Clone)]
pub struct UploadedAsset {
    /// Canonical remote URL.
    pub url: String,
    /// Host-side identifier.
    pub public_id: String,
    /// Duration in seconds, present for video/audio assets.
    pub duration: Option<f64>,
    /// Kind as reported by the host.
    pub kind: AssetKind,
}

/// Outcome of a best-effort remote deletion.
///
/// Deletion never raises: callers that depend on it succeeding must check
/// the outcome and abort their dependent mutation when it is not ok.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The host confirmed removal.
    Deleted,
    /// Nothing to do: empty URL or no derivable identifier.
    Skipped,
    /// The host rejected the request or was unreachable.
    Failed(String),
}

impl DeleteOutcome {
    /// True when the dependent mutation may proceed.
    pub fn is_ok(&self) -> bool {
        !matches!(self, Self::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_classification_table() {
        assert_eq!(AssetKind::from_url("https://host/v/abc.mp4"), AssetKind::Video);
        assert_eq!(AssetKind::from_url("https://host/v/abc.mkv"), AssetKind::Video);
        assert_eq!(AssetKind::from_url("https://host/v/abc.mov"), AssetKind::Video);
        assert_eq!(AssetKind::from_url("https://host/v/abc.AVI"), AssetKind::Video);
        assert_eq!(AssetKind::from_url("https://host/a/abc.mp3"), AssetKind::Raw);
        assert_eq!(AssetKind::from_url("https://host/a/abc.wav"), AssetKind::Raw);
        assert_eq!(AssetKind::from_url("https://host/i/abc.jpg"), AssetKind::Image);
        assert_eq!(AssetKind::from_url("https://host/i/abc.png"), AssetKind::Image);
        assert_eq!(AssetKind::from_url("https://host/i/no-extension"), AssetKind::Image);
    }

    #[test]
    fn public_id_strips_extension() {
        assert_eq!(
            derive_public_id("https://host/folder/abc123.mp4").as_deref(),
            Some("abc123")
        );
        assert_eq!(
            derive_public_id("https://host/xyz.jpg").as_deref(),
            Some("xyz")
        );
        assert_eq!(
            derive_public_id("https://host/plain").as_deref(),
            Some("plain")
        );
    }

    #[test]
    fn public_id_none_when_underivable() {
        assert_eq!(derive_public_id(""), None);
        assert_eq!(derive_public_id("   "), None);
        assert_eq!(derive_public_id("https://host/.hidden"), None);
    }

    #[test]
    fn failed_outcome_is_not_ok() {
        assert!(DeleteOutcome::Deleted.is_ok());
        assert!(DeleteOutcome::Skipped.is_ok());
        assert!(!DeleteOutcome::Failed("boom".into()).is_ok());
    }
}
