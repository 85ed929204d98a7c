//! Paginated listing result.

use serde::{Deserialize, Serialize};

use crate::video::VideoWithOwner;

/// One page of the video listing pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoPage {
    pub videos: Vec<VideoWithOwner>,
    pub total_videos: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
}

impl VideoPage {
    /// Assemble a page, deriving `total_pages` as ceil(total / limit).
    pub fn new(videos: Vec<VideoWithOwner>, total_videos: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_videos.div_ceil(limit)
        };
        Self {
            videos,
            total_videos,
            page,
            limit,
            total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_pages_is_ceiling() {
        assert_eq!(VideoPage::new(vec![], 0, 1, 10).total_pages, 0);
        assert_eq!(VideoPage::new(vec![], 1, 1, 10).total_pages, 1);
        assert_eq!(VideoPage::new(vec![], 10, 1, 10).total_pages, 1);
        assert_eq!(VideoPage::new(vec![], 11, 1, 10).total_pages, 2);
        assert_eq!(VideoPage::new(vec![], 25, 1, 10).total_pages, 3);
    }

    #[test]
    fn zero_limit_does_not_divide() {
        assert_eq!(VideoPage::new(vec![], 5, 1, 0).total_pages, 0);
    }
}
