use crate::error::FeedError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageInfo {
    pub url: String,
    pub copyright: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ImageFeed {
    pub images: Vec<ImageInfo>,
}

impl ImageInfo {
    /// Absolute URL of the image, joining relative paths onto `base_url`.
    pub fn full_url(&self, base_url: &str) -> String {
        if self.url.starts_with("http") {
            self.url.clone()
        } else {
            format!("{}{}", base_url.trim_end_matches('/'), self.url)
        }
    }
}

/// Parses an image archive response and returns its first entry.
pub fn parse_feed(body: &str) -> Result<ImageInfo, FeedError> {
    let feed: ImageFeed = serde_json::from_str(body)?;
    feed.images.into_iter().next().ok_or(FeedError::NoImages)
}

/// Feed URL, scoped to a market code when one is given.
pub fn feed_url(base: &str, market: Option<&str>) -> String {
    match market {
        Some(code) if !code.is_empty() => format!("{}&mkt={}", base, code),
        _ => base.to_string(),
    }
}
