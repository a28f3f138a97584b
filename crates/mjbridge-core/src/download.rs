//! Grid image download.

use std::time::Duration;

use tracing::debug;

use crate::error::ImagineError;
use crate::splitter::GridImage;

#[cfg(test)]
#[path = "download_tests.rs"]
mod tests;

/// Fetches and decodes result images.
#[derive(Debug, Clone)]
pub struct ImageDownloader {
    client: reqwest::Client,
}

impl ImageDownloader {
    /// Create a downloader whose requests give up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ImagineError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Download `url` and decode it, keeping any embedded ICC profile.
    ///
    /// Any non-success status is an error; nothing is written on failure.
    pub async fn fetch(&self, url: &str) -> Result<GridImage, ImagineError> {
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ImagineError::Download {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let bytes = response.bytes().await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), url);

        GridImage::decode(&bytes).map_err(|source| ImagineError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
