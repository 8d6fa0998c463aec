use async_trait::async_trait;
use image::DynamicImage;
use reqwest::Client;

use super::output::decode_data_url;
use crate::error::{DreamLayerError, Result};

/// Where compositor inputs come from. Every failure is reported as
/// [`DreamLayerError::ImageLoadFailed`].
#[async_trait]
pub trait ImageSource: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>>;

    async fn load(&self, location: &str) -> Result<DynamicImage> {
        let bytes = self.fetch(location).await?;
        image::load_from_memory(&bytes).map_err(|e| DreamLayerError::image_load(location, e))
    }
}

/// Loads `http(s)://` URLs over HTTP, `data:` URLs inline, and anything else
/// from the local filesystem.
#[derive(Clone)]
pub struct DefaultImageSource {
    client: Client,
}

impl DefaultImageSource {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| DreamLayerError::image_load(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DreamLayerError::image_load(url, format!("HTTP {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DreamLayerError::image_load(url, e))?;
        Ok(bytes.to_vec())
    }
}

impl Default for DefaultImageSource {
    fn default() -> Self {
        Self::new(Client::new())
    }
}

#[async_trait]
impl ImageSource for DefaultImageSource {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>> {
        if location.starts_with("http://") || location.starts_with("https://") {
            self.fetch_http(location).await
        } else if location.starts_with("data:") {
            decode_data_url(location).map_err(|e| DreamLayerError::image_load("data URL", e))
        } else {
            tokio::fs::read(location)
                .await
                .map_err(|e| DreamLayerError::image_load(location, e))
        }
    }
}
