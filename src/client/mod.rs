pub mod image_client;
pub mod model_client;

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::{
    compositor::{CompositorOptions, DefaultImageSource, DiscCompositor},
    config::DreamLayerConfig,
    error::{DreamLayerError, Result},
    models::CoverStyle,
};

pub use image_client::ImageClient;
pub use model_client::ModelClient;

/// Entry point bundling the catalog client, the generation client and a
/// compositor that share one HTTP connection pool.
#[derive(Clone)]
pub struct DreamLayerClient {
    config: DreamLayerConfig,
    model_client: ModelClient,
    image_client: ImageClient,
    compositor: DiscCompositor,
}

impl DreamLayerClient {
    pub fn new(config: DreamLayerConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| DreamLayerError::ConfigError(format!("HTTP client: {}", e)))?;

        let source = Arc::new(DefaultImageSource::new(http.clone()));

        Ok(Self {
            model_client: ModelClient::new(http.clone(), &config),
            image_client: ImageClient::new(http, &config),
            compositor: DiscCompositor::with_source(source, &config),
            config,
        })
    }

    pub fn config(&self) -> &DreamLayerConfig {
        &self.config
    }

    pub fn models(&self) -> &ModelClient {
        &self.model_client
    }

    pub fn images(&self) -> &ImageClient {
        &self.image_client
    }

    pub fn compositor(&self) -> &DiscCompositor {
        &self.compositor
    }

    /// Generates a cover and composites its first image onto the disc,
    /// returning a PNG data URL.
    pub async fn cover_disc(
        &self,
        style: CoverStyle,
        mood: &str,
        title: Option<&str>,
        options: CompositorOptions,
    ) -> Result<String> {
        let generation = self.image_client.generate_cover(style, mood, title).await?;

        let image = generation
            .into_images()?
            .into_iter()
            .next()
            .ok_or_else(|| {
                DreamLayerError::MalformedResponse("backend returned no images".into())
            })?;

        let url = self.image_client.resolve_url(&image);
        self.compositor.composite(&url, options).await
    }
}

pub(crate) fn request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

/// Parses a JSON body. Bodies that don't parse are reported as the HTTP
/// status when it was not 2xx, otherwise as malformed.
pub(crate) async fn read_json<T: DeserializeOwned>(response: Response, url: &str) -> Result<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| DreamLayerError::BackendUnavailable(format!("{}: {}", url, e)))?;

    match serde_json::from_str::<T>(&body) {
        Ok(value) => Ok(value),
        Err(_) if !status.is_success() => Err(DreamLayerError::HttpStatus {
            status: status.as_u16(),
            url: url.to_string(),
        }),
        Err(e) => Err(DreamLayerError::MalformedResponse(format!("{}: {}", url, e))),
    }
}
