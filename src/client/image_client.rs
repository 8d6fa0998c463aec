use reqwest::Client;

use super::{read_json, request_id};
use crate::{
    config::DreamLayerConfig,
    error::{DreamLayerError, Result},
    models::{cover_prompt, CoverStyle, GeneratedImage, GenerationRequest, GenerationResponse},
};

/// Generation side of the backend (`/api/txt2img`, `/api/images/{filename}`).
#[derive(Clone)]
pub struct ImageClient {
    client: Client,
    txt2img_url: String,
    images_url: String,
}

impl ImageClient {
    pub fn new(client: Client, config: &DreamLayerConfig) -> Self {
        Self {
            client,
            txt2img_url: format!("{}/txt2img", config.generation_url),
            images_url: config.images_url(),
        }
    }

    /// Sends a txt2img request with defaults filled in. A backend-reported
    /// failure comes back as [`GenerationResponse::Failure`], not as `Err`.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse> {
        let id = request_id();
        let payload = request.into_payload();
        log::info!(
            "[{}] Generating {}x{} with {}",
            id,
            payload.width,
            payload.height,
            payload.checkpoint
        );
        log::debug!("[{}] txt2img payload: {}", id, serde_json::to_string(&payload)?);

        let response = self
            .client
            .post(&self.txt2img_url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                DreamLayerError::BackendUnavailable(format!("{}: {}", self.txt2img_url, e))
            })?;

        let generation: GenerationResponse = read_json(response, &self.txt2img_url).await?;
        match &generation {
            GenerationResponse::Success { images, .. } => {
                log::info!("[{}] ✅ {} image(s) generated", id, images.len())
            }
            GenerationResponse::Failure { status, error, .. } => log::warn!(
                "[{}] Backend reported '{}': {}",
                id,
                status,
                error.as_deref().unwrap_or("no details")
            ),
        }
        Ok(generation)
    }

    /// `{images_url}/{filename}`, with no escaping.
    pub fn image_url(&self, filename: &str) -> String {
        format!("{}/{}", self.images_url, filename)
    }

    pub fn resolve_url(&self, image: &GeneratedImage) -> String {
        image
            .url
            .clone()
            .unwrap_or_else(|| self.image_url(&image.filename))
    }

    pub async fn download(&self, filename: &str) -> Result<Vec<u8>> {
        let url = self.image_url(filename);
        log::debug!("Downloading {}", url);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| DreamLayerError::BackendUnavailable(format!("{}: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(DreamLayerError::DownloadFailed {
                url,
                status: status.as_u16(),
            });
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| DreamLayerError::BackendUnavailable(format!("{}: {}", url, e)))?;
        Ok(bytes.to_vec())
    }

    pub async fn generate_cover(
        &self,
        style: CoverStyle,
        mood: &str,
        title: Option<&str>,
    ) -> Result<GenerationResponse> {
        let prompt = cover_prompt(style, mood, title);
        log::info!("🎨 Cover prompt: {}", prompt);
        self.generate(GenerationRequest::new(prompt)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DEFAULT_NEGATIVE_PROMPT;
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ImageClient {
        let config =
            DreamLayerConfig::new().with_generation_url(format!("{}/api", server.uri()));
        ImageClient::new(Client::new(), &config)
    }

    fn success_body() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "status": "success",
            "message": "done",
            "generated_images": [{"filename": "cover_0001.png"}]
        }))
    }

    #[tokio::test]
    async fn test_generate_sends_defaults() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/txt2img"))
            .and(body_json(json!({
                "prompt": "neon city",
                "negative_prompt": DEFAULT_NEGATIVE_PROMPT,
                "checkpoint": "stable-diffusion-v1-5.safetensors",
                "steps": 20,
                "cfg": 7.0,
                "width": 300,
                "height": 300,
                "batch_size": 1
            })))
            .respond_with(success_body())
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .generate(GenerationRequest::new("neon city"))
            .await
            .unwrap();
        assert!(response.is_success());
        assert_eq!(response.images()[0].filename, "cover_0001.png");
    }

    #[tokio::test]
    async fn test_generate_passes_backend_failure_through() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/txt2img"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_json(json!({"status": "error", "error": "sampler crashed"})),
            )
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .generate(GenerationRequest::new("x"))
            .await
            .unwrap();
        assert_eq!(
            response,
            GenerationResponse::Failure {
                status: "error".into(),
                error: Some("sampler crashed".into()),
                message: None,
            }
        );
    }

    #[tokio::test]
    async fn test_generate_malformed_json() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/txt2img"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server)
            .generate(GenerationRequest::new("x"))
            .await;
        assert!(matches!(result, Err(DreamLayerError::MalformedResponse(_))));
    }

    #[tokio::test]
    async fn test_generate_http_error_without_envelope() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/txt2img"))
            .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server)
            .generate(GenerationRequest::new("x"))
            .await;
        assert!(matches!(
            result,
            Err(DreamLayerError::HttpStatus { status: 502, .. })
        ));
    }

    #[test]
    fn test_image_url_preserves_reserved_characters() {
        let config = DreamLayerConfig::new().with_generation_url("http://gpu-box:5001/api");
        let client = ImageClient::new(Client::new(), &config);

        for filename in ["a.png", "with space.png", "q?x=1&y=2#frag.png", "100%.png"] {
            assert_eq!(
                client.image_url(filename),
                format!("http://gpu-box:5001/api/images/{}", filename)
            );
        }
    }

    #[test]
    fn test_resolve_url_prefers_backend_url() {
        let client = ImageClient::new(Client::new(), &DreamLayerConfig::default());
        let with_url = GeneratedImage {
            filename: "a.png".into(),
            url: Some("http://cdn/a.png".into()),
        };
        let without_url = GeneratedImage {
            filename: "a.png".into(),
            url: None,
        };
        assert_eq!(client.resolve_url(&with_url), "http://cdn/a.png");
        assert_eq!(
            client.resolve_url(&without_url),
            "http://localhost:5001/api/images/a.png"
        );
    }

    #[tokio::test]
    async fn test_download_success_and_404() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/images/cover.png"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(vec![0x89, b'P', b'N', b'G']))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/images/gone.png"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        assert_eq!(
            client.download("cover.png").await.unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
        assert!(matches!(
            client.download("gone.png").await,
            Err(DreamLayerError::DownloadFailed { status: 404, .. })
        ));
    }

    #[tokio::test]
    async fn test_generate_cover_prompt() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/txt2img"))
            .and(body_json(json!({
                "prompt": concat!(
                    "beautiful gradient, calm, artistic, 300x300px, square, ",
                    "inspired by \"Late Night\""
                ),
                "negative_prompt": DEFAULT_NEGATIVE_PROMPT,
                "checkpoint": "stable-diffusion-v1-5.safetensors",
                "steps": 20,
                "cfg": 7.0,
                "width": 300,
                "height": 300,
                "batch_size": 1
            })))
            .respond_with(success_body())
            .expect(1)
            .mount(&mock_server)
            .await;

        let response = client_for(&mock_server)
            .generate_cover(CoverStyle::Gradients, "calm", Some("Late Night"))
            .await
            .unwrap();
        assert!(response.is_success());
    }
}
