use reqwest::Client;

use super::{read_json, request_id};
use crate::{
    config::DreamLayerConfig,
    error::{DreamLayerError, Result},
    models::{HealthStatus, Model, ModelsEnvelope},
};

/// Catalog side of the backend (`/api/models`, `/health`).
#[derive(Clone)]
pub struct ModelClient {
    client: Client,
    models_url: String,
    health_url: String,
}

impl ModelClient {
    pub fn new(client: Client, config: &DreamLayerConfig) -> Self {
        Self {
            client,
            models_url: format!("{}/models", config.models_url),
            health_url: config.health_url(),
        }
    }

    /// Lists available checkpoints. Anything but a `"success"` status is an error.
    pub async fn list(&self) -> Result<Vec<Model>> {
        let id = request_id();
        log::debug!("[{}] GET {}", id, self.models_url);

        let response = self
            .client
            .get(&self.models_url)
            .send()
            .await
            .map_err(|e| {
                DreamLayerError::BackendUnavailable(format!("{}: {}", self.models_url, e))
            })?;

        let envelope: ModelsEnvelope = read_json(response, &self.models_url).await?;
        if envelope.status != "success" {
            log::error!("[{}] Model listing returned status '{}'", id, envelope.status);
            return Err(DreamLayerError::UnexpectedStatus {
                status: envelope.status,
                message: envelope.error.unwrap_or_default(),
            });
        }

        log::info!("[{}] {} model(s) available", id, envelope.models.len());
        Ok(envelope.models)
    }

    pub async fn health(&self) -> Result<HealthStatus> {
        let id = request_id();
        log::debug!("[{}] GET {}", id, self.health_url);

        let response = self
            .client
            .get(&self.health_url)
            .send()
            .await
            .map_err(|e| {
                DreamLayerError::BackendUnavailable(format!("{}: {}", self.health_url, e))
            })?;

        read_json(response, &self.health_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn client_for(server: &MockServer) -> ModelClient {
        let config = DreamLayerConfig::new().with_models_url(format!("{}/api", server.uri()));
        ModelClient::new(Client::new(), &config)
    }

    #[tokio::test]
    async fn test_list_models_success() {
        let mock_server = MockServer::start().await;
        let body = r#"{
            "status": "success",
            "models": [{
                "filename": "stable-diffusion-v1-5.safetensors",
                "id": "stable-diffusion-v1-5",
                "name": "Stable Diffusion v1.5"
            }]
        }"#;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&mock_server)
            .await;

        let models = client_for(&mock_server).await.list().await.unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].id, "stable-diffusion-v1-5");
        assert_eq!(models[0].name, "Stable Diffusion v1.5");
    }

    #[tokio::test]
    async fn test_list_models_error_status_is_an_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(
                ResponseTemplate::new(500)
                    .set_body_string(r#"{"status": "error", "error": "disk"}"#),
            )
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).await.list().await;
        match result {
            Err(DreamLayerError::UnexpectedStatus { status, message }) => {
                assert_eq!(status, "error");
                assert_eq!(message, "disk");
            }
            other => panic!("expected UnexpectedStatus, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_list_models_bare_error_status() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/models"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"status": "error"}"#))
            .mount(&mock_server)
            .await;

        let result = client_for(&mock_server).await.list().await;
        assert!(matches!(result, Err(DreamLayerError::UnexpectedStatus { .. })));
    }

    #[tokio::test]
    async fn test_list_models_unreachable_backend() {
        let config = DreamLayerConfig::new().with_models_url("http://127.0.0.1:1/api");
        let result = ModelClient::new(Client::new(), &config).list().await;
        assert!(matches!(result, Err(DreamLayerError::BackendUnavailable(_))));
    }

    #[tokio::test]
    async fn test_health() {
        let mock_server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"status": "healthy", "service": "dreamlayer-backend", "version": "1.0.0"}"#,
            ))
            .mount(&mock_server)
            .await;

        let health = client_for(&mock_server).await.health().await.unwrap();
        assert!(health.is_healthy());
        assert_eq!(health.version.as_deref(), Some("1.0.0"));
    }
}
