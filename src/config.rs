use std::env;

pub const DEFAULT_HOST: &str = "http://localhost";
pub const DEFAULT_MODELS_PORT: u16 = 5002;
pub const DEFAULT_GENERATION_PORT: u16 = 5001;
pub const DEFAULT_DISC_BASE: &str = "assets/disc-base.png";
pub const DEFAULT_OUTPUT_SIZE: u32 = 300;
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Endpoints and compositing settings for one client instance.
///
/// `models_url` and `generation_url` are API roots (ending in `/api`); the
/// individual endpoints are joined onto them by the clients.
#[derive(Debug, Clone, PartialEq)]
pub struct DreamLayerConfig {
    pub models_url: String,
    pub generation_url: String,
    pub disc_base_path: String,
    pub output_size: u32,
    pub timeout_secs: u64,
}

impl Default for DreamLayerConfig {
    fn default() -> Self {
        DreamLayerConfig {
            models_url: api_root(DEFAULT_HOST, DEFAULT_MODELS_PORT),
            generation_url: api_root(DEFAULT_HOST, DEFAULT_GENERATION_PORT),
            disc_base_path: DEFAULT_DISC_BASE.to_string(),
            output_size: DEFAULT_OUTPUT_SIZE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl DreamLayerConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        let host = env::var("DREAMLAYER_HOST").unwrap_or_else(|_| DEFAULT_HOST.to_string());
        let models_port = env::var("DREAMLAYER_MODELS_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_MODELS_PORT);
        let generation_port = env::var("DREAMLAYER_GENERATION_PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_GENERATION_PORT);
        let disc_base_path =
            env::var("DREAMLAYER_DISC_BASE").unwrap_or_else(|_| DEFAULT_DISC_BASE.to_string());
        let output_size = env::var("DREAMLAYER_OUTPUT_SIZE")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_OUTPUT_SIZE);
        let timeout_secs = env::var("DREAMLAYER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        DreamLayerConfig {
            models_url: api_root(&host, models_port),
            generation_url: api_root(&host, generation_port),
            disc_base_path,
            output_size,
            timeout_secs,
        }
    }

    /// Points both API roots at `host`, keeping the ports they already use.
    pub fn with_host(mut self, host: impl AsRef<str>) -> Self {
        let models_port = url_port(&self.models_url).unwrap_or(DEFAULT_MODELS_PORT);
        let generation_port =
            url_port(&self.generation_url).unwrap_or(DEFAULT_GENERATION_PORT);
        self.models_url = api_root(host.as_ref(), models_port);
        self.generation_url = api_root(host.as_ref(), generation_port);
        self
    }

    pub fn with_models_url(mut self, url: impl Into<String>) -> Self {
        self.models_url = trim_slash(url.into());
        self
    }

    pub fn with_generation_url(mut self, url: impl Into<String>) -> Self {
        self.generation_url = trim_slash(url.into());
        self
    }

    pub fn with_disc_base(mut self, path: impl Into<String>) -> Self {
        self.disc_base_path = path.into();
        self
    }

    pub fn with_output_size(mut self, size: u32) -> Self {
        self.output_size = size;
        self
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Base for fetching generated images: `{generation_url}/images`.
    pub fn images_url(&self) -> String {
        format!("{}/images", self.generation_url)
    }

    /// The health endpoint lives at the server root, outside `/api`.
    pub fn health_url(&self) -> String {
        let origin = self
            .models_url
            .strip_suffix("/api")
            .unwrap_or(&self.models_url);
        format!("{}/health", origin)
    }
}

fn api_root(host: &str, port: u16) -> String {
    format!("{}:{}/api", host.trim_end_matches('/'), port)
}

fn url_port(url: &str) -> Option<u16> {
    reqwest::Url::parse(url).ok()?.port_or_known_default()
}

fn trim_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_port_split() {
        let config = DreamLayerConfig::default();
        assert_eq!(config.models_url, "http://localhost:5002/api");
        assert_eq!(config.generation_url, "http://localhost:5001/api");
        assert_eq!(config.images_url(), "http://localhost:5001/api/images");
        assert_eq!(config.health_url(), "http://localhost:5002/health");
        assert_eq!(config.output_size, 300);
    }

    #[test]
    fn test_builder_overrides() {
        let config = DreamLayerConfig::new()
            .with_host("http://10.0.0.7/")
            .with_generation_url("http://127.0.0.1:9000/api/")
            .with_output_size(512)
            .with_disc_base("covers/base.png");

        assert_eq!(config.models_url, "http://10.0.0.7:5002/api");
        assert_eq!(config.generation_url, "http://127.0.0.1:9000/api");
        assert_eq!(config.output_size, 512);
        assert_eq!(config.disc_base_path, "covers/base.png");
    }

    #[test]
    fn test_with_host_keeps_configured_ports() {
        let config = DreamLayerConfig::new()
            .with_models_url("http://old:6002/api")
            .with_generation_url("http://old:7001/api")
            .with_host("http://gpu");
        assert_eq!(config.models_url, "http://gpu:6002/api");
        assert_eq!(config.generation_url, "http://gpu:7001/api");
    }

    const ENV_VARS: [&str; 6] = [
        "DREAMLAYER_HOST",
        "DREAMLAYER_MODELS_PORT",
        "DREAMLAYER_GENERATION_PORT",
        "DREAMLAYER_DISC_BASE",
        "DREAMLAYER_OUTPUT_SIZE",
        "DREAMLAYER_TIMEOUT_SECS",
    ];

    fn clear_env() {
        for var in ENV_VARS {
            env::remove_var(var);
        }
    }

    // Env vars are process-wide, so every from_env case lives in this one test.
    #[test]
    fn test_from_env() {
        clear_env();
        assert_eq!(DreamLayerConfig::from_env(), DreamLayerConfig::default());

        env::set_var("DREAMLAYER_HOST", "http://gpu");
        env::set_var("DREAMLAYER_MODELS_PORT", "6002");
        env::set_var("DREAMLAYER_GENERATION_PORT", "7001");
        env::set_var("DREAMLAYER_DISC_BASE", "/srv/disc.png");
        env::set_var("DREAMLAYER_OUTPUT_SIZE", "512");
        env::set_var("DREAMLAYER_TIMEOUT_SECS", "90");

        let config = DreamLayerConfig::from_env();
        assert_eq!(config.models_url, "http://gpu:6002/api");
        assert_eq!(config.generation_url, "http://gpu:7001/api");
        assert_eq!(config.disc_base_path, "/srv/disc.png");
        assert_eq!(config.output_size, 512);
        assert_eq!(config.timeout_secs, 90);

        // the binary re-applies the host on top of from_env
        let config = DreamLayerConfig::from_env().with_host("http://gpu");
        assert_eq!(config.models_url, "http://gpu:6002/api");
        assert_eq!(config.generation_url, "http://gpu:7001/api");

        env::set_var("DREAMLAYER_MODELS_PORT", "not-a-port");
        env::set_var("DREAMLAYER_GENERATION_PORT", "70000");
        env::set_var("DREAMLAYER_OUTPUT_SIZE", "big");
        env::set_var("DREAMLAYER_TIMEOUT_SECS", "-5");

        let config = DreamLayerConfig::from_env();
        assert_eq!(config.models_url, "http://gpu:5002/api");
        assert_eq!(config.generation_url, "http://gpu:5001/api");
        assert_eq!(config.output_size, DEFAULT_OUTPUT_SIZE);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);

        clear_env();
    }

    #[test]
    fn test_health_url_without_api_suffix() {
        let config = DreamLayerConfig::new().with_models_url("http://mock:1234");
        assert_eq!(config.health_url(), "http://mock:1234/health");
    }
}
