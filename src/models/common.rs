use serde::{Deserialize, Serialize};

/// A checkpoint the backend can load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    pub filename: String,
    pub id: String,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ModelsEnvelope {
    pub status: String,
    #[serde(default)]
    pub models: Vec<Model>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub service: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        self.status == "healthy"
    }
}
