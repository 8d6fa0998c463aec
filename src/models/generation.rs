use serde::{Deserialize, Serialize};

use crate::error::{DreamLayerError, Result};

pub const DEFAULT_NEGATIVE_PROMPT: &str =
    "blurry, low quality, distorted, deformed, watermark, text, signature";
pub const DEFAULT_CHECKPOINT: &str = "stable-diffusion-v1-5.safetensors";
pub const DEFAULT_STEPS: u32 = 20;
pub const DEFAULT_CFG: f32 = 7.0;
pub const DEFAULT_WIDTH: u32 = 300;
pub const DEFAULT_HEIGHT: u32 = 300;
pub const DEFAULT_BATCH_SIZE: u32 = 1;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct GenerationRequest {
    pub prompt: String,
    pub negative_prompt: Option<String>,
    pub checkpoint: Option<String>,
    pub steps: Option<u32>,
    pub cfg: Option<f32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub batch_size: Option<u32>,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Default::default()
        }
    }

    pub fn with_negative_prompt(mut self, negative_prompt: impl Into<String>) -> Self {
        self.negative_prompt = Some(negative_prompt.into());
        self
    }

    pub fn with_checkpoint(mut self, checkpoint: impl Into<String>) -> Self {
        self.checkpoint = Some(checkpoint.into());
        self
    }

    pub fn with_steps(mut self, steps: u32) -> Self {
        self.steps = Some(steps);
        self
    }

    pub fn with_cfg(mut self, cfg: f32) -> Self {
        self.cfg = Some(cfg);
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_batch_size(mut self, batch_size: u32) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Fills every unset field with its default.
    pub fn into_payload(self) -> Txt2ImgPayload {
        Txt2ImgPayload {
            prompt: self.prompt,
            negative_prompt: self
                .negative_prompt
                .unwrap_or_else(|| DEFAULT_NEGATIVE_PROMPT.to_string()),
            checkpoint: self
                .checkpoint
                .unwrap_or_else(|| DEFAULT_CHECKPOINT.to_string()),
            steps: self.steps.unwrap_or(DEFAULT_STEPS),
            cfg: self.cfg.unwrap_or(DEFAULT_CFG),
            width: self.width.unwrap_or(DEFAULT_WIDTH),
            height: self.height.unwrap_or(DEFAULT_HEIGHT),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
        }
    }
}

/// Body of `POST /api/txt2img`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Txt2ImgPayload {
    pub prompt: String,
    pub negative_prompt: String,
    pub checkpoint: String,
    pub steps: u32,
    pub cfg: f32,
    pub width: u32,
    pub height: u32,
    pub batch_size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratedImage {
    pub filename: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "GenerationEnvelope")]
pub enum GenerationResponse {
    Success {
        message: Option<String>,
        images: Vec<GeneratedImage>,
    },
    Failure {
        status: String,
        error: Option<String>,
        message: Option<String>,
    },
}

impl GenerationResponse {
    pub fn is_success(&self) -> bool {
        matches!(self, GenerationResponse::Success { .. })
    }

    pub fn images(&self) -> &[GeneratedImage] {
        match self {
            GenerationResponse::Success { images, .. } => images,
            GenerationResponse::Failure { .. } => &[],
        }
    }

    /// The generated images, or the backend's failure as an error.
    pub fn into_images(self) -> Result<Vec<GeneratedImage>> {
        match self {
            GenerationResponse::Success { images, .. } => Ok(images),
            GenerationResponse::Failure {
                status,
                error,
                message,
            } => Err(DreamLayerError::UnexpectedStatus {
                status,
                message: error.or(message).unwrap_or_default(),
            }),
        }
    }
}

/// Raw wire shape; `status` is a free-form string on the backend side.
#[derive(Debug, Deserialize)]
struct GenerationEnvelope {
    status: String,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    generated_images: Vec<GeneratedImage>,
}

impl From<GenerationEnvelope> for GenerationResponse {
    fn from(envelope: GenerationEnvelope) -> Self {
        if envelope.status == "success" {
            GenerationResponse::Success {
                message: envelope.message,
                images: envelope.generated_images,
            }
        } else {
            GenerationResponse::Failure {
                status: envelope.status,
                error: envelope.error,
                message: envelope.message,
            }
        }
    }
}
