use thiserror::Error;

#[derive(Debug, Error)]
pub enum DreamLayerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Backend unavailable: {0}")]
    BackendUnavailable(String),

    #[error("Unexpected backend status '{status}': {message}")]
    UnexpectedStatus { status: String, message: String },

    #[error("HTTP {status} from {url}")]
    HttpStatus { status: u16, url: String },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("Download failed for {url}: HTTP {status}")]
    DownloadFailed { url: String, status: u16 },

    #[error("Invalid cover style: {0}")]
    InvalidStyle(String),

    #[error("Drawing surface unavailable: {0}")]
    DrawingSurfaceUnavailable(String),

    #[error("Failed to load image {location}: {reason}")]
    ImageLoadFailed { location: String, reason: String },

    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl DreamLayerError {
    pub fn image_load(location: impl Into<String>, reason: impl ToString) -> Self {
        DreamLayerError::ImageLoadFailed {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<image::ImageError> for DreamLayerError {
    fn from(e: image::ImageError) -> Self {
        DreamLayerError::Encode(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, DreamLayerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = DreamLayerError::UnexpectedStatus {
            status: "error".into(),
            message: "no models".into(),
        };
        assert_eq!(err.to_string(), "Unexpected backend status 'error': no models");

        let err = DreamLayerError::image_load("http://x/a.png", "HTTP 404");
        assert_eq!(err.to_string(), "Failed to load image http://x/a.png: HTTP 404");
    }

    #[test]
    fn test_io_conversion_keeps_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.png");
        let err: DreamLayerError = io.into();
        assert!(matches!(err, DreamLayerError::Io(_)));
        assert!(err.to_string().contains("missing.png"));
    }
}
