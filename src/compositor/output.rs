use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{ImageFormat, RgbaImage};

use crate::error::{DreamLayerError, Result};

pub const DEFAULT_DOWNLOAD_NAME: &str = "playlist-cover.png";
const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    image.write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)?;
    Ok(buf)
}

pub fn png_data_url(image: &RgbaImage) -> Result<String> {
    let png = encode_png(image)?;
    Ok(format!("{}{}", PNG_DATA_URL_PREFIX, STANDARD.encode(png)))
}

/// Decodes the payload of a base64 `data:` URL, whatever its media type.
pub fn decode_data_url(data_url: &str) -> Result<Vec<u8>> {
    let rest = data_url
        .strip_prefix("data:")
        .ok_or_else(|| DreamLayerError::Encode("not a data URL".into()))?;
    let (meta, payload) = rest
        .split_once(',')
        .ok_or_else(|| DreamLayerError::Encode("data URL has no payload".into()))?;
    if !meta.ends_with(";base64") {
        return Err(DreamLayerError::Encode(format!(
            "unsupported data URL encoding: {}",
            meta
        )));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| DreamLayerError::Encode(e.to_string()))
}

/// Writes a data URL's bytes to disk. A directory target gets
/// `playlist-cover.png` inside it.
pub async fn save_data_url(data_url: &str, target: impl AsRef<Path>) -> Result<PathBuf> {
    let bytes = decode_data_url(data_url)?;
    let target = target.as_ref();
    let path = if tokio::fs::metadata(target)
        .await
        .map(|m| m.is_dir())
        .unwrap_or(false)
    {
        target.join(DEFAULT_DOWNLOAD_NAME)
    } else {
        target.to_path_buf()
    };

    let len = bytes.len();
    tokio::fs::write(&path, bytes).await?;
    log::info!("💾 Saved {} bytes to {}", len, path.display());
    Ok(path)
}
