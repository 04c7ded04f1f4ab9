//! Text recognition collaborators.
//!
//! The scanner never looks inside images itself; it hands an [`ImageSource`]
//! to a [`TextRecognizer`] and extracts ingredients from whatever text comes
//! back.

mod google;
mod simulated;

pub use google::GoogleVisionRecognizer;
pub use simulated::{SimulatedRecognizer, SIMULATED_LABEL_TEXT};

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::path::Path;

use crate::error::ScanError;

/// Represents the source of an image for OCR processing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image from a file path
    Path(String),
    /// Image as base64-encoded data
    Base64(String),
    /// Image as a `data:<mime>;base64,<payload>` URL, as produced by browsers
    DataUrl(String),
}

impl ImageSource {
    /// Short label for logs and scan results
    pub fn label(&self) -> String {
        match self {
            ImageSource::Path(p) => p.clone(),
            ImageSource::Base64(_) => "base64-image".to_string(),
            ImageSource::DataUrl(_) => "data-url-image".to_string(),
        }
    }

    /// Base64 payload of the image, reading it from disk if needed
    pub async fn to_base64(&self) -> Result<String, ScanError> {
        match self {
            ImageSource::Path(path) => {
                let image_data = tokio::fs::read(path).await?;
                Ok(STANDARD.encode(image_data))
            }
            ImageSource::Base64(data) => Ok(data.clone()),
            ImageSource::DataUrl(url) => {
                let (_, payload) = split_data_url(url)?;
                Ok(payload.to_string())
            }
        }
    }

    /// The image as a `data:` URL, the form kept by image caches
    pub async fn to_data_url(&self) -> Result<String, ScanError> {
        match self {
            ImageSource::DataUrl(url) => {
                split_data_url(url)?;
                Ok(url.clone())
            }
            ImageSource::Path(path) => {
                let mime = mime_for_path(Path::new(path));
                Ok(format!("data:{};base64,{}", mime, self.to_base64().await?))
            }
            // Raw payloads carry no type; browsers capture labels as PNG.
            ImageSource::Base64(data) => Ok(format!("data:image/png;base64,{}", data)),
        }
    }

    /// Decoded image bytes; fails if the payload is not valid base64
    pub async fn to_bytes(&self) -> Result<Vec<u8>, ScanError> {
        let encoded = self.to_base64().await?;
        STANDARD.decode(encoded.trim()).map_err(|e| {
            ScanError::InvalidImage(format!("{} is not valid base64: {}", self.label(), e))
        })
    }
}

/// Splits a `data:` URL into its media type and base64 payload
fn split_data_url(url: &str) -> Result<(&str, &str), ScanError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| ScanError::InvalidImage("data URL must start with 'data:'".to_string()))?;

    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| ScanError::InvalidImage("data URL has no payload".to_string()))?;

    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| ScanError::InvalidImage("data URL is not base64-encoded".to_string()))?;

    if payload.is_empty() {
        return Err(ScanError::InvalidImage("data URL payload is empty".to_string()));
    }

    Ok((mime, payload))
}

fn mime_for_path(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}

/// Anything that can turn an image into text
#[async_trait]
pub trait TextRecognizer: Send + Sync {
    /// Recognizer name (e.g., "google_vision", "simulated")
    fn name(&self) -> &str;

    /// Recognize all text in the image
    ///
    /// Returns [`ScanError::RecognitionFailed`] when the image holds no
    /// readable text.
    async fn recognize(&self, image: &ImageSource) -> Result<String, ScanError>;
}
