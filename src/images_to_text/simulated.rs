use async_trait::async_trait;
use log::debug;

use super::{ImageSource, TextRecognizer};
use crate::error::ScanError;

/// Placeholder label text used when no OCR service is configured
pub const SIMULATED_LABEL_TEXT: &str = "Sugar, Palm Oil, Whey Protein, Vitamin D";

/// Recognizer that returns fixed text for every readable image
///
/// The image is still decoded, so broken sources fail the same way they
/// would against a real service.
#[derive(Debug, Clone)]
pub struct SimulatedRecognizer {
    text: String,
}

impl SimulatedRecognizer {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl Default for SimulatedRecognizer {
    fn default() -> Self {
        Self::new(SIMULATED_LABEL_TEXT)
    }
}

#[async_trait]
impl TextRecognizer for SimulatedRecognizer {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn recognize(&self, image: &ImageSource) -> Result<String, ScanError> {
        let bytes = image.to_bytes().await?;
        debug!(
            "Simulating recognition of {} ({} bytes)",
            image.label(),
            bytes.len()
        );

        if self.text.trim().is_empty() {
            return Err(ScanError::RecognitionFailed(
                "No text detected in image".to_string(),
            ));
        }

        Ok(self.text.clone())
    }
}
