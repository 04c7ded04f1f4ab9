use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

use super::{ImageSource, TextRecognizer};
use crate::error::ScanError;

const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// Performs OCR using the Google Cloud Vision API
pub struct GoogleVisionRecognizer {
    client: Client,
    api_key: String,
    endpoint: String,
}

impl GoogleVisionRecognizer {
    /// Create a recognizer with an explicit API key
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self, ScanError> {
        let timeout = timeout.unwrap_or(Duration::from_secs(30));
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Create a recognizer using the GOOGLE_API_KEY environment variable
    pub fn from_env(timeout: Option<Duration>) -> Result<Self, ScanError> {
        let api_key = std::env::var("GOOGLE_API_KEY").map_err(|_| ScanError::MissingApiKey)?;
        Self::new(api_key, timeout)
    }

    /// Check if the recognizer can be built from the environment
    pub fn is_available() -> bool {
        std::env::var("GOOGLE_API_KEY").is_ok()
    }

    /// Override the annotate endpoint (proxies, tests)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn annotate(&self, base64_image: &str) -> Result<String, ScanError> {
        let url = format!("{}?key={}", self.endpoint, self.api_key);

        let request_body = json!({
            "requests": [{
                "image": {
                    "content": base64_image
                },
                "features": [{
                    "type": "TEXT_DETECTION"
                }]
            }]
        });

        debug!("Sending OCR request to Google Vision API");

        let response = self
            .client
            .post(&url)
            .header("Accept-Encoding", "identity")
            .json(&request_body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            return Err(ScanError::RecognitionFailed(format!(
                "Google Vision API error ({}): {}",
                status, error_text
            )));
        }

        let response_body: Value = response.json().await?;
        debug!("Google Vision API response: {:?}", response_body);

        // All detected text lives in the first response's full annotation
        let text = response_body["responses"][0]["fullTextAnnotation"]["text"]
            .as_str()
            .unwrap_or_default();

        if text.trim().is_empty() {
            return Err(ScanError::RecognitionFailed(
                "No text detected in image".to_string(),
            ));
        }

        debug!("Extracted text from image: {} characters", text.len());

        Ok(text.to_string())
    }
}

#[async_trait]
impl TextRecognizer for GoogleVisionRecognizer {
    fn name(&self) -> &str {
        "google_vision"
    }

    async fn recognize(&self, image: &ImageSource) -> Result<String, ScanError> {
        let base64_image = image.to_base64().await?;
        self.annotate(&base64_image).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_env_requires_api_key() {
        let original_key = std::env::var("GOOGLE_API_KEY").ok();
        std::env::remove_var("GOOGLE_API_KEY");

        let result = GoogleVisionRecognizer::from_env(None);
        assert!(matches!(result, Err(ScanError::MissingApiKey)));
        assert!(!GoogleVisionRecognizer::is_available());

        if let Some(key) = original_key {
            std::env::set_var("GOOGLE_API_KEY", key);
        }
    }

    #[test]
    fn test_with_endpoint() {
        let recognizer = GoogleVisionRecognizer::new("key", None)
            .unwrap()
            .with_endpoint("http://localhost:1234/annotate");
        assert_eq!(recognizer.endpoint, "http://localhost:1234/annotate");
        assert_eq!(recognizer.name(), "google_vision");
    }
}
