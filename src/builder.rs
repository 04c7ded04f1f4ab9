use log::debug;
use std::sync::Arc;
use std::time::Duration;

use crate::cache::ImageCache;
use crate::config::ScanConfig;
use crate::error::ScanError;
use crate::extractor::{IngredientExtractor, MarkerPolicy};
use crate::images_to_text::{
    GoogleVisionRecognizer, ImageSource, SimulatedRecognizer, TextRecognizer,
};
use crate::model::ScanResult;
use crate::pipelines;

/// Represents the input source for a scan
#[derive(Debug, Clone)]
pub enum InputSource {
    /// Recognized text, extracted directly
    Text(String),
    /// One or more label images, recognized first
    Images(Vec<ImageSource>),
}

/// Entry point for the builder API
pub struct Scanner;

impl Scanner {
    pub fn builder() -> ScannerBuilder {
        ScannerBuilder::default()
    }

    /// Builder preset from loaded configuration
    ///
    /// # Errors
    /// Returns `ScanError::BuilderError` for an unknown OCR provider
    pub fn from_config(config: &ScanConfig) -> Result<ScannerBuilder, ScanError> {
        let mut builder = ScannerBuilder::default()
            .marker_policy(config.extractor.marker_policy)
            .timeout(config.ocr_timeout());

        match config.ocr.provider.as_str() {
            "google_vision" => {}
            "simulated" => builder = builder.simulated(),
            other => {
                return Err(ScanError::BuilderError(format!(
                    "Unknown OCR provider '{}'",
                    other
                )))
            }
        }

        if let Some(api_key) = &config.ocr.api_key {
            builder = builder.api_key(api_key.clone());
        }
        if let Some(endpoint) = &config.ocr.endpoint {
            builder = builder.ocr_endpoint(endpoint.clone());
        }

        Ok(builder)
    }
}

/// Builder for configuring and running a scan
#[derive(Default)]
pub struct ScannerBuilder {
    source: Option<InputSource>,
    policy: MarkerPolicy,
    recognizer: Option<Arc<dyn TextRecognizer>>,
    api_key: Option<String>,
    endpoint: Option<String>,
    timeout: Option<Duration>,
    cache: Option<(Arc<dyn ImageCache>, String)>,
}

impl ScannerBuilder {
    /// Set the input source to recognized text
    ///
    /// # Example
    /// ```
    /// use dilloscan::Scanner;
    ///
    /// let builder = Scanner::builder().text("Ingredients: Oats, Honey");
    /// ```
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.source = Some(InputSource::Text(text.into()));
        self
    }

    /// Add an image file to scan
    ///
    /// Calling this (or [`base64`](Self::base64) / [`data_url`](Self::data_url))
    /// more than once scans every image, in order, as one label.
    pub fn image(self, image_path: impl Into<String>) -> Self {
        self.push_image(ImageSource::Path(image_path.into()))
    }

    /// Add a base64-encoded image to scan
    pub fn base64(self, data: impl Into<String>) -> Self {
        self.push_image(ImageSource::Base64(data.into()))
    }

    /// Add a `data:` URL image to scan
    pub fn data_url(self, url: impl Into<String>) -> Self {
        self.push_image(ImageSource::DataUrl(url.into()))
    }

    fn push_image(mut self, image: ImageSource) -> Self {
        match &mut self.source {
            Some(InputSource::Images(images)) => images.push(image),
            _ => self.source = Some(InputSource::Images(vec![image])),
        }
        self
    }

    /// Choose where extraction starts reading
    ///
    /// # Example
    /// ```
    /// use dilloscan::{MarkerPolicy, Scanner};
    ///
    /// let builder = Scanner::builder()
    ///     .text("Nutrition facts\nIngredients: Oats")
    ///     .marker_policy(MarkerPolicy::RequireMarker);
    /// ```
    pub fn marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Use a custom text recognizer
    pub fn recognizer(mut self, recognizer: Arc<dyn TextRecognizer>) -> Self {
        self.recognizer = Some(recognizer);
        self
    }

    /// Use the simulated recognizer instead of a real OCR service
    pub fn simulated(self) -> Self {
        self.recognizer(Arc::new(SimulatedRecognizer::default()))
    }

    /// Set the Google Vision API key instead of reading GOOGLE_API_KEY
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Override the Google Vision annotate endpoint
    pub fn ocr_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set a timeout for recognition requests
    pub fn timeout(mut self, duration: Duration) -> Self {
        self.timeout = Some(duration);
        self
    }

    /// Remember the scanned image under `session`
    ///
    /// Scanned images replace the cached one. Without an input source the
    /// cached image is scanned again.
    pub fn cache(mut self, cache: Arc<dyn ImageCache>, session: impl Into<String>) -> Self {
        self.cache = Some((cache, session.into()));
        self
    }

    /// Build and execute the scan
    ///
    /// # Errors
    /// Returns `ScanError` if:
    /// - No input source was specified and nothing is cached for the session
    /// - An image cannot be read or decoded
    /// - Recognition fails
    /// - The image cache fails
    ///
    /// # Example
    /// ```no_run
    /// use dilloscan::Scanner;
    ///
    /// # async fn run() -> Result<(), dilloscan::ScanError> {
    /// let result = Scanner::builder()
    ///     .image("/path/to/label.jpg")
    ///     .build()
    ///     .await?;
    /// println!("{}", result.ingredients);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn build(self) -> Result<ScanResult, ScanError> {
        let extractor = IngredientExtractor::new(self.policy);

        let images = match &self.source {
            Some(InputSource::Text(text)) => {
                return Ok(pipelines::text::process(text, &extractor));
            }
            Some(InputSource::Images(images)) => {
                if let Some((cache, session)) = &self.cache {
                    if let Some(latest) = images.last() {
                        cache.set(session, &latest.to_data_url().await?).await?;
                    }
                }
                images.clone()
            }
            None => vec![self.cached_image().await?],
        };

        let recognizer = self.build_recognizer()?;
        pipelines::image::process(&images, recognizer.as_ref(), &extractor).await
    }

    async fn cached_image(&self) -> Result<ImageSource, ScanError> {
        let no_source = || ScanError::BuilderError("No input source specified".to_string());

        let (cache, session) = self.cache.as_ref().ok_or_else(no_source)?;
        let data_url = cache.get(session).await?.ok_or_else(no_source)?;

        debug!("Scanning cached image for session '{}'", session);
        Ok(ImageSource::DataUrl(data_url))
    }

    fn build_recognizer(&self) -> Result<Arc<dyn TextRecognizer>, ScanError> {
        if let Some(recognizer) = &self.recognizer {
            return Ok(Arc::clone(recognizer));
        }

        let mut recognizer = match &self.api_key {
            Some(key) => GoogleVisionRecognizer::new(key.clone(), self.timeout)?,
            None => GoogleVisionRecognizer::from_env(self.timeout)?,
        };
        if let Some(endpoint) = &self.endpoint {
            recognizer = recognizer.with_endpoint(endpoint.clone());
        }

        Ok(Arc::new(recognizer))
    }
}
