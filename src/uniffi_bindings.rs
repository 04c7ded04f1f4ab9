//! UniFFI bindings for dilloscan
//!
//! This module provides FFI-compatible types and functions for use with iOS and Android.
//! It wraps the async Rust API with synchronous functions that manage their own tokio runtime.

use std::fmt;
use std::time::Duration;

use crate::{MarkerPolicy, ScanError, ScanResult, Scanner};

#[cfg(feature = "uniffi")]
uniffi::setup_scaffolding!();

/// FFI-compatible marker policy
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Enum))]
pub enum FfiMarkerPolicy {
    #[default]
    FromStart,
    RequireMarker,
}

impl From<FfiMarkerPolicy> for MarkerPolicy {
    fn from(policy: FfiMarkerPolicy) -> Self {
        match policy {
            FfiMarkerPolicy::FromStart => MarkerPolicy::FromStart,
            FfiMarkerPolicy::RequireMarker => MarkerPolicy::RequireMarker,
        }
    }
}

/// FFI-compatible scan result
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiScanResult {
    pub source: String,
    pub text: String,
    pub ingredients: Vec<String>,
}

impl From<ScanResult> for FfiScanResult {
    fn from(result: ScanResult) -> Self {
        FfiScanResult {
            source: result.source,
            text: result.text,
            ingredients: result.ingredients.into_vec(),
        }
    }
}

/// FFI-compatible error type
#[derive(Debug, Clone)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Error))]
pub enum FfiScanError {
    /// Text could not be recognized in the image
    RecognitionFailed { message: String },
    /// The image could not be read or decoded
    InvalidInput { message: String },
    /// Configuration error (missing API key, bad settings)
    ConfigError { message: String },
    /// Builder configuration error
    BuilderError { message: String },
    /// Runtime error (tokio)
    RuntimeError { message: String },
}

impl fmt::Display for FfiScanError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FfiScanError::RecognitionFailed { message } => {
                write!(f, "Recognition failed: {}", message)
            }
            FfiScanError::InvalidInput { message } => write!(f, "Invalid input: {}", message),
            FfiScanError::ConfigError { message } => write!(f, "Config error: {}", message),
            FfiScanError::BuilderError { message } => write!(f, "Builder error: {}", message),
            FfiScanError::RuntimeError { message } => write!(f, "Runtime error: {}", message),
        }
    }
}

impl std::error::Error for FfiScanError {}

impl From<ScanError> for FfiScanError {
    fn from(err: ScanError) -> Self {
        let message = err.to_string();
        match err {
            ScanError::RecognitionFailed(_) | ScanError::Http(_) | ScanError::Json(_) => {
                FfiScanError::RecognitionFailed { message }
            }
            ScanError::InvalidImage(_) | ScanError::Io(_) | ScanError::InvalidSession(_) => {
                FfiScanError::InvalidInput { message }
            }
            ScanError::MissingApiKey | ScanError::ConfigError(_) => {
                FfiScanError::ConfigError { message }
            }
            ScanError::BuilderError(_) => FfiScanError::BuilderError { message },
        }
    }
}

/// Configuration for scanning images
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "uniffi", derive(uniffi::Record))]
pub struct FfiScanConfig {
    pub marker_policy: FfiMarkerPolicy,
    /// Optional API key (uses GOOGLE_API_KEY if not specified)
    pub api_key: Option<String>,
    /// Optional timeout in seconds (uses default if not specified)
    pub timeout_seconds: Option<u64>,
    /// Use placeholder text instead of calling the OCR service
    pub simulated: bool,
}

/// Create a new tokio runtime for FFI calls
fn create_runtime() -> Result<tokio::runtime::Runtime, FfiScanError> {
    tokio::runtime::Runtime::new().map_err(|e| FfiScanError::RuntimeError {
        message: format!("Failed to create async runtime: {}", e),
    })
}

/// Extract ingredients from recognized label text
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn extract_ingredients(text: String, marker_policy: FfiMarkerPolicy) -> Vec<String> {
    crate::IngredientExtractor::new(marker_policy.into())
        .extract(&text)
        .into_vec()
}

/// Recognize an image file and extract its ingredients
///
/// # Arguments
/// * `image_path` - Path to the label image
/// * `config` - Optional configuration for the scan
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scan_image_file(
    image_path: String,
    config: Option<FfiScanConfig>,
) -> Result<FfiScanResult, FfiScanError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = Scanner::builder().image(image_path);
        scan_with_config(builder, config).await
    })
}

/// Recognize a base64-encoded image and extract its ingredients
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn scan_image_base64(
    data: String,
    config: Option<FfiScanConfig>,
) -> Result<FfiScanResult, FfiScanError> {
    let rt = create_runtime()?;
    rt.block_on(async {
        let builder = Scanner::builder().base64(data);
        scan_with_config(builder, config).await
    })
}

async fn scan_with_config(
    mut builder: crate::ScannerBuilder,
    config: Option<FfiScanConfig>,
) -> Result<FfiScanResult, FfiScanError> {
    let config = config.unwrap_or_default();

    builder = builder.marker_policy(config.marker_policy.into());

    if let Some(api_key) = config.api_key {
        builder = builder.api_key(api_key);
    }

    if let Some(timeout_secs) = config.timeout_seconds {
        builder = builder.timeout(Duration::from_secs(timeout_secs));
    }

    if config.simulated {
        builder = builder.simulated();
    }

    Ok(builder.build().await?.into())
}

/// Get the library version
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// Check if the Google Vision recognizer has an API key available
#[cfg_attr(feature = "uniffi", uniffi::export)]
pub fn is_ocr_available() -> bool {
    crate::GoogleVisionRecognizer::is_available()
}
