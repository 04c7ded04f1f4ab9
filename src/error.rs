use thiserror::Error;

/// Errors that can occur while scanning a label
///
/// Ingredient extraction itself never fails; every variant here belongs to a
/// collaborator around it (recognition, image cache, configuration).
#[derive(Error, Debug)]
pub enum ScanError {
    /// The recognition service could not read text from the image
    #[error("Recognition failed: {0}")]
    RecognitionFailed(String),

    /// No API key was configured for the recognition service
    #[error("GOOGLE_API_KEY environment variable not set")]
    MissingApiKey,

    /// The image source could not be decoded
    #[error("Invalid image: {0}")]
    InvalidImage(String),

    /// HTTP transport error talking to the recognition service
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem error (reading images, image cache)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed JSON from the recognition service
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Session identifier rejected by the image cache
    #[error("Invalid session id: {0}")]
    InvalidSession(String),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}
