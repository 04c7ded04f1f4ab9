use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::chat::{Chatbot, DEFAULT_REPLY_TEMPLATE};
use crate::extractor::{IngredientExtractor, MarkerPolicy};

/// Main scanner configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct ScanConfig {
    #[serde(default)]
    pub extractor: ExtractorConfig,
    #[serde(default)]
    pub ocr: OcrConfig,
    #[serde(default)]
    pub chat: ChatConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ExtractorConfig {
    /// "from_start" or "require_marker"
    #[serde(default)]
    pub marker_policy: MarkerPolicy,
}

/// Configuration for the text recognition service
#[derive(Debug, Deserialize, Clone)]
pub struct OcrConfig {
    /// "google_vision" or "simulated"
    #[serde(default = "default_ocr_provider")]
    pub provider: String,
    /// API key for authentication (falls back to GOOGLE_API_KEY)
    pub api_key: Option<String>,
    /// Annotate endpoint override (for proxies)
    pub endpoint: Option<String>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            provider: default_ocr_provider(),
            api_key: None,
            endpoint: None,
            timeout: default_timeout(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ChatConfig {
    /// Delay before the scripted reply, in milliseconds
    #[serde(default = "default_chat_delay_ms")]
    pub delay_ms: u64,
    #[serde(default = "default_chat_template")]
    pub template: String,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            delay_ms: default_chat_delay_ms(),
            template: default_chat_template(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    /// Directory holding one cached image per session
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

// Default value functions
fn default_ocr_provider() -> String {
    "google_vision".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_chat_delay_ms() -> u64 {
    1000
}

fn default_chat_template() -> String {
    DEFAULT_REPLY_TEMPLATE.to_string()
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from(".dilloscan-cache")
}

impl ScanConfig {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded with the following priority (highest to lowest):
    /// 1. Environment variables with DILLOSCAN__ prefix
    /// 2. config.toml file in current directory
    /// 3. Default values
    ///
    /// Environment variable format: DILLOSCAN__OCR__API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        load_config()
    }

    pub fn extractor(&self) -> IngredientExtractor {
        IngredientExtractor::new(self.extractor.marker_policy)
    }

    pub fn chatbot(&self) -> Chatbot {
        Chatbot::new(
            Duration::from_millis(self.chat.delay_ms),
            self.chat.template.clone(),
        )
    }

    pub fn ocr_timeout(&self) -> Duration {
        Duration::from_secs(self.ocr.timeout)
    }
}

/// Load configuration from file and environment variables
///
/// See [`ScanConfig::load`] for the source priority.
pub fn load_config() -> Result<ScanConfig, ConfigError> {
    let settings = Config::builder()
        // Optional config file (can be missing)
        .add_source(File::with_name("config").required(false))
        // Use double underscore for nested keys: DILLOSCAN__CHAT__DELAY_MS
        .add_source(
            Environment::with_prefix("DILLOSCAN")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    settings.try_deserialize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> ScanConfig {
        Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_ocr_provider(), "google_vision");
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_chat_delay_ms(), 1000);
        assert_eq!(default_cache_dir(), PathBuf::from(".dilloscan-cache"));
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = from_toml("");
        assert_eq!(config.extractor.marker_policy, MarkerPolicy::FromStart);
        assert_eq!(config.ocr.provider, "google_vision");
        assert!(config.ocr.api_key.is_none());
        assert_eq!(config.chat.template, DEFAULT_REPLY_TEMPLATE);
        assert_eq!(config.ocr_timeout(), Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_from_toml() {
        let config = from_toml(
            r#"
            [extractor]
            marker_policy = "require_marker"

            [ocr]
            provider = "simulated"
            timeout = 5

            [chat]
            delay_ms = 10
            template = "About {input}"
            "#,
        );

        assert_eq!(config.extractor().policy(), MarkerPolicy::RequireMarker);
        assert_eq!(config.ocr.provider, "simulated");
        assert_eq!(config.ocr_timeout(), Duration::from_secs(5));
        assert_eq!(config.chat.delay_ms, 10);
        assert_eq!(config.chat.template, "About {input}");
    }

    #[test]
    fn test_unknown_marker_policy_is_rejected() {
        let result = Config::builder()
            .add_source(File::from_str(
                "[extractor]\nmarker_policy = \"sometimes\"",
                FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize::<ScanConfig>();
        assert!(result.is_err());
    }

    #[test]
    fn test_load_config_without_file() {
        // No config.toml in the test working directory; must not panic
        let result = load_config();
        assert!(result.is_ok() || result.is_err());
    }
}
