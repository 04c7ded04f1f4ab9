//! Ingredient lists from nutrition labels.
//!
//! The heart of the crate is [`extract_ingredients`], a total function from
//! recognized label text to a cleaned ingredient list. Around it sit small
//! collaborators: text recognition ([`TextRecognizer`]), a per-session image
//! cache ([`ImageCache`]) and a scripted ingredient chat ([`Chatbot`]).
//!
//! ```
//! let items = dilloscan::extract_ingredients(
//!     "Ingredients: Sugar, Palm Oil (from coconut), Salt\nAllergens: none",
//! );
//! assert_eq!(items, vec!["Sugar", "Palm Oil", "Salt"]);
//! ```

pub mod builder;
pub mod cache;
pub mod chat;
pub mod config;
pub mod error;
pub mod extractor;
pub mod images_to_text;
pub mod model;
pub mod pipelines;
pub mod uniffi_bindings;

pub use builder::{InputSource, Scanner, ScannerBuilder};
pub use cache::{FileImageCache, ImageCache, MemoryImageCache};
pub use chat::{ChatMessage, Chatbot, Sender};
pub use config::ScanConfig;
pub use error::ScanError;
pub use extractor::{extract_ingredients, IngredientExtractor, MarkerPolicy};
pub use images_to_text::{
    GoogleVisionRecognizer, ImageSource, SimulatedRecognizer, TextRecognizer,
    SIMULATED_LABEL_TEXT,
};
pub use model::{IngredientList, ScanResult};

/// Extract ingredients from already recognized text
///
/// # Example
/// ```
/// let result = dilloscan::scan_text("Water, Salt (sea)");
/// assert_eq!(result.ingredients.to_string(), "Water, Salt");
/// ```
pub fn scan_text(text: &str) -> ScanResult {
    pipelines::text::process(text, &IngredientExtractor::default())
}

/// Recognize an image file with Google Vision and extract its ingredients
///
/// Requires the GOOGLE_API_KEY environment variable.
pub async fn scan_image(image_path: &str) -> Result<ScanResult, ScanError> {
    Scanner::builder().image(image_path).build().await
}
