use log::debug;

use super::ScanResult;
use crate::extractor::IngredientExtractor;

/// Source label for text handed in directly rather than recognized from an image
pub const DIRECT_INPUT: &str = "direct-input";

/// Extract ingredients from text that needs no recognition pass
pub fn process(text: &str, extractor: &IngredientExtractor) -> ScanResult {
    debug!("Extracting ingredients from {} bytes of direct input", text.len());

    ScanResult {
        source: DIRECT_INPUT.to_string(),
        text: text.to_string(),
        ingredients: extractor.extract(text),
    }
}
