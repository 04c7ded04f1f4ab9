use log::{debug, info};

use super::ScanResult;
use crate::error::ScanError;
use crate::extractor::IngredientExtractor;
use crate::images_to_text::{ImageSource, TextRecognizer};

/// Recognize every image in order and extract ingredients from the combined text
///
/// A recognition failure on any image aborts the scan; the extractor only
/// ever sees text that was actually recognized.
pub async fn process(
    images: &[ImageSource],
    recognizer: &dyn TextRecognizer,
    extractor: &IngredientExtractor,
) -> Result<ScanResult, ScanError> {
    if images.is_empty() {
        return Err(ScanError::BuilderError(
            "At least one image is required".to_string(),
        ));
    }

    let mut all_text = Vec::with_capacity(images.len());
    let mut sources = Vec::with_capacity(images.len());

    for image in images {
        debug!("Recognizing {} with {}", image.label(), recognizer.name());
        let text = recognizer.recognize(image).await?;
        all_text.push(text);
        sources.push(image.label());
    }

    let combined = all_text.join("\n\n");
    let ingredients = extractor.extract(&combined);
    info!(
        "Found {} ingredients in {} image(s)",
        ingredients.len(),
        images.len()
    );

    Ok(ScanResult {
        source: sources.join(", "),
        text: combined,
        ingredients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::images_to_text::SimulatedRecognizer;

    fn png() -> ImageSource {
        ImageSource::Base64("aGVsbG8=".to_string())
    }

    #[tokio::test]
    async fn test_simulated_scan() {
        let result = process(
            &[png()],
            &SimulatedRecognizer::default(),
            &IngredientExtractor::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.source, "base64-image");
        assert_eq!(
            result.ingredients.as_slice(),
            ["Sugar", "Palm Oil", "Whey Protein", "Vitamin D"]
        );
    }

    #[tokio::test]
    async fn test_multiple_images_join_text() {
        let recognizer = SimulatedRecognizer::new("Ingredients: Rice, Water");
        let result = process(
            &[png(), png()],
            &recognizer,
            &IngredientExtractor::default(),
        )
        .await
        .unwrap();

        assert_eq!(result.text, "Ingredients: Rice, Water\n\nIngredients: Rice, Water");
        assert_eq!(result.source, "base64-image, base64-image");
        // Only the first line of the combined text is read.
        assert_eq!(result.ingredients.as_slice(), ["Rice", "Water"]);
    }

    #[tokio::test]
    async fn test_no_images() {
        let result = process(
            &[],
            &SimulatedRecognizer::default(),
            &IngredientExtractor::default(),
        )
        .await;
        assert!(matches!(result, Err(ScanError::BuilderError(_))));
    }

    #[tokio::test]
    async fn test_recognition_failure_propagates() {
        let result = process(
            &[png()],
            &SimulatedRecognizer::new(""),
            &IngredientExtractor::default(),
        )
        .await;
        assert!(matches!(result, Err(ScanError::RecognitionFailed(_))));
    }
}
