//! Scan a label end to end without any OCR credentials
//!
//! Run with: cargo run --example scan_label

use dilloscan::{extract_ingredients, MarkerPolicy, Scanner};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Text straight from a recognition pass
    println!("=== Extract from text ===");
    let label = "Ingredients: Sugar, Palm Oil (from coconut), Salt\nAllergens: none";
    println!("{:?}", extract_ingredients(label));

    // Only read after an "ingredients" marker
    println!("\n=== Require marker ===");
    let result = Scanner::builder()
        .text("Serving size: 30g\nINGREDIENTS: Oats, Honey (raw); Almonds")
        .marker_policy(MarkerPolicy::RequireMarker)
        .build()
        .await?;
    println!("Detected ingredients: {}", result.ingredients);

    // Image through the simulated recognizer
    println!("\n=== Simulated image scan ===");
    let result = Scanner::builder()
        .data_url("data:image/png;base64,aGVsbG8=")
        .simulated()
        .build()
        .await?;
    println!("Detected ingredients: {}", result.ingredients);

    Ok(())
}
