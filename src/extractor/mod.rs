//! Ingredient extraction from recognized label text.
//!
//! The extractor is a single pass over the text:
//!
//! 1. choose where to start reading (see [`MarkerPolicy`]),
//! 2. take the section between the first `:` and the first line break,
//! 3. split that section on `;` and `,`,
//! 4. strip parenthesized asides, trim, drop empty tokens and collapse
//!    internal whitespace to single spaces.
//!
//! It never fails: text without a usable section simply yields an empty list.

mod patterns;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::model::IngredientList;
use patterns::{DELIMITER, INGREDIENTS_MARKER, PARENTHETICAL, STRAY_PAREN, WHITESPACE_RUN};

/// Where extraction starts reading the recognized text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// Ignore any "ingredients" marker and parse from the start of the text
    #[default]
    FromStart,
    /// Start at the first case-insensitive "ingredients"; no marker means no ingredients
    RequireMarker,
}

/// Extracts a cleaned ingredient list from recognized text
///
/// Stateless apart from its policy, so one instance can be shared freely
/// between threads and tasks.
#[derive(Debug, Clone, Copy, Default)]
pub struct IngredientExtractor {
    policy: MarkerPolicy,
}

impl IngredientExtractor {
    pub fn new(policy: MarkerPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> MarkerPolicy {
        self.policy
    }

    /// Extract the ingredient list from `text`
    ///
    /// # Example
    /// ```
    /// use dilloscan::{IngredientExtractor, MarkerPolicy};
    ///
    /// let extractor = IngredientExtractor::new(MarkerPolicy::RequireMarker);
    /// let list = extractor.extract("Net wt 200g\nIngredients: Oats, Honey (raw)");
    /// assert_eq!(list.as_slice(), ["Oats", "Honey"]);
    /// ```
    pub fn extract(&self, text: &str) -> IngredientList {
        let start = match self.policy {
            MarkerPolicy::FromStart => 0,
            MarkerPolicy::RequireMarker => match INGREDIENTS_MARKER.find(text) {
                Some(marker) => marker.start(),
                None => {
                    debug!("No ingredients marker found in {} bytes of text", text.len());
                    return IngredientList::default();
                }
            },
        };

        let section = section_of(&text[start..]);
        let items: Vec<String> = DELIMITER.split(section).filter_map(clean_token).collect();

        debug!("Extracted {} ingredients", items.len());
        IngredientList::from(items)
    }
}

/// Extract ingredients from the whole text, ignoring any section marker
///
/// # Example
/// ```
/// let items = dilloscan::extract_ingredients("Sugar, Palm Oil (from coconut); Salt");
/// assert_eq!(items, vec!["Sugar", "Palm Oil", "Salt"]);
/// ```
pub fn extract_ingredients(text: &str) -> Vec<String> {
    IngredientExtractor::default().extract(text).into_vec()
}

/// The part of `tail` after its first colon and before its first line break
fn section_of(tail: &str) -> &str {
    let begin = tail.find(':').map_or(0, |colon| colon + 1);
    let end = tail.find('\n').unwrap_or(tail.len());

    // A line break before the first colon leaves nothing between them.
    if begin > end {
        ""
    } else {
        &tail[begin..end]
    }
}

fn clean_token(token: &str) -> Option<String> {
    let without_asides = PARENTHETICAL.replace_all(token, "");
    let without_parens = STRAY_PAREN.replace_all(&without_asides, "");
    let trimmed = without_parens.trim();

    if trimmed.is_empty() {
        return None;
    }

    Some(WHITESPACE_RUN.replace_all(trimmed, " ").into_owned())
}
