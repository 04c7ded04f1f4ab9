use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered list of cleaned ingredient names
///
/// Serializes as a plain JSON array and displays as comma-separated text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IngredientList(Vec<String>);

impl IngredientList {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

impl From<Vec<String>> for IngredientList {
    fn from(items: Vec<String>) -> Self {
        IngredientList(items)
    }
}

impl IntoIterator for IngredientList {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a IngredientList {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for IngredientList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(", "))
    }
}

/// Outcome of scanning one label
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScanResult {
    /// Where the text came from (image paths, "base64-image", "direct-input")
    pub source: String,
    /// Full recognized text the ingredients were extracted from
    pub text: String,
    pub ingredients: IngredientList,
}
