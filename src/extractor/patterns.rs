// Compiled patterns used by the ingredient extractor.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Section marker, matched case-insensitively anywhere in the text
    pub static ref INGREDIENTS_MARKER: Regex =
        Regex::new(r"(?i)ingredients").expect("INGREDIENTS_MARKER regex is valid");

    /// Token delimiters inside a section
    pub static ref DELIMITER: Regex = Regex::new(r"[;,]").expect("DELIMITER regex is valid");

    /// A parenthesized aside, non-nested, matched lazily left to right
    pub static ref PARENTHETICAL: Regex =
        Regex::new(r"\([^)]*\)").expect("PARENTHETICAL regex is valid");

    /// Unbalanced parentheses left behind once the asides are gone
    pub static ref STRAY_PAREN: Regex = Regex::new(r"[()]").expect("STRAY_PAREN regex is valid");

    pub static ref WHITESPACE_RUN: Regex =
        Regex::new(r"\s+").expect("WHITESPACE_RUN regex is valid");
}
