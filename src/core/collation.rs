//! Base-level string collation
//!
//! Case, diacritics, punctuation and whitespace are all ignored, so
//! `Crépis praemorsa` and `crepis-praemorsa` collate equal.

use std::cmp::Ordering;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Comparison key for `text`: decomposed, marks removed, alphanumerics only, lowercased
pub fn collation_key(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn compare(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b))
}

pub fn base_equal(a: &str, b: &str) -> bool {
    compare(a, b) == Ordering::Equal
}
