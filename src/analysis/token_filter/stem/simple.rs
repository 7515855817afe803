//! Suffix-stripping stemmer.

use super::Stemmer;

const DEFAULT_SUFFIXES: &[&str] = &[
    "ing", "ed", "er", "est", "ly", "s", "es", "ies", "ied", "tion", "sion", "able", "ible",
    "ment", "ness", "ful",
];

/// Stemmer that strips the longest matching suffix from a lowercased word.
///
/// Words of three bytes or fewer are only lowercased, and a suffix is removed
/// only when at least three bytes of stem remain.
#[derive(Debug, Clone)]
pub struct SimpleStemmer {
    /// Sorted longest first.
    suffixes: Vec<String>,
}

impl SimpleStemmer {
    /// Create a new simple stemmer with common English suffixes.
    pub fn new() -> Self {
        Self::with_suffixes(DEFAULT_SUFFIXES.iter().map(|s| s.to_string()).collect())
    }

    /// Create a simple stemmer with custom suffixes.
    pub fn with_suffixes(mut suffixes: Vec<String>) -> Self {
        suffixes.sort_by_key(|s| std::cmp::Reverse(s.len()));
        SimpleStemmer { suffixes }
    }
}

impl Default for SimpleStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stemmer for SimpleStemmer {
    fn stem(&self, word: &str) -> String {
        let word = word.to_lowercase();
        if word.len() <= 3 {
            return word;
        }

        self.suffixes
            .iter()
            .find(|suffix| word.len() > suffix.len() + 2 && word.ends_with(suffix.as_str()))
            .map(|suffix| word[..word.len() - suffix.len()].to_string())
            .unwrap_or(word)
    }

    fn name(&self) -> &'static str {
        "simple"
    }
}
