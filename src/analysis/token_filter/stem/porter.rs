//! Porter stemming algorithm.
//!
//! Implements the five rewrite steps of M.F. Porter's 1980 algorithm over the
//! ASCII bytes of a lowercased word. Words containing non-ASCII characters
//! are lowercased and otherwise returned unchanged.
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::token_filter::stem::{PorterStemmer, Stemmer};
//!
//! let stemmer = PorterStemmer::new();
//!
//! assert_eq!(stemmer.stem("running"), "run");
//! assert_eq!(stemmer.stem("relational"), "relat");
//! ```

use super::Stemmer;

const STEP2_RULES: &[(&str, &str)] = &[
    ("ational", "ate"),
    ("tional", "tion"),
    ("enci", "ence"),
    ("anci", "ance"),
    ("izer", "ize"),
    ("abli", "able"),
    ("alli", "al"),
    ("entli", "ent"),
    ("eli", "e"),
    ("ousli", "ous"),
    ("ization", "ize"),
    ("ation", "ate"),
    ("ator", "ate"),
    ("alism", "al"),
    ("iveness", "ive"),
    ("fulness", "ful"),
    ("ousness", "ous"),
    ("aliti", "al"),
    ("iviti", "ive"),
    ("biliti", "ble"),
];

const STEP3_RULES: &[(&str, &str)] = &[
    ("icate", "ic"),
    ("ative", ""),
    ("alize", "al"),
    ("iciti", "ic"),
    ("ical", "ic"),
    ("ful", ""),
    ("ness", ""),
];

// A longer suffix precedes any shorter suffix it ends with.
const STEP4_SUFFIXES: &[&str] = &[
    "al", "ance", "ence", "er", "ic", "able", "ible", "ant", "ement", "ment", "ent", "ion", "ou",
    "ism", "ate", "iti", "ous", "ive", "ize",
];

/// Porter stemmer for English.
#[derive(Debug, Clone, Copy, Default)]
pub struct PorterStemmer;

impl PorterStemmer {
    /// Create a new Porter stemmer.
    pub fn new() -> Self {
        PorterStemmer
    }
}

impl Stemmer for PorterStemmer {
    fn stem(&self, word: &str) -> String {
        let lower = word.to_lowercase();
        if lower.len() <= 2 || !lower.is_ascii() {
            return lower;
        }

        let mut w = Word(lower.into_bytes());
        w.step1a();
        w.step1b();
        w.step1c();
        w.step2();
        w.step3();
        w.step4();
        w.step5();

        // Only ASCII bytes were ever written.
        String::from_utf8_lossy(&w.0).into_owned()
    }

    fn name(&self) -> &'static str {
        "porter"
    }
}

struct Word(Vec<u8>);

fn is_consonant(b: &[u8], i: usize) -> bool {
    match b[i] {
        b'a' | b'e' | b'i' | b'o' | b'u' => false,
        b'y' => i == 0 || !is_consonant(b, i - 1),
        _ => true,
    }
}

/// Number of vowel-consonant sequences in `b`.
fn measure(b: &[u8]) -> usize {
    let mut m = 0;
    let mut prev_vowel = false;
    for i in 0..b.len() {
        let consonant = is_consonant(b, i);
        if consonant && prev_vowel {
            m += 1;
        }
        prev_vowel = !consonant;
    }
    m
}

fn has_vowel(b: &[u8]) -> bool {
    (0..b.len()).any(|i| !is_consonant(b, i))
}

fn ends_double_consonant(b: &[u8]) -> bool {
    let n = b.len();
    n >= 2 && b[n - 1] == b[n - 2] && is_consonant(b, n - 1)
}

/// Consonant-vowel-consonant ending whose last letter is not w, x or y.
fn ends_cvc(b: &[u8]) -> bool {
    let n = b.len();
    n >= 3
        && is_consonant(b, n - 3)
        && !is_consonant(b, n - 2)
        && is_consonant(b, n - 1)
        && !matches!(b[n - 1], b'w' | b'x' | b'y')
}

impl Word {
    fn ends_with(&self, suffix: &str) -> bool {
        self.0.ends_with(suffix.as_bytes())
    }

    /// The word without its last `len` bytes.
    fn stem(&self, len: usize) -> &[u8] {
        &self.0[..self.0.len() - len]
    }

    fn replace_suffix(&mut self, len: usize, with: &str) {
        let keep = self.0.len() - len;
        self.0.truncate(keep);
        self.0.extend_from_slice(with.as_bytes());
    }

    fn step1a(&mut self) {
        if self.ends_with("sses") || self.ends_with("ies") {
            self.replace_suffix(2, "");
        } else if !self.ends_with("ss") && self.ends_with("s") {
            self.replace_suffix(1, "");
        }
    }

    fn step1b(&mut self) {
        if self.ends_with("eed") {
            if measure(self.stem(3)) > 0 {
                self.replace_suffix(1, "");
            }
            return;
        }

        let removed = if self.ends_with("ed") && has_vowel(self.stem(2)) {
            2
        } else if self.ends_with("ing") && has_vowel(self.stem(3)) {
            3
        } else {
            return;
        };
        self.replace_suffix(removed, "");

        if self.ends_with("at") || self.ends_with("bl") || self.ends_with("iz") {
            self.0.push(b'e');
        } else if ends_double_consonant(&self.0)
            && !matches!(self.0.last(), Some(b'l' | b's' | b'z'))
        {
            self.0.pop();
        } else if measure(&self.0) == 1 && ends_cvc(&self.0) {
            self.0.push(b'e');
        }
    }

    fn step1c(&mut self) {
        if self.ends_with("y") && has_vowel(self.stem(1)) {
            self.replace_suffix(1, "i");
        }
    }

    fn apply_rules(&mut self, rules: &[(&str, &str)]) {
        if let Some((suffix, with)) = rules.iter().find(|(suffix, _)| self.ends_with(suffix)) {
            if measure(self.stem(suffix.len())) > 0 {
                self.replace_suffix(suffix.len(), with);
            }
        }
    }

    fn step2(&mut self) {
        self.apply_rules(STEP2_RULES);
    }

    fn step3(&mut self) {
        self.apply_rules(STEP3_RULES);
    }

    fn step4(&mut self) {
        let Some(suffix) = STEP4_SUFFIXES.iter().find(|s| self.ends_with(s)) else {
            return;
        };
        let stem = self.stem(suffix.len());
        if measure(stem) <= 1 {
            return;
        }
        if *suffix == "ion" && !matches!(stem.last(), Some(b's' | b't')) {
            return;
        }
        self.replace_suffix(suffix.len(), "");
    }

    fn step5(&mut self) {
        if self.ends_with("e") {
            let stem = self.stem(1);
            let m = measure(stem);
            if m > 1 || (m == 1 && !ends_cvc(stem)) {
                self.0.pop();
            }
        }
        if self.ends_with("ll") && measure(&self.0) > 1 {
            self.0.pop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_porter_stemmer() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("caresses"), "caress");
        assert_eq!(stemmer.stem("ponies"), "poni");
        assert_eq!(stemmer.stem("cats"), "cat");
        assert_eq!(stemmer.stem("running"), "run");
        assert_eq!(stemmer.stem("flies"), "fli");
        assert_eq!(stemmer.stem("agreed"), "agre");
        assert_eq!(stemmer.stem("hopping"), "hop");
        assert_eq!(stemmer.stem("falling"), "fall");
        assert_eq!(stemmer.stem("filing"), "file");
        assert_eq!(stemmer.stem("happy"), "happi");
        assert_eq!(stemmer.stem("relational"), "relat");
        assert_eq!(stemmer.stem("motoring"), "motor");
    }

    #[test]
    fn test_porter_short_and_non_ascii() {
        let stemmer = PorterStemmer::new();

        assert_eq!(stemmer.stem("Is"), "is");
        assert_eq!(stemmer.stem("Straße"), "straße");
    }

    #[test]
    fn test_porter_measure() {
        assert_eq!(measure(b"tree"), 0);
        assert_eq!(measure(b"trees"), 1);
        assert_eq!(measure(b"trouble"), 1);
        assert_eq!(measure(b"troubles"), 2);
        assert_eq!(measure(b"oaten"), 2);
    }

    #[test]
    fn test_consonant_detection() {
        let word = b"toy";
        assert!(is_consonant(word, 0));
        assert!(!is_consonant(word, 1));
        assert!(is_consonant(word, 2));
        assert!(!is_consonant(b"syzygy", 1));
    }
}
