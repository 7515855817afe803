//! Tokenizer implementations for text analysis.
//!
//! Tokenizers split raw text into tokens. They are the opaque building blocks
//! the combo analyzer merges: each sub-analyzer runs its own tokenizer over its
//! own copy of the input.
//!
//! # Available Tokenizers
//!
//! - [`whitespace::WhitespaceTokenizer`] - Splits on whitespace characters
//! - [`regex::RegexTokenizer`] - Custom regex-based tokenization
//! - [`whole::WholeTokenizer`] - Treats entire text as single token
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::tokenizer::Tokenizer;
//! use combo_analysis::analysis::tokenizer::whitespace::WhitespaceTokenizer;
//!
//! let tokenizer = WhitespaceTokenizer::new();
//! let tokens: Vec<_> = tokenizer.tokenize("Hello world").unwrap().collect();
//! assert_eq!(tokens.len(), 2);
//! ```

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for tokenizers that convert text into tokens.
///
/// The trait requires `Send + Sync` so tokenizers can be shared by analyzers
/// used from several threads.
pub trait Tokenizer: Send + Sync {
    /// Tokenize the given text into a stream of tokens.
    fn tokenize(&self, text: &str) -> Result<TokenStream>;

    /// Get the name of this tokenizer (for debugging and configuration).
    fn name(&self) -> &'static str;
}

/// Classify a token text as `"number"` when it is made of ASCII digits only,
/// `"word"` otherwise.
pub(crate) fn detect_token_type(word: &str) -> &'static str {
    if !word.is_empty() && word.bytes().all(|b| b.is_ascii_digit()) {
        "number"
    } else {
        "word"
    }
}

pub mod regex;
pub mod whitespace;
pub mod whole;

pub use regex::RegexTokenizer;
pub use whitespace::WhitespaceTokenizer;
pub use whole::WholeTokenizer;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_token_type() {
        assert_eq!(detect_token_type("0"), "number");
        assert_eq!(detect_token_type("2024"), "number");
        assert_eq!(detect_token_type("a1"), "word");
        assert_eq!(detect_token_type(""), "word");
    }
}
