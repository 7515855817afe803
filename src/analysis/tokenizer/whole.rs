//! Whole tokenizer implementation.
//!
//! Emits the entire input as one token typed `"keyword"`, which is how the
//! keyword analyzer contributes an untouched copy of a field next to the
//! split forms produced by other analyzers.

use super::Tokenizer;

use crate::analysis::token::{Token, TokenStream};
use crate::error::Result;

/// Type tag given to the single token produced by [`WholeTokenizer`].
pub const KEYWORD_TOKEN_TYPE: &str = "keyword";

/// A tokenizer that treats the entire input as a single token.
#[derive(Clone, Debug, Default)]
pub struct WholeTokenizer;

impl WholeTokenizer {
    /// Create a new whole tokenizer.
    pub fn new() -> Self {
        WholeTokenizer
    }
}

impl Tokenizer for WholeTokenizer {
    fn tokenize(&self, text: &str) -> Result<TokenStream> {
        let token = (!text.is_empty()).then(|| {
            Token::with_offsets(text, 0, 0, text.len()).with_token_type(KEYWORD_TOKEN_TYPE)
        });
        Ok(Box::new(token.into_iter()))
    }

    fn name(&self) -> &'static str {
        "whole"
    }
}
