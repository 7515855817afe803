//! Token types and utilities for text analysis.
//!
//! This module defines the core data structure flowing through every analyzer
//! and every merge: the [`Token`]. A token carries its term text, byte offsets
//! into the source text, positional information and an open set of named
//! attributes supplied by whichever tokenizer produced it.
//!
//! # Positions
//!
//! Positions are expressed relative to the previous token through
//! `position_increment`. When several analyzers are merged, tokens that share
//! a position are emitted with an increment of 0:
//!
//! ```text
//! Input: "just a little test"
//! Analyzers: whitespace + keyword
//!
//!   "just"               (pos_inc=1)
//!   "just a little test" (pos_inc=0)  ← same position as "just"
//!   "a"                  (pos_inc=1)
//! ```
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::token::Token;
//!
//! let token = Token::with_offsets("world", 1, 6, 11)
//!     .with_token_type("word")
//!     .with_attribute("script", "latin");
//!
//! assert_eq!(token.text, "world");
//! assert_eq!(token.start_offset, 6);
//! assert_eq!(token.end_offset, 11);
//! assert_eq!(token.attribute("script"), Some("latin"));
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Default type tag given to tokens.
pub const DEFAULT_TOKEN_TYPE: &str = "word";

/// A token represents a single unit of text after tokenization.
///
/// # Fields
///
/// - `text` - The token's text content
/// - `position` - Position in the token stream (0-based)
/// - `start_offset` / `end_offset` - Byte offsets in original text
/// - `position_increment` - Position relative to previous token (default: 1)
/// - `position_length` - Number of positions this token spans (default: 1)
/// - `token_type` - Free-form type tag (default: `"word"`)
/// - `boost` - Scoring weight multiplier (default: 1.0)
/// - `stopped` - Whether the token was marked for removal
/// - `attributes` - Named values attached by the producing tokenizer
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Token {
    /// The text content of the token
    pub text: String,

    /// The position of the token in the token stream (0-based)
    pub position: usize,

    /// The byte offset where this token starts in the original text
    pub start_offset: usize,

    /// The byte offset where this token ends in the original text
    pub end_offset: usize,

    /// Position increment from the previous token (default: 1).
    ///
    /// - 1 (default): Normal increment, next position
    /// - 0: Same position as previous token (e.g., for stems or synonyms)
    /// - >1: Skip positions (e.g., for removed stop words)
    pub position_increment: usize,

    /// How many positions this token spans (default: 1).
    pub position_length: usize,

    /// Free-form token type tag, such as `"word"` or `"number"`.
    pub token_type: String,

    /// Boost factor for this token (default: 1.0)
    pub boost: f32,

    /// Whether this token has been marked as stopped (removed) by a filter
    pub stopped: bool,

    /// Additional named attributes. Keys unknown to the merge are carried
    /// through untouched.
    pub attributes: BTreeMap<String, String>,
}

impl Token {
    /// Create a new token with the given text and position.
    pub fn new<S: Into<String>>(text: S, position: usize) -> Self {
        Token {
            text: text.into(),
            position,
            start_offset: 0,
            end_offset: 0,
            position_increment: 1,
            position_length: 1,
            token_type: DEFAULT_TOKEN_TYPE.to_string(),
            boost: 1.0,
            stopped: false,
            attributes: BTreeMap::new(),
        }
    }

    /// Create a new token with text, position, and byte offsets.
    pub fn with_offsets<S: Into<String>>(
        text: S,
        position: usize,
        start_offset: usize,
        end_offset: usize,
    ) -> Self {
        let mut token = Token::new(text, position);
        token.start_offset = start_offset;
        token.end_offset = end_offset;
        token
    }

    /// Get the length of the token text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Check if the token is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Set the boost factor for this token.
    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    /// Mark this token as stopped.
    pub fn stop(mut self) -> Self {
        self.stopped = true;
        self
    }

    /// Check if this token is stopped.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Set the type tag.
    pub fn with_token_type<S: Into<String>>(mut self, token_type: S) -> Self {
        self.token_type = token_type.into();
        self
    }

    /// Attach a named attribute.
    pub fn with_attribute<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Get a named attribute.
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(|s| s.as_str())
    }

    /// Clone this token with updated text.
    pub fn with_text<S: Into<String>>(&self, text: S) -> Self {
        let mut token = self.clone();
        token.text = text.into();
        token
    }

    /// Set the position increment.
    pub fn with_position_increment(mut self, increment: usize) -> Self {
        self.position_increment = increment;
        self
    }

    /// Set the position length.
    pub fn with_position_length(mut self, length: usize) -> Self {
        self.position_length = length;
        self
    }

    /// Overwrite every field with the values of `other`, reusing this
    /// token's allocations where possible.
    pub fn copy_from(&mut self, other: &Token) {
        self.text.clone_from(&other.text);
        self.position = other.position;
        self.start_offset = other.start_offset;
        self.end_offset = other.end_offset;
        self.position_increment = other.position_increment;
        self.position_length = other.position_length;
        self.token_type.clone_from(&other.token_type);
        self.boost = other.boost;
        self.stopped = other.stopped;
        self.attributes.clone_from(&other.attributes);
    }

    /// Reset every field to the values of an empty token.
    pub fn clear(&mut self) {
        self.text.clear();
        self.position = 0;
        self.start_offset = 0;
        self.end_offset = 0;
        self.position_increment = 1;
        self.position_length = 1;
        self.token_type.clear();
        self.token_type.push_str(DEFAULT_TOKEN_TYPE);
        self.boost = 1.0;
        self.stopped = false;
        self.attributes.clear();
    }
}

impl Default for Token {
    fn default() -> Self {
        Token::new("", 0)
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// A token stream represents a sequence of tokens from a tokenizer or filter.
pub type TokenStream = Box<dyn Iterator<Item = Token> + Send>;

/// Trait for types that can produce a token stream.
pub trait IntoTokenStream {
    /// Convert this type into a token stream.
    fn into_token_stream(self) -> TokenStream;
}

impl IntoTokenStream for Vec<Token> {
    fn into_token_stream(self) -> TokenStream {
        Box::new(self.into_iter())
    }
}
