//! Token filters applied after tokenization inside a pipeline analyzer.
//!
//! Filters see the whole token list of one input and may rewrite, mark or
//! drop tokens. A filter that drops tokens must fold their position
//! increments into the next surviving token so positions stay consistent
//! once the stream is merged with other analyzers.

use crate::analysis::token::TokenStream;
use crate::error::Result;

/// Trait for filters that transform token streams.
pub trait Filter: Send + Sync {
    /// Apply this filter to a token stream.
    fn filter(&self, tokens: TokenStream) -> Result<TokenStream>;

    /// Get the name of this filter (for debugging and configuration).
    fn name(&self) -> &'static str;
}

pub mod lowercase;
pub mod stem;
pub mod stop;

pub use lowercase::LowercaseFilter;
pub use stem::{PorterStemmer, SimpleStemmer, StemFilter, Stemmer};
pub use stop::StopFilter;
