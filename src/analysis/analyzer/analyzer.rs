//! Core analyzer trait definition.
//!
//! An analyzer turns one character input into a token producer. Combo
//! analyzers treat every analyzer as opaque: they only call the entry points
//! defined here.
//!
//! ```text
//! reader → Analyzer → TokenProducer
//!             ↓
//!         Tokenizer
//!             ↓
//!         Filter 1 … Filter N
//! ```
//!
//! # Available Implementations
//!
//! - [`StandardAnalyzer`](super::standard::StandardAnalyzer) - Regex words, lowercased, stop words removed
//! - [`SimpleAnalyzer`](super::simple::SimpleAnalyzer) - Tokenization only, no filtering
//! - [`KeywordAnalyzer`](super::keyword::KeywordAnalyzer) - Treats entire input as one token
//! - [`PipelineAnalyzer`](super::pipeline::PipelineAnalyzer) - Custom tokenizer + filter chains
//! - [`EnglishAnalyzer`](super::language::english::EnglishAnalyzer) - Standard plus Porter stemming
//! - [`ComboAnalyzer`](crate::analysis::combo::ComboAnalyzer) - Merges several analyzers
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::analyzer::analyzer::Analyzer;
//! use combo_analysis::analysis::analyzer::standard::StandardAnalyzer;
//!
//! let analyzer = StandardAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Hello World").unwrap().collect();
//!
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! ```

use std::any::Any;
use std::fmt::Debug;

use crate::analysis::context::AnalysisContext;
use crate::analysis::producer::{BoxTokenProducer, SharedTokenProducer, drain};
use crate::analysis::reader::{CharReader, StringReader};
use crate::analysis::token::{IntoTokenStream, TokenStream};
use crate::error::Result;

/// Trait for analyzers that convert text into processed tokens.
///
/// Analyzers are shared across threads (`Send + Sync`) and keep no
/// per-invocation state of their own. State kept for reuse belongs to the
/// caller's [`AnalysisContext`].
pub trait Analyzer: Send + Sync + Debug {
    /// Create a fresh producer over `reader`.
    ///
    /// `field` names the field being analyzed; analyzers that do not
    /// distinguish fields ignore it.
    fn token_producer(&self, field: &str, reader: Box<dyn CharReader>) -> Result<BoxTokenProducer>;

    /// Return a producer over `reader`, reusing the one this analyzer handed
    /// out on the previous call with the same context when possible.
    ///
    /// A producer obtained here stays valid only until the next call on the
    /// same analyzer and context.
    fn reusable_token_producer(
        &self,
        ctx: &mut AnalysisContext,
        field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<SharedTokenProducer> {
        let _ = ctx;
        Ok(SharedTokenProducer::new(self.token_producer(field, reader)?))
    }

    /// Whether [`reusable_token_producer`](Self::reusable_token_producer)
    /// actually reuses producers.
    fn supports_reuse(&self) -> bool {
        false
    }

    /// Analyze the given text and return its tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use combo_analysis::analysis::analyzer::analyzer::Analyzer;
    /// use combo_analysis::analysis::analyzer::standard::StandardAnalyzer;
    ///
    /// let analyzer = StandardAnalyzer::new().unwrap();
    /// let tokens: Vec<_> = analyzer.analyze("The quick brown fox").unwrap().collect();
    ///
    /// assert_eq!(tokens.len(), 3);
    /// assert_eq!(tokens[0].text, "quick");
    /// assert_eq!(tokens[0].position_increment, 2);
    /// ```
    fn analyze(&self, text: &str) -> Result<TokenStream> {
        let mut producer = self.token_producer("", Box::new(StringReader::new(text)))?;
        let tokens = drain(producer.as_mut())?;
        producer.close()?;
        Ok(tokens.into_token_stream())
    }

    /// Get the name of this analyzer (for debugging and configuration).
    fn name(&self) -> &'static str;

    /// Provide access to the concrete type for downcasting.
    fn as_any(&self) -> &dyn Any;
}
