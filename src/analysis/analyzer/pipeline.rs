//! Pipeline analyzer that combines a tokenizer and filters.
//!
//! This is the building block behind every non-combo analyzer. The tokenizer
//! runs first, then the filters in the order they were added.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use combo_analysis::analysis::analyzer::analyzer::Analyzer;
//! use combo_analysis::analysis::analyzer::pipeline::PipelineAnalyzer;
//! use combo_analysis::analysis::token_filter::{LowercaseFilter, StopFilter};
//! use combo_analysis::analysis::tokenizer::RegexTokenizer;
//!
//! let tokenizer = Arc::new(RegexTokenizer::new().unwrap());
//! let analyzer = PipelineAnalyzer::new(tokenizer)
//!     .add_filter(Arc::new(LowercaseFilter::new()))
//!     .add_filter(Arc::new(StopFilter::from_words(vec!["the", "and"])))
//!     .with_name("my_custom_analyzer");
//!
//! let tokens: Vec<_> = analyzer.analyze("Hello THE world AND test").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 3);
//! assert_eq!(tokens[0].text, "hello");
//! assert_eq!(tokens[1].text, "world");
//! assert_eq!(tokens[2].text, "test");
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::context::{AnalysisContext, AnalyzerId};
use crate::analysis::producer::{
    BoxTokenProducer, PipelineTokenProducer, SharedTokenProducer, TokenProducer,
};
use crate::analysis::reader::CharReader;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// A configurable analyzer that combines a tokenizer with a chain of filters.
///
/// Pipeline analyzers support producer reuse: within one
/// [`AnalysisContext`] the same producer is handed out again, fed with the
/// new input.
pub struct PipelineAnalyzer {
    id: AnalyzerId,
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    name: String,
}

impl PipelineAnalyzer {
    /// Create a new pipeline analyzer with the given tokenizer.
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        PipelineAnalyzer {
            id: AnalyzerId::next(),
            name: format!("pipeline_{}", tokenizer.name()),
            tokenizer,
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline.
    pub fn add_filter(mut self, filter: Arc<dyn Filter>) -> Self {
        self.filters.push(filter);
        self
    }

    /// Set a custom name for this analyzer.
    pub fn with_name<S: Into<String>>(mut self, name: S) -> Self {
        self.name = name.into();
        self
    }

    /// The configured name, as opposed to the static kind from [`Analyzer::name`].
    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> AnalyzerId {
        self.id
    }

    /// Get the tokenizer used by this analyzer.
    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        &self.tokenizer
    }

    /// Get the filters used by this analyzer.
    pub fn filters(&self) -> &[Arc<dyn Filter>] {
        &self.filters
    }

    fn new_producer(&self, reader: Box<dyn CharReader>) -> PipelineTokenProducer {
        PipelineTokenProducer::new(Arc::clone(&self.tokenizer), self.filters.clone(), reader)
    }
}

impl Analyzer for PipelineAnalyzer {
    fn token_producer(
        &self,
        _field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<BoxTokenProducer> {
        Ok(Box::new(self.new_producer(reader)))
    }

    fn reusable_token_producer(
        &self,
        ctx: &mut AnalysisContext,
        _field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<SharedTokenProducer> {
        if let Some(producer) = ctx.get_mut::<SharedTokenProducer>(self.id) {
            producer.set_reader(reader)?;
            return Ok(producer.clone());
        }

        let producer = SharedTokenProducer::new(Box::new(self.new_producer(reader)));
        ctx.insert(self.id, producer.clone());
        Ok(producer)
    }

    fn supports_reuse(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for PipelineAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineAnalyzer")
            .field("name", &self.name)
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}
