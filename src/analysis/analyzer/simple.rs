use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::context::AnalysisContext;
use crate::analysis::producer::{BoxTokenProducer, SharedTokenProducer};
use crate::analysis::reader::CharReader;
use crate::analysis::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::error::Result;

/// Analyzer that only tokenizes.
pub struct SimpleAnalyzer {
    inner: PipelineAnalyzer,
}

impl SimpleAnalyzer {
    pub fn new(tokenizer: Arc<dyn Tokenizer>) -> Self {
        SimpleAnalyzer {
            inner: PipelineAnalyzer::new(tokenizer).with_name("simple"),
        }
    }

    /// Split on whitespace and nothing else.
    pub fn whitespace() -> Self {
        Self::new(Arc::new(WhitespaceTokenizer::new()))
    }

    pub fn tokenizer(&self) -> &Arc<dyn Tokenizer> {
        self.inner.tokenizer()
    }
}

impl Analyzer for SimpleAnalyzer {
    fn token_producer(&self, field: &str, reader: Box<dyn CharReader>) -> Result<BoxTokenProducer> {
        self.inner.token_producer(field, reader)
    }

    fn reusable_token_producer(
        &self,
        ctx: &mut AnalysisContext,
        field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<SharedTokenProducer> {
        self.inner.reusable_token_producer(ctx, field, reader)
    }

    fn supports_reuse(&self) -> bool {
        self.inner.supports_reuse()
    }

    fn name(&self) -> &'static str {
        "simple"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for SimpleAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimpleAnalyzer")
            .field("tokenizer", &self.tokenizer().name())
            .finish()
    }
}
