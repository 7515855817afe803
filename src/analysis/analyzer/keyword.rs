use std::any::Any;
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::simple::SimpleAnalyzer;
use crate::analysis::context::AnalysisContext;
use crate::analysis::producer::{BoxTokenProducer, SharedTokenProducer};
use crate::analysis::reader::CharReader;
use crate::analysis::tokenizer::WholeTokenizer;
use crate::error::Result;

/// Analyzer emitting the whole input as one token.
pub struct KeywordAnalyzer {
    inner: SimpleAnalyzer,
}

impl KeywordAnalyzer {
    pub fn new() -> Self {
        KeywordAnalyzer {
            inner: SimpleAnalyzer::new(Arc::new(WholeTokenizer::new())),
        }
    }
}

impl Default for KeywordAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}

impl Analyzer for KeywordAnalyzer {
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
        "keyword"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl std::fmt::Debug for KeywordAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeywordAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}
