use std::any::Any;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use crate::analysis::analyzer::analyzer::Analyzer;
use crate::analysis::analyzer::pipeline::PipelineAnalyzer;
use crate::analysis::context::AnalysisContext;
use crate::analysis::producer::{BoxTokenProducer, SharedTokenProducer};
use crate::analysis::reader::CharReader;
use crate::analysis::token_filter::{LowercaseFilter, StemFilter, StopFilter};
use crate::analysis::tokenizer::RegexTokenizer;
use crate::error::Result;

/// English analysis: regex words, lowercased, stop words removed, Porter
/// stemmed.
pub struct EnglishAnalyzer {
    inner: PipelineAnalyzer,
}

impl EnglishAnalyzer {
    pub fn new() -> Result<Self> {
        let tokenizer = Arc::new(RegexTokenizer::new()?);
        let analyzer = PipelineAnalyzer::new(tokenizer)
            .add_filter(Arc::new(LowercaseFilter::new()))
            .add_filter(Arc::new(StopFilter::default()))
            .add_filter(Arc::new(StemFilter::new()))
            .with_name("english");

        Ok(Self { inner: analyzer })
    }
}

impl Default for EnglishAnalyzer {
    fn default() -> Self {
        Self::new().expect("English analyzer should be creatable with default settings")
    }
}

impl Analyzer for EnglishAnalyzer {
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
        true
    }

    fn name(&self) -> &'static str {
        "english"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl Debug for EnglishAnalyzer {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnglishAnalyzer")
            .field("inner", &self.inner)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::token::Token;

    #[test]
    fn test_english_analyzer() {
        let analyzer = EnglishAnalyzer::new().unwrap();

        let tokens: Vec<Token> = analyzer
            .analyze("Hello the world and tests")
            .unwrap()
            .collect();

        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world", "test"]);
        assert_eq!(tokens[1].position_increment, 2);
        assert_eq!((tokens[2].start_offset, tokens[2].end_offset), (20, 25));
    }

    #[test]
    fn test_english_analyzer_name() {
        let analyzer = EnglishAnalyzer::new().unwrap();

        assert_eq!(analyzer.name(), "english");
    }
}
