//! Producer running a tokenizer and a filter chain over one input.

use std::fmt;
use std::sync::Arc;

use crate::analysis::producer::TokenProducer;
use crate::analysis::reader::{self, CharReader};
use crate::analysis::token::Token;
use crate::analysis::token_filter::Filter;
use crate::analysis::tokenizer::Tokenizer;
use crate::error::Result;

/// Token producer backing every pipeline analyzer.
///
/// The input is read and analyzed as a whole when the producer is first reset
/// (or first advanced). Resetting an analyzed producer replays its tokens.
pub struct PipelineTokenProducer {
    tokenizer: Arc<dyn Tokenizer>,
    filters: Vec<Arc<dyn Filter>>,
    reader: Option<Box<dyn CharReader>>,
    tokens: Vec<Token>,
    cursor: usize,
    current: Token,
    final_offset: usize,
}

impl PipelineTokenProducer {
    pub fn new(
        tokenizer: Arc<dyn Tokenizer>,
        filters: Vec<Arc<dyn Filter>>,
        reader: Box<dyn CharReader>,
    ) -> Self {
        PipelineTokenProducer {
            tokenizer,
            filters,
            reader: Some(reader),
            tokens: Vec::new(),
            cursor: 0,
            current: Token::default(),
            final_offset: 0,
        }
    }

    fn load(&mut self) -> Result<()> {
        let Some(reader) = self.reader.take() else {
            return Ok(());
        };

        let (tokens, len) = reader::with_text(reader, |text| {
            let mut stream = self.tokenizer.tokenize(text)?;
            for filter in &self.filters {
                stream = filter.filter(stream)?;
            }
            Ok((stream.collect::<Vec<_>>(), text.len()))
        })?;

        self.tokens = tokens;
        self.final_offset = len;
        self.cursor = 0;
        Ok(())
    }
}

impl TokenProducer for PipelineTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.load()?;
        self.cursor = 0;
        self.current.clear();
        Ok(())
    }

    fn advance(&mut self) -> Result<bool> {
        self.load()?;
        match self.tokens.get(self.cursor) {
            Some(token) => {
                self.current.copy_from(token);
                self.cursor += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn end(&mut self) -> Result<()> {
        self.cursor = self.tokens.len();
        Ok(())
    }

    fn final_offset(&self) -> usize {
        self.final_offset
    }

    fn close(&mut self) -> Result<()> {
        self.reader = None;
        self.tokens.clear();
        self.cursor = 0;
        self.current.clear();
        Ok(())
    }

    fn set_reader(&mut self, reader: Box<dyn CharReader>) -> Result<()> {
        self.reader = Some(reader);
        self.tokens.clear();
        self.cursor = 0;
        self.final_offset = 0;
        self.current.clear();
        Ok(())
    }

    fn name(&self) -> &'static str {
        "pipeline"
    }
}

impl fmt::Debug for PipelineTokenProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PipelineTokenProducer")
            .field("tokenizer", &self.tokenizer.name())
            .field(
                "filters",
                &self.filters.iter().map(|f| f.name()).collect::<Vec<_>>(),
            )
            .field("pending_input", &self.reader.is_some())
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::analysis::producer::drain;
    use crate::analysis::reader::StringReader;
    use crate::analysis::token_filter::LowercaseFilter;
    use crate::analysis::tokenizer::WhitespaceTokenizer;
    use crate::error::ComboError;

    fn producer(text: &str) -> PipelineTokenProducer {
        PipelineTokenProducer::new(
            Arc::new(WhitespaceTokenizer::new()),
            vec![Arc::new(LowercaseFilter::new()) as Arc<dyn Filter>],
            Box::new(StringReader::new(text)),
        )
    }

    #[test]
    fn test_pipeline_producer() {
        let mut producer = producer("Hello World");

        let tokens = drain(&mut producer).unwrap();
        let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["hello", "world"]);
        assert_eq!(producer.final_offset(), 11);
    }

    #[test]
    fn test_reset_replays() {
        let mut producer = producer("a b");

        assert_eq!(drain(&mut producer).unwrap().len(), 2);
        assert_eq!(drain(&mut producer).unwrap().len(), 2);
    }

    #[test]
    fn test_set_reader_after_close() {
        let mut producer = producer("first input");
        drain(&mut producer).unwrap();
        producer.close().unwrap();

        producer
            .set_reader(Box::new(StringReader::new("Second")))
            .unwrap();
        let tokens = drain(&mut producer).unwrap();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].text, "second");
        assert_eq!(producer.final_offset(), 6);
    }

    #[test]
    fn test_read_error_propagates() {
        let mut producer = PipelineTokenProducer::new(
            Arc::new(WhitespaceTokenizer::new()),
            Vec::new(),
            Box::new(io::Cursor::new(vec![0xff])),
        );

        assert!(matches!(producer.reset(), Err(ComboError::Io(_))));
    }
}
