//! Replayable token cache.

use crate::analysis::producer::{BoxTokenProducer, TokenProducer};
use crate::analysis::token::Token;
use crate::error::{ComboError, Result};

/// Buffers every token of its input so the sequence can be replayed.
///
/// The cache is filled on the first `advance` (or by an explicit
/// [`fill_cache`](Self::fill_cache)); filling ends and closes the input and
/// then drops it. Every later `reset` rewinds the replay.
pub struct CachingTokenProducer {
    input: Option<BoxTokenProducer>,
    cache: Option<Vec<Token>>,
    cursor: usize,
    current: Token,
    final_offset: usize,
    attribute_keys: Vec<String>,
}

impl CachingTokenProducer {
    pub fn new(input: BoxTokenProducer) -> Self {
        CachingTokenProducer {
            attribute_keys: input.attribute_keys(),
            input: Some(input),
            cache: None,
            cursor: 0,
            current: Token::default(),
            final_offset: 0,
        }
    }

    /// Drain the input into the cache. The input must have been reset.
    ///
    /// On failure the partially filled cache is discarded and the input is
    /// kept, so the error can be reported and the producer closed.
    pub fn fill_cache(&mut self) -> Result<()> {
        if self.cache.is_some() {
            return Ok(());
        }
        let input = self.input.as_mut().ok_or_else(|| {
            ComboError::invalid_operation("token cache input was already released")
        })?;

        let mut tokens = Vec::new();
        while input.advance()? {
            tokens.push(input.token().clone());
        }
        input.end()?;
        self.final_offset = input.final_offset();
        input.close()?;

        self.input = None;
        self.cache = Some(tokens);
        self.cursor = 0;
        Ok(())
    }

    pub fn is_filled(&self) -> bool {
        self.cache.is_some()
    }

    /// Number of cached tokens, zero before filling.
    pub fn len(&self) -> usize {
        self.cache.as_ref().map_or(0, Vec::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TokenProducer for CachingTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.cursor = 0;
        self.current.clear();
        match (&self.cache, self.input.as_mut()) {
            (None, Some(input)) => input.reset(),
            _ => Ok(()),
        }
    }

    fn advance(&mut self) -> Result<bool> {
        self.fill_cache()?;
        let Some(cache) = self.cache.as_ref() else {
            return Ok(false);
        };
        match cache.get(self.cursor) {
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
        self.cursor = self.len();
        Ok(())
    }

    fn final_offset(&self) -> usize {
        self.final_offset
    }

    fn close(&mut self) -> Result<()> {
        self.cache = None;
        self.cursor = 0;
        self.current.clear();
        match self.input.take() {
            Some(mut input) => input.close(),
            None => Ok(()),
        }
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.attribute_keys.clone()
    }

    fn name(&self) -> &'static str {
        "caching"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::producer::drain;
    use crate::analysis::producer::testing::VecProducer;

    #[test]
    fn test_cache_replays() {
        let input =
            VecProducer::from_terms(&[("just", 1), ("a", 1), ("test", 1)]).with_keys(&["lang"]);
        let mut cache = CachingTokenProducer::new(Box::new(input));
        assert_eq!(cache.attribute_keys(), vec!["lang".to_string()]);

        cache.reset().unwrap();
        cache.fill_cache().unwrap();
        assert!(cache.is_filled());
        assert_eq!(cache.len(), 3);

        let first = drain(&mut cache).unwrap();
        let second = drain(&mut cache).unwrap();
        assert_eq!(first, second);
        assert_eq!(first[2].text, "test");
        assert_eq!(cache.final_offset(), 11);
    }

    #[test]
    fn test_fill_on_first_advance() {
        let input = VecProducer::from_terms(&[("x", 1)]);
        let closed = input.closed_flag();
        let mut cache = CachingTokenProducer::new(Box::new(input));

        assert!(!cache.is_filled());
        cache.reset().unwrap();
        assert!(cache.advance().unwrap());
        assert!(cache.is_filled());
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!cache.advance().unwrap());
    }

    #[test]
    fn test_fill_error_discards_partial_cache() {
        let input = VecProducer::from_terms(&[("a", 1), ("b", 1), ("c", 1)]).failing_at(2);
        let mut cache = CachingTokenProducer::new(Box::new(input));

        cache.reset().unwrap();
        assert!(cache.fill_cache().is_err());
        assert!(!cache.is_filled());
        assert_eq!(cache.len(), 0);
        cache.close().unwrap();
    }

    #[test]
    fn test_close_releases() {
        let mut cache =
            CachingTokenProducer::new(Box::new(VecProducer::from_terms(&[("x", 1)])));
        drain(&mut cache).unwrap();
        cache.close().unwrap();

        assert!(cache.is_empty());
        assert!(matches!(
            cache.advance(),
            Err(ComboError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_close_before_first_advance() {
        let input = VecProducer::from_terms(&[("x", 1)]);
        let closed = input.closed_flag();
        let mut cache = CachingTokenProducer::new(Box::new(input));

        cache.close().unwrap();
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
        assert!(!cache.is_filled());
    }
}
