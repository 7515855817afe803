//! Absolute position tracking over a relative-increment producer.

use crate::analysis::producer::{BoxTokenProducer, TokenProducer};
use crate::analysis::token::Token;
use crate::error::Result;

/// Wraps a producer and accumulates the position increments of its tokens.
///
/// The position starts at 0, so a first token with increment 1 sits at
/// position 1. Once the input is exhausted the position becomes
/// `usize::MAX`, which orders the producer after every live one.
pub struct PositionedTokenProducer {
    inner: BoxTokenProducer,
    position: usize,
}

impl PositionedTokenProducer {
    pub fn new(inner: BoxTokenProducer) -> Self {
        PositionedTokenProducer { inner, position: 0 }
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Ordering key of the current token: position, start and end offset.
    pub fn key(&self) -> (usize, usize, usize) {
        let token = self.inner.token();
        (self.position, token.start_offset, token.end_offset)
    }
}

impl TokenProducer for PositionedTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.position = 0;
        self.inner.reset()
    }

    fn advance(&mut self) -> Result<bool> {
        if self.inner.advance()? {
            self.position = self
                .position
                .saturating_add(self.inner.token().position_increment);
            Ok(true)
        } else {
            self.position = usize::MAX;
            Ok(false)
        }
    }

    fn token(&self) -> &Token {
        self.inner.token()
    }

    fn end(&mut self) -> Result<()> {
        self.position = 0;
        self.inner.end()
    }

    fn final_offset(&self) -> usize {
        self.inner.final_offset()
    }

    fn close(&mut self) -> Result<()> {
        self.position = 0;
        self.inner.close()
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.inner.attribute_keys()
    }

    fn name(&self) -> &'static str {
        "positioned"
    }
}
