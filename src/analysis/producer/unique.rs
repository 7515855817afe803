//! Same-position deduplication.

use ahash::AHashSet;

use crate::analysis::producer::{BoxTokenProducer, TokenProducer};
use crate::analysis::token::Token;
use crate::error::Result;

/// Drops tokens whose text already occurred at the same position.
///
/// A token with a position increment above zero opens a new position group;
/// within a group the first occurrence of each exact text is kept. Only the
/// current group's texts are remembered, and since a dropped token always has
/// an increment of zero no position information is lost.
pub struct UniqueTokenProducer {
    input: BoxTokenProducer,
    seen: AHashSet<String>,
    current: Token,
}

impl UniqueTokenProducer {
    pub fn new(input: BoxTokenProducer) -> Self {
        UniqueTokenProducer {
            input,
            seen: AHashSet::new(),
            current: Token::default(),
        }
    }
}

impl TokenProducer for UniqueTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.seen.clear();
        self.current.clear();
        self.input.reset()
    }

    fn advance(&mut self) -> Result<bool> {
        while self.input.advance()? {
            let token = self.input.token();
            if token.position_increment > 0 {
                self.seen.clear();
            } else if self.seen.contains(&token.text) {
                continue;
            }
            self.seen.insert(token.text.clone());
            self.current.copy_from(token);
            return Ok(true);
        }
        Ok(false)
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn end(&mut self) -> Result<()> {
        self.seen.clear();
        self.input.end()
    }

    fn final_offset(&self) -> usize {
        self.input.final_offset()
    }

    fn close(&mut self) -> Result<()> {
        self.seen.clear();
        self.input.close()
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.input.attribute_keys()
    }

    fn name(&self) -> &'static str {
        "unique"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::producer::drain;
    use crate::analysis::producer::testing::VecProducer;

    fn unique(terms: &[(&str, usize)]) -> Vec<(String, usize)> {
        let mut producer = UniqueTokenProducer::new(Box::new(VecProducer::from_terms(terms)));
        drain(&mut producer)
            .unwrap()
            .into_iter()
            .map(|t| (t.text, t.position_increment))
            .collect()
    }

    #[test]
    fn test_same_position_duplicates_removed() {
        let result = unique(&[("just", 1), ("just", 0), ("a", 1), ("a", 0), ("A", 0)]);

        assert_eq!(
            result,
            vec![
                ("just".to_string(), 1),
                ("a".to_string(), 1),
                ("A".to_string(), 0),
            ]
        );
    }

    #[test]
    fn test_different_positions_kept() {
        let result = unique(&[("b", 1), ("b", 1), ("b", 0), ("b", 2)]);

        let increments: Vec<_> = result.iter().map(|(_, inc)| *inc).collect();
        assert_eq!(increments, vec![1, 1, 2]);
    }

    #[test]
    fn test_close_before_first_advance() {
        let input = VecProducer::from_terms(&[("x", 1), ("x", 0)]);
        let closed = input.closed_flag();
        let mut producer = UniqueTokenProducer::new(Box::new(input));

        producer.close().unwrap();
        assert!(closed.load(std::sync::atomic::Ordering::SeqCst));
    }
}
