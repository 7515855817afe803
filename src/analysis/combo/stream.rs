//! K-way merge of several token producers into one position-ordered stream.
//!
//! Each input is wrapped in a [`PositionedTokenProducer`] so its tokens carry
//! an absolute position. A min-heap keyed by (position, start offset, end
//! offset, slot) always exposes the next token to emit; the emitted position
//! increment is the distance from the previously emitted position.
//!
//! ```text
//! slot 0 (whitespace): just@1  a@2  little@3
//! slot 1 (keyword):    "just a little"@1
//!
//! merged: just(+1)  "just a little"(+0)  a(+1)  little(+1)
//! ```

use std::cmp::Reverse;
use std::collections::{BTreeSet, BinaryHeap};

use crate::analysis::producer::{BoxTokenProducer, PositionedTokenProducer, TokenProducer};
use crate::analysis::token::Token;
use crate::error::{ComboError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct QueueEntry {
    position: usize,
    start_offset: usize,
    end_offset: usize,
    slot: usize,
}

impl QueueEntry {
    fn key(&self) -> (usize, usize, usize) {
        (self.position, self.start_offset, self.end_offset)
    }
}

/// Merges the tokens of several producers by position.
///
/// Absent slots (`None`) are skipped. The merge is initialized lazily on the
/// first `advance` after construction or `reset`. An error from any input
/// leaves the merge failed: it is returned once, and later advances fail
/// with [`ComboError::InvalidOperation`] until the merge is reset.
pub struct ComboTokenProducer {
    slots: Vec<Option<PositionedTokenProducer>>,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    initialized: bool,
    failed: bool,
    lazy_requeue: bool,
    last_position: usize,
    current: Token,
    final_offset: usize,
    attribute_keys: Vec<String>,
}

impl ComboTokenProducer {
    pub fn new(inputs: Vec<Option<BoxTokenProducer>>) -> Self {
        let attribute_keys: BTreeSet<String> = inputs
            .iter()
            .flatten()
            .flat_map(|input| input.attribute_keys())
            .collect();

        ComboTokenProducer {
            slots: inputs
                .into_iter()
                .map(|input| input.map(PositionedTokenProducer::new))
                .collect(),
            queue: BinaryHeap::new(),
            initialized: false,
            failed: false,
            lazy_requeue: true,
            last_position: 0,
            current: Token::default(),
            final_offset: 0,
            attribute_keys: attribute_keys.into_iter().collect(),
        }
    }

    /// Keep a slot in place when its next token has the same key as the one
    /// just emitted (default: true). Disabling it pops and pushes the slot
    /// after every token.
    pub fn with_lazy_requeue(mut self, enabled: bool) -> Self {
        self.lazy_requeue = enabled;
        self
    }

    /// Number of slots, absent ones included.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    fn initialize(&mut self) -> Result<()> {
        self.queue.clear();
        for (slot, input) in self.slots.iter_mut().enumerate() {
            let Some(input) = input else {
                continue;
            };
            if input.advance()? {
                self.queue.push(Reverse(entry(input, slot)));
            }
        }
        self.initialized = true;
        Ok(())
    }

    fn next_token(&mut self) -> Result<bool> {
        if !self.initialized {
            self.initialize()?;
        }

        let Some(Reverse(top)) = self.queue.peek().copied() else {
            self.current.clear();
            return Ok(false);
        };
        let input = self.slots[top.slot]
            .as_mut()
            .ok_or_else(|| ComboError::analysis(format!("merge slot {} is empty", top.slot)))?;

        self.current.copy_from(input.token());
        self.current.position_increment = top.position.saturating_sub(self.last_position);
        self.current.position = top.position.saturating_sub(1);
        self.last_position = top.position;

        if !input.advance()? {
            self.queue.pop();
        } else if !self.lazy_requeue {
            let next = entry(input, top.slot);
            self.queue.pop();
            self.queue.push(Reverse(next));
        } else if input.key() != top.key() {
            let next = entry(input, top.slot);
            if let Some(mut head) = self.queue.peek_mut() {
                *head = Reverse(next);
            }
        }
        Ok(true)
    }

    fn for_each_input(
        &mut self,
        mut f: impl FnMut(&mut PositionedTokenProducer) -> Result<()>,
    ) -> Result<()> {
        let mut first_error = None;
        for input in self.slots.iter_mut().flatten() {
            if let Err(e) = f(input) {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}

fn entry(input: &PositionedTokenProducer, slot: usize) -> QueueEntry {
    let (position, start_offset, end_offset) = input.key();
    QueueEntry {
        position,
        start_offset,
        end_offset,
        slot,
    }
}

impl TokenProducer for ComboTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.queue.clear();
        self.initialized = false;
        self.last_position = 0;
        self.final_offset = 0;
        self.current.clear();
        let result = self.for_each_input(|input| input.reset());
        self.failed = result.is_err();
        result
    }

    fn advance(&mut self) -> Result<bool> {
        if self.failed {
            return Err(ComboError::invalid_operation(
                "merge failed; reset it before advancing again",
            ));
        }
        self.next_token().inspect_err(|_| self.failed = true)
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn end(&mut self) -> Result<()> {
        let result = self.for_each_input(|input| input.end());
        self.final_offset = self
            .slots
            .iter()
            .flatten()
            .map(|input| input.final_offset())
            .max()
            .unwrap_or(0);
        self.last_position = 0;
        self.queue.clear();
        self.initialized = false;
        result
    }

    fn final_offset(&self) -> usize {
        self.final_offset
    }

    fn close(&mut self) -> Result<()> {
        self.queue.clear();
        self.initialized = false;
        self.last_position = 0;
        self.current.clear();
        self.for_each_input(|input| input.close())
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.attribute_keys.clone()
    }

    fn name(&self) -> &'static str {
        "combo"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use crate::analysis::producer::drain;
    use crate::analysis::producer::testing::VecProducer;

    type Row = (String, usize, usize, usize);

    fn rows(tokens: &[Token]) -> Vec<Row> {
        tokens
            .iter()
            .map(|t| {
                (
                    t.text.clone(),
                    t.start_offset,
                    t.end_offset,
                    t.position_increment,
                )
            })
            .collect()
    }

    fn row(text: &str, start: usize, end: usize, inc: usize) -> Row {
        (text.to_string(), start, end, inc)
    }

    fn words() -> VecProducer {
        VecProducer::from_terms(&[("just", 1), ("a", 1), ("little", 1), ("test", 1), ("0", 1)])
    }

    fn whole() -> VecProducer {
        VecProducer::new(vec![Token::with_offsets("just a little test 0", 0, 0, 20)])
    }

    fn some(producer: VecProducer) -> Option<BoxTokenProducer> {
        Some(Box::new(producer))
    }

    fn merge(inputs: Vec<Option<BoxTokenProducer>>) -> ComboTokenProducer {
        ComboTokenProducer::new(inputs)
    }

    #[test]
    fn test_merge_orders_by_position_then_offsets() {
        let mut combo = merge(vec![some(whole()), some(words())]);

        let tokens = drain(&mut combo).unwrap();

        assert_eq!(
            rows(&tokens),
            vec![
                row("just", 0, 4, 1),
                row("just a little test 0", 0, 20, 0),
                row("a", 5, 6, 1),
                row("little", 7, 13, 1),
                row("test", 14, 18, 1),
                row("0", 19, 20, 1),
            ]
        );
        let positions: Vec<_> = tokens.iter().map(|t| t.position).collect();
        assert_eq!(positions, vec![0, 0, 1, 2, 3, 4]);
        assert_eq!(combo.final_offset(), 20);
    }

    #[test]
    fn test_equal_keys_break_ties_by_slot() {
        let first =
            VecProducer::new(vec![Token::with_offsets("x", 0, 0, 1).with_attribute("src", "0")]);
        let second =
            VecProducer::new(vec![Token::with_offsets("x", 0, 0, 1).with_attribute("src", "1")]);
        let mut combo = merge(vec![some(first), some(second)]);

        let tokens = drain(&mut combo).unwrap();

        assert_eq!(tokens[0].attribute("src"), Some("0"));
        assert_eq!(tokens[1].attribute("src"), Some("1"));
        assert_eq!(tokens[1].position_increment, 0);
    }

    #[test]
    fn test_position_gaps_are_preserved() {
        let sparse = VecProducer::from_terms(&[("a", 1), ("b", 3)]);
        let dense = VecProducer::from_terms(&[("c", 1), ("d", 1), ("e", 1)]);
        let mut combo = merge(vec![some(sparse), some(dense)]);

        let tokens = drain(&mut combo).unwrap();

        let summary: Vec<_> = tokens
            .iter()
            .map(|t| (t.text.as_str(), t.position_increment))
            .collect();
        assert_eq!(summary, vec![("a", 1), ("c", 0), ("d", 1), ("e", 1), ("b", 1)]);
        let total: usize = tokens.iter().map(|t| t.position_increment).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn test_absent_and_empty_slots() {
        let mut combo = merge(vec![
            None,
            some(VecProducer::new(Vec::new())),
            some(VecProducer::from_terms(&[("only", 1)])),
        ]);

        let tokens = drain(&mut combo).unwrap();
        assert_eq!(rows(&tokens), vec![row("only", 0, 4, 1)]);
        assert_eq!(combo.len(), 3);

        let mut empty = merge(Vec::new());
        assert!(drain(&mut empty).unwrap().is_empty());
        assert_eq!(empty.final_offset(), 0);
    }

    #[test]
    fn test_reset_reproduces_output() {
        let mut combo = merge(vec![some(words()), some(whole())]);

        let first = drain(&mut combo).unwrap();
        let second = drain(&mut combo).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_lazy_and_eager_requeue_agree() {
        let inputs = || -> Vec<Option<BoxTokenProducer>> {
            vec![
                some(VecProducer::from_terms(&[("a", 1), ("b", 0), ("c", 2), ("d", 0)])),
                some(words()),
                some(whole()),
            ]
        };

        let lazy = drain(&mut merge(inputs())).unwrap();
        let eager = drain(&mut merge(inputs()).with_lazy_requeue(false)).unwrap();
        assert_eq!(lazy, eager);
    }

    #[test]
    fn test_attribute_keys_union() {
        let combo = merge(vec![
            some(words().with_keys(&["script", "lang"])),
            None,
            some(whole().with_keys(&["lang", "weight"])),
        ]);

        assert_eq!(combo.attribute_keys(), vec!["lang", "script", "weight"]);
    }

    #[test]
    fn test_error_fails_merge_until_reset() {
        let failing = VecProducer::from_terms(&[("a", 1), ("b", 1), ("c", 1)]).failing_at(2);
        let mut combo = merge(vec![some(failing), some(words())]);

        combo.reset().unwrap();
        let mut seen = 0;
        let err = loop {
            match combo.advance() {
                Ok(true) => seen += 1,
                Ok(false) => panic!("merge should fail"),
                Err(e) => break e,
            }
        };
        assert!(matches!(err, ComboError::Analysis(_)));
        assert_eq!(seen, 2);
        assert!(matches!(
            combo.advance(),
            Err(ComboError::InvalidOperation(_))
        ));

        combo.reset().unwrap();
        assert!(combo.advance().is_ok());
    }

    #[test]
    fn test_close_propagates_to_every_slot() {
        let first = words();
        let second = whole();
        let flags = [first.closed_flag(), second.closed_flag()];
        let mut combo = merge(vec![some(first), some(second)]);
        drain(&mut combo).unwrap();

        combo.close().unwrap();
        assert!(flags.iter().all(|f| f.load(Ordering::SeqCst)));
    }

    #[test]
    fn test_close_before_first_advance() {
        let first = words();
        let second = whole();
        let flags = [first.closed_flag(), second.closed_flag()];
        let mut combo = merge(vec![some(first), None, some(second)]);

        combo.close().unwrap();
        assert!(flags.iter().all(|f| f.load(Ordering::SeqCst)));
    }
}
