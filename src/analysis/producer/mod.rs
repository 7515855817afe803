//! Token producers: the pull-based lifecycle shared by every token stream.
//!
//! A producer is driven through `reset → advance* → end → close`. `advance`
//! moves to the next token and exposes it through [`TokenProducer::token`];
//! `end` makes the final offset available. Producers that an analyzer hands
//! out for reuse also accept a fresh input through
//! [`TokenProducer::set_reader`].
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::analyzer::{Analyzer, SimpleAnalyzer};
//! use combo_analysis::analysis::producer::drain;
//! use combo_analysis::analysis::reader::StringReader;
//!
//! let analyzer = SimpleAnalyzer::whitespace();
//! let mut producer = analyzer
//!     .token_producer("body", Box::new(StringReader::new("one two")))
//!     .unwrap();
//!
//! let tokens = drain(producer.as_mut()).unwrap();
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(producer.final_offset(), 7);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::analysis::reader::CharReader;
use crate::analysis::token::Token;
use crate::error::{ComboError, Result};

pub mod caching;
pub mod pipeline;
pub mod positioned;
pub mod unique;

pub use caching::CachingTokenProducer;
pub use pipeline::PipelineTokenProducer;
pub use positioned::PositionedTokenProducer;
pub use unique::UniqueTokenProducer;

/// A pull-based source of tokens.
pub trait TokenProducer: Send {
    /// Prepare for consumption. Must be called before the first `advance`.
    fn reset(&mut self) -> Result<()>;

    /// Move to the next token. Returns `false` once exhausted.
    fn advance(&mut self) -> Result<bool>;

    /// The token produced by the last successful `advance`.
    fn token(&self) -> &Token;

    /// Signal the end of consumption.
    fn end(&mut self) -> Result<()>;

    /// Offset just past the consumed input. Valid after `end`.
    fn final_offset(&self) -> usize;

    /// Release resources. Valid at any point of the lifecycle.
    fn close(&mut self) -> Result<()>;

    /// Names of the custom attributes this producer may attach to tokens.
    fn attribute_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Feed a new input so the producer can be consumed again.
    fn set_reader(&mut self, reader: Box<dyn CharReader>) -> Result<()> {
        drop(reader);
        Err(ComboError::invalid_operation(format!(
            "{} producer cannot take a new input",
            self.name()
        )))
    }

    fn name(&self) -> &'static str;
}

pub type BoxTokenProducer = Box<dyn TokenProducer>;

/// Reset `producer`, collect all of its tokens and end it.
pub fn drain(producer: &mut dyn TokenProducer) -> Result<Vec<Token>> {
    producer.reset()?;
    let mut tokens = Vec::new();
    while producer.advance()? {
        tokens.push(producer.token().clone());
    }
    producer.end()?;
    Ok(tokens)
}

/// A cloneable handle to one producer.
///
/// Clones drive the same underlying producer and compare equal under
/// [`SharedTokenProducer::ptr_eq`]. This is how analyzers hand out reusable
/// producers and how a combo analyzer recognizes that it was handed the same
/// producers as on its previous invocation.
#[derive(Clone)]
pub struct SharedTokenProducer {
    inner: Arc<Mutex<BoxTokenProducer>>,
    current: Token,
    name: &'static str,
}

impl SharedTokenProducer {
    pub fn new(producer: BoxTokenProducer) -> Self {
        SharedTokenProducer {
            name: producer.name(),
            inner: Arc::new(Mutex::new(producer)),
            current: Token::default(),
        }
    }

    /// Whether both handles drive the same producer.
    pub fn ptr_eq(&self, other: &SharedTokenProducer) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for SharedTokenProducer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedTokenProducer")
            .field("name", &self.name)
            .field("handles", &Arc::strong_count(&self.inner))
            .finish()
    }
}

impl TokenProducer for SharedTokenProducer {
    fn reset(&mut self) -> Result<()> {
        self.current.clear();
        self.inner.lock().reset()
    }

    fn advance(&mut self) -> Result<bool> {
        let mut producer = self.inner.lock();
        let more = producer.advance()?;
        if more {
            self.current.copy_from(producer.token());
        }
        Ok(more)
    }

    fn token(&self) -> &Token {
        &self.current
    }

    fn end(&mut self) -> Result<()> {
        self.inner.lock().end()
    }

    fn final_offset(&self) -> usize {
        self.inner.lock().final_offset()
    }

    fn close(&mut self) -> Result<()> {
        self.current.clear();
        self.inner.lock().close()
    }

    fn attribute_keys(&self) -> Vec<String> {
        self.inner.lock().attribute_keys()
    }

    fn set_reader(&mut self, reader: Box<dyn CharReader>) -> Result<()> {
        self.current.clear();
        self.inner.lock().set_reader(reader)
    }

    fn name(&self) -> &'static str {
        self.name
    }
}
