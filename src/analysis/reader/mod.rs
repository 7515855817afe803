//! Character inputs and their duplication.
//!
//! A combo analyzer receives exactly one input per invocation but has to feed
//! it to several sub-analyzers. This module defines the input abstraction
//! ([`CharReader`]) and the machinery that turns one input into N independent
//! ones ([`ReaderCloneFactory`]).
//!
//! # Examples
//!
//! ```
//! use std::io::Read;
//!
//! use combo_analysis::analysis::reader::{ReaderCloneFactory, StringReader};
//!
//! let reader = Box::new(StringReader::new("just a little test"));
//! let mut cloner = ReaderCloneFactory::cloner(reader, 2).unwrap();
//!
//! let mut first = String::new();
//! cloner.give_a_clone().unwrap().read_to_string(&mut first).unwrap();
//! let mut second = String::new();
//! cloner.give_a_clone().unwrap().read_to_string(&mut second).unwrap();
//!
//! assert_eq!(first, second);
//! ```

use std::any::Any;
use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use crate::error::Result;

pub mod cloner;
pub mod factory;

pub use cloner::{
    CursorCloner, DefaultReaderCloner, ReaderCloner, StringReaderCloner, UseOnceCloner,
};
pub use factory::{ReaderCloneFactory, Unwrapped};

/// A character input an analyzer can consume.
///
/// Every `Read + Send + 'static` type is a `CharReader`. The `Any` accessors
/// let the clone factory dispatch on the concrete reader type; call them on
/// `&*boxed` so the boxed value, not the box, is inspected.
pub trait CharReader: Read + Send + Any {
    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;
}

impl<T: Read + Send + 'static> CharReader for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
        self
    }
}

/// In-memory reader over shared text.
///
/// Cloning the reader (or duplicating it through a [`StringReaderCloner`])
/// shares the underlying buffer; only the read cursor is per reader.
#[derive(Clone)]
pub struct StringReader {
    text: Arc<str>,
    pos: usize,
}

impl StringReader {
    pub fn new<S: Into<Arc<str>>>(text: S) -> Self {
        StringReader {
            text: text.into(),
            pos: 0,
        }
    }

    pub(crate) fn from_shared(text: Arc<str>, pos: usize) -> Self {
        StringReader { text, pos }
    }

    /// The unread remainder, or `None` if a partial read stopped inside a
    /// multi-byte character.
    pub fn text(&self) -> Option<&str> {
        self.text.get(self.pos..)
    }

    pub(crate) fn shared(&self) -> (Arc<str>, usize) {
        (Arc::clone(&self.text), self.pos)
    }
}

impl Read for StringReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let remaining = &self.text.as_bytes()[self.pos.min(self.text.len())..];
        let n = remaining.len().min(buf.len());
        buf[..n].copy_from_slice(&remaining[..n]);
        self.pos += n;
        Ok(n)
    }
}

impl fmt::Debug for StringReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StringReader")
            .field("len", &self.text.len())
            .field("pos", &self.pos)
            .finish()
    }
}

impl From<&str> for StringReader {
    fn from(text: &str) -> Self {
        StringReader::new(text)
    }
}

impl From<String> for StringReader {
    fn from(text: String) -> Self {
        StringReader::new(text)
    }
}

/// Run `f` over the full text of `reader`.
///
/// A [`StringReader`] is read in place; any other input is read to its end
/// and must be valid UTF-8.
pub(crate) fn with_text<T>(
    mut reader: Box<dyn CharReader>,
    f: impl FnOnce(&str) -> Result<T>,
) -> Result<T> {
    if let Some(text) = CharReader::as_any(&*reader)
        .downcast_ref::<StringReader>()
        .and_then(StringReader::text)
    {
        return f(text);
    }
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    f(&text)
}
