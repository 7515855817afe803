//! Strategies handing out independent copies of one input.

use std::io::{self, Cursor, Read};
use std::sync::Arc;

use crate::analysis::reader::{CharReader, StringReader};
use crate::error::{ComboError, Result};

/// Read buffer used when an input has to be drained to be duplicated.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 16 * 1024;

/// Initial capacity of the text accumulated from a drained input.
pub const DEFAULT_INITIAL_CAPACITY: usize = 64 * 1024;

pub(crate) const DUPLICATION_FAILED: &str =
    "could not duplicate the original reader to feed multiple sub-analyzers";

/// Hands out readers that each yield the same character content as the
/// original input, starting where the original was positioned.
pub trait ReaderCloner: Send {
    fn give_a_clone(&mut self) -> Result<Box<dyn CharReader>>;
}

/// Cloner for a single consumer: hands out the original input once.
pub struct UseOnceCloner {
    reader: Option<Box<dyn CharReader>>,
}

impl UseOnceCloner {
    pub fn new(reader: Box<dyn CharReader>) -> Self {
        UseOnceCloner {
            reader: Some(reader),
        }
    }
}

impl ReaderCloner for UseOnceCloner {
    fn give_a_clone(&mut self) -> Result<Box<dyn CharReader>> {
        self.reader
            .take()
            .ok_or_else(|| ComboError::invalid_operation("the single input was already handed out"))
    }
}

/// Zero-copy cloner for [`StringReader`].
///
/// The first clone is the original reader; later clones share its text
/// buffer and start at the original's cursor.
pub struct StringReaderCloner {
    original: Option<StringReader>,
    text: Arc<str>,
    pos: usize,
}

impl StringReaderCloner {
    pub fn new(reader: StringReader) -> Self {
        let (text, pos) = reader.shared();
        StringReaderCloner {
            original: Some(reader),
            text,
            pos,
        }
    }
}

impl ReaderCloner for StringReaderCloner {
    fn give_a_clone(&mut self) -> Result<Box<dyn CharReader>> {
        match self.original.take() {
            Some(original) => Ok(Box::new(original)),
            None => Ok(Box::new(StringReader::from_shared(
                Arc::clone(&self.text),
                self.pos,
            ))),
        }
    }
}

/// Cloner for in-memory cursors.
///
/// The unread tail is copied once; the first clone is the original cursor and
/// later clones read the shared copy.
pub struct CursorCloner<T> {
    original: Option<Cursor<T>>,
    tail: Arc<[u8]>,
}

impl<T: AsRef<[u8]>> CursorCloner<T> {
    pub fn new(cursor: Cursor<T>) -> Self {
        let bytes = cursor.get_ref().as_ref();
        let start = (cursor.position() as usize).min(bytes.len());
        let tail = Arc::from(&bytes[start..]);
        CursorCloner {
            original: Some(cursor),
            tail,
        }
    }
}

impl<T: AsRef<[u8]> + Send + 'static> ReaderCloner for CursorCloner<T> {
    fn give_a_clone(&mut self) -> Result<Box<dyn CharReader>> {
        match self.original.take() {
            Some(original) => Ok(Box::new(original)),
            None => Ok(Box::new(Cursor::new(Arc::clone(&self.tail)))),
        }
    }
}

/// Fallback cloner: drains the input once and serves [`StringReader`]s over
/// the buffered text.
pub struct DefaultReaderCloner {
    text: Arc<str>,
}

impl DefaultReaderCloner {
    /// Read `reader` to exhaustion. Fails if reading fails or the content is
    /// not valid UTF-8.
    pub fn new(mut reader: Box<dyn CharReader>) -> Result<Self> {
        let mut buf = Vec::with_capacity(DEFAULT_INITIAL_CAPACITY);
        let mut chunk = vec![0u8; DEFAULT_READ_BUFFER_SIZE];
        loop {
            match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => buf.extend_from_slice(&chunk[..n]),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    return Err(ComboError::invalid_argument(format!(
                        "{DUPLICATION_FAILED}: {e}"
                    )));
                }
            }
        }
        let text = String::from_utf8(buf).map_err(|e| {
            ComboError::invalid_argument(format!("{DUPLICATION_FAILED}: {e}"))
        })?;

        Ok(DefaultReaderCloner {
            text: Arc::from(text),
        })
    }
}

impl ReaderCloner for DefaultReaderCloner {
    fn give_a_clone(&mut self) -> Result<Box<dyn CharReader>> {
        Ok(Box::new(StringReader::new(Arc::clone(&self.text))))
    }
}
