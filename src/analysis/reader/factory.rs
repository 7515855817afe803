//! Type-keyed selection of the cheapest way to duplicate an input.
//!
//! Resolution for a reader's concrete type, cached per [`TypeId`]:
//!
//! 1. a bound cloner for exactly that type;
//! 2. a bound unwrapper, which peels off a wrapper (only when doing so loses
//!    no buffered data) and resolves the inner reader again;
//! 3. the [`DefaultReaderCloner`], which reads the input to its end.

use std::any::TypeId;
use std::io::{BufReader, Cursor};
use std::sync::Arc;

use ahash::AHashMap;
use lazy_static::lazy_static;
use parking_lot::RwLock;
use tracing::trace;

use crate::analysis::reader::cloner::{
    CursorCloner, DefaultReaderCloner, ReaderCloner, StringReaderCloner, UseOnceCloner,
};
use crate::analysis::reader::{CharReader, StringReader};
use crate::error::{ComboError, Result};

/// Outcome of an unwrapper.
pub enum Unwrapped {
    /// The wrapped reader, safe to duplicate on its own.
    Inner(Box<dyn CharReader>),
    /// The wrapper itself, which holds data the inner reader no longer has.
    Kept(Box<dyn CharReader>),
}

type ClonerBuilder =
    Arc<dyn Fn(Box<dyn CharReader>) -> Result<Box<dyn ReaderCloner>> + Send + Sync>;
type UnwrapperFn = Arc<dyn Fn(Box<dyn CharReader>) -> Result<Unwrapped> + Send + Sync>;

#[derive(Clone)]
enum Strategy {
    Cloner(ClonerBuilder),
    Unwrapper(UnwrapperFn),
    Fallback,
}

lazy_static! {
    static ref STRATEGIES: RwLock<AHashMap<TypeId, Strategy>> = RwLock::new(default_strategies());
}

fn downcast<R: CharReader>(reader: Box<dyn CharReader>) -> Result<R> {
    reader
        .into_any()
        .downcast::<R>()
        .map(|boxed| *boxed)
        .map_err(|_| ComboError::other("reader type does not match its registered strategy"))
}

fn cloner_for<R, F>(build: F) -> Strategy
where
    R: CharReader,
    F: Fn(R) -> Box<dyn ReaderCloner> + Send + Sync + 'static,
{
    Strategy::Cloner(Arc::new(move |reader| Ok(build(downcast::<R>(reader)?))))
}

fn unwrapper_for<R, F>(unwrap: F) -> Strategy
where
    R: CharReader,
    F: Fn(R) -> Unwrapped + Send + Sync + 'static,
{
    Strategy::Unwrapper(Arc::new(move |reader| Ok(unwrap(downcast::<R>(reader)?))))
}

fn unwrap_buffered<R: CharReader>(buffered: BufReader<R>) -> Unwrapped {
    if buffered.buffer().is_empty() {
        Unwrapped::Inner(Box::new(buffered.into_inner()))
    } else {
        Unwrapped::Kept(Box::new(buffered))
    }
}

fn default_strategies() -> AHashMap<TypeId, Strategy> {
    let mut strategies = AHashMap::new();

    strategies.insert(
        TypeId::of::<StringReader>(),
        cloner_for(|r: StringReader| Box::new(StringReaderCloner::new(r))),
    );
    strategies.insert(
        TypeId::of::<Cursor<String>>(),
        cloner_for(|r: Cursor<String>| Box::new(CursorCloner::new(r))),
    );
    strategies.insert(
        TypeId::of::<Cursor<Vec<u8>>>(),
        cloner_for(|r: Cursor<Vec<u8>>| Box::new(CursorCloner::new(r))),
    );

    strategies.insert(
        TypeId::of::<Box<dyn CharReader>>(),
        unwrapper_for(|r: Box<dyn CharReader>| Unwrapped::Inner(r)),
    );
    strategies.insert(
        TypeId::of::<BufReader<StringReader>>(),
        unwrapper_for(unwrap_buffered::<StringReader>),
    );
    strategies.insert(
        TypeId::of::<BufReader<Cursor<String>>>(),
        unwrapper_for(unwrap_buffered::<Cursor<String>>),
    );
    strategies.insert(
        TypeId::of::<BufReader<Cursor<Vec<u8>>>>(),
        unwrapper_for(unwrap_buffered::<Cursor<Vec<u8>>>),
    );
    strategies.insert(
        TypeId::of::<BufReader<Box<dyn CharReader>>>(),
        unwrapper_for(unwrap_buffered::<Box<dyn CharReader>>),
    );

    strategies
}

/// Entry point for duplicating a reader.
pub struct ReaderCloneFactory;

impl ReaderCloneFactory {
    /// Build a cloner able to hand out `copies` independent readers with the
    /// content of `reader`.
    ///
    /// A single copy never duplicates anything: the original is handed out
    /// once. Fails with [`ComboError::InvalidArgument`] when the input has to
    /// be drained and reading it fails or yields invalid UTF-8.
    pub fn cloner(reader: Box<dyn CharReader>, copies: usize) -> Result<Box<dyn ReaderCloner>> {
        if copies <= 1 {
            return Ok(Box::new(UseOnceCloner::new(reader)));
        }
        Self::resolve(reader)
    }

    /// Register a cloner for readers of type `R`, replacing any previous
    /// strategy for that type.
    pub fn bind_cloner<R, F>(build: F)
    where
        R: CharReader,
        F: Fn(R) -> Box<dyn ReaderCloner> + Send + Sync + 'static,
    {
        STRATEGIES
            .write()
            .insert(TypeId::of::<R>(), cloner_for(build));
    }

    /// Register an unwrapper for wrapper readers of type `R`.
    pub fn bind_unwrapper<R, F>(unwrap: F)
    where
        R: CharReader,
        F: Fn(R) -> Unwrapped + Send + Sync + 'static,
    {
        STRATEGIES
            .write()
            .insert(TypeId::of::<R>(), unwrapper_for(unwrap));
    }

    fn resolve(mut reader: Box<dyn CharReader>) -> Result<Box<dyn ReaderCloner>> {
        loop {
            let type_id = CharReader::as_any(&*reader).type_id();
            let strategy = STRATEGIES.read().get(&type_id).cloned();

            match strategy {
                Some(Strategy::Cloner(build)) => return build(reader),
                Some(Strategy::Unwrapper(unwrap)) => match unwrap(reader)? {
                    Unwrapped::Inner(inner) => reader = inner,
                    Unwrapped::Kept(wrapper) => return Self::fallback(wrapper),
                },
                Some(Strategy::Fallback) => return Self::fallback(reader),
                None => {
                    trace!(
                        target: "combo::reader",
                        type_id = ?type_id,
                        "no cloner bound for reader type, reading it to the end"
                    );
                    STRATEGIES.write().insert(type_id, Strategy::Fallback);
                    return Self::fallback(reader);
                }
            }
        }
    }

    fn fallback(reader: Box<dyn CharReader>) -> Result<Box<dyn ReaderCloner>> {
        Ok(Box::new(DefaultReaderCloner::new(reader)?))
    }
}

#[cfg(test)]
mod tests {
    use std::io::{self, Read};

    use super::*;

    fn read_all(mut reader: Box<dyn CharReader>) -> String {
        let mut text = String::new();
        reader.read_to_string(&mut text).unwrap();
        text
    }

    fn clone_n(reader: Box<dyn CharReader>, n: usize) -> Vec<String> {
        let mut cloner = ReaderCloneFactory::cloner(reader, n).unwrap();
        (0..n)
            .map(|_| read_all(cloner.give_a_clone().unwrap()))
            .collect()
    }

    #[test]
    fn test_single_copy_hands_out_original() {
        let mut cloner = ReaderCloneFactory::cloner(Box::new(StringReader::new("x")), 1).unwrap();

        let reader = cloner.give_a_clone().unwrap();
        assert!(CharReader::as_any(&*reader).is::<StringReader>());
        assert!(cloner.give_a_clone().is_err());
    }

    #[test]
    fn test_string_reader_is_not_copied() {
        let mut cloner =
            ReaderCloneFactory::cloner(Box::new(StringReader::new("shared text")), 3).unwrap();

        for _ in 0..3 {
            let reader = cloner.give_a_clone().unwrap();
            assert!(CharReader::as_any(&*reader).is::<StringReader>());
            assert_eq!(read_all(reader), "shared text");
        }
    }

    #[test]
    fn test_cursor_readers() {
        let copies = clone_n(Box::new(Cursor::new(String::from("from string"))), 3);
        assert!(copies.iter().all(|c| c == "from string"));

        let copies = clone_n(Box::new(Cursor::new(b"from bytes".to_vec())), 2);
        assert!(copies.iter().all(|c| c == "from bytes"));
    }

    #[test]
    fn test_unwrap_nested_wrappers() {
        let inner: Box<dyn CharReader> = Box::new(StringReader::new("wrapped"));
        let wrapped: Box<dyn CharReader> = Box::new(BufReader::new(inner));

        let mut cloner = ReaderCloneFactory::cloner(Box::new(wrapped), 2).unwrap();
        let first = cloner.give_a_clone().unwrap();
        assert!(CharReader::as_any(&*first).is::<StringReader>());
        assert_eq!(read_all(first), "wrapped");
        assert_eq!(read_all(cloner.give_a_clone().unwrap()), "wrapped");
    }

    #[test]
    fn test_buffered_reader_with_pending_data_is_drained() {
        let mut buffered = BufReader::with_capacity(4, StringReader::new("abcdefgh"));
        let mut first = [0u8; 2];
        buffered.read_exact(&mut first).unwrap();
        assert!(!buffered.buffer().is_empty());

        let copies = clone_n(Box::new(buffered), 2);
        assert_eq!(copies, vec!["cdefgh", "cdefgh"]);
    }

    #[test]
    fn test_unknown_reader_falls_back() {
        let copies = clone_n(Box::new(io::repeat(b'z').take(5)), 3);
        assert_eq!(copies, vec!["zzzzz", "zzzzz", "zzzzz"]);

        let type_id = TypeId::of::<io::Take<io::Repeat>>();
        assert!(matches!(
            STRATEGIES.read().get(&type_id),
            Some(Strategy::Fallback)
        ));
    }

    #[test]
    fn test_bind_custom_cloner() {
        struct Shouting(StringReader);

        impl Read for Shouting {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                self.0.read(buf)
            }
        }

        ReaderCloneFactory::bind_cloner(|r: Shouting| Box::new(StringReaderCloner::new(r.0)));

        let mut cloner =
            ReaderCloneFactory::cloner(Box::new(Shouting(StringReader::new("loud"))), 2).unwrap();
        let first = cloner.give_a_clone().unwrap();
        assert!(CharReader::as_any(&*first).is::<StringReader>());
        assert_eq!(read_all(first), "loud");
    }

    #[test]
    fn test_invalid_utf8_fails() {
        let result = ReaderCloneFactory::cloner(Box::new(io::Cursor::new([0xffu8, 0xfe])), 2);
        assert!(matches!(result, Err(ComboError::InvalidArgument(_))));
    }
}
