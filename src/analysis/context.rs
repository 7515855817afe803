//! Per-execution-context storage for reusable analysis state.
//!
//! Analyzers are shared between threads and hold only immutable settings.
//! Whatever they keep from one invocation to the next (reusable producers,
//! the last merge a combo analyzer built) lives in an [`AnalysisContext`]
//! owned by the caller, one per worker, keyed by the analyzer's
//! [`AnalyzerId`].
//!
//! A context also holds nested scopes, one per (owner, slot) pair. An
//! analyzer that feeds sub-analyzers hands each of its slots its own scope,
//! so a sub-analyzer shared by several owners never gives the same reusable
//! producer to two live merges.

use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};

use ahash::AHashMap;

static NEXT_ANALYZER_ID: AtomicU64 = AtomicU64::new(1);

/// Identity of one analyzer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnalyzerId(u64);

impl AnalyzerId {
    /// Allocate an id no other analyzer in this process has.
    pub fn next() -> Self {
        AnalyzerId(NEXT_ANALYZER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Reuse state for the analyzers used by one worker.
#[derive(Default)]
pub struct AnalysisContext {
    entries: AHashMap<AnalyzerId, Box<dyn Any + Send>>,
    scopes: AHashMap<(AnalyzerId, usize), AnalysisContext>,
}

impl AnalysisContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return the state stored for `id`, if it has type `T`.
    pub fn take<T: Any>(&mut self, id: AnalyzerId) -> Option<T> {
        let entry = self.entries.remove(&id)?;
        match entry.downcast::<T>() {
            Ok(value) => Some(*value),
            Err(other) => {
                self.entries.insert(id, other);
                None
            }
        }
    }

    pub fn get_mut<T: Any>(&mut self, id: AnalyzerId) -> Option<&mut T> {
        self.entries.get_mut(&id)?.downcast_mut::<T>()
    }

    /// Store state for `id`, replacing what was there.
    pub fn insert<T: Any + Send>(&mut self, id: AnalyzerId, value: T) {
        self.entries.insert(id, Box::new(value));
    }

    pub fn remove(&mut self, id: AnalyzerId) {
        self.entries.remove(&id);
    }

    /// The nested context for slot `slot` of analyzer `owner`, created on
    /// first use.
    pub fn scope(&mut self, owner: AnalyzerId, slot: usize) -> &mut AnalysisContext {
        self.scopes.entry((owner, slot)).or_default()
    }

    /// Number of entries stored directly in this context, nested scopes
    /// excluded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether neither entries nor nested scopes are stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty() && self.scopes.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.scopes.clear();
    }
}

impl std::fmt::Debug for AnalysisContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AnalysisContext")
            .field("entries", &self.entries.len())
            .field("scopes", &self.scopes.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_are_unique() {
        let a = AnalyzerId::next();
        let b = AnalyzerId::next();
        assert_ne!(a, b);
        assert!(b.value() > a.value());
    }

    #[test]
    fn test_take_and_insert() {
        let id = AnalyzerId::next();
        let mut ctx = AnalysisContext::new();
        assert!(ctx.take::<String>(id).is_none());

        ctx.insert(id, String::from("state"));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.take::<u32>(id).is_none());
        assert_eq!(ctx.len(), 1);

        ctx.get_mut::<String>(id).unwrap().push('!');
        assert_eq!(ctx.take::<String>(id).as_deref(), Some("state!"));
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_scopes_are_separate() {
        let owner = AnalyzerId::next();
        let shared = AnalyzerId::next();
        let mut ctx = AnalysisContext::new();

        ctx.scope(owner, 0).insert(shared, 1u32);
        ctx.scope(owner, 1).insert(shared, 2u32);
        ctx.insert(shared, 3u32);

        assert_eq!(ctx.scope(owner, 0).take::<u32>(shared), Some(1));
        assert_eq!(ctx.scope(owner, 1).take::<u32>(shared), Some(2));
        assert_eq!(ctx.take::<u32>(shared), Some(3));
        assert_eq!(ctx.len(), 0);
        assert!(!ctx.is_empty());

        ctx.clear();
        assert!(ctx.is_empty());
    }
}
