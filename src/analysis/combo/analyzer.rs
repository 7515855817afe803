//! Analyzer merging the output of several sub-analyzers.
//!
//! Every invocation duplicates the input once per sub-analyzer, opens one
//! producer per sub-analyzer and merges them with a [`ComboTokenProducer`],
//! optionally followed by a [`UniqueTokenProducer`].
//!
//! # Duplicate sub-analyzers
//!
//! The same analyzer instance may be listed several times. Such duplicates
//! are detected by identity when the combo analyzer is built; only their
//! first occurrence in an invocation may use a reusable producer, and every
//! occurrence is cached before merging so the occurrences never share
//! consumption state.
//!
//! # Reuse
//!
//! Through [`Analyzer::reusable_token_producer`] the combo analyzer keeps,
//! per [`AnalysisContext`], the producers it merged last time. When every
//! sub-analyzer hands back the very same reusable producer, the previous
//! merge is returned again instead of building a new one.
//!
//! Each slot asks its sub-analyzer for a reusable producer in its own
//! [`AnalysisContext::scope`], keyed by this analyzer and the slot index. A
//! sub-analyzer that also appears inside a nested combo analyzer therefore
//! hands a distinct producer to every merge it feeds.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use combo_analysis::analysis::analyzer::{Analyzer, KeywordAnalyzer, SimpleAnalyzer};
//! use combo_analysis::analysis::combo::ComboAnalyzer;
//!
//! let combo = ComboAnalyzer::new(vec![
//!     Arc::new(SimpleAnalyzer::whitespace()),
//!     Arc::new(KeywordAnalyzer::new()),
//! ]);
//!
//! let tokens: Vec<_> = combo.analyze("just a test").unwrap().collect();
//! let texts: Vec<_> = tokens.iter().map(|t| t.text.as_str()).collect();
//! assert_eq!(texts, vec!["just", "just a test", "a", "test"]);
//! assert_eq!(tokens[1].position_increment, 0);
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use ahash::AHashSet;
use rayon::prelude::*;
use tracing::{debug, trace, warn};

use crate::analysis::analyzer::{Analyzer, AnalyzerRegistry};
use crate::analysis::combo::config::ComboAnalyzerConfig;
use crate::analysis::combo::stream::ComboTokenProducer;
use crate::analysis::context::{AnalysisContext, AnalyzerId};
use crate::analysis::producer::{
    BoxTokenProducer, CachingTokenProducer, SharedTokenProducer, TokenProducer,
    UniqueTokenProducer, drain,
};
use crate::analysis::reader::{CharReader, ReaderCloneFactory, StringReader};
use crate::analysis::token::Token;
use crate::error::Result;

/// Producer opened for one slot of one invocation.
enum SlotInput {
    Reusable(SharedTokenProducer),
    Fresh(BoxTokenProducer),
}

impl SlotInput {
    fn into_producer(self) -> BoxTokenProducer {
        match self {
            SlotInput::Reusable(shared) => Box::new(shared),
            SlotInput::Fresh(producer) => producer,
        }
    }
}

/// What a slot held on the previous invocation.
#[derive(Clone)]
enum SlotHandle {
    Absent,
    Reusable(SharedTokenProducer),
    Fresh,
}

/// Reuse state kept in an [`AnalysisContext`] between invocations.
#[derive(Clone)]
struct ComboReuseState {
    slots: Vec<SlotHandle>,
    output: SharedTokenProducer,
}

impl ComboReuseState {
    fn matches(&self, inputs: &[Option<SlotInput>]) -> bool {
        self.slots.len() == inputs.len()
            && self
                .slots
                .iter()
                .zip(inputs)
                .all(|(previous, current)| match (previous, current) {
                    (SlotHandle::Absent, None) => true,
                    (SlotHandle::Reusable(previous), Some(SlotInput::Reusable(current))) => {
                        previous.ptr_eq(current)
                    }
                    _ => false,
                })
    }
}

/// Data-pointer address identifying one analyzer instance.
fn identity(analyzer: &Arc<dyn Analyzer>) -> usize {
    Arc::as_ptr(analyzer) as *const () as usize
}

/// An analyzer whose output is the position-ordered merge of its
/// sub-analyzers' outputs.
pub struct ComboAnalyzer {
    id: AnalyzerId,
    analyzers: Vec<Option<Arc<dyn Analyzer>>>,
    duplicates: AHashSet<usize>,
    caching: bool,
    deduplication: bool,
    reuse: bool,
}

impl ComboAnalyzer {
    /// Merge the given analyzers, in order.
    pub fn new(analyzers: Vec<Arc<dyn Analyzer>>) -> Self {
        Self::with_slots(analyzers.into_iter().map(Some).collect())
    }

    /// Merge the given slots; `None` slots never produce tokens.
    pub fn with_slots(analyzers: Vec<Option<Arc<dyn Analyzer>>>) -> Self {
        let mut seen = AHashSet::new();
        let duplicates = analyzers
            .iter()
            .flatten()
            .map(identity)
            .filter(|key| !seen.insert(*key))
            .collect();

        ComboAnalyzer {
            id: AnalyzerId::next(),
            analyzers,
            duplicates,
            caching: false,
            deduplication: false,
            reuse: true,
        }
    }

    /// Build a combo analyzer from configuration, resolving sub-analyzer
    /// names in `registry`. Unknown names are logged and leave their slot
    /// empty.
    pub fn from_config(config: &ComboAnalyzerConfig, registry: &AnalyzerRegistry) -> Self {
        let slots = config
            .sub_analyzers
            .iter()
            .map(|name| {
                let analyzer = registry.get(name);
                if analyzer.is_none() {
                    warn!(target: "combo::analyzer", sub_analyzer = %name, "sub-analyzer not found");
                }
                analyzer
            })
            .collect();

        Self::with_slots(slots)
            .with_caching(config.tokenstream_caching)
            .with_deduplication(config.deduplication)
            .with_reuse(config.tokenstream_reuse)
    }

    /// Cache every sub-analyzer's tokens before merging.
    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.caching = enabled;
        self
    }

    /// Remove same-text tokens at the same position from the merged output.
    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplication = enabled;
        self
    }

    /// Reuse producers across invocations within one context.
    pub fn with_reuse(mut self, enabled: bool) -> Self {
        self.reuse = enabled;
        self
    }

    pub fn caching_enabled(&self) -> bool {
        self.caching
    }

    pub fn deduplication_enabled(&self) -> bool {
        self.deduplication
    }

    pub fn reuse_enabled(&self) -> bool {
        self.reuse
    }

    pub fn id(&self) -> AnalyzerId {
        self.id
    }

    /// The configured slots, empty ones included.
    pub fn analyzers(&self) -> &[Option<Arc<dyn Analyzer>>] {
        &self.analyzers
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Whether `analyzer` appears in more than one slot.
    pub fn is_duplicate(&self, analyzer: &Arc<dyn Analyzer>) -> bool {
        self.duplicates.contains(&identity(analyzer))
    }

    /// Analyze `text` through the reusable path of `ctx` and collect the
    /// merged tokens.
    pub fn analyze_field(
        &self,
        ctx: &mut AnalysisContext,
        field: &str,
        text: &str,
    ) -> Result<Vec<Token>> {
        let mut producer =
            self.reusable_token_producer(ctx, field, Box::new(StringReader::new(text)))?;
        let tokens = drain(&mut producer);
        let closed = producer.close();
        let tokens = tokens?;
        closed?;
        Ok(tokens)
    }

    /// Analyze many texts in parallel, one [`AnalysisContext`] per worker.
    pub fn analyze_batch<S>(&self, field: &str, texts: &[S]) -> Result<Vec<Vec<Token>>>
    where
        S: AsRef<str> + Sync,
    {
        texts
            .par_iter()
            .map_init(AnalysisContext::new, |ctx, text| {
                self.analyze_field(ctx, field, text.as_ref())
            })
            .collect()
    }

    fn open_slots(
        &self,
        mut ctx: Option<&mut AnalysisContext>,
        field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<Vec<Option<SlotInput>>> {
        let present = self.analyzers.iter().flatten().count();
        let mut cloner = ReaderCloneFactory::cloner(reader, present)?;
        let mut used = AHashSet::with_capacity(present);
        let mut inputs = Vec::with_capacity(self.analyzers.len());

        for (slot, analyzer) in self.analyzers.iter().enumerate() {
            let Some(analyzer) = analyzer else {
                inputs.push(None);
                continue;
            };
            let key = identity(analyzer);
            let duplicate = self.duplicates.contains(&key);
            let first_use = used.insert(key);
            let reader = cloner.give_a_clone()?;

            let reusable = self.reuse && analyzer.supports_reuse() && first_use;
            let opened = match ctx.as_deref_mut() {
                Some(ctx) if reusable => analyzer
                    .reusable_token_producer(ctx.scope(self.id, slot), field, reader)
                    .map(SlotInput::Reusable),
                _ => analyzer.token_producer(field, reader).map(SlotInput::Fresh),
            };
            let input = match opened {
                Ok(input) => input,
                Err(e) => {
                    debug!(
                        target: "combo::analyzer",
                        slot,
                        sub_analyzer = analyzer.name(),
                        error = %e,
                        "sub-analyzer could not open a token producer"
                    );
                    inputs.push(None);
                    continue;
                }
            };

            if self.caching || duplicate {
                inputs.push(Some(SlotInput::Fresh(Box::new(fill_cache(input)?))));
            } else {
                inputs.push(Some(input));
            }
        }

        Ok(inputs)
    }

    fn merge(&self, inputs: Vec<Option<SlotInput>>) -> BoxTokenProducer {
        let combo = ComboTokenProducer::new(
            inputs
                .into_iter()
                .map(|input| input.map(SlotInput::into_producer))
                .collect(),
        );
        if self.deduplication {
            Box::new(UniqueTokenProducer::new(Box::new(combo)))
        } else {
            Box::new(combo)
        }
    }
}

fn fill_cache(input: SlotInput) -> Result<CachingTokenProducer> {
    let mut cached = CachingTokenProducer::new(input.into_producer());
    cached.reset()?;
    cached.fill_cache()?;
    Ok(cached)
}

impl Analyzer for ComboAnalyzer {
    fn token_producer(&self, field: &str, reader: Box<dyn CharReader>) -> Result<BoxTokenProducer> {
        let inputs = self.open_slots(None, field, reader)?;
        Ok(self.merge(inputs))
    }

    fn reusable_token_producer(
        &self,
        ctx: &mut AnalysisContext,
        field: &str,
        reader: Box<dyn CharReader>,
    ) -> Result<SharedTokenProducer> {
        if !self.reuse {
            return Ok(SharedTokenProducer::new(self.token_producer(field, reader)?));
        }

        let previous = ctx.take::<ComboReuseState>(self.id);
        let inputs = self.open_slots(Some(&mut *ctx), field, reader)?;

        if let Some(state) = previous.filter(|state| state.matches(&inputs)) {
            trace!(target: "combo::analyzer", id = self.id.value(), "reusing previous merge");
            let output = state.output.clone();
            ctx.insert(self.id, state);
            return Ok(output);
        }

        let slots = inputs
            .iter()
            .map(|input| match input {
                None => SlotHandle::Absent,
                Some(SlotInput::Reusable(shared)) => SlotHandle::Reusable(shared.clone()),
                Some(SlotInput::Fresh(_)) => SlotHandle::Fresh,
            })
            .collect();
        let output = SharedTokenProducer::new(self.merge(inputs));
        ctx.insert(
            self.id,
            ComboReuseState {
                slots,
                output: output.clone(),
            },
        );
        Ok(output)
    }

    fn supports_reuse(&self) -> bool {
        self.reuse
    }

    fn name(&self) -> &'static str {
        "combo"
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl fmt::Debug for ComboAnalyzer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComboAnalyzer")
            .field(
                "analyzers",
                &self
                    .analyzers
                    .iter()
                    .map(|a| a.as_ref().map(|a| a.name()))
                    .collect::<Vec<_>>(),
            )
            .field("duplicates", &self.duplicates.len())
            .field("caching", &self.caching)
            .field("deduplication", &self.deduplication)
            .field("reuse", &self.reuse)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::analysis::analyzer::{KeywordAnalyzer, SimpleAnalyzer};
    use crate::error::ComboError;

    /// Analyzer that can never open a producer.
    #[derive(Debug)]
    struct BrokenAnalyzer;

    impl Analyzer for BrokenAnalyzer {
        fn token_producer(
            &self,
            _field: &str,
            _reader: Box<dyn CharReader>,
        ) -> Result<BoxTokenProducer> {
            Err(ComboError::analysis("broken"))
        }

        fn name(&self) -> &'static str {
            "broken"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    /// Analyzer whose producers fail on reset and on close.
    #[derive(Debug)]
    struct FailingLifecycleAnalyzer;

    struct FailingLifecycleProducer {
        current: Token,
    }

    impl TokenProducer for FailingLifecycleProducer {
        fn reset(&mut self) -> Result<()> {
            Err(ComboError::analysis("reset failed"))
        }

        fn advance(&mut self) -> Result<bool> {
            Ok(false)
        }

        fn token(&self) -> &Token {
            &self.current
        }

        fn end(&mut self) -> Result<()> {
            Ok(())
        }

        fn final_offset(&self) -> usize {
            0
        }

        fn close(&mut self) -> Result<()> {
            Err(ComboError::other("close failed"))
        }

        fn name(&self) -> &'static str {
            "failing"
        }
    }

    impl Analyzer for FailingLifecycleAnalyzer {
        fn token_producer(
            &self,
            _field: &str,
            _reader: Box<dyn CharReader>,
        ) -> Result<BoxTokenProducer> {
            Ok(Box::new(FailingLifecycleProducer {
                current: Token::default(),
            }))
        }

        fn name(&self) -> &'static str {
            "failing"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }
    }

    fn texts(tokens: &[Token]) -> Vec<(&str, usize)> {
        tokens
            .iter()
            .map(|t| (t.text.as_str(), t.position_increment))
            .collect()
    }

    #[test]
    fn test_duplicate_detection() {
        let whitespace: Arc<dyn Analyzer> = Arc::new(SimpleAnalyzer::whitespace());
        let keyword: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
        let combo = ComboAnalyzer::new(vec![
            Arc::clone(&whitespace),
            Arc::clone(&keyword),
            Arc::clone(&whitespace),
        ]);

        assert!(combo.is_duplicate(&whitespace));
        assert!(!combo.is_duplicate(&keyword));
        assert_eq!(combo.len(), 3);
    }

    #[test]
    fn test_failed_slot_is_skipped() {
        let combo = ComboAnalyzer::new(vec![
            Arc::new(BrokenAnalyzer),
            Arc::new(SimpleAnalyzer::whitespace()),
        ]);

        let tokens: Vec<Token> = combo.analyze("a b").unwrap().collect();
        assert_eq!(texts(&tokens), vec![("a", 1), ("b", 1)]);
    }

    #[test]
    fn test_duplication_failure_is_reported() {
        let combo = ComboAnalyzer::new(vec![
            Arc::new(SimpleAnalyzer::whitespace()),
            Arc::new(KeywordAnalyzer::new()),
        ]);

        let result = combo.token_producer("f", Box::new(io::Cursor::new([0xffu8, 0x00])));
        assert!(matches!(result, Err(ComboError::InvalidArgument(_))));
    }

    #[test]
    fn test_reuse_returns_previous_merge() {
        let combo = ComboAnalyzer::new(vec![
            Arc::new(SimpleAnalyzer::whitespace()),
            Arc::new(KeywordAnalyzer::new()),
        ]);
        let mut ctx = AnalysisContext::new();

        let first = combo
            .reusable_token_producer(&mut ctx, "f", Box::new(StringReader::new("a b")))
            .unwrap();
        let second = combo
            .reusable_token_producer(&mut ctx, "f", Box::new(StringReader::new("c")))
            .unwrap();
        assert!(first.ptr_eq(&second));

        let tokens = combo.analyze_field(&mut ctx, "f", "x y").unwrap();
        assert_eq!(texts(&tokens), vec![("x", 1), ("x y", 0), ("y", 1)]);
    }

    #[test]
    fn test_caching_disables_merge_reuse() {
        let combo =
            ComboAnalyzer::new(vec![Arc::new(SimpleAnalyzer::whitespace())]).with_caching(true);
        let mut ctx = AnalysisContext::new();

        let first = combo
            .reusable_token_producer(&mut ctx, "f", Box::new(StringReader::new("a")))
            .unwrap();
        let second = combo
            .reusable_token_producer(&mut ctx, "f", Box::new(StringReader::new("b")))
            .unwrap();
        assert!(!first.ptr_eq(&second));
    }

    #[test]
    fn test_without_reuse() {
        let combo = ComboAnalyzer::new(vec![Arc::new(KeywordAnalyzer::new())]).with_reuse(false);
        let mut ctx = AnalysisContext::new();

        assert!(!combo.supports_reuse());
        let tokens = combo.analyze_field(&mut ctx, "f", "whole").unwrap();
        assert_eq!(texts(&tokens), vec![("whole", 1)]);
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_analyze_batch() {
        let combo = ComboAnalyzer::new(vec![
            Arc::new(SimpleAnalyzer::whitespace()),
            Arc::new(KeywordAnalyzer::new()),
        ])
        .with_deduplication(true);

        let inputs = vec!["one", "two words", "one"];
        let outputs = combo.analyze_batch("f", &inputs).unwrap();

        assert_eq!(outputs.len(), 3);
        assert_eq!(texts(&outputs[0]), vec![("one", 1)]);
        assert_eq!(
            texts(&outputs[1]),
            vec![("two", 1), ("two words", 0), ("words", 1)]
        );
        assert_eq!(outputs[0], outputs[2]);
    }

    #[test]
    fn test_analyze_field_reports_the_analysis_error() {
        let combo = ComboAnalyzer::new(vec![Arc::new(FailingLifecycleAnalyzer)]);
        let mut ctx = AnalysisContext::new();

        match combo.analyze_field(&mut ctx, "f", "text") {
            Err(ComboError::Analysis(message)) => assert_eq!(message, "reset failed"),
            other => panic!("expected the reset error, got {other:?}"),
        }
    }

    #[test]
    fn test_slots_reuse_in_their_own_scope() {
        let keyword: Arc<dyn Analyzer> = Arc::new(KeywordAnalyzer::new());
        let inner: Arc<dyn Analyzer> = Arc::new(ComboAnalyzer::new(vec![
            Arc::new(SimpleAnalyzer::whitespace()),
            Arc::clone(&keyword),
        ]));
        let outer = ComboAnalyzer::new(vec![inner, Arc::clone(&keyword)]);
        let mut ctx = AnalysisContext::new();

        for text in ["x y", "p q"] {
            let tokens = outer.analyze_field(&mut ctx, "f", text).unwrap();
            let fresh: Vec<Token> = outer.analyze(text).unwrap().collect();
            assert_eq!(tokens, fresh);
            assert_eq!(tokens.iter().filter(|t| t.text == text).count(), 2);
        }
        assert_eq!(ctx.len(), 1);
    }
}
