//! Name-based lookup of analyzers.
//!
//! Combo analyzer configurations refer to their sub-analyzers by name; the
//! registry resolves those names to shared analyzer instances. Resolving the
//! same name twice yields the same instance, which is what makes duplicate
//! detection in [`ComboAnalyzer`] meaningful.
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::analyzer::AnalyzerRegistry;
//! use combo_analysis::analysis::combo::ComboAnalyzerConfig;
//!
//! let mut registry = AnalyzerRegistry::with_defaults().unwrap();
//! let config = ComboAnalyzerConfig::new(vec!["whitespace", "keyword"]);
//! let combo = registry.register_combo("combo", &config);
//!
//! assert_eq!(combo.len(), 2);
//! assert!(registry.get("combo").is_some());
//! ```

use std::fmt;
use std::sync::Arc;

use ahash::AHashMap;
use tracing::debug;

use crate::analysis::analyzer::{
    Analyzer, EnglishAnalyzer, KeywordAnalyzer, PipelineAnalyzer, SimpleAnalyzer,
    StandardAnalyzer,
};
use crate::analysis::combo::{ComboAnalyzer, ComboAnalyzerConfig};
use crate::analysis::token_filter::StemFilter;
use crate::analysis::tokenizer::{RegexTokenizer, WhitespaceTokenizer};
use crate::error::Result;

/// Registry of named analyzers.
#[derive(Clone, Default)]
pub struct AnalyzerRegistry {
    analyzers: AHashMap<String, Arc<dyn Analyzer>>,
}

impl AnalyzerRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in analyzers:
    ///
    /// - `whitespace` - whitespace split, no filtering
    /// - `keyword` - the whole input as one token
    /// - `simple` - regex word split, no filtering
    /// - `standard` - regex words, lowercased, stop words removed
    /// - `english` - `standard` plus Porter stemming
    /// - `stemmer` - whitespace split with a light suffix stemmer
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        registry.register("whitespace", Arc::new(SimpleAnalyzer::whitespace()));
        registry.register("keyword", Arc::new(KeywordAnalyzer::new()));
        registry.register(
            "simple",
            Arc::new(SimpleAnalyzer::new(Arc::new(RegexTokenizer::new()?))),
        );
        registry.register("standard", Arc::new(StandardAnalyzer::new()?));
        registry.register("english", Arc::new(EnglishAnalyzer::new()?));
        registry.register(
            "stemmer",
            Arc::new(
                PipelineAnalyzer::new(Arc::new(WhitespaceTokenizer::new()))
                    .add_filter(Arc::new(StemFilter::simple()))
                    .with_name("stemmer"),
            ),
        );
        Ok(registry)
    }

    /// Register `analyzer` under `name`, returning the analyzer it replaces.
    pub fn register<S: Into<String>>(
        &mut self,
        name: S,
        analyzer: Arc<dyn Analyzer>,
    ) -> Option<Arc<dyn Analyzer>> {
        let name = name.into();
        debug!(target: "combo::registry", name = %name, kind = analyzer.name(), "registering analyzer");
        self.analyzers.insert(name, analyzer)
    }

    /// Look up an analyzer by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Analyzer>> {
        self.analyzers.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.analyzers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.analyzers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.analyzers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.analyzers.is_empty()
    }

    /// Build a combo analyzer from `config`, resolving its sub-analyzers in
    /// this registry, and register it under `name`.
    pub fn register_combo<S: Into<String>>(
        &mut self,
        name: S,
        config: &ComboAnalyzerConfig,
    ) -> Arc<ComboAnalyzer> {
        let combo = Arc::new(ComboAnalyzer::from_config(config, self));
        self.register(name, Arc::clone(&combo) as Arc<dyn Analyzer>);
        combo
    }
}

impl fmt::Debug for AnalyzerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalyzerRegistry")
            .field("analyzers", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_analyzers() {
        let registry = AnalyzerRegistry::with_defaults().unwrap();

        assert_eq!(
            registry.names(),
            vec!["english", "keyword", "simple", "standard", "stemmer", "whitespace"]
        );
        assert_eq!(registry.get("keyword").unwrap().name(), "keyword");
        assert!(registry.get("missing").is_none());
    }

    #[test]
    fn test_same_name_same_instance() {
        let registry = AnalyzerRegistry::with_defaults().unwrap();

        let a = registry.get("whitespace").unwrap();
        let b = registry.get("whitespace").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_stemmer_analyzer() {
        let registry = AnalyzerRegistry::with_defaults().unwrap();
        let stemmer = registry.get("stemmer").unwrap();

        let texts: Vec<_> = stemmer
            .analyze("tests just a little")
            .unwrap()
            .map(|t| t.text)
            .collect();
        assert_eq!(texts, vec!["test", "just", "a", "little"]);
    }

    #[test]
    fn test_register_replaces() {
        let mut registry = AnalyzerRegistry::new();
        assert!(registry.is_empty());

        assert!(registry.register("a", Arc::new(KeywordAnalyzer::new())).is_none());
        assert!(registry.register("a", Arc::new(KeywordAnalyzer::new())).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("a"));
    }
}
