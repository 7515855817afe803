//! Combining several analyzers into one token stream.
//!
//! A [`ComboAnalyzer`] feeds the same input to each of its sub-analyzers and
//! merges their token streams by position with a [`ComboTokenProducer`].
//! Tokens produced at the same position by different sub-analyzers come out
//! next to each other, the later ones with a position increment of 0, so the
//! merged stream can be indexed as if a single analyzer produced it.
//!
//! ```text
//! Input: "just a little test"
//!
//!   whitespace: just  a  little  test
//!   keyword:    "just a little test"
//!
//!   merged:     just(+1) "just a little test"(+0) a(+1) little(+1) test(+1)
//! ```
//!
//! Sub-analyzers are configured by name through [`ComboAnalyzerConfig`] and
//! resolved in an [`AnalyzerRegistry`](crate::analysis::analyzer::AnalyzerRegistry).

pub mod analyzer;
pub mod config;
pub mod stream;

pub use analyzer::ComboAnalyzer;
pub use config::ComboAnalyzerConfig;
pub use stream::ComboTokenProducer;
