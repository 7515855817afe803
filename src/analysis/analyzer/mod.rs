//! Analyzer implementations that combine tokenizers and filters.

pub mod analyzer;
pub mod keyword;
pub mod language;
pub mod pipeline;
pub mod registry;
pub mod simple;
pub mod standard;

pub use analyzer::Analyzer;
pub use keyword::KeywordAnalyzer;
pub use language::english::EnglishAnalyzer;
pub use pipeline::PipelineAnalyzer;
pub use registry::AnalyzerRegistry;
pub use simple::SimpleAnalyzer;
pub use standard::StandardAnalyzer;
