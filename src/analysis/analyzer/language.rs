//! Language-specific analyzers.
//!
//! # Examples
//!
//! ```
//! use combo_analysis::analysis::analyzer::analyzer::Analyzer;
//! use combo_analysis::analysis::analyzer::language::english::EnglishAnalyzer;
//!
//! let analyzer = EnglishAnalyzer::new().unwrap();
//! let tokens: Vec<_> = analyzer.analyze("Running the tests").unwrap().collect();
//!
//! assert_eq!(tokens.len(), 2);
//! assert_eq!(tokens[0].text, "run");
//! ```

pub mod english;
