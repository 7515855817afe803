//! # combo-analysis
//!
//! Combine several text analyzers into a single, position-ordered token
//! stream.
//!
//! ## Features
//!
//! - K-way merge of any number of sub-analyzers by position and offsets
//! - Input duplication that avoids copying in-memory readers
//! - Optional caching of sub-analyzer output and duplicate removal
//! - Producer reuse across invocations through an explicit context
//! - Tokenizers, filters and analyzers to build sub-analyzers from

pub mod analysis;
pub mod cli;
pub mod error;

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
