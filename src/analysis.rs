//! Text analysis module for combo-analysis.
//!
//! This module provides the analysis building blocks (tokenizers, token
//! filters, analyzers and token producers) together with the combo analyzer
//! that merges several analyzers into a single token stream.

pub mod analyzer;
pub mod combo;
pub mod context;
pub mod producer;
pub mod reader;
pub mod token;
pub mod token_filter;
pub mod tokenizer;
