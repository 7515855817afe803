//! Settings of a combo analyzer as they appear in configuration files.

use serde::{Deserialize, Serialize};

use crate::error::{ComboError, Result};

fn default_reuse() -> bool {
    true
}

/// Configuration for a [`ComboAnalyzer`](super::ComboAnalyzer).
///
/// ```
/// use combo_analysis::analysis::combo::ComboAnalyzerConfig;
///
/// let config = ComboAnalyzerConfig::from_json(
///     r#"{"sub_analyzers": ["whitespace", "keyword"], "deduplication": true}"#,
/// )
/// .unwrap();
///
/// assert_eq!(config.sub_analyzers, vec!["whitespace", "keyword"]);
/// assert!(config.deduplication);
/// assert!(!config.tokenstream_caching);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboAnalyzerConfig {
    /// Names of the analyzers to merge, in slot order.
    pub sub_analyzers: Vec<String>,

    /// Cache every sub-analyzer's tokens before merging (default: false).
    /// Sub-analyzers listed more than once are cached regardless.
    #[serde(default)]
    pub tokenstream_caching: bool,

    /// Drop same-text tokens at the same position (default: false).
    #[serde(default)]
    pub deduplication: bool,

    /// Reuse producers across invocations within one context (default: true).
    #[serde(default = "default_reuse")]
    pub tokenstream_reuse: bool,
}

impl ComboAnalyzerConfig {
    pub fn new<I, S>(sub_analyzers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ComboAnalyzerConfig {
            sub_analyzers: sub_analyzers.into_iter().map(Into::into).collect(),
            tokenstream_caching: false,
            deduplication: false,
            tokenstream_reuse: true,
        }
    }

    pub fn with_caching(mut self, enabled: bool) -> Self {
        self.tokenstream_caching = enabled;
        self
    }

    pub fn with_deduplication(mut self, enabled: bool) -> Self {
        self.deduplication = enabled;
        self
    }

    pub fn with_reuse(mut self, enabled: bool) -> Self {
        self.tokenstream_reuse = enabled;
        self
    }

    /// Parse a configuration from JSON.
    ///
    /// A missing or malformed `sub_analyzers` list is a configuration error.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            ComboError::invalid_config(format!(
                "combo analyzers must have a \"sub_analyzers\" list property: {e}"
            ))
        })
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
