//! Error types for the combo analysis library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`ComboError`] enum. Sub-analyzer failures surface through the same type so
//! a merged token stream reports exactly what its producers reported.
//!
//! # Examples
//!
//! ```
//! use combo_analysis::error::{ComboError, Result};
//!
//! fn example_operation() -> Result<()> {
//!     Err(ComboError::invalid_argument("Invalid input"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use std::io;

use thiserror::Error;

/// The main error type for combo analysis operations.
#[derive(Error, Debug)]
pub enum ComboError {
    /// I/O errors raised while reading analyzer input.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Analysis-related errors (tokenization, filtering, merging).
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Illegal analyzer configuration.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Illegal argument, such as an input that cannot be duplicated.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation not valid in the current lifecycle state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with ComboError.
pub type Result<T> = std::result::Result<T, ComboError>;

impl ComboError {
    /// Create a new analysis error.
    pub fn analysis<S: Into<String>>(msg: S) -> Self {
        ComboError::Analysis(msg.into())
    }

    /// Create a new invalid config error.
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        ComboError::InvalidConfig(msg.into())
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        ComboError::InvalidArgument(msg.into())
    }

    /// Create a new invalid operation error.
    pub fn invalid_operation<S: Into<String>>(msg: S) -> Self {
        ComboError::InvalidOperation(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        ComboError::Other(msg.into())
    }
}
