//! Error types for the regression harness

use ceql_query::CompileError;
use std::io;
use thiserror::Error;

/// Harness error type
#[derive(Debug, Error)]
pub enum HarnessError {
    /// IO error reading a sample or binding file
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Sample file could not be read as tab-separated records
    #[error("Sample file error: {0}")]
    Csv(#[from] csv::Error),

    /// A sample line has the wrong shape
    #[error("Malformed sample on line {line}: {message}")]
    MalformedSample {
        /// 1-based line number
        line: u64,
        /// What was wrong
        message: String,
    },

    /// Binding file is not valid TOML
    #[error("Binding file error: {0}")]
    BindingFile(#[from] toml::de::Error),

    /// Binding or option rejected by the compiler
    #[error("Invalid binding: {0}")]
    Binding(#[from] CompileError),
}

/// Result type for harness operations
pub type HarnessResult<T> = Result<T, HarnessError>;

impl HarnessError {
    /// Create a malformed-sample error
    pub fn malformed(line: u64, message: impl Into<String>) -> Self {
        Self::MalformedSample {
            line,
            message: message.into(),
        }
    }
}
