//! Compile error and diagnostic types.

use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Which compile stage rejected the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiagnosticKind {
    /// Unrecognized character, unbalanced brace
    Lex,
    /// Unexpected token, missing term, misplaced wildcard or tag
    Syntax,
    /// Query needs an annotation layer that is not bound, or a bad option
    Config,
    /// Structural scope name not permitted
    Scope,
    /// Generated output failed the well-formedness check
    Render,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Lex => "lex error",
            Self::Syntax => "syntax error",
            Self::Config => "configuration error",
            Self::Scope => "scope error",
            Self::Render => "render error",
        };
        f.write_str(name)
    }
}

/// A human-readable message produced by a failed compile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
    /// Byte offset into the query, when the failure has one
    pub position: Option<usize>,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.position {
            Some(pos) => write!(f, "{} at byte {}: {}", self.kind, pos, self.message),
            None => write!(f, "{}: {}", self.kind, self.message),
        }
    }
}

/// Error raised by any stage of the compiler.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{message}")]
    Lex { message: String, position: usize },

    #[error("{message}")]
    Syntax { message: String, position: usize },

    #[error("{message}")]
    Config {
        message: String,
        position: Option<usize>,
    },

    #[error("{message}")]
    Scope { message: String },

    #[error("{message}")]
    Render { message: String },
}

/// Result type for compiler operations
pub type CompileResult<T> = Result<T, CompileError>;

impl CompileError {
    pub fn lex(message: impl Into<String>, position: usize) -> Self {
        Self::Lex {
            message: message.into(),
            position,
        }
    }

    pub fn syntax(message: impl Into<String>, position: usize) -> Self {
        Self::Syntax {
            message: message.into(),
            position,
        }
    }

    /// Configuration error not tied to a place in the query
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            position: None,
        }
    }

    pub fn scope(message: impl Into<String>) -> Self {
        Self::Scope {
            message: message.into(),
        }
    }

    pub fn render(message: impl Into<String>) -> Self {
        Self::Render {
            message: message.into(),
        }
    }

    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Self::Lex { .. } => DiagnosticKind::Lex,
            Self::Syntax { .. } => DiagnosticKind::Syntax,
            Self::Config { .. } => DiagnosticKind::Config,
            Self::Scope { .. } => DiagnosticKind::Scope,
            Self::Render { .. } => DiagnosticKind::Render,
        }
    }

    pub fn position(&self) -> Option<usize> {
        match self {
            Self::Lex { position, .. } | Self::Syntax { position, .. } => Some(*position),
            Self::Config { position, .. } => *position,
            Self::Scope { .. } | Self::Render { .. } => None,
        }
    }
}

impl From<CompileError> for Diagnostic {
    fn from(err: CompileError) -> Self {
        Self {
            kind: err.kind(),
            position: err.position(),
            message: err.to_string(),
        }
    }
}
