//! CEQL to CQP query compiler.
//!
//! Translates the simplified CEQL search syntax into CQP bracket/attribute
//! queries:
//!
//! - `elephant` → `[word="elephant"%c]`
//! - `{break}` → `[lemma="break"%c]`
//! - `said_VVD >>6>> that_CST` →
//!   `MU(meet [word="said"%c & pos="VVD"] [word="that"%c & pos="CST"] 1 6)`
//!
//! ## Pipeline
//!
//! input → [`syntax::lex`] → [`syntax::parse_tokens`] → [`ast::Query`] →
//! [`render::CqpRenderer`] (with [`extension`] hooks) → [`validate`] → output
//!
//! ```
//! use ceql_query::CeqlCompiler;
//!
//! let mut compiler = CeqlCompiler::new();
//! compiler.configure_named("lemma_attribute", "lemma").unwrap();
//! assert_eq!(compiler.compile("{break}").unwrap(), r#"[lemma="break"%c]"#);
//! ```

pub mod ast;
pub mod compiler;
pub mod config;
pub mod error;
pub mod extension;
pub mod render;
pub mod syntax;
pub mod validate;

pub use ast::{LiteralOrWildcard, Query, Term, WordMatch};
pub use compiler::CeqlCompiler;
pub use config::{AttributeBinding, CaseMode, ConfigOption};
pub use error::{CompileError, CompileResult, Diagnostic, DiagnosticKind};
pub use extension::{
    ExtensionRegistry, ExtensionRegistryBuilder, FnExtension, Node, Production, RenderContext,
    RenderExtension, WithinScope,
};
pub use render::{CqpRenderer, QueryRenderer};
pub use syntax::{lex, parse, Token};
